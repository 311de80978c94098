use fcom_core::diff::{diff_lines, diff_values, LineDiff, LineDiffKind};
use serde_json::json;

fn kinds(diff: &[LineDiff]) -> Vec<LineDiffKind> {
    diff.iter().map(|line| line.kind).collect()
}

#[test]
fn test_identical_text_is_all_equal() {
    let text = "{\n  \"set\": {\n    \"source\": 1\n  }\n}";
    let diff = diff_lines(text, text);
    assert_eq!(diff.len(), 5);
    assert!(diff.iter().all(|line| line.kind == LineDiffKind::Equal));
}

#[test]
fn test_empty_before_adds_every_line() {
    assert_eq!(
        diff_lines("", "a\nb"),
        vec![
            LineDiff {
                kind: LineDiffKind::Add,
                value: "a".to_string()
            },
            LineDiff {
                kind: LineDiffKind::Add,
                value: "b".to_string()
            },
        ]
    );
}

#[test]
fn test_empty_after_removes_every_line() {
    assert_eq!(
        kinds(&diff_lines("a\nb", "")),
        vec![LineDiffKind::Remove, LineDiffKind::Remove]
    );
}

#[test]
fn test_inserted_line_in_middle() {
    let diff = diff_lines("a\nc", "a\nb\nc");
    assert_eq!(
        kinds(&diff),
        vec![LineDiffKind::Equal, LineDiffKind::Add, LineDiffKind::Equal]
    );
    assert_eq!(diff[1].value, "b");
}

#[test]
fn test_diff_values_of_changed_processor() {
    let before = json!({"set": {"source": "old", "targetField": "$.event.Summary"}});
    let after = json!({"set": {"source": "new", "targetField": "$.event.Summary"}});

    let diff = diff_values(Some(&before), Some(&after));
    let added: Vec<&str> = diff
        .iter()
        .filter(|line| line.kind == LineDiffKind::Add)
        .map(|line| line.value.as_str())
        .collect();
    let removed: Vec<&str> = diff
        .iter()
        .filter(|line| line.kind == LineDiffKind::Remove)
        .map(|line| line.value.as_str())
        .collect();

    assert_eq!(added, vec!["    \"source\": \"new\","]);
    assert_eq!(removed, vec!["    \"source\": \"old\","]);
}

#[test]
fn test_diff_values_of_added_scalar() {
    let diff = diff_values(None, Some(&json!("Critical")));
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].kind, LineDiffKind::Add);
    assert_eq!(diff[0].value, "\"Critical\"");

    assert!(diff_values(None, Some(&serde_json::Value::Null)).is_empty());
}

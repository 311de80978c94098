//! Line-level diff for reviewing a single changed value.
//!
//! Presentation only: change classification compares whole values, never
//! lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineDiffKind {
    Equal,
    Add,
    Remove,
}

/// One line of a line diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineDiff {
    #[serde(rename = "type")]
    pub kind: LineDiffKind,
    pub value: String,
}

impl LineDiff {
    fn new(kind: LineDiffKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Diff two texts line by line using a longest common subsequence table.
///
/// The table holds common-suffix lengths computed backward. The forward
/// walk emits equal lines first, then an addition when skipping the new
/// line keeps at least as long a common suffix as skipping the old line,
/// otherwise a removal. Empty text has no lines.
pub fn diff_lines(before: &str, after: &str) -> Vec<LineDiff> {
    let a = split_lines(before);
    let b = split_lines(after);
    let (n, m) = (a.len(), b.len());

    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            out.push(LineDiff::new(LineDiffKind::Equal, a[i]));
            i += 1;
            j += 1;
        } else if table[i][j + 1] >= table[i + 1][j] {
            out.push(LineDiff::new(LineDiffKind::Add, b[j]));
            j += 1;
        } else {
            out.push(LineDiff::new(LineDiffKind::Remove, a[i]));
            i += 1;
        }
    }
    out.extend(a[i..].iter().map(|line| LineDiff::new(LineDiffKind::Remove, line)));
    out.extend(b[j..].iter().map(|line| LineDiff::new(LineDiffKind::Add, line)));
    out
}

/// Pretty JSON with two-space indentation; absent and `null` render empty.
pub fn format_diff_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    }
}

/// Line diff of two values after formatting.
pub fn diff_values(before: Option<&Value>, after: Option<&Value>) -> Vec<LineDiff> {
    diff_lines(&format_diff_value(before), &format_diff_value(after))
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

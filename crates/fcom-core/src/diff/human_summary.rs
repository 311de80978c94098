//! Human-readable review summary for staged diffs.

use crate::diff::line_diff::{diff_values, LineDiffKind};
use crate::diff::model::{ChangeAction, FieldChange, FieldOrigin, StagedDiff};

/// Render a Markdown review summary of a [`StagedDiff`].
///
/// The summary is intended for commit review. It is informational only
/// and does not affect the structured diff.
pub fn render_review_summary(diff: &StagedDiff) -> String {
    let mut out = String::new();

    // Header
    out.push_str("## Staged Override Changes\n\n");

    if diff.is_empty() {
        out.push_str("_No staged changes._\n");
        return out;
    }

    out.push_str(&format!(
        "**Total changes**: {}  \n**Edited objects**: {}\n\n",
        diff.total_changes,
        if diff.edited_objects.is_empty() {
            "none".to_string()
        } else {
            diff.edited_objects.join(", ")
        }
    ));

    for section in &diff.sections {
        out.push_str(&format!("### {}\n\n", section.title));
        if !section.method.is_empty() {
            out.push_str(&format!("Method: `{}`\n\n", section.method));
        }

        // Field changes
        for change in &section.field_changes {
            render_field_change(&mut out, change);
        }

        // Processor changes
        for change in &section.processor_changes {
            out.push_str(&format!(
                "- **{}** processor `{}`\n",
                action_label(change.action),
                change.processor.kind_label()
            ));
        }
        out.push('\n');
    }

    out
}

fn render_field_change(out: &mut String, change: &FieldChange) {
    let origin = match change.origin {
        FieldOrigin::Event => "event",
        FieldOrigin::Processor => "processor",
    };
    out.push_str(&format!(
        "- **{}** `{}` ({})\n",
        action_label(change.action),
        change.target,
        origin
    ));

    if change.action != ChangeAction::Updated {
        return;
    }
    out.push_str("\n  ```diff\n");
    for line in diff_values(change.before.as_ref(), change.after.as_ref()) {
        let marker = match line.kind {
            LineDiffKind::Equal => ' ',
            LineDiffKind::Add => '+',
            LineDiffKind::Remove => '-',
        };
        out.push_str(&format!("  {}{}\n", marker, line.value));
    }
    out.push_str("  ```\n\n");
}

fn action_label(action: ChangeAction) -> &'static str {
    match action {
        ChangeAction::Added => "Added",
        ChangeAction::Updated => "Updated",
        ChangeAction::Removed => "Removed",
    }
}

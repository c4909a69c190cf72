//! Unified diff generation.

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::workspace::DocumentChange;

/// Unified diff of one file, with three lines of context.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    let mut output = String::new();
    if old == new {
        return output;
    }
    let diff = TextDiff::from_lines(old, new);
    let _ = writeln!(output, "--- a/{}", path);
    let _ = writeln!(output, "+++ b/{}", path);
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        let _ = writeln!(output, "{}", hunk.header());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            let _ = write!(output, "{}{}", sign, change);
            if change.missing_newline() {
                let _ = writeln!(output);
            }
        }
    }
    output
}

/// Concatenated unified diffs for a list of document changes.
pub fn generate_unified_diff(changes: &[DocumentChange]) -> String {
    changes
        .iter()
        .map(|c| unified_diff(&c.path, &c.old_text, &c.new_text))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::workspace::DocumentId;

    #[test]
    fn identical_text_has_empty_diff() {
        assert_eq!(unified_diff("A.cs", "using A;\n", "using A;\n"), "");
    }

    #[test]
    fn single_line_change() {
        let diff = unified_diff(
            "App/A.cs",
            "namespace N\n{\n    using Sub;\n}\n",
            "namespace N\n{\n    using Company.Sub;\n}\n",
        );
        assert!(diff.starts_with("--- a/App/A.cs\n+++ b/App/A.cs\n@@ "));
        assert!(diff.contains("-    using Sub;\n"));
        assert!(diff.contains("+    using Company.Sub;\n"));
        assert!(diff.contains(" namespace N\n"));
    }

    #[test]
    fn missing_trailing_newline_is_terminated() {
        let diff = unified_diff("A.cs", "using A;", "using B;");
        assert!(diff.ends_with("+using B;\n"));
    }

    #[test]
    fn multiple_files_in_order() {
        let changes = vec![
            DocumentChange {
                id: DocumentId(0),
                path: "A.cs".to_string(),
                old_text: Arc::from("using A;\n"),
                new_text: Arc::from("using X.A;\n"),
            },
            DocumentChange {
                id: DocumentId(1),
                path: "B.cs".to_string(),
                old_text: Arc::from("using B;\n"),
                new_text: Arc::from("using X.B;\n"),
            },
        ];
        let diff = generate_unified_diff(&changes);
        let a = diff.find("--- a/A.cs").unwrap();
        let b = diff.find("--- a/B.cs").unwrap();
        assert!(a < b);
        assert_eq!(diff.matches("@@ -").count(), 2);
    }
}

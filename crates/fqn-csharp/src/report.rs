//! Per-document outcomes of a rewrite.

use std::fmt;

use serde::Serialize;

use fqn_core::output::DocumentInfo;
use fqn_core::workspace::DocumentId;

/// Why a document was left unchanged without being considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// The document has no syntax tree (it failed to parse, or is unknown).
    MissingTree(String),
    /// No semantic model could be obtained for the document.
    MissingSemanticModel,
    /// A directive in the rewrite scope sits under a preprocessor line.
    ConditionalDirectives,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTree(message) => write!(f, "no syntax tree: {}", message),
            SkipReason::MissingSemanticModel => write!(f, "no semantic model"),
            SkipReason::ConditionalDirectives => {
                write!(f, "directives under conditional compilation")
            }
        }
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// The text changed. `directives` counts renamed directives.
    Rewritten { directives: u32 },
    Unchanged,
    Skipped { reason: SkipReason },
}

impl DocumentOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        DocumentOutcome::Skipped { reason }
    }

    pub fn is_rewritten(&self) -> bool {
        matches!(self, DocumentOutcome::Rewritten { .. })
    }
}

/// A document's outcome together with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub id: DocumentId,
    pub path: String,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    /// Output form for CLI responses.
    pub fn to_info(&self) -> DocumentInfo {
        match &self.outcome {
            DocumentOutcome::Rewritten { directives } => {
                DocumentInfo::rewritten(&self.path, *directives)
            }
            DocumentOutcome::Unchanged => DocumentInfo::unchanged(&self.path),
            DocumentOutcome::Skipped { reason } => {
                DocumentInfo::skipped(&self.path, reason.to_string())
            }
        }
    }
}

/// Outcomes of a project or solution rewrite, in fold order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub documents: Vec<DocumentReport>,
    /// The fold stopped at a file boundary before visiting every document.
    pub cancelled: bool,
}

impl RewriteReport {
    pub fn push(&mut self, id: DocumentId, path: impl Into<String>, outcome: DocumentOutcome) {
        self.documents.push(DocumentReport {
            id,
            path: path.into(),
            outcome,
        });
    }

    pub fn rewritten(&self) -> usize {
        self.documents.iter().filter(|d| d.outcome.is_rewritten()).count()
    }

    pub fn skipped(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| matches!(d.outcome, DocumentOutcome::Skipped { .. }))
            .count()
    }

    pub fn infos(&self) -> Vec<DocumentInfo> {
        self.documents.iter().map(DocumentReport::to_info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_outcome() {
        let mut report = RewriteReport::default();
        report.push(DocumentId(0), "A.cs", DocumentOutcome::Rewritten { directives: 2 });
        report.push(DocumentId(1), "B.cs", DocumentOutcome::Unchanged);
        report.push(
            DocumentId(2),
            "C.cs",
            DocumentOutcome::skipped(SkipReason::ConditionalDirectives),
        );
        assert_eq!(report.rewritten(), 1);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn info_carries_reason_text() {
        let report = DocumentReport {
            id: DocumentId(0),
            path: "Broken.cs".to_string(),
            outcome: DocumentOutcome::skipped(SkipReason::MissingTree("unbalanced '{'".into())),
        };
        let info = report.to_info();
        assert_eq!(info.outcome, "skipped");
        assert_eq!(info.reason.as_deref(), Some("no syntax tree: unbalanced '{'"));
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(DocumentOutcome::Rewritten { directives: 3 }).unwrap();
        assert_eq!(json["outcome"], "rewritten");
        assert_eq!(json["directives"], 3);
    }
}

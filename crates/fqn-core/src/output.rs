//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input produces the same output (field order,
//!    document order)
//! 3. **Nullable vs absent:** An absent field means "not applicable"
//! 4. **Versioned:** Schema version in every response

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{FqnError, OutputErrorCode};

pub use crate::types::Location;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Document Results
// ============================================================================

/// What happened to one document during a rewrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Workspace-relative path.
    pub path: String,
    /// One of: rewritten, unchanged, skipped.
    pub outcome: String,
    /// Number of directives whose text changed (rewritten only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives: Option<u32>,
    /// Why the document was skipped (skipped only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DocumentInfo {
    pub fn rewritten(path: impl Into<String>, directives: u32) -> Self {
        DocumentInfo {
            path: path.into(),
            outcome: "rewritten".to_string(),
            directives: Some(directives),
            reason: None,
        }
    }

    pub fn unchanged(path: impl Into<String>) -> Self {
        DocumentInfo {
            path: path.into(),
            outcome: "unchanged".to_string(),
            directives: None,
            reason: None,
        }
    }

    pub fn skipped(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentInfo {
            path: path.into(),
            outcome: "skipped".to_string(),
            directives: None,
            reason: Some(reason.into()),
        }
    }
}

/// Totals over a rewrite.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub documents: u32,
    pub rewritten: u32,
    pub unchanged: u32,
    pub skipped: u32,
    /// Directives whose text changed, over all documents.
    pub directives: u32,
}

impl Summary {
    /// Tally a list of document results.
    pub fn from_documents(documents: &[DocumentInfo]) -> Self {
        let mut summary = Summary {
            documents: documents.len() as u32,
            ..Default::default()
        };
        for doc in documents {
            match doc.outcome.as_str() {
                "rewritten" => summary.rewritten += 1,
                "skipped" => summary.skipped += 1,
                _ => summary.unchanged += 1,
            }
            summary.directives += doc.directives.unwrap_or(0);
        }
        summary
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for the rewrite commands (directive, document, project, solution).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Scope of the rewrite: directive, document, project, or solution.
    pub scope: String,
    /// Per-document results, in solution order.
    pub documents: Vec<DocumentInfo>,
    pub summary: Summary,
    /// True when the fold stopped early on cancellation.
    pub cancelled: bool,
    /// Unified diff of all changes (present with `--format diff|json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    /// Whether changes were written to disk.
    pub applied: bool,
    /// Files that were written (present when applied).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_written: Option<Vec<String>>,
}

impl RewriteResponse {
    /// Create a response for a rewrite that has not been written to disk.
    pub fn new(scope: impl Into<String>, documents: Vec<DocumentInfo>, cancelled: bool) -> Self {
        let summary = Summary::from_documents(&documents);
        RewriteResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            scope: scope.into(),
            documents,
            summary,
            cancelled,
            diff: None,
            applied: false,
            files_written: None,
        }
    }

    /// Attach a unified diff.
    pub fn with_diff(mut self, diff: String) -> Self {
        self.diff = Some(diff);
        self
    }

    /// Record the files written to disk.
    pub fn with_apply(mut self, files_written: Vec<String>) -> Self {
        self.applied = true;
        self.files_written = Some(files_written);
        self
    }
}

/// One action offered at a position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionInfo {
    /// Stable action id: directive, document, project, solution.
    pub kind: String,
    /// Human-readable title.
    pub title: String,
}

/// Response for the actions command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Position the actions were computed for.
    pub location: Location,
    /// Canonical name of the directive at the position, if it resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
    pub actions: Vec<ActionInfo>,
}

impl ActionsResponse {
    pub fn new(location: Location, canonical_name: Option<String>, actions: Vec<ActionInfo>) -> Self {
        ActionsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            location,
            canonical_name,
            actions,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from an FqnError.
    pub fn from_error(err: &FqnError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, location) = match err {
            FqnError::DirectiveNotFound { file, line, col } => {
                (None, Some(Location::new(file.clone(), *line, *col)))
            }
            FqnError::InvalidArguments { details, .. } => (details.clone(), None),
            FqnError::FileNotFound { path } => (Some(serde_json::json!({ "path": path })), None),
            FqnError::ProjectNotFound { name } => {
                (Some(serde_json::json!({ "project": name })), None)
            }
            FqnError::ParseError { file, .. } => (Some(serde_json::json!({ "file": file })), None),
            FqnError::ApplyError { file, .. } => {
                let details = file.as_ref().map(|f| serde_json::json!({ "file": f }));
                (details, None)
            }
            _ => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            location,
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from an FqnError.
    pub fn from_error(err: &FqnError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emit
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_to_value<T: Serialize>(response: &T) -> serde_json::Value {
        let mut output = Vec::new();
        emit_response(response, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    mod rewrite_response {
        use super::*;

        #[test]
        fn status_is_first_field() {
            let response = RewriteResponse::new("document", vec![], false);
            let json = serde_json::to_string(&response).unwrap();
            assert!(json.starts_with("{\"status\":\"ok\""));
        }

        #[test]
        fn summary_counts_outcomes() {
            let documents = vec![
                DocumentInfo::rewritten("A.cs", 2),
                DocumentInfo::unchanged("B.cs"),
                DocumentInfo::skipped("C.cs", "conditional directives"),
                DocumentInfo::rewritten("D.cs", 1),
            ];
            let response = RewriteResponse::new("project", documents, false);
            assert_eq!(
                response.summary,
                Summary {
                    documents: 4,
                    rewritten: 2,
                    unchanged: 1,
                    skipped: 1,
                    directives: 3,
                }
            );
        }

        #[test]
        fn optional_fields_absent_until_set() {
            let value = emit_to_value(&RewriteResponse::new("solution", vec![], false));
            assert!(value.get("diff").is_none());
            assert!(value.get("files_written").is_none());
            assert_eq!(value["applied"], false);

            let applied = RewriteResponse::new("solution", vec![], false)
                .with_diff("--- a\n+++ b\n".to_string())
                .with_apply(vec!["A.cs".to_string()]);
            let value = emit_to_value(&applied);
            assert_eq!(value["applied"], true);
            assert_eq!(value["files_written"][0], "A.cs");
        }

        #[test]
        fn unchanged_document_omits_counts() {
            let value = serde_json::to_value(DocumentInfo::unchanged("A.cs")).unwrap();
            assert!(value.get("directives").is_none());
            assert!(value.get("reason").is_none());
        }
    }

    mod error_response {
        use super::*;

        #[test]
        fn directive_not_found_carries_location() {
            let err = FqnError::directive_not_found("A.cs", 3, 9);
            let value = emit_to_value(&ErrorResponse::from_error(&err));
            assert_eq!(value["status"], "error");
            assert_eq!(value["error"]["code"], 3);
            assert_eq!(value["error"]["location"]["line"], 3);
        }

        #[test]
        fn apply_error_carries_file_details() {
            let err = FqnError::ApplyError {
                message: "stale".to_string(),
                file: Some("A.cs".to_string()),
            };
            let info = ErrorInfo::from_error(&err);
            assert_eq!(info.code, 4);
            assert_eq!(info.details, Some(serde_json::json!({ "file": "A.cs" })));
        }
    }

    #[test]
    fn actions_response_serializes() {
        let response = ActionsResponse::new(
            Location::new("A.cs", 3, 11),
            Some("Company.Product.Sub".to_string()),
            vec![ActionInfo {
                kind: "directive".to_string(),
                title: "Fully qualify directive".to_string(),
            }],
        );
        let value = emit_to_value(&response);
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["actions"][0]["kind"], "directive");
        assert_eq!(value["canonical_name"], "Company.Product.Sub");
    }
}

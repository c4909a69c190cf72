//! Errors for caller-facing lookups.
//!
//! Rewrites degrade instead of failing: an unparseable or unbindable document
//! becomes a [`SkipReason`](crate::report::SkipReason). [`OpError`] covers
//! what a caller asked for that does not exist, such as a document id outside
//! the solution or a position that is not on a using directive.

use thiserror::Error;

use fqn_core::error::FqnError;
use fqn_core::workspace::{DocumentId, ProjectId};
use fqn_cst::ParserError;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("document {0} is not part of the solution")]
    DocumentNotFound(DocumentId),

    #[error("project {0} is not part of the solution")]
    ProjectNotFound(ProjectId),

    #[error("no using directive at byte offset {offset} of {path}")]
    DirectiveNotFound { path: String, offset: usize },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParserError,
    },
}

pub type OpResult<T> = Result<T, OpError>;

impl From<OpError> for FqnError {
    fn from(err: OpError) -> Self {
        match err {
            OpError::DocumentNotFound(id) => FqnError::file_not_found(id.to_string()),
            OpError::ProjectNotFound(id) => FqnError::ProjectNotFound {
                name: id.to_string(),
            },
            OpError::DirectiveNotFound { path, .. } => FqnError::DirectiveNotFound {
                file: path,
                line: 0,
                col: 0,
            },
            OpError::Parse { path, source } => FqnError::ParseError {
                file: path,
                message: source.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fqn_core::error::OutputErrorCode;

    #[test]
    fn lookup_failures_are_resolution_errors() {
        let err = FqnError::from(OpError::DirectiveNotFound {
            path: "A.cs".to_string(),
            offset: 12,
        });
        assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);

        let err = FqnError::from(OpError::DocumentNotFound(DocumentId(4)));
        assert_eq!(err.to_string(), "file not found: d4");
    }

    #[test]
    fn parse_failure_keeps_message() {
        let err = FqnError::from(OpError::Parse {
            path: "A.cs".to_string(),
            source: ParserError::UnbalancedDelimiter {
                delimiter: "{".to_string(),
                offset: 3,
            },
        });
        assert_eq!(err.to_string(), "parse error in A.cs: unbalanced '{'");
    }
}

//! Error types and error code constants for fqn.
//!
//! This module provides a unified error type (`FqnError`) that bridges
//! domain-specific errors from different subsystems (workspace loading,
//! configuration, parsing, directive lookup) into a common format suitable
//! for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file not found, no directive at location)
//! - `4`: Apply errors (failed to write changes, stale file on disk)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Rewrites themselves never produce an `FqnError`: a directive or file that
//! cannot be resolved or parsed is left unchanged and reported as an outcome.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::workspace::WorkspaceError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found, no directive at location).
    ResolutionError = 3,
    /// Apply errors (failed to write changes, stale file).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum FqnError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// File not found in the loaded solution.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Project not found in the loaded solution.
    #[error("project not found: {name}")]
    ProjectNotFound { name: String },

    /// No using directive covers the requested location.
    #[error("no using directive at {file}:{line}:{col}")]
    DirectiveNotFound { file: String, line: u32, col: u32 },

    /// The file could not be parsed.
    #[error("parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    /// Failed to apply changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Configuration could not be loaded.
    #[error("config error: {message}")]
    ConfigError { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&FqnError> for OutputErrorCode {
    fn from(err: &FqnError) -> Self {
        match err {
            FqnError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            FqnError::ConfigError { .. } => OutputErrorCode::InvalidArguments,
            FqnError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            FqnError::ProjectNotFound { .. } => OutputErrorCode::ResolutionError,
            FqnError::DirectiveNotFound { .. } => OutputErrorCode::ResolutionError,
            FqnError::ParseError { .. } => OutputErrorCode::ResolutionError,
            FqnError::ApplyError { .. } => OutputErrorCode::ApplyError,
            FqnError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<FqnError> for OutputErrorCode {
    fn from(err: FqnError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<WorkspaceError> for FqnError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::RootNotFound { path } => FqnError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            },
            WorkspaceError::StaleFile { path } => FqnError::ApplyError {
                message: format!("{} changed on disk since it was loaded", path),
                file: Some(path),
            },
            WorkspaceError::Write { path, source } => FqnError::ApplyError {
                message: format!("failed to write {}: {}", path, source),
                file: Some(path),
            },
            WorkspaceError::InvalidPattern(message) => FqnError::ConfigError { message },
            WorkspaceError::Io(io_err) => FqnError::InternalError {
                message: format!("IO error: {}", io_err),
            },
        }
    }
}

impl From<ConfigError> for FqnError {
    fn from(err: ConfigError) -> Self {
        FqnError::ConfigError {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl FqnError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        FqnError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        FqnError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        FqnError::FileNotFound { path: path.into() }
    }

    /// Create a directive not found error.
    pub fn directive_not_found(file: impl Into<String>, line: u32, col: u32) -> Self {
        FqnError::DirectiveNotFound {
            file: file.into(),
            line,
            col,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        FqnError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

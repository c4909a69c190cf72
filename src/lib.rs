//! fqn: rewrites C# using directives to their fully-qualified names.
//!
//! The workspace crates do the work; this package ties them together behind
//! the `fqn` binary and the [`cli`] front door.

// Core infrastructure, re-exported from fqn-core
pub use fqn_core::config;
pub use fqn_core::diff;
pub use fqn_core::error;
pub use fqn_core::output;
pub use fqn_core::text;
pub use fqn_core::types;
pub use fqn_core::workspace;

// Syntax tree and rewrite operations
pub use fqn_csharp as csharp;
pub use fqn_cst as cst;

// Front door
pub mod cli;

//! Rewrite entry points at directive, document, project, and solution scope.
//!
//! Each scope is layered on the one below it. Every entry point takes a
//! [`Solution`](fqn_core::workspace::Solution) and returns a new one; the
//! input is never modified.

mod actions;
mod directive;
mod document;
mod project;
mod solution;

pub use actions::{available_actions, ActionKind, AvailableActions};
pub use directive::{apply_directive_rewrite, plan_directive_rewrite, rewrite_directive, DirectivePlan};
pub use document::{rewrite_document, rewrite_tree, TreeRewrite};
pub use project::rewrite_project;
pub use solution::rewrite_solution;

// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Traversal and rewriting passes over a C# compilation unit.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_namespace`
//! - Children are visited in source order: extern aliases, using directives,
//!   then members
//!
//! The read-only passes ([`classify_directives`], [`find_directive_at`],
//! [`declared_namespaces`]) are [`Visitor`] implementations. The rewriting
//! passes ([`remove_directives`], [`write_directives`], [`replace_directive`])
//! are pure functions that return a new tree and leave their input alone.

mod classify;
mod lookup;
mod namespaces;
mod remove;
mod replace;
mod traits;
mod write;

pub use classify::{
    classify_directive, classify_directives, classify_scopes, ClassifiedDirectives,
    DirectiveCategory, STANDARD_LIBRARY_ROOT,
};
pub use lookup::{find_directive, find_directive_at};
pub use namespaces::declared_namespaces;
pub use remove::{remove_directives, TraversalMode};
pub use replace::replace_directive;
pub use traits::{walk_compilation_unit, walk_namespace, VisitResult, Visitor};
pub use write::write_directives;

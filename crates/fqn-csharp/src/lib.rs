//! C# using-directive rewriting.
//!
//! Rewrites every using directive in a rewrite scope to name its namespace by
//! the fully-qualified name, then writes the directives back as one ordered
//! block per outermost namespace. The pipeline for one document:
//!
//! 1. classify each rewrite scope (`fqn_cst::classify_scopes`)
//! 2. resolve each directive ([`resolve`])
//! 3. synthesize a replacement ([`synthesize`])
//! 4. order the block ([`order`])
//! 5. remove the stale directives, then write the block (`fqn_cst`)
//!
//! [`ops`] layers the directive, document, project, and solution entry points
//! on top, all written against the [`host::DocumentServices`] seam.
//!
//! ```
//! use fqn_core::config::RewriteOptions;
//! use fqn_core::workspace::SolutionBuilder;
//! use fqn_csharp::{rewrite_document, IndexedServices};
//!
//! let mut builder = SolutionBuilder::new("/ws");
//! let app = builder.add_project("App");
//! let doc = builder.add_document(
//!     app,
//!     "Program.cs",
//!     "namespace Company.Product\n{\n    using Sub;\n}\n",
//! );
//! builder.add_document(app, "Sub.cs", "namespace Company.Product.Sub { }\n");
//! let solution = builder.build();
//! let services = IndexedServices::default();
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let (edited, _) = runtime.block_on(rewrite_document(
//!     &services,
//!     &solution,
//!     doc,
//!     RewriteOptions::default(),
//! ));
//! assert!(edited.document(doc).unwrap().text().contains("using Company.Product.Sub;"));
//! ```

pub mod error;
pub mod host;
pub mod ops;
pub mod order;
pub mod report;
pub mod resolve;
pub mod semantic;
pub mod synthesize;

pub use error::{OpError, OpResult};
pub use host::{DocumentServices, IndexedServices};
pub use ops::{
    apply_directive_rewrite, available_actions, plan_directive_rewrite, rewrite_directive,
    rewrite_document, rewrite_project, rewrite_solution, ActionKind, AvailableActions,
    DirectivePlan,
};
pub use report::{DocumentOutcome, DocumentReport, RewriteReport, SkipReason};
pub use semantic::{NamespaceIndex, SemanticModel, Symbol, SymbolKind};

//! Whole-document rewrite.
//!
//! classify, resolve each directive, synthesize, order, remove, write. Each
//! outermost namespace gets a block built from its own directives. The
//! remove and write steps are separate whole-tree passes; the first pass's
//! output feeds the second.

use std::collections::HashSet;

use fqn_core::config::RewriteOptions;
use fqn_core::workspace::{DocumentId, Solution};
use fqn_cst::{
    classify_directives, classify_scopes, remove_directives, write_directives, Codegen,
    CompilationUnit, DirectiveCategory, NodeId,
};
use tracing::{debug, warn};

use crate::host::DocumentServices;
use crate::order::{order_directives, BLOCK_ORDER};
use crate::report::{DocumentOutcome, SkipReason};
use crate::resolve::{resolve_canonical_name, semantic_model_or_compute};
use crate::semantic::SemanticModel;
use crate::synthesize::synthesize_directive;

/// Result of rewriting one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRewrite {
    /// The rewritten tree and the number of directives whose name changed.
    Rewritten { root: CompilationUnit, renamed: u32 },
    /// No directive is in the rewrite scope.
    NothingInScope,
    /// An in-scope directive sits under a preprocessor line.
    Conditional,
}

/// Rewrite the directives of one tree. Pure: `root` is not modified.
pub fn rewrite_tree(
    root: &CompilationUnit,
    model: &dyn SemanticModel,
    options: RewriteOptions,
) -> TreeRewrite {
    let classified = classify_directives(root, options.scope);
    if classified.is_empty() {
        return TreeRewrite::NothingInScope;
    }
    if classified.iter().any(|d| d.has_preprocessor_trivia()) {
        return TreeRewrite::Conditional;
    }

    // Top-level directives appear in every scope under the file policy.
    let mut renamed: HashSet<NodeId> = HashSet::new();
    let mut blocks = Vec::new();
    for scope in classify_scopes(root, options.scope) {
        let mut synthesized = Vec::with_capacity(scope.len());
        for category in BLOCK_ORDER {
            for directive in scope.get(category) {
                let canonical = resolve_canonical_name(model, directive);
                let replacement = synthesize_directive(directive, canonical.as_deref(), options);
                if replacement != **directive {
                    if renamed.insert(directive.id) {
                        debug!(
                            from = %directive.name.plain_text(),
                            to = %replacement.name.plain_text(),
                            "directive renamed"
                        );
                    }
                } else if canonical.is_none() && category != DirectiveCategory::Aliased {
                    debug!(name = %directive.name.plain_text(), "directive does not resolve; kept");
                }
                synthesized.push(replacement);
            }
        }
        blocks.push(order_directives(synthesized));
    }

    let removed = remove_directives(root, options.scope);
    let written = write_directives(&removed, options.scope, &blocks);
    TreeRewrite::Rewritten {
        root: written,
        renamed: renamed.len() as u32,
    }
}

/// Rewrite one document of `solution`.
///
/// Returns the solution unchanged with a `Skipped` outcome when the document
/// is unknown, does not parse, cannot be bound, or keeps directives under
/// conditional compilation.
pub async fn rewrite_document(
    services: &dyn DocumentServices,
    solution: &Solution,
    id: DocumentId,
    options: RewriteOptions,
) -> (Solution, DocumentOutcome) {
    let Some(document) = solution.document(id) else {
        let reason = SkipReason::MissingTree(format!("document {} is not part of the solution", id));
        return (solution.clone(), DocumentOutcome::skipped(reason));
    };

    let root = match services.syntax_root(document).await {
        Ok(root) => root,
        Err(err) => {
            warn!(path = %document.path, error = %err, "skipping document: parse failed");
            let reason = SkipReason::MissingTree(err.to_string());
            return (solution.clone(), DocumentOutcome::skipped(reason));
        }
    };
    let Some(model) = semantic_model_or_compute(services, solution, document, None).await else {
        warn!(path = %document.path, "skipping document: no semantic model");
        return (
            solution.clone(),
            DocumentOutcome::skipped(SkipReason::MissingSemanticModel),
        );
    };

    let (new_root, renamed) = match rewrite_tree(&root, model.as_ref(), options) {
        TreeRewrite::Rewritten { root, renamed } => (root, renamed),
        TreeRewrite::NothingInScope => {
            debug!(path = %document.path, "no directives in scope");
            return (solution.clone(), DocumentOutcome::Unchanged);
        }
        TreeRewrite::Conditional => {
            warn!(path = %document.path, "skipping document: conditional directives");
            return (
                solution.clone(),
                DocumentOutcome::skipped(SkipReason::ConditionalDirectives),
            );
        }
    };

    let text = new_root.to_source();
    if text == document.text() {
        debug!(path = %document.path, "already canonical");
        return (solution.clone(), DocumentOutcome::Unchanged);
    }
    match solution.with_document_text(id, text) {
        Some(edited) => {
            debug!(path = %document.path, renamed, "document rewritten");
            (edited, DocumentOutcome::Rewritten { directives: renamed })
        }
        None => (solution.clone(), DocumentOutcome::Unchanged),
    }
}

//! Single-directive rewrite.
//!
//! A caller points at one directive by byte offset. Planning resolves the
//! directive and synthesizes its replacement; applying swaps just that node
//! and commits a new document text.

use std::sync::Arc;

use fqn_core::config::RewriteOptions;
use fqn_core::workspace::{DocumentId, Solution};
use fqn_cst::{
    find_directive, find_directive_at, replace_directive, Codegen, CompilationUnit, NodeId,
    UsingDirective,
};
use tracing::debug;

use crate::error::{OpError, OpResult};
use crate::host::DocumentServices;
use crate::report::DocumentOutcome;
use crate::resolve::{resolve_canonical_name, semantic_model_or_compute};
use crate::synthesize::synthesize_directive;

/// A resolved directive rewrite, ready to apply.
#[derive(Debug, Clone)]
pub struct DirectivePlan {
    pub document: DocumentId,
    pub directive: NodeId,
    /// The name as written, without trivia.
    pub written_name: String,
    pub canonical_name: String,
    pub replacement: UsingDirective,
    root: Arc<CompilationUnit>,
}

impl DirectivePlan {
    /// Swap the directive in its tree and commit the new text to `solution`.
    ///
    /// `None` if the document is no longer part of `solution`.
    pub fn apply(&self, solution: &Solution) -> Option<Solution> {
        let root = replace_directive(&self.root, self.directive, &self.replacement)?;
        solution.with_document_text(self.document, root.to_source())
    }
}

/// The tree, the id of the directive at `offset`, and the directive's
/// canonical name (`None` when the name does not bind).
///
/// Errors if the document is unknown, does not parse, or has no directive at
/// `offset`.
pub(crate) async fn resolve_directive_at(
    services: &dyn DocumentServices,
    solution: &Solution,
    document: DocumentId,
    offset: usize,
) -> OpResult<(Arc<CompilationUnit>, NodeId, Option<String>)> {
    let doc = solution
        .document(document)
        .ok_or(OpError::DocumentNotFound(document))?;
    let root = services
        .syntax_root(doc)
        .await
        .map_err(|source| OpError::Parse {
            path: doc.path.clone(),
            source,
        })?;
    let directive = find_directive_at(&root, offset).ok_or_else(|| OpError::DirectiveNotFound {
        path: doc.path.clone(),
        offset,
    })?;
    let id = directive.id;
    let canonical = match semantic_model_or_compute(services, solution, doc, None).await {
        Some(model) => resolve_canonical_name(model.as_ref(), directive),
        None => None,
    };
    Ok((Arc::clone(&root), id, canonical))
}

/// Plan the rewrite of the directive at `offset`.
///
/// `Ok(None)` when there is nothing to do: the name does not bind, it is
/// already canonical, or synthesis leaves the directive as written (a
/// `global::` name, or an alias with alias renaming off).
pub async fn plan_directive_rewrite(
    services: &dyn DocumentServices,
    solution: &Solution,
    document: DocumentId,
    offset: usize,
    options: RewriteOptions,
) -> OpResult<Option<DirectivePlan>> {
    let (root, id, canonical) = resolve_directive_at(services, solution, document, offset).await?;
    let Some(canonical) = canonical else {
        debug!(offset, "directive does not resolve");
        return Ok(None);
    };
    let Some(directive) = find_directive(&root, id) else {
        return Ok(None);
    };
    let replacement = synthesize_directive(directive, Some(&canonical), options);
    if replacement == *directive {
        return Ok(None);
    }
    Ok(Some(DirectivePlan {
        document,
        directive: id,
        written_name: directive.name.plain_text(),
        canonical_name: canonical,
        replacement,
        root,
    }))
}

/// Replace one directive of `root` with its synthesized form and commit.
///
/// The single-directive entry point for callers that already hold the tree
/// and the canonical name. `None` if synthesis is a no-op or the directive
/// or document is not found.
pub fn apply_directive_rewrite(
    solution: &Solution,
    document: DocumentId,
    root: &CompilationUnit,
    directive: &UsingDirective,
    canonical: Option<&str>,
    options: RewriteOptions,
) -> Option<Solution> {
    let replacement = synthesize_directive(directive, canonical, options);
    if replacement == *directive {
        return None;
    }
    let root = replace_directive(root, directive.id, &replacement)?;
    solution.with_document_text(document, root.to_source())
}

/// Rewrite the directive at `offset`.
///
/// The solution comes back unchanged with [`DocumentOutcome::Unchanged`] when
/// there is nothing to rewrite.
pub async fn rewrite_directive(
    services: &dyn DocumentServices,
    solution: &Solution,
    document: DocumentId,
    offset: usize,
    options: RewriteOptions,
) -> OpResult<(Solution, DocumentOutcome)> {
    let Some(plan) = plan_directive_rewrite(services, solution, document, offset, options).await?
    else {
        return Ok((solution.clone(), DocumentOutcome::Unchanged));
    };
    match plan.apply(solution) {
        Some(edited) => {
            debug!(from = %plan.written_name, to = %plan.canonical_name, "directive rewritten");
            Ok((edited, DocumentOutcome::Rewritten { directives: 1 }))
        }
        None => Ok((solution.clone(), DocumentOutcome::Unchanged)),
    }
}

//! Project fold.

use fqn_core::config::RewriteOptions;
use fqn_core::workspace::{ProjectId, Solution};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::document::rewrite_document;
use crate::error::{OpError, OpResult};
use crate::host::DocumentServices;
use crate::report::{DocumentOutcome, RewriteReport};

/// Rewrite every document of one project.
///
/// Documents are rewritten strictly one after another. Each step looks its
/// document up in the solution produced by the previous step, never in the
/// one passed in. `cancel` is checked before each document only; when it
/// fires the fold stops and returns the solution built so far with
/// `report.cancelled` set.
#[instrument(level = "info", skip_all, fields(project = %project))]
pub async fn rewrite_project(
    services: &dyn DocumentServices,
    solution: &Solution,
    project: ProjectId,
    options: RewriteOptions,
    cancel: Option<&CancellationToken>,
) -> OpResult<(Solution, RewriteReport)> {
    let mut report = RewriteReport::default();
    let solution = fold_project(services, solution.clone(), project, options, cancel, &mut report).await?;
    info!(
        rewritten = report.rewritten(),
        skipped = report.skipped(),
        cancelled = report.cancelled,
        "project rewritten"
    );
    Ok((solution, report))
}

/// The fold itself, accumulating into a caller-owned report.
pub(crate) async fn fold_project(
    services: &dyn DocumentServices,
    mut solution: Solution,
    project: ProjectId,
    options: RewriteOptions,
    cancel: Option<&CancellationToken>,
    report: &mut RewriteReport,
) -> OpResult<Solution> {
    let ids = solution
        .project(project)
        .ok_or(OpError::ProjectNotFound(project))?
        .documents
        .clone();

    for id in ids {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            report.cancelled = true;
            break;
        }
        let path = match solution.document(id) {
            Some(document) => document.path.clone(),
            None => continue,
        };
        let (next, outcome) = rewrite_document(services, &solution, id, options).await;
        if !matches!(outcome, DocumentOutcome::Unchanged) {
            info!(%path, ?outcome, "document");
        }
        report.push(id, path, outcome);
        solution = next;
    }
    Ok(solution)
}

//! Solution fold.

use fqn_core::config::RewriteOptions;
use fqn_core::workspace::Solution;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::project::fold_project;
use crate::error::OpResult;
use crate::host::DocumentServices;
use crate::report::RewriteReport;

/// Rewrite every project of `solution`, in project order.
///
/// Same discipline as [`rewrite_project`](super::rewrite_project): strictly
/// sequential, each project folded over the solution the previous one
/// produced, cancellation observed only between documents.
#[instrument(level = "info", skip_all, fields(projects = solution.projects().len()))]
pub async fn rewrite_solution(
    services: &dyn DocumentServices,
    solution: &Solution,
    options: RewriteOptions,
    cancel: Option<&CancellationToken>,
) -> OpResult<(Solution, RewriteReport)> {
    let mut report = RewriteReport::default();
    let ids: Vec<_> = solution.projects().iter().map(|p| p.id).collect();

    let mut current = solution.clone();
    for id in ids {
        current = fold_project(services, current, id, options, cancel, &mut report).await?;
        if report.cancelled {
            break;
        }
    }
    info!(
        documents = report.documents.len(),
        rewritten = report.rewritten(),
        skipped = report.skipped(),
        cancelled = report.cancelled,
        "solution rewritten"
    );
    Ok((current, report))
}

//! CLI front door.
//!
//! Library-level helpers behind the `fqn` binary:
//! - [`Workspace::open`] loads configuration and every C# document under a root
//! - [`run_rewrite`] runs one of the four rewrite scopes and builds the response
//! - [`run_actions`] lists the actions offered at a position
//!
//! All functions return `Result<T, FqnError>`; the binary turns errors into
//! JSON error responses with stable exit codes.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::info;

use fqn_core::config::{CliOverrides, ResolvedConfig, RewriteOptions};
use fqn_core::diff::generate_unified_diff;
use fqn_core::error::FqnError;
use fqn_core::output::{ActionsResponse, Location, RewriteResponse};
use fqn_core::text::position_to_byte_offset;
use fqn_core::workspace::{write_changes, DocumentId, Solution};
use fqn_csharp::{
    available_actions, rewrite_directive, rewrite_document, rewrite_project, rewrite_solution,
    IndexedServices, OpError, RewriteReport,
};

// ============================================================================
// Workspace
// ============================================================================

/// A loaded workspace: resolved configuration, the solution, and the services
/// that parse and bind its documents.
#[derive(Debug)]
pub struct Workspace {
    config: ResolvedConfig,
    solution: Solution,
    services: IndexedServices,
}

impl Workspace {
    /// Resolve configuration for `root` and load its C# documents.
    pub fn open(root: &Path, overrides: &CliOverrides) -> Result<Self, FqnError> {
        let config = ResolvedConfig::resolve(root, overrides)?;
        let solution = Solution::load(root, &config.workspace_config())?;
        let services = IndexedServices::new(config.reference_namespaces.value.iter().cloned());
        info!(
            root = %solution.root().display(),
            projects = solution.projects().len(),
            documents = solution.documents().count(),
            scope = %config.scope.value,
            "workspace loaded"
        );
        Ok(Workspace {
            config,
            solution,
            services,
        })
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn options(&self) -> RewriteOptions {
        self.config.rewrite_options()
    }

    /// Document and byte offset for a `file:line:col` location.
    fn locate(&self, at: &str) -> Result<(Location, DocumentId, usize), FqnError> {
        let location = Location::parse(at).ok_or_else(|| {
            FqnError::invalid_args(format!(
                "invalid location format '{}', expected path:line:col",
                at
            ))
        })?;
        let document = self
            .solution
            .document_by_path(&location.file)
            .ok_or_else(|| FqnError::file_not_found(location.file.clone()))?;
        let offset = position_to_byte_offset(document.text(), location.line, location.col)
            .ok_or_else(|| {
                FqnError::directive_not_found(location.file.clone(), location.line, location.col)
            })?;
        Ok((location, document.id, offset))
    }
}

/// Map an operation error, giving directive lookups their real position.
fn op_error(err: OpError, location: &Location) -> FqnError {
    match err {
        OpError::DirectiveNotFound { .. } => {
            FqnError::directive_not_found(location.file.clone(), location.line, location.col)
        }
        other => other.into(),
    }
}

// ============================================================================
// Rewrite
// ============================================================================

/// Which entry point to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteScope {
    /// The directive at a `file:line:col` location.
    Directive { at: String },
    /// One document, by workspace-relative path.
    Document { path: String },
    /// One project by name; the first project when `None`.
    Project { name: Option<String> },
    Solution,
}

impl RewriteScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteScope::Directive { .. } => "directive",
            RewriteScope::Document { .. } => "document",
            RewriteScope::Project { .. } => "project",
            RewriteScope::Solution => "solution",
        }
    }
}

/// Run a rewrite and build its response.
///
/// The response always carries the unified diff. With `apply`, changed files
/// are written back after every one of them passes the stale-file check.
pub async fn run_rewrite(
    workspace: &Workspace,
    scope: &RewriteScope,
    apply: bool,
    cancel: Option<&CancellationToken>,
) -> Result<RewriteResponse, FqnError> {
    let original = &workspace.solution;
    let services = &workspace.services;
    let options = workspace.options();

    let (edited, report) = match scope {
        RewriteScope::Directive { at } => {
            let (location, id, offset) = workspace.locate(at)?;
            let (edited, outcome) = rewrite_directive(services, original, id, offset, options)
                .await
                .map_err(|e| op_error(e, &location))?;
            let mut report = RewriteReport::default();
            report.push(id, location.file, outcome);
            (edited, report)
        }
        RewriteScope::Document { path } => {
            let document = original
                .document_by_path(path)
                .ok_or_else(|| FqnError::file_not_found(path.clone()))?;
            let (edited, outcome) = rewrite_document(services, original, document.id, options).await;
            let mut report = RewriteReport::default();
            report.push(document.id, document.path.clone(), outcome);
            (edited, report)
        }
        RewriteScope::Project { name } => {
            let project = match name {
                Some(name) => original.project_by_name(name),
                None => original.projects().first(),
            }
            .ok_or_else(|| FqnError::ProjectNotFound {
                name: name.clone().unwrap_or_default(),
            })?;
            rewrite_project(services, original, project.id, options, cancel).await?
        }
        RewriteScope::Solution => rewrite_solution(services, original, options, cancel).await?,
    };

    let changes = edited.changes_since(original);
    let diff = generate_unified_diff(&changes);
    let response =
        RewriteResponse::new(scope.as_str(), report.infos(), report.cancelled).with_diff(diff);
    info!(
        scope = scope.as_str(),
        changed = changes.len(),
        cancelled = report.cancelled,
        "rewrite finished"
    );

    if !apply {
        return Ok(response);
    }
    let written = write_changes(original, &edited)?;
    Ok(response.with_apply(written))
}

/// Human-readable summary of a rewrite response.
pub fn format_summary(response: &RewriteResponse) -> String {
    let summary = &response.summary;
    let mut out = String::new();
    let verb = if response.applied {
        "Rewrote"
    } else {
        "Dry run: would rewrite"
    };
    out.push_str(&format!(
        "{} {} of {} document(s) ({} directive(s) renamed)\n",
        verb, summary.rewritten, summary.documents, summary.directives
    ));
    for document in &response.documents {
        match (document.outcome.as_str(), &document.reason) {
            ("unchanged", _) => {}
            (outcome, Some(reason)) => {
                out.push_str(&format!("  {:<10} {}: {}\n", outcome, document.path, reason));
            }
            (outcome, None) => {
                out.push_str(&format!("  {:<10} {}\n", outcome, document.path));
            }
        }
    }
    if response.cancelled {
        out.push_str("  cancelled before every document was visited\n");
    }
    out
}

// ============================================================================
// Actions
// ============================================================================

/// Actions offered at a `file:line:col` location.
pub async fn run_actions(workspace: &Workspace, at: &str) -> Result<ActionsResponse, FqnError> {
    let (location, id, offset) = workspace.locate(at)?;
    let available = available_actions(
        &workspace.services,
        &workspace.solution,
        id,
        offset,
        workspace.options(),
    )
    .await
    .map_err(|e| op_error(e, &location))?;
    let actions = available.actions.iter().map(|kind| kind.to_info()).collect();
    Ok(ActionsResponse::new(location, available.canonical_name, actions))
}

// ============================================================================
// Tests
// ============================================================================

//! Actions offered at a position.

use std::fmt;

use serde::Serialize;

use fqn_core::config::RewriteOptions;
use fqn_core::output::ActionInfo;
use fqn_core::workspace::{DocumentId, Solution};
use fqn_cst::find_directive;

use super::directive::resolve_directive_at;
use crate::error::OpResult;
use crate::host::DocumentServices;
use crate::synthesize::would_rename;

/// One of the four rewrite entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Directive,
    Document,
    Project,
    Solution,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Directive => "directive",
            ActionKind::Document => "document",
            ActionKind::Project => "project",
            ActionKind::Solution => "solution",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActionKind::Directive => "Fully qualify this using directive",
            ActionKind::Document => "Fully qualify using directives in document",
            ActionKind::Project => "Fully qualify using directives in project",
            ActionKind::Solution => "Fully qualify using directives in solution",
        }
    }

    pub fn to_info(self) -> ActionInfo {
        ActionInfo {
            kind: self.as_str().to_string(),
            title: self.title().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What can be done with the directive at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableActions {
    /// Canonical name of the directive, if it binds.
    pub canonical_name: Option<String>,
    pub actions: Vec<ActionKind>,
}

/// Actions offered for the directive at `offset`.
///
/// The directive and document actions are offered only when the directive
/// would actually be renamed. The project and solution actions are offered
/// for any directive. A position that is not on a using directive is an
/// error.
pub async fn available_actions(
    services: &dyn DocumentServices,
    solution: &Solution,
    document: DocumentId,
    offset: usize,
    options: RewriteOptions,
) -> OpResult<AvailableActions> {
    let (root, id, canonical_name) = resolve_directive_at(services, solution, document, offset).await?;

    let mut actions = Vec::with_capacity(4);
    let renames = find_directive(&root, id)
        .is_some_and(|directive| would_rename(directive, canonical_name.as_deref(), options));
    if renames {
        actions.push(ActionKind::Directive);
        actions.push(ActionKind::Document);
    }
    actions.push(ActionKind::Project);
    actions.push(ActionKind::Solution);

    Ok(AvailableActions {
        canonical_name,
        actions,
    })
}

// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Stale-directive removal.
//!
//! A pure recursive descent that threads a [`TraversalMode`]: directives
//! owned by a declaration visited `Inside` the rewrite scope are dropped,
//! except `GlobalOrExternal` ones, which stay in their original order, and
//! top-level `global using` directives, which only the compilation unit may
//! hold. Everything else is copied through untouched.

use fqn_core::config::ScopePolicy;

use super::classify::{classify_directive, DirectiveCategory};
use crate::nodes::{CompilationUnit, Member, NamespaceDeclaration, UsingDirective};

/// Whether the declaration being visited is inside the rewrite scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    Outside,
    Inside,
}

impl TraversalMode {
    /// Mode for the compilation unit itself.
    pub fn for_compilation_unit(policy: ScopePolicy) -> Self {
        match policy {
            ScopePolicy::Namespace => TraversalMode::Outside,
            ScopePolicy::File => TraversalMode::Inside,
        }
    }
}

/// Remove every in-scope directive except `GlobalOrExternal` ones.
pub fn remove_directives(root: &CompilationUnit, policy: ScopePolicy) -> CompilationUnit {
    let mode = TraversalMode::for_compilation_unit(policy);
    CompilationUnit {
        externs: root.externs.clone(),
        usings: retain_in_scope(&root.usings, mode, true),
        members: remove_in_members(&root.members),
        end_of_file: root.end_of_file.clone(),
    }
}

fn retain_in_scope(
    usings: &[UsingDirective],
    mode: TraversalMode,
    at_compilation_unit: bool,
) -> Vec<UsingDirective> {
    match mode {
        TraversalMode::Outside => usings.to_vec(),
        TraversalMode::Inside => usings
            .iter()
            .filter(|d| {
                classify_directive(d) == DirectiveCategory::GlobalOrExternal
                    || (at_compilation_unit && d.global_keyword.is_some())
            })
            .cloned()
            .collect(),
    }
}

fn remove_in_members(members: &[Member]) -> Vec<Member> {
    members
        .iter()
        .map(|member| match member {
            Member::Namespace(ns) => {
                Member::Namespace(remove_in_namespace(ns, TraversalMode::Inside))
            }
            Member::Other(other) => Member::Other(other.clone()),
        })
        .collect()
}

fn remove_in_namespace(ns: &NamespaceDeclaration, mode: TraversalMode) -> NamespaceDeclaration {
    NamespaceDeclaration {
        usings: retain_in_scope(&ns.usings, mode, false),
        members: remove_in_members(&ns.members),
        ..ns.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_compilation_unit, Codegen};

    #[test]
    fn namespace_policy_keeps_compilation_unit_directives() {
        let unit = parse_compilation_unit(
            "using A;\nnamespace N\n{\n    using B;\n    class C { }\n}\n",
        )
        .unwrap();
        let removed = remove_directives(&unit, ScopePolicy::Namespace);
        assert_eq!(
            removed.to_source(),
            "using A;\nnamespace N\n{\n    class C { }\n}\n"
        );
    }

    #[test]
    fn nested_namespaces_are_cleared_independently() {
        let unit = parse_compilation_unit(
            "namespace N\n{\n    using B;\n    namespace M\n    {\n        using C;\n    }\n    namespace O\n    {\n        using D;\n    }\n}\n",
        )
        .unwrap();
        let removed = remove_directives(&unit, ScopePolicy::Namespace);
        assert_eq!(
            removed.to_source(),
            "namespace N\n{\n    namespace M\n    {\n    }\n    namespace O\n    {\n    }\n}\n"
        );
    }

    #[test]
    fn global_or_external_directives_survive() {
        let unit = parse_compilation_unit(
            "namespace N\n{\n    using global::A;\n    using B;\n    using G = global::C;\n}\n",
        )
        .unwrap();
        let removed = remove_directives(&unit, ScopePolicy::Namespace);
        assert_eq!(
            removed.to_source(),
            "namespace N\n{\n    using global::A;\n    using G = global::C;\n}\n"
        );
    }

    #[test]
    fn file_policy_clears_compilation_unit_too() {
        let unit = parse_compilation_unit("using A;\nusing B;\nclass C { }\n").unwrap();
        let removed = remove_directives(&unit, ScopePolicy::File);
        assert_eq!(removed.to_source(), "class C { }\n");
    }

    #[test]
    fn file_policy_keeps_top_level_global_using() {
        let unit = parse_compilation_unit(
            "global using System;\nusing A;\nnamespace N\n{\n    using B;\n}\n",
        )
        .unwrap();
        let removed = remove_directives(&unit, ScopePolicy::File);
        assert_eq!(
            removed.to_source(),
            "global using System;\nnamespace N\n{\n}\n"
        );
    }

    #[test]
    fn file_without_namespace_is_untouched_under_namespace_policy() {
        let source = "using B;\nusing A;\nclass C { }\n";
        let unit = parse_compilation_unit(source).unwrap();
        let removed = remove_directives(&unit, ScopePolicy::Namespace);
        assert_eq!(removed, unit);
    }
}

// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Directive classification.
//!
//! Every using directive in scope falls into exactly one category, decided
//! in this order:
//!
//! 1. `GlobalOrExternal`: the name uses an alias qualifier (`global::`,
//!    `extern_alias::`) anywhere, type arguments included
//! 2. `Aliased`: the directive has an `Alias =` clause
//! 3. `StandardLibrary`: the leftmost identifier is [`STANDARD_LIBRARY_ROOT`]
//! 4. `Ordinary`
//!
//! Which directives are in scope depends on the [`ScopePolicy`]: only those
//! owned by namespace declarations, or every directive in the file except
//! top-level `global using` directives, which cannot move into a namespace.
//!
//! [`classify_scopes`] splits the in-scope directives by rewrite scope: each
//! outermost namespace gets its own partition, built from its own subtree.

use fqn_core::config::ScopePolicy;

use super::traits::{walk_compilation_unit, walk_namespace, VisitResult, Visitor};
use crate::nodes::{CompilationUnit, NamespaceDeclaration, UsingDirective};

/// Root namespace of the standard library.
pub const STANDARD_LIBRARY_ROOT: &str = "System";

/// Category of a using directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveCategory {
    StandardLibrary,
    Aliased,
    GlobalOrExternal,
    Ordinary,
}

/// Classify one directive by its shape.
pub fn classify_directive(directive: &UsingDirective) -> DirectiveCategory {
    if directive.name.has_alias_qualifier() {
        DirectiveCategory::GlobalOrExternal
    } else if directive.alias.is_some() {
        DirectiveCategory::Aliased
    } else if directive.name.leftmost_identifier().identifier_text() == STANDARD_LIBRARY_ROOT {
        DirectiveCategory::StandardLibrary
    } else {
        DirectiveCategory::Ordinary
    }
}

/// In-scope directives partitioned by category, each list in first-seen order.
#[derive(Debug, Default)]
pub struct ClassifiedDirectives<'a> {
    pub standard_library: Vec<&'a UsingDirective>,
    pub aliased: Vec<&'a UsingDirective>,
    pub global_or_external: Vec<&'a UsingDirective>,
    pub ordinary: Vec<&'a UsingDirective>,
}

impl<'a> ClassifiedDirectives<'a> {
    pub fn get(&self, category: DirectiveCategory) -> &[&'a UsingDirective] {
        match category {
            DirectiveCategory::StandardLibrary => &self.standard_library,
            DirectiveCategory::Aliased => &self.aliased,
            DirectiveCategory::GlobalOrExternal => &self.global_or_external,
            DirectiveCategory::Ordinary => &self.ordinary,
        }
    }

    fn push(&mut self, directive: &'a UsingDirective) {
        match classify_directive(directive) {
            DirectiveCategory::StandardLibrary => self.standard_library.push(directive),
            DirectiveCategory::Aliased => self.aliased.push(directive),
            DirectiveCategory::GlobalOrExternal => self.global_or_external.push(directive),
            DirectiveCategory::Ordinary => self.ordinary.push(directive),
        }
    }

    pub fn len(&self) -> usize {
        self.standard_library.len()
            + self.aliased.len()
            + self.global_or_external.len()
            + self.ordinary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every classified directive, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &'a UsingDirective> + '_ {
        self.standard_library
            .iter()
            .chain(&self.aliased)
            .chain(&self.global_or_external)
            .chain(&self.ordinary)
            .copied()
    }
}

/// Whether a directive at `namespace_depth` (0 is the compilation unit) is
/// rewritten under `policy`.
pub(crate) fn in_scope(policy: ScopePolicy, namespace_depth: usize, directive: &UsingDirective) -> bool {
    match policy {
        ScopePolicy::Namespace => namespace_depth > 0,
        ScopePolicy::File => namespace_depth > 0 || directive.global_keyword.is_none(),
    }
}

struct DirectiveClassifier<'a> {
    policy: ScopePolicy,
    namespace_depth: usize,
    result: ClassifiedDirectives<'a>,
}

impl DirectiveClassifier<'_> {
    fn new(policy: ScopePolicy) -> Self {
        DirectiveClassifier {
            policy,
            namespace_depth: 0,
            result: ClassifiedDirectives::default(),
        }
    }
}

impl<'a> Visitor<'a> for DirectiveClassifier<'a> {
    fn visit_namespace(&mut self, _node: &'a NamespaceDeclaration) -> VisitResult {
        self.namespace_depth += 1;
        VisitResult::Continue
    }

    fn leave_namespace(&mut self, _node: &'a NamespaceDeclaration) {
        self.namespace_depth -= 1;
    }

    fn visit_using_directive(&mut self, node: &'a UsingDirective) -> VisitResult {
        if in_scope(self.policy, self.namespace_depth, node) {
            self.result.push(node);
        }
        VisitResult::Continue
    }
}

/// Partition every in-scope directive of a file.
pub fn classify_directives(root: &CompilationUnit, policy: ScopePolicy) -> ClassifiedDirectives<'_> {
    let mut classifier = DirectiveClassifier::new(policy);
    walk_compilation_unit(&mut classifier, root);
    classifier.result
}

/// Partition the in-scope directives of each rewrite scope.
///
/// One entry per outermost namespace, in source order, holding the
/// directives of that namespace and everything nested in it. Under
/// [`ScopePolicy::File`] the in-scope compilation-unit directives come first
/// in every entry, and a file with no namespace yields a single entry for the
/// compilation unit. Under [`ScopePolicy::Namespace`] such a file yields none.
pub fn classify_scopes(root: &CompilationUnit, policy: ScopePolicy) -> Vec<ClassifiedDirectives<'_>> {
    let top: Vec<&UsingDirective> = root
        .usings
        .iter()
        .filter(|d| in_scope(policy, 0, d))
        .collect();

    if !root.has_namespace() {
        if policy == ScopePolicy::Namespace {
            return Vec::new();
        }
        let mut scope = ClassifiedDirectives::default();
        for &directive in &top {
            scope.push(directive);
        }
        return vec![scope];
    }

    root.namespaces()
        .map(|ns| {
            let mut classifier = DirectiveClassifier::new(policy);
            for &directive in &top {
                classifier.result.push(directive);
            }
            walk_namespace(&mut classifier, ns);
            classifier.result
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_compilation_unit;

    fn category_of(directive: &str) -> DirectiveCategory {
        let unit = parse_compilation_unit(directive).unwrap();
        classify_directive(&unit.usings[0])
    }

    mod single_directive {
        use super::*;

        #[test]
        fn standard_library_by_leftmost_identifier() {
            assert_eq!(category_of("using System;"), DirectiveCategory::StandardLibrary);
            assert_eq!(
                category_of("using System.Collections.Generic;"),
                DirectiveCategory::StandardLibrary
            );
            assert_eq!(category_of("using SystemX.Y;"), DirectiveCategory::Ordinary);
        }

        #[test]
        fn alias_wins_over_standard_library() {
            assert_eq!(category_of("using S = System.Text;"), DirectiveCategory::Aliased);
        }

        #[test]
        fn alias_qualifier_wins_over_everything() {
            assert_eq!(
                category_of("using global::System;"),
                DirectiveCategory::GlobalOrExternal
            );
            assert_eq!(
                category_of("using G = global::Foo.Bar;"),
                DirectiveCategory::GlobalOrExternal
            );
            assert_eq!(
                category_of("using L = System.Collections.Generic.List<global::Foo>;"),
                DirectiveCategory::GlobalOrExternal
            );
        }

        #[test]
        fn ordinary_names() {
            assert_eq!(category_of("using Sub;"), DirectiveCategory::Ordinary);
            assert_eq!(category_of("using static Company.Math;"), DirectiveCategory::Ordinary);
        }
    }

    mod scope_policy {
        use super::*;

        const SOURCE: &str = "using System.IO;\n\
            namespace A\n{\n    using B;\n    using X = Y.Z;\n    namespace Inner\n    {\n        using global::C;\n        using System;\n    }\n}\n";

        #[test]
        fn namespace_policy_ignores_compilation_unit_directives() {
            let unit = parse_compilation_unit(SOURCE).unwrap();
            let classified = classify_directives(&unit, ScopePolicy::Namespace);
            assert_eq!(classified.len(), 4);
            assert_eq!(classified.standard_library.len(), 1);
            assert_eq!(classified.standard_library[0].name.plain_text(), "System");
            assert_eq!(classified.ordinary.len(), 1);
            assert_eq!(classified.aliased.len(), 1);
            assert_eq!(classified.global_or_external.len(), 1);
        }

        #[test]
        fn file_policy_classifies_everything() {
            let unit = parse_compilation_unit(SOURCE).unwrap();
            let classified = classify_directives(&unit, ScopePolicy::File);
            assert_eq!(classified.len(), 5);
            let names: Vec<_> = classified
                .standard_library
                .iter()
                .map(|d| d.name.plain_text())
                .collect();
            assert_eq!(names, vec!["System.IO", "System"]);
        }

        #[test]
        fn file_policy_leaves_top_level_global_using() {
            let unit =
                parse_compilation_unit("global using System;\nusing System.IO;\nclass C { }\n")
                    .unwrap();
            let classified = classify_directives(&unit, ScopePolicy::File);
            assert_eq!(classified.len(), 1);
            assert_eq!(classified.standard_library[0].name.plain_text(), "System.IO");
        }

        #[test]
        fn every_directive_in_exactly_one_category() {
            let unit = parse_compilation_unit(SOURCE).unwrap();
            let classified = classify_directives(&unit, ScopePolicy::File);
            let mut ids: Vec<_> = classified.iter().map(|d| d.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 5);
        }
    }

    mod scopes {
        use super::*;

        const TWO_NAMESPACES: &str = "using Top;\n\
            namespace A\n{\n    using System;\n    namespace Inner\n    {\n        using Deep;\n    }\n}\n\
            namespace B\n{\n    using System.Linq;\n}\n";

        fn names(scope: &ClassifiedDirectives<'_>) -> Vec<String> {
            scope.iter().map(|d| d.name.plain_text()).collect()
        }

        #[test]
        fn one_partition_per_outermost_namespace() {
            let unit = parse_compilation_unit(TWO_NAMESPACES).unwrap();
            let scopes = classify_scopes(&unit, ScopePolicy::Namespace);
            assert_eq!(scopes.len(), 2);
            assert_eq!(names(&scopes[0]), vec!["System", "Deep"]);
            assert_eq!(names(&scopes[1]), vec!["System.Linq"]);
        }

        #[test]
        fn file_policy_shares_top_level_directives() {
            let unit = parse_compilation_unit(TWO_NAMESPACES).unwrap();
            let scopes = classify_scopes(&unit, ScopePolicy::File);
            assert_eq!(names(&scopes[0]), vec!["System", "Top", "Deep"]);
            assert_eq!(names(&scopes[1]), vec!["System.Linq", "Top"]);
        }

        #[test]
        fn file_without_namespace() {
            let unit = parse_compilation_unit("using B;\nusing A;\nclass C { }\n").unwrap();
            assert!(classify_scopes(&unit, ScopePolicy::Namespace).is_empty());
            let scopes = classify_scopes(&unit, ScopePolicy::File);
            assert_eq!(scopes.len(), 1);
            assert_eq!(names(&scopes[0]), vec!["B", "A"]);
        }
    }
}

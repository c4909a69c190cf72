//! Namespace binding for using directives.
//!
//! A [`NamespaceIndex`] lists every namespace a project can see: the ones its
//! documents declare plus the configured reference namespaces. A
//! [`DocumentModel`] binds each using directive of one document against that
//! index, using the directive's position in the tree. The first segment of
//! the name is looked up one scope at a time, innermost first, ending with
//! the global namespace. At each scope:
//!
//! 1. If `Ns.First` is an indexed namespace, the name binds to `Ns.N`.
//! 2. Otherwise, if that scope's declaration strictly encloses the directive
//!    and declares an alias `First`, the alias target replaces the first
//!    segment.
//!
//! The first scope that matches decides; if the rest of the name is not
//! indexed there, the directive does not bind. `global::N` binds only
//! globally. Other alias-qualified names (extern aliases) and generic names
//! never bind, so their directives are left as written.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use fqn_cst::visitor::{walk_compilation_unit, VisitResult, Visitor};
use fqn_cst::{
    declared_namespaces, CompilationUnit, Name, NamespaceDeclaration, NodeId, OpaqueMember,
    UsingDirective,
};

/// Qualifier that roots a name at the global namespace.
pub const GLOBAL_ALIAS: &str = "global";

// ============================================================================
// Symbols
// ============================================================================

/// Kind of symbol a using directive can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Namespace,
}

/// A bound symbol. Displays as its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub full_name: String,
}

impl Symbol {
    pub fn namespace(full_name: impl Into<String>) -> Self {
        Symbol {
            kind: SymbolKind::Namespace,
            full_name: full_name.into(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

// ============================================================================
// Namespace Index
// ============================================================================

/// The set of namespaces visible to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceIndex {
    names: BTreeSet<String>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        NamespaceIndex::default()
    }

    /// Index built from parsed documents plus reference namespaces.
    pub fn build<'a>(
        roots: impl IntoIterator<Item = &'a CompilationUnit>,
        references: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let mut index = NamespaceIndex::new();
        for root in roots {
            index.add_declarations(root);
        }
        for name in references {
            index.insert(name.as_ref());
        }
        index
    }

    /// Add `name` and each of its dotted prefixes.
    pub fn insert(&mut self, name: &str) {
        let mut end = 0;
        for segment in name.split('.') {
            end += segment.len();
            if !segment.is_empty() {
                self.names.insert(name[..end].to_string());
            }
            end += 1;
        }
    }

    /// Add every namespace declared in a file.
    pub fn add_declarations(&mut self, root: &CompilationUnit) {
        for name in declared_namespaces(root) {
            self.insert(&name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

// ============================================================================
// Semantic Model
// ============================================================================

/// Binds using directives of one document to symbols.
pub trait SemanticModel: Send + Sync {
    /// The symbol `directive`'s name binds to, or `None` if it does not bind.
    fn symbol_for(&self, directive: &UsingDirective) -> Option<Symbol>;
}

/// One scope searched during lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ScopeLevel {
    /// Full namespace name; `None` for the global namespace.
    namespace: Option<String>,
    /// Aliases this scope's declaration makes visible, resolved targets.
    aliases: HashMap<String, String>,
}

impl ScopeLevel {
    fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        }
    }
}

/// Where a directive sits: the scopes searched for it, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DirectiveContext {
    levels: Vec<ScopeLevel>,
}

/// [`SemanticModel`] for one parsed document.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    index: Arc<NamespaceIndex>,
    contexts: HashMap<NodeId, DirectiveContext>,
}

impl DocumentModel {
    pub fn new(index: Arc<NamespaceIndex>, root: &CompilationUnit) -> Self {
        let mut builder = ContextBuilder {
            index: index.as_ref(),
            namespaces: Vec::new(),
            alias_scopes: vec![HashMap::new()],
            contexts: HashMap::new(),
        };
        walk_compilation_unit(&mut builder, root);
        let contexts = builder.contexts;
        DocumentModel { index, contexts }
    }

    pub fn index(&self) -> &NamespaceIndex {
        &self.index
    }
}

impl SemanticModel for DocumentModel {
    fn symbol_for(&self, directive: &UsingDirective) -> Option<Symbol> {
        let context = self.contexts.get(&directive.id)?;
        bind_name(&directive.name, context, &self.index).map(Symbol::namespace)
    }
}

fn bind_name(name: &Name, context: &DirectiveContext, index: &NamespaceIndex) -> Option<String> {
    if name.is_generic() {
        return None;
    }
    if name.has_alias_qualifier() {
        // Only `global::` binds, and only from the root.
        let text = name.plain_text();
        let rest = text.strip_prefix(GLOBAL_ALIAS)?.strip_prefix("::")?;
        return index.contains(rest).then(|| rest.to_string());
    }

    let text = name.plain_text();
    let (first, rest) = match text.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (text.as_str(), None),
    };
    for level in &context.levels {
        let candidate = if index.contains(&level.qualify(first)) {
            level.qualify(&text)
        } else if let Some(target) = level.aliases.get(first) {
            match rest {
                Some(rest) => format!("{}.{}", target, rest),
                None => target.clone(),
            }
        } else {
            continue;
        };
        return index.contains(&candidate).then_some(candidate);
    }
    None
}

/// Enclosing namespaces of `full`, innermost first: `A.B.C`, `A.B`, `A`.
fn namespace_chain(full: &str) -> Vec<String> {
    let mut chain = vec![full.to_string()];
    let mut rest = full;
    while let Some((prefix, _)) = rest.rsplit_once('.') {
        chain.push(prefix.to_string());
        rest = prefix;
    }
    chain
}

/// Records a [`DirectiveContext`] for every using directive.
struct ContextBuilder<'i> {
    index: &'i NamespaceIndex,
    /// Full names of the namespaces being visited, outermost first.
    namespaces: Vec<String>,
    /// Aliases declared by each open scope, compilation unit first.
    alias_scopes: Vec<HashMap<String, String>>,
    contexts: HashMap<NodeId, DirectiveContext>,
}

impl ContextBuilder<'_> {
    /// Aliases of the declaration at `depth` (0 is the compilation unit),
    /// empty for the declaration the directive itself sits in.
    fn visible_aliases(&self, depth: usize) -> HashMap<String, String> {
        if depth + 1 >= self.alias_scopes.len() {
            return HashMap::new();
        }
        self.alias_scopes.get(depth).cloned().unwrap_or_default()
    }

    fn current_context(&self) -> DirectiveContext {
        let mut levels = Vec::new();
        for (depth, full) in self.namespaces.iter().enumerate().rev() {
            let parent = depth
                .checked_sub(1)
                .and_then(|p| self.namespaces.get(p))
                .map(String::as_str);
            // `namespace A.B` opens A.B and A; only A.B carries its aliases.
            let mut aliases = self.visible_aliases(depth + 1);
            for namespace in namespace_chain(full) {
                if Some(namespace.as_str()) == parent {
                    break;
                }
                levels.push(ScopeLevel {
                    namespace: Some(namespace),
                    aliases: std::mem::take(&mut aliases),
                });
            }
        }
        levels.push(ScopeLevel {
            namespace: None,
            aliases: self.visible_aliases(0),
        });
        DirectiveContext { levels }
    }
}

impl<'a> Visitor<'a> for ContextBuilder<'_> {
    fn visit_namespace(&mut self, node: &'a NamespaceDeclaration) -> VisitResult {
        let name = node.name.plain_text();
        let full = match self.namespaces.last() {
            Some(parent) => format!("{}.{}", parent, name),
            None => name,
        };
        self.namespaces.push(full);
        self.alias_scopes.push(HashMap::new());
        VisitResult::Continue
    }

    fn leave_namespace(&mut self, _node: &'a NamespaceDeclaration) {
        self.namespaces.pop();
        self.alias_scopes.pop();
    }

    fn visit_using_directive(&mut self, node: &'a UsingDirective) -> VisitResult {
        let context = self.current_context();
        if let Some(alias) = &node.alias {
            let target = bind_name(&node.name, &context, self.index)
                .unwrap_or_else(|| node.name.plain_text());
            if let Some(scope) = self.alias_scopes.last_mut() {
                scope.insert(alias.name.identifier_text().to_string(), target);
            }
        }
        self.contexts.insert(node.id, context);
        VisitResult::Continue
    }

    fn visit_opaque_member(&mut self, _node: &'a OpaqueMember) -> VisitResult {
        VisitResult::SkipChildren
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fqn_cst::parse_compilation_unit;

    fn model_for(source: &str, references: &[&str]) -> (CompilationUnit, DocumentModel) {
        let root = parse_compilation_unit(source).unwrap();
        let index = NamespaceIndex::build([&root], references.iter().copied());
        let model = DocumentModel::new(Arc::new(index), &root);
        (root, model)
    }

    fn all_directives(root: &CompilationUnit) -> Vec<&UsingDirective> {
        fn collect<'a>(ns: &'a NamespaceDeclaration, out: &mut Vec<&'a UsingDirective>) {
            out.extend(ns.usings.iter());
            for inner in ns.namespaces() {
                collect(inner, out);
            }
        }
        let mut out: Vec<&UsingDirective> = root.usings.iter().collect();
        for ns in root.namespaces() {
            collect(ns, &mut out);
        }
        out
    }

    fn bound(source: &str, references: &[&str]) -> Vec<Option<String>> {
        let (root, model) = model_for(source, references);
        all_directives(&root)
            .into_iter()
            .map(|d| model.symbol_for(d).map(|s| s.to_string()))
            .collect()
    }

    mod index {
        use super::*;

        #[test]
        fn insert_adds_prefixes() {
            let mut index = NamespaceIndex::new();
            index.insert("A.B.C");
            assert!(index.contains("A"));
            assert!(index.contains("A.B"));
            assert!(index.contains("A.B.C"));
            assert_eq!(index.len(), 3);
        }

        #[test]
        fn build_collects_nested_declarations() {
            let root = parse_compilation_unit(
                "namespace Company.Product\n{\n    namespace Sub { }\n}\n",
            )
            .unwrap();
            let index = NamespaceIndex::build([&root], ["System.Linq"]);
            assert_eq!(
                index.iter().collect::<Vec<_>>(),
                vec!["Company", "Company.Product", "Company.Product.Sub", "System", "System.Linq"]
            );
        }
    }

    mod binding {
        use super::*;

        #[test]
        fn relative_name_binds_to_enclosing_namespace() {
            let source = "namespace Company.Product\n{\n    using Sub;\n}\nnamespace Company.Product.Sub { }\n";
            assert_eq!(bound(source, &[]), vec![Some("Company.Product.Sub".to_string())]);
        }

        #[test]
        fn innermost_namespace_wins() {
            let source = "namespace A\n{\n    namespace B\n    {\n        using C;\n    }\n}\nnamespace A.C { }\nnamespace A.B.C { }\n";
            assert_eq!(bound(source, &[]), vec![Some("A.B.C".to_string())]);
        }

        #[test]
        fn global_name_when_no_enclosing_match() {
            let source = "namespace App\n{\n    using System.Linq;\n}\n";
            assert_eq!(bound(source, &["System.Linq"]), vec![Some("System.Linq".to_string())]);
        }

        #[test]
        fn canonical_names_bind_to_themselves() {
            let source = "namespace Company.Product\n{\n    using Company.Product.Sub;\n}\nnamespace Company.Product.Sub { }\n";
            assert_eq!(bound(source, &[]), vec![Some("Company.Product.Sub".to_string())]);
        }

        #[test]
        fn unknown_namespace_does_not_bind() {
            let source = "namespace App\n{\n    using Nowhere.ToBeFound;\n}\n";
            assert_eq!(bound(source, &["System"]), vec![None]);
        }

        #[test]
        fn global_qualifier_binds_only_from_root() {
            let source = "namespace A\n{\n    using global::B;\n}\nnamespace A.B { }\n";
            assert_eq!(bound(source, &[]), vec![None]);

            let source = "namespace A\n{\n    using global::B;\n}\nnamespace B { }\n";
            assert_eq!(bound(source, &[]), vec![Some("B".to_string())]);
        }

        #[test]
        fn extern_alias_and_generic_names_do_not_bind() {
            let source = "extern alias Legacy;\nnamespace A\n{\n    using Legacy::B;\n    using L = System.Collections.Generic.List<int>;\n}\n";
            assert_eq!(bound(source, &["System.Collections.Generic"]), vec![None, None]);
        }

        #[test]
        fn alias_from_enclosing_scope_is_substituted() {
            let source = "using Core = Company.Core;\nnamespace App\n{\n    using Core.Models;\n}\nnamespace Company.Core.Models { }\n";
            assert_eq!(
                bound(source, &[]),
                vec![
                    Some("Company.Core".to_string()),
                    Some("Company.Core.Models".to_string())
                ]
            );
        }

        #[test]
        fn enclosing_namespace_member_shadows_alias() {
            let source = "using Core = Company.Core;\nnamespace App\n{\n    using Core.Models;\n}\nnamespace Company.Core.Models { }\nnamespace App.Core.Models { }\n";
            assert_eq!(
                bound(source, &[]),
                vec![
                    Some("Company.Core".to_string()),
                    Some("App.Core.Models".to_string())
                ]
            );
        }

        #[test]
        fn namespace_alias_wins_over_outer_namespace() {
            let source = "namespace Outer\n{\n    using Io = Vendor.Io;\n    namespace Inner\n    {\n        using Io.Streams;\n    }\n}\nnamespace Vendor.Io.Streams { }\nnamespace Io.Streams { }\n";
            assert_eq!(
                bound(source, &[]),
                vec![
                    Some("Vendor.Io".to_string()),
                    Some("Vendor.Io.Streams".to_string())
                ]
            );
        }

        #[test]
        fn first_matching_scope_decides() {
            let source = "namespace App\n{\n    using Core.Models;\n}\nnamespace App.Core { }\nnamespace Core.Models { }\n";
            assert_eq!(bound(source, &[]), vec![None]);
        }

        #[test]
        fn alias_in_same_scope_is_not_visible() {
            let source = "namespace App\n{\n    using Core = Company.Core;\n    using Core.Models;\n}\nnamespace Company.Core.Models { }\n";
            assert_eq!(
                bound(source, &[]),
                vec![Some("Company.Core".to_string()), None]
            );
        }

        #[test]
        fn directive_from_another_tree_does_not_bind() {
            let (_, model) = model_for("namespace A { using B; }\nnamespace A.B { }\n", &[]);
            let other = parse_compilation_unit("using B;").unwrap();
            let mut directive = other.usings[0].clone();
            directive.id = NodeId(999);
            assert!(model.symbol_for(&directive).is_none());
        }
    }

    mod chain {
        use super::*;

        #[test]
        fn chain_is_innermost_first() {
            assert_eq!(namespace_chain("A.B.C"), vec!["A.B.C", "A.B", "A"]);
            assert_eq!(namespace_chain("A"), vec!["A"]);
        }
    }
}

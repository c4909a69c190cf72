//! Name resolution adapter.

use std::sync::Arc;

use fqn_core::workspace::{Document, Solution};
use fqn_cst::UsingDirective;

use crate::host::DocumentServices;
use crate::semantic::{SemanticModel, Symbol};

/// A semantic model for `document`, computing one only when no cached model
/// is available.
///
/// `cached` is tried first, then the services' own cache. Each source yields
/// an equivalent model for the same document text.
pub async fn semantic_model_or_compute(
    services: &dyn DocumentServices,
    solution: &Solution,
    document: &Document,
    cached: Option<Arc<dyn SemanticModel>>,
) -> Option<Arc<dyn SemanticModel>> {
    if let Some(model) = cached {
        return Some(model);
    }
    if let Some(model) = services.try_cached_semantic_model(document) {
        return Some(model);
    }
    services.semantic_model(solution, document).await
}

/// The symbol a directive's name binds to.
pub fn resolve_symbol(model: &dyn SemanticModel, directive: &UsingDirective) -> Option<Symbol> {
    model.symbol_for(directive)
}

/// Canonical name of a directive's namespace, or `None` if it does not bind.
pub fn resolve_canonical_name(model: &dyn SemanticModel, directive: &UsingDirective) -> Option<String> {
    resolve_symbol(model, directive).map(|symbol| symbol.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use fqn_core::workspace::SolutionBuilder;
    use fqn_cst::{parse_compilation_unit, CompilationUnit, ParserError};

    /// Binds every directive to a fixed name.
    struct FixedModel(&'static str);

    impl SemanticModel for FixedModel {
        fn symbol_for(&self, _directive: &UsingDirective) -> Option<Symbol> {
            Some(Symbol::namespace(self.0))
        }
    }

    #[derive(Default)]
    struct CountingServices {
        cached: Option<&'static str>,
        computed: AtomicUsize,
    }

    #[async_trait]
    impl DocumentServices for CountingServices {
        async fn syntax_root(&self, document: &Document) -> Result<Arc<CompilationUnit>, ParserError> {
            parse_compilation_unit(document.text()).map(Arc::new)
        }

        fn try_cached_semantic_model(&self, _document: &Document) -> Option<Arc<dyn SemanticModel>> {
            self.cached
                .map(|name| Arc::new(FixedModel(name)) as Arc<dyn SemanticModel>)
        }

        async fn semantic_model(
            &self,
            _solution: &Solution,
            _document: &Document,
        ) -> Option<Arc<dyn SemanticModel>> {
            self.computed.fetch_add(1, Ordering::SeqCst);
            Some(Arc::new(FixedModel("Computed")))
        }
    }

    fn fixture() -> (Solution, UsingDirective) {
        let mut builder = SolutionBuilder::new("/ws");
        let project = builder.add_project("App");
        builder.add_document(project, "A.cs", "namespace App { using X; }\n");
        let solution = builder.build();
        let root = parse_compilation_unit("using X;").unwrap();
        (solution, root.usings[0].clone())
    }

    #[tokio::test]
    async fn explicit_cache_wins() {
        let (solution, directive) = fixture();
        let services = CountingServices {
            cached: Some("Services"),
            ..CountingServices::default()
        };
        let doc = solution.documents().next().unwrap();
        let explicit: Arc<dyn SemanticModel> = Arc::new(FixedModel("Explicit"));
        let model = semantic_model_or_compute(&services, &solution, doc, Some(explicit))
            .await
            .unwrap();
        assert_eq!(resolve_canonical_name(model.as_ref(), &directive).unwrap(), "Explicit");
        assert_eq!(services.computed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn services_cache_before_compute() {
        let (solution, directive) = fixture();
        let services = CountingServices {
            cached: Some("Services"),
            ..CountingServices::default()
        };
        let doc = solution.documents().next().unwrap();
        let model = semantic_model_or_compute(&services, &solution, doc, None)
            .await
            .unwrap();
        assert_eq!(resolve_canonical_name(model.as_ref(), &directive).unwrap(), "Services");
        assert_eq!(services.computed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn computes_when_nothing_cached() {
        let (solution, directive) = fixture();
        let services = CountingServices::default();
        let doc = solution.documents().next().unwrap();
        let model = semantic_model_or_compute(&services, &solution, doc, None)
            .await
            .unwrap();
        assert_eq!(resolve_canonical_name(model.as_ref(), &directive).unwrap(), "Computed");
        assert_eq!(services.computed.load(Ordering::SeqCst), 1);
    }
}

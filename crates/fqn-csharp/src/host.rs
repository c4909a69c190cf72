//! Host services the rewrite operations are written against.
//!
//! [`DocumentServices`] is the seam between the operations and whatever owns
//! parsing and binding: an editor host, a build server, or the bundled
//! [`IndexedServices`], which parses with `fqn-cst` and binds against a
//! per-project [`NamespaceIndex`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use fqn_core::workspace::{ContentHash, Document, DocumentId, ProjectId, Solution};
use fqn_cst::{parse_compilation_unit, CompilationUnit, ParserError};

use crate::semantic::{DocumentModel, NamespaceIndex, SemanticModel};

/// Parsing and binding for documents of a solution.
///
/// The `#[async_trait]` macro keeps the trait object-safe, so operations take
/// `&dyn DocumentServices`.
#[async_trait]
pub trait DocumentServices: Send + Sync {
    /// The document's syntax tree.
    async fn syntax_root(&self, document: &Document) -> Result<Arc<CompilationUnit>, ParserError>;

    /// A semantic model computed earlier for this exact document text, if any.
    fn try_cached_semantic_model(&self, document: &Document) -> Option<Arc<dyn SemanticModel>>;

    /// Compute a semantic model. `None` if the document cannot be bound.
    async fn semantic_model(
        &self,
        solution: &Solution,
        document: &Document,
    ) -> Option<Arc<dyn SemanticModel>>;
}

/// One cached value per document, tagged with the text it was computed from.
type DocumentCache<T> = RwLock<HashMap<DocumentId, (ContentHash, Arc<T>)>>;

fn cached<T>(cache: &DocumentCache<T>, document: &Document) -> Option<Arc<T>> {
    let entries = cache.read().ok()?;
    let (hash, value) = entries.get(&document.id)?;
    (*hash == document.content_hash()).then(|| Arc::clone(value))
}

/// Store `value` for `document`, replacing whatever an older text left.
fn store<T>(cache: &DocumentCache<T>, document: &Document, value: &Arc<T>) {
    if let Ok(mut entries) = cache.write() {
        entries.insert(document.id, (document.content_hash(), Arc::clone(value)));
    }
}

/// [`DocumentServices`] backed by `fqn-cst` and a namespace index per project.
///
/// Project indexes are built on first use and kept for the life of the
/// instance. Directive rewrites never add or remove namespace declarations,
/// so an index stays valid while a solution is being rewritten. Trees and
/// models are cached for the latest text of each document only.
#[derive(Debug, Default)]
pub struct IndexedServices {
    reference_namespaces: Vec<String>,
    indexes: RwLock<HashMap<ProjectId, Arc<NamespaceIndex>>>,
    roots: DocumentCache<CompilationUnit>,
    models: DocumentCache<DocumentModel>,
}

impl IndexedServices {
    pub fn new(reference_namespaces: impl IntoIterator<Item = impl Into<String>>) -> Self {
        IndexedServices {
            reference_namespaces: reference_namespaces.into_iter().map(Into::into).collect(),
            ..IndexedServices::default()
        }
    }

    pub fn reference_namespaces(&self) -> &[String] {
        &self.reference_namespaces
    }

    fn parse(&self, document: &Document) -> Result<Arc<CompilationUnit>, ParserError> {
        if let Some(root) = cached(&self.roots, document) {
            return Ok(root);
        }
        let root = Arc::new(parse_compilation_unit(document.text())?);
        store(&self.roots, document, &root);
        Ok(root)
    }

    /// The namespace index of `project`, built from `solution` on first use.
    ///
    /// Documents that fail to parse contribute no declarations.
    pub fn project_index(&self, solution: &Solution, project: ProjectId) -> Arc<NamespaceIndex> {
        if let Some(index) = self.indexes.read().ok().and_then(|map| map.get(&project).cloned()) {
            return index;
        }

        let roots: Vec<Arc<CompilationUnit>> = solution
            .project_documents(project)
            .into_iter()
            .filter_map(|doc| self.parse(doc).ok())
            .collect();
        let index = Arc::new(NamespaceIndex::build(
            roots.iter().map(Arc::as_ref),
            &self.reference_namespaces,
        ));
        debug!(project = %project, namespaces = index.len(), "built namespace index");

        if let Ok(mut map) = self.indexes.write() {
            map.entry(project).or_insert_with(|| Arc::clone(&index));
        }
        index
    }
}

#[async_trait]
impl DocumentServices for IndexedServices {
    async fn syntax_root(&self, document: &Document) -> Result<Arc<CompilationUnit>, ParserError> {
        self.parse(document)
    }

    fn try_cached_semantic_model(&self, document: &Document) -> Option<Arc<dyn SemanticModel>> {
        cached(&self.models, document).map(|model| model as Arc<dyn SemanticModel>)
    }

    async fn semantic_model(
        &self,
        solution: &Solution,
        document: &Document,
    ) -> Option<Arc<dyn SemanticModel>> {
        let root = self.parse(document).ok()?;
        let index = self.project_index(solution, document.project_id);
        let model = Arc::new(DocumentModel::new(index, &root));
        store(&self.models, document, &model);
        Some(model as Arc<dyn SemanticModel>)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fqn_core::workspace::SolutionBuilder;

    fn two_file_solution() -> (Solution, DocumentId, DocumentId) {
        let mut builder = SolutionBuilder::new("/ws");
        let project = builder.add_project("App");
        let a = builder.add_document(project, "A.cs", "namespace App\n{\n    using Models;\n}\n");
        let b = builder.add_document(project, "Models.cs", "namespace App.Models { }\n");
        (builder.build(), a, b)
    }

    #[test]
    fn trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn DocumentServices) {}
    }

    #[tokio::test]
    async fn model_binds_across_project_documents() {
        let (solution, a, _) = two_file_solution();
        let services = IndexedServices::new(["System"]);
        let doc = solution.document(a).unwrap();
        let model = services.semantic_model(&solution, doc).await.unwrap();
        let root = services.syntax_root(doc).await.unwrap();
        let directive = &root.namespaces().next().unwrap().usings[0];
        assert_eq!(model.symbol_for(directive).unwrap().to_string(), "App.Models");
    }

    #[tokio::test]
    async fn computed_model_is_cached_by_content() {
        let (solution, a, _) = two_file_solution();
        let services = IndexedServices::new(Vec::<String>::new());
        let doc = solution.document(a).unwrap();
        assert!(services.try_cached_semantic_model(doc).is_none());
        services.semantic_model(&solution, doc).await.unwrap();
        assert!(services.try_cached_semantic_model(doc).is_some());

        let edited = solution.with_document_text(a, "namespace App { }\n").unwrap();
        let edited_doc = edited.document(a).unwrap();
        assert!(services.try_cached_semantic_model(edited_doc).is_none());
    }

    #[tokio::test]
    async fn caches_hold_only_the_latest_text() {
        let (solution, a, _) = two_file_solution();
        let services = IndexedServices::new(Vec::<String>::new());
        let first = Arc::clone(solution.document(a).unwrap());
        services.semantic_model(&solution, &first).await.unwrap();

        let mut current = solution;
        for body in ["class C { }", "class D { }", "class E { }"] {
            let text = format!("namespace App\n{{\n    using Models;\n    {}\n}}\n", body);
            current = current.with_document_text(a, text).unwrap();
            let doc = current.document(a).unwrap();
            services.semantic_model(&current, doc).await.unwrap();
            assert!(services.try_cached_semantic_model(doc).is_some());
        }

        // Two documents were parsed for the index; A's older texts are gone.
        assert_eq!(services.roots.read().unwrap().len(), 2);
        assert_eq!(services.models.read().unwrap().len(), 1);
        assert!(services.try_cached_semantic_model(&first).is_none());
    }

    #[tokio::test]
    async fn unparseable_document_has_no_model() {
        let mut builder = SolutionBuilder::new("/ws");
        let project = builder.add_project("App");
        let broken = builder.add_document(project, "Broken.cs", "class C {\n");
        let solution = builder.build();
        let services = IndexedServices::default();
        let doc = solution.document(broken).unwrap();
        assert!(services.syntax_root(doc).await.is_err());
        assert!(services.semantic_model(&solution, doc).await.is_none());
    }

    #[test]
    fn index_includes_references_and_declarations() {
        let (solution, _, _) = two_file_solution();
        let services = IndexedServices::new(["System.Linq"]);
        let index = services.project_index(&solution, ProjectId(0));
        assert!(index.contains("App.Models"));
        assert!(index.contains("System"));
        assert!(index.contains("System.Linq"));
    }
}

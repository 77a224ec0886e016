//! Index caches over the document's flat arrays.
//!
//! Caches hold array indices only and never mutate the document. They are
//! updated exclusively through [`DocumentObserver`] notifications issued by
//! the builder around each append and swap removal.

pub mod dependency;
pub mod edge;
pub mod node;

pub use dependency::DependencyCache;
pub use edge::EdgeCache;
pub use node::NodeCache;

use crate::error::Result;
use soundgraph_api::{Document, DocumentArray};

/// Receives index deltas of the document arrays.
///
/// `on_added` is called after the element lands at `index`; `on_removing`
/// is called while the element is still at `index`.
pub trait DocumentObserver {
    fn on_added(&mut self, array: DocumentArray, document: &Document, index: usize);

    fn on_removing(&mut self, array: DocumentArray, document: &Document, index: usize);

    /// Called after a full rebuild, when incremental deltas were skipped.
    fn on_reloaded(&mut self, _document: &Document) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCache {
    pub dependencies: DependencyCache,
    pub nodes: NodeCache,
    pub edges: EdgeCache,
}

impl DocumentCache {
    pub fn new(document: &Document) -> Self {
        let dependencies = DependencyCache::from_document(document);
        let nodes = NodeCache::from_document(document, &dependencies);
        let edges = EdgeCache::from_document(document);
        Self {
            dependencies,
            nodes,
            edges,
        }
    }

    /// Rebuilds every cache. Dependencies first, as node classification reads them.
    pub fn reload(&mut self, document: &Document) {
        self.dependencies.reload(document);
        self.nodes.reload(document, &self.dependencies);
        self.edges.reload(document);
        tracing::debug!(
            "Reloaded document cache: {} dependencies, {} nodes, {} edges",
            self.dependencies.len(),
            self.nodes.len(),
            self.edges.len()
        );
    }

    /// Checks every cache against a rebuild from `document`.
    pub fn verify(&self, document: &Document) -> Result<()> {
        self.dependencies.verify(document)?;
        self.nodes.verify(document, &self.dependencies)?;
        self.edges.verify(document)
    }
}

impl DocumentObserver for DocumentCache {
    fn on_added(&mut self, array: DocumentArray, document: &Document, index: usize) {
        match array {
            DocumentArray::Dependencies => self.dependencies.on_added(document, index),
            DocumentArray::Nodes => self.nodes.on_added(document, &self.dependencies, index),
            DocumentArray::Edges => self.edges.on_added(document, index),
        }
    }

    fn on_removing(&mut self, array: DocumentArray, document: &Document, index: usize) {
        match array {
            DocumentArray::Dependencies => self.dependencies.on_removing(document, index),
            DocumentArray::Nodes => self.nodes.on_removing(document, index),
            DocumentArray::Edges => self.edges.on_removing(document, index),
        }
    }

    fn on_reloaded(&mut self, document: &Document) {
        self.reload(document);
    }
}

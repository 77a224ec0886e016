//! Edge lookups by destination input and by source output.

use crate::error::{FrontendError, Result};
use soundgraph_api::{Document, DocumentArray, Edge, Guid, VertexKey};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeCache {
    /// At most one edge feeds an input.
    input_to_index: HashMap<VertexKey, usize>,
    output_to_indices: HashMap<VertexKey, BTreeSet<usize>>,
}

impl EdgeCache {
    pub fn from_document(document: &Document) -> Self {
        let mut cache = Self::default();
        cache.reload(document);
        cache
    }

    pub fn reload(&mut self, document: &Document) {
        self.input_to_index.clear();
        self.output_to_indices.clear();
        for index in 0..document.edges().len() {
            self.on_added(document, index);
        }
    }

    pub fn on_added(&mut self, document: &Document, index: usize) {
        let Some(edge) = document.edges().get(index) else {
            tracing::error!("Edge added at out of range index {}", index);
            return;
        };
        if let Some(previous) = self.input_to_index.insert(edge.input_key(), index) {
            tracing::error!(
                "Input {}:{} already fed by edge {}, replaced by {}",
                edge.to_node_id,
                edge.to_vertex_id,
                previous,
                index
            );
        }
        self.output_to_indices
            .entry(edge.output_key())
            .or_default()
            .insert(index);
    }

    pub fn on_removing(&mut self, document: &Document, index: usize) {
        let Some(edge) = document.edges().get(index) else {
            tracing::error!("Edge removing at out of range index {}", index);
            return;
        };
        let input_key = edge.input_key();
        if self.input_to_index.get(&input_key) == Some(&index) {
            self.input_to_index.remove(&input_key);
        }
        let output_key = edge.output_key();
        if let Some(indices) = self.output_to_indices.get_mut(&output_key) {
            indices.remove(&index);
            if indices.is_empty() {
                self.output_to_indices.remove(&output_key);
            }
        }
    }

    pub fn find_edge_index_to_node_input(&self, node_id: Guid, vertex_id: Guid) -> Option<usize> {
        self.input_to_index
            .get(&VertexKey::new(node_id, vertex_id))
            .copied()
    }

    /// Indices of edges leaving an output, ascending.
    pub fn find_edge_indices_from_node_output(&self, node_id: Guid, vertex_id: Guid) -> Vec<usize> {
        self.output_to_indices
            .get(&VertexKey::new(node_id, vertex_id))
            .map(|indices| indices.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_node_input_connected(&self, node_id: Guid, vertex_id: Guid) -> bool {
        self.input_to_index
            .contains_key(&VertexKey::new(node_id, vertex_id))
    }

    pub fn is_node_output_connected(&self, node_id: Guid, vertex_id: Guid) -> bool {
        self.output_to_indices
            .contains_key(&VertexKey::new(node_id, vertex_id))
    }

    pub fn contains_edge(&self, document: &Document, edge: &Edge) -> bool {
        self.input_to_index
            .get(&edge.input_key())
            .and_then(|index| document.edges().get(*index))
            .is_some_and(|existing| existing == edge)
    }

    /// Every edge touching the vertex, whether it is an input or an output.
    pub fn find_edges<'a>(
        &self,
        document: &'a Document,
        node_id: Guid,
        vertex_id: Guid,
    ) -> Vec<&'a Edge> {
        let mut indices = self.find_edge_indices_from_node_output(node_id, vertex_id);
        if let Some(index) = self.find_edge_index_to_node_input(node_id, vertex_id) {
            indices.push(index);
        }
        indices
            .into_iter()
            .filter_map(|index| document.edges().get(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.input_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_to_index.is_empty()
    }

    pub fn verify(&self, document: &Document) -> Result<()> {
        let fresh = Self::from_document(document);
        if *self == fresh {
            return Ok(());
        }
        let stale = self
            .input_to_index
            .iter()
            .find(|(key, index)| fresh.input_to_index.get(*key) != Some(*index));
        let detail = match stale {
            Some((key, index)) => format!(
                "edge into {}:{} cached at {} but found at {:?}",
                key.node_id,
                key.vertex_id,
                index,
                fresh.input_to_index.get(key)
            ),
            None => format!(
                "cached {} edges, document holds {}",
                self.input_to_index.len(),
                document.edges().len()
            ),
        };
        Err(FrontendError::CacheDesync {
            array: DocumentArray::Edges,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: Guid, to: Guid) -> Edge {
        Edge::new(from, Guid::nil(), to, Guid::nil())
    }

    #[test]
    fn test_fan_out_indices() {
        let source = Guid::new_v4();
        let mut document = Document::new();
        document.root_graph.graph.edges.push(edge(source, Guid::new_v4()));
        document.root_graph.graph.edges.push(edge(source, Guid::new_v4()));
        let cache = EdgeCache::from_document(&document);

        assert_eq!(
            cache.find_edge_indices_from_node_output(source, Guid::nil()),
            vec![0, 1]
        );
        assert!(cache.is_node_output_connected(source, Guid::nil()));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_contains_edge_compares_source() {
        let to = Guid::new_v4();
        let mut document = Document::new();
        let existing = edge(Guid::new_v4(), to);
        document.root_graph.graph.edges.push(existing);
        let cache = EdgeCache::from_document(&document);

        assert!(cache.contains_edge(&document, &existing));
        assert!(!cache.contains_edge(&document, &edge(Guid::new_v4(), to)));
        assert!(cache.is_node_input_connected(to, Guid::nil()));
    }

    #[test]
    fn test_find_edges_both_directions() {
        let middle = Guid::new_v4();
        let mut document = Document::new();
        document.root_graph.graph.edges.push(edge(Guid::new_v4(), middle));
        document.root_graph.graph.edges.push(edge(middle, Guid::new_v4()));
        let cache = EdgeCache::from_document(&document);

        assert_eq!(cache.find_edges(&document, middle, Guid::nil()).len(), 2);
    }
}

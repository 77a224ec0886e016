//! Node lookups by id, by class and by graph member name.

use super::DependencyCache;
use crate::error::{FrontendError, Result};
use smol_str::SmolStr;
use soundgraph_api::{ClassType, Document, DocumentArray, Guid, Node, Vertex};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCache {
    id_to_index: HashMap<Guid, usize>,
    class_id_to_indices: HashMap<Guid, BTreeSet<usize>>,
    /// Graph input member nodes by input name.
    input_name_to_index: HashMap<SmolStr, usize>,
    /// Graph output member nodes by output name.
    output_name_to_index: HashMap<SmolStr, usize>,
}

impl NodeCache {
    pub fn from_document(document: &Document, dependencies: &DependencyCache) -> Self {
        let mut cache = Self::default();
        cache.reload(document, dependencies);
        cache
    }

    pub fn reload(&mut self, document: &Document, dependencies: &DependencyCache) {
        self.id_to_index.clear();
        self.class_id_to_indices.clear();
        self.input_name_to_index.clear();
        self.output_name_to_index.clear();
        for index in 0..document.nodes().len() {
            self.on_added(document, dependencies, index);
        }
    }

    pub fn on_added(&mut self, document: &Document, dependencies: &DependencyCache, index: usize) {
        let Some(node) = document.nodes().get(index) else {
            tracing::error!("Node added at out of range index {}", index);
            return;
        };
        self.id_to_index.insert(node.id, index);
        self.class_id_to_indices
            .entry(node.class_id)
            .or_default()
            .insert(index);

        match dependencies
            .find(document, &node.class_id)
            .map(|class| class.metadata.class_type)
        {
            Some(ClassType::Input) => {
                self.input_name_to_index.insert(node.name.clone(), index);
            }
            Some(ClassType::Output) => {
                self.output_name_to_index.insert(node.name.clone(), index);
            }
            _ => {}
        }
    }

    pub fn on_removing(&mut self, document: &Document, index: usize) {
        let Some(node) = document.nodes().get(index) else {
            tracing::error!("Node removing at out of range index {}", index);
            return;
        };
        if self.id_to_index.get(&node.id) == Some(&index) {
            self.id_to_index.remove(&node.id);
        }
        if let Some(indices) = self.class_id_to_indices.get_mut(&node.class_id) {
            indices.remove(&index);
            if indices.is_empty() {
                self.class_id_to_indices.remove(&node.class_id);
            }
        }
        // Member names are unique, so a matching index identifies this node.
        if self.input_name_to_index.get(&node.name) == Some(&index) {
            self.input_name_to_index.remove(&node.name);
        }
        if self.output_name_to_index.get(&node.name) == Some(&index) {
            self.output_name_to_index.remove(&node.name);
        }
    }

    pub fn find_index(&self, node_id: &Guid) -> Option<usize> {
        self.id_to_index.get(node_id).copied()
    }

    pub fn contains(&self, node_id: &Guid) -> bool {
        self.id_to_index.contains_key(node_id)
    }

    pub fn find<'a>(&self, document: &'a Document, node_id: &Guid) -> Option<&'a Node> {
        self.find_index(node_id)
            .and_then(|index| document.nodes().get(index))
    }

    /// Indices of every node instancing `class_id`, ascending.
    pub fn find_indices_of_class(&self, class_id: &Guid) -> Vec<usize> {
        self.class_id_to_indices
            .get(class_id)
            .map(|indices| indices.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn find_nodes_of_class<'a>(
        &self,
        document: &'a Document,
        class_id: &Guid,
    ) -> Vec<&'a Node> {
        self.find_indices_of_class(class_id)
            .into_iter()
            .filter_map(|index| document.nodes().get(index))
            .collect()
    }

    pub fn contains_nodes_of_class(&self, class_id: &Guid) -> bool {
        self.class_id_to_indices.contains_key(class_id)
    }

    pub fn find_input_node_index(&self, name: &str) -> Option<usize> {
        self.input_name_to_index.get(name).copied()
    }

    pub fn find_output_node_index(&self, name: &str) -> Option<usize> {
        self.output_name_to_index.get(name).copied()
    }

    pub fn find_input_node<'a>(&self, document: &'a Document, name: &str) -> Option<&'a Node> {
        self.find_input_node_index(name)
            .and_then(|index| document.nodes().get(index))
    }

    pub fn find_output_node<'a>(&self, document: &'a Document, name: &str) -> Option<&'a Node> {
        self.find_output_node_index(name)
            .and_then(|index| document.nodes().get(index))
    }

    pub fn find_input_vertex<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        vertex_id: &Guid,
    ) -> Option<&'a Vertex> {
        self.find(document, node_id)
            .and_then(|node| node.find_input(vertex_id))
    }

    pub fn find_output_vertex<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        vertex_id: &Guid,
    ) -> Option<&'a Vertex> {
        self.find(document, node_id)
            .and_then(|node| node.find_output(vertex_id))
    }

    pub fn find_input_vertex_by_name<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        name: &str,
    ) -> Option<&'a Vertex> {
        self.find(document, node_id)
            .and_then(|node| node.find_input_by_name(name))
    }

    pub fn find_output_vertex_by_name<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        name: &str,
    ) -> Option<&'a Vertex> {
        self.find(document, node_id)
            .and_then(|node| node.find_output_by_name(name))
    }

    /// Input vertices of `node_id` carrying `type_name`.
    pub fn find_node_inputs<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        type_name: &str,
    ) -> Vec<&'a Vertex> {
        self.find(document, node_id)
            .map(|node| {
                node.interface
                    .inputs
                    .iter()
                    .filter(|vertex| vertex.type_name == type_name)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Output vertices of `node_id` carrying `type_name`.
    pub fn find_node_outputs<'a>(
        &self,
        document: &'a Document,
        node_id: &Guid,
        type_name: &str,
    ) -> Vec<&'a Vertex> {
        self.find(document, node_id)
            .map(|node| {
                node.interface
                    .outputs
                    .iter()
                    .filter(|vertex| vertex.type_name == type_name)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }

    pub fn verify(&self, document: &Document, dependencies: &DependencyCache) -> Result<()> {
        let fresh = Self::from_document(document, dependencies);
        if *self == fresh {
            return Ok(());
        }

        let stale = self
            .id_to_index
            .iter()
            .find(|(id, index)| fresh.id_to_index.get(*id) != Some(*index));
        let detail = match stale {
            Some((id, index)) => format!(
                "node {} cached at {} but found at {:?}",
                id,
                index,
                fresh.id_to_index.get(id)
            ),
            None => format!(
                "cached {} nodes, document holds {}",
                self.id_to_index.len(),
                fresh.id_to_index.len()
            ),
        };
        Err(FrontendError::CacheDesync {
            array: DocumentArray::Nodes,
            detail,
        })
    }
}

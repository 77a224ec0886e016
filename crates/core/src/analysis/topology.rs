//! petgraph view of a document's node graph
//!
//! Built on demand from the flat arrays; never kept in sync with edits.

use crate::error::{FrontendError, Result};
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use soundgraph_api::{Document, Edge, Guid};
use std::collections::HashMap;

/// Directed node graph with node ids as weights and edges as edge weights.
#[derive(Debug, Clone)]
pub struct GraphTopology {
    pub graph: StableDiGraph<Guid, Edge>,

    /// Node id -> graph index
    pub index: HashMap<Guid, NodeIndex>,
}

impl GraphTopology {
    pub fn from_document(document: &Document) -> Self {
        let mut graph =
            StableDiGraph::with_capacity(document.nodes().len(), document.edges().len());
        let mut index = HashMap::with_capacity(document.nodes().len());

        for node in document.nodes() {
            index.insert(node.id, graph.add_node(node.id));
        }

        for edge in document.edges() {
            // Dangling edges are skipped; they fail cache verification instead.
            let endpoints = (index.get(&edge.from_node_id), index.get(&edge.to_node_id));
            if let (Some(&from), Some(&to)) = endpoints {
                graph.add_edge(from, to, *edge);
            } else {
                tracing::warn!("Skipping edge with unknown endpoint: {:?}", edge);
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Node ids in an order where every edge points forward.
    pub fn topological_order(&self) -> Result<Vec<Guid>> {
        let order = toposort(&self.graph, None)
            .map_err(|cycle| FrontendError::GraphCycle(self.graph[cycle.node_id()]))?;
        Ok(order.into_iter().map(|index| self.graph[index]).collect())
    }

    /// Ids of the nodes fed directly by `node_id`.
    pub fn downstream(&self, node_id: &Guid) -> Vec<Guid> {
        self.index
            .get(node_id)
            .map(|&index| {
                self.graph
                    .neighbors_directed(index, petgraph::Direction::Outgoing)
                    .map(|neighbor| self.graph[neighbor])
                    .collect()
            })
            .unwrap_or_default()
    }
}

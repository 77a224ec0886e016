use super::DocumentBuilder;
use indexmap::IndexSet;
use soundgraph_api::{
    AccessType, ClassVertex, DocumentArray, DocumentHandle, Edge, Guid, NamedEdge, Vertex,
};
use tracing::{debug, warn};

/// Outcome of a named-edge batch.
///
/// Valid edges are applied even when others fail; `success` is false if
/// any requested edge could not be resolved or applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeBatch {
    pub edges: Vec<Edge>,
    pub success: bool,
}

impl EdgeBatch {
    fn new() -> Self {
        Self {
            edges: Vec::new(),
            success: true,
        }
    }
}

impl<D: DocumentHandle> DocumentBuilder<D> {
    /// Whether `edge` may be added. Checked in order: the input is free,
    /// both vertices exist, type names match, access types are compatible.
    pub fn can_add_edge(&self, edge: &Edge) -> bool {
        if self
            .cache
            .edges
            .is_node_input_connected(edge.to_node_id, edge.to_vertex_id)
        {
            return false;
        }

        let (Some(output), Some(input)) = (
            self.find_node_output(&edge.from_node_id, &edge.from_vertex_id),
            self.find_node_input(&edge.to_node_id, &edge.to_vertex_id),
        ) else {
            return false;
        };

        if output.type_name != input.type_name {
            return false;
        }

        match (
            self.find_node_class_output(&edge.from_node_id, &edge.from_vertex_id),
            self.find_node_class_input(&edge.to_node_id, &edge.to_vertex_id),
        ) {
            (Some(class_output), Some(class_input)) => {
                AccessType::can_connect(class_output.access_type, class_input.access_type)
            }
            _ => false,
        }
    }

    pub fn add_edge(&mut self, edge: Edge) -> Option<&Edge> {
        if !self.can_add_edge(&edge) {
            warn!(
                "Rejected edge {}:{} -> {}:{}",
                edge.from_node_id, edge.from_vertex_id, edge.to_node_id, edge.to_vertex_id
            );
            return None;
        }

        self.handle.document_mut().root_graph.graph.edges.push(edge);
        let index = self.document().edges().len() - 1;
        self.notify_added(DocumentArray::Edges, index);
        self.check_cache();
        self.document().edges().get(index)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.cache.edges.contains_edge(self.document(), edge)
    }

    /// Removes `edge` if present. Only an exact match is removed.
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        if !self.contains_edge(edge) {
            return false;
        }
        self.remove_edge_to_node_input(&edge.to_node_id, &edge.to_vertex_id)
    }

    /// Removes the edge feeding the input, if any.
    pub fn remove_edge_to_node_input(&mut self, node_id: &Guid, vertex_id: &Guid) -> bool {
        let Some(index) = self
            .cache
            .edges
            .find_edge_index_to_node_input(*node_id, *vertex_id)
        else {
            return false;
        };
        self.remove_at_swap(DocumentArray::Edges, index);
        self.check_cache();
        true
    }

    /// Removes every edge leaving the output. Returns whether any was removed.
    pub fn remove_edges_from_node_output(&mut self, node_id: &Guid, vertex_id: &Guid) -> bool {
        let mut removed = 0;
        // Each removal can move another edge of this output, so look up again every time.
        while let Some(index) = self
            .cache
            .edges
            .find_edge_indices_from_node_output(*node_id, *vertex_id)
            .first()
            .copied()
        {
            self.remove_at_swap(DocumentArray::Edges, index);
            removed += 1;
        }
        if removed > 0 {
            debug!("Removed {} edges from output {}:{}", removed, node_id, vertex_id);
            self.check_cache();
        }
        removed > 0
    }

    /// Resolves named edges to vertex ids and adds the valid ones.
    pub fn add_named_edges(&mut self, named_edges: &IndexSet<NamedEdge>) -> EdgeBatch {
        let mut batch = EdgeBatch::new();

        let mut to_add = Vec::new();
        for named in named_edges {
            let Some(edge) = self.resolve_named_edge(named) else {
                warn!(
                    "Failed to resolve connection between output '{}' and input '{}'",
                    named.output_name, named.input_name
                );
                batch.success = false;
                continue;
            };
            if self.can_add_edge(&edge) {
                to_add.push(edge);
            } else {
                warn!(
                    "Cannot connect output '{}' to input '{}': incompatible or already connected",
                    named.output_name, named.input_name
                );
                batch.success = false;
            }
        }

        for edge in to_add {
            // Two requests may target the same input; only the first lands.
            match self.add_edge(edge) {
                Some(added) => batch.edges.push(*added),
                None => batch.success = false,
            }
        }
        batch
    }

    /// Resolves named edges and removes those present.
    pub fn remove_named_edges(&mut self, named_edges: &IndexSet<NamedEdge>) -> EdgeBatch {
        let mut batch = EdgeBatch::new();

        let mut to_remove = Vec::new();
        for named in named_edges {
            match self.resolve_named_edge(named) {
                Some(edge) if self.contains_edge(&edge) => to_remove.push(edge),
                _ => {
                    warn!(
                        "Failed to remove connection from output '{}' to input '{}': not found",
                        named.output_name, named.input_name
                    );
                    batch.success = false;
                }
            }
        }

        for edge in to_remove {
            if self.remove_edge_to_node_input(&edge.to_node_id, &edge.to_vertex_id) {
                batch.edges.push(edge);
            } else {
                batch.success = false;
            }
        }
        batch
    }

    fn resolve_named_edge(&self, named: &NamedEdge) -> Option<Edge> {
        let output = self.find_node_output_by_name(&named.output_node_id, &named.output_name)?;
        let input = self.find_node_input_by_name(&named.input_node_id, &named.input_name)?;
        Some(Edge::new(
            named.output_node_id,
            output.vertex_id,
            named.input_node_id,
            input.vertex_id,
        ))
    }

    // ---- Vertex queries ----

    pub fn find_node_input(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&Vertex> {
        self.cache
            .nodes
            .find_input_vertex(self.document(), node_id, vertex_id)
    }

    pub fn find_node_output(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&Vertex> {
        self.cache
            .nodes
            .find_output_vertex(self.document(), node_id, vertex_id)
    }

    pub fn find_node_input_by_name(&self, node_id: &Guid, name: &str) -> Option<&Vertex> {
        self.cache
            .nodes
            .find_input_vertex_by_name(self.document(), node_id, name)
    }

    pub fn find_node_output_by_name(&self, node_id: &Guid, name: &str) -> Option<&Vertex> {
        self.cache
            .nodes
            .find_output_vertex_by_name(self.document(), node_id, name)
    }

    pub fn find_node_inputs(&self, node_id: &Guid, type_name: &str) -> Vec<&Vertex> {
        self.cache
            .nodes
            .find_node_inputs(self.document(), node_id, type_name)
    }

    pub fn find_node_outputs(&self, node_id: &Guid, type_name: &str) -> Vec<&Vertex> {
        self.cache
            .nodes
            .find_node_outputs(self.document(), node_id, type_name)
    }

    /// Class input declaring the node's input vertex.
    pub fn find_node_class_input(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&ClassVertex> {
        let node = self.find_node(node_id)?;
        self.find_dependency_by_id(&node.class_id)?
            .find_input(vertex_id)
    }

    /// Class output declaring the node's output vertex.
    pub fn find_node_class_output(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&ClassVertex> {
        let node = self.find_node(node_id)?;
        self.find_dependency_by_id(&node.class_id)?
            .find_output(vertex_id)
    }

    pub fn is_node_input_connected(&self, node_id: &Guid, vertex_id: &Guid) -> bool {
        self.cache
            .edges
            .is_node_input_connected(*node_id, *vertex_id)
    }

    pub fn is_node_output_connected(&self, node_id: &Guid, vertex_id: &Guid) -> bool {
        self.cache
            .edges
            .is_node_output_connected(*node_id, *vertex_id)
    }

    /// Whether any output of `from` feeds any input of `to`.
    pub fn nodes_are_connected(&self, from_node_id: &Guid, to_node_id: &Guid) -> bool {
        let Some(from) = self.find_node(from_node_id) else {
            return false;
        };
        from.interface.outputs.iter().any(|output| {
            self.cache
                .edges
                .find_edge_indices_from_node_output(from.id, output.vertex_id)
                .into_iter()
                .filter_map(|index| self.document().edges().get(index))
                .any(|edge| edge.to_node_id == *to_node_id)
        })
    }
}

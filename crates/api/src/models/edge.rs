use super::Guid;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Directed connection from one node output to one node input.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from_node_id: Guid,
    pub from_vertex_id: Guid,
    pub to_node_id: Guid,
    pub to_vertex_id: Guid,
}

impl Edge {
    pub fn new(
        from_node_id: Guid,
        from_vertex_id: Guid,
        to_node_id: Guid,
        to_vertex_id: Guid,
    ) -> Self {
        Self {
            from_node_id,
            from_vertex_id,
            to_node_id,
            to_vertex_id,
        }
    }

    /// Key of the destination input; unique across a graph.
    pub fn input_key(&self) -> VertexKey {
        VertexKey::new(self.to_node_id, self.to_vertex_id)
    }

    /// Key of the source output; may be shared by many edges.
    pub fn output_key(&self) -> VertexKey {
        VertexKey::new(self.from_node_id, self.from_vertex_id)
    }
}

/// `(node id, vertex id)` pair addressing one vertex in a graph.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub node_id: Guid,
    pub vertex_id: Guid,
}

impl VertexKey {
    pub fn new(node_id: Guid, vertex_id: Guid) -> Self {
        Self { node_id, vertex_id }
    }
}

/// Edge addressed by vertex names rather than vertex ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedEdge {
    pub output_node_id: Guid,
    pub output_name: SmolStr,
    pub input_node_id: Guid,
    pub input_name: SmolStr,
}

impl NamedEdge {
    pub fn new(
        output_node_id: Guid,
        output_name: impl Into<SmolStr>,
        input_node_id: Guid,
        input_name: impl Into<SmolStr>,
    ) -> Self {
        Self {
            output_node_id,
            output_name: output_name.into(),
            input_node_id,
            input_name: input_name.into(),
        }
    }
}

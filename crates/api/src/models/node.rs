use super::class::{ClassDescriptor, ClassVertex};
use super::literal::Literal;
use super::Guid;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Realized connection point on a node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub vertex_id: Guid,
    pub name: SmolStr,
    pub type_name: SmolStr,
}

impl From<&ClassVertex> for Vertex {
    fn from(vertex: &ClassVertex) -> Self {
        Self {
            vertex_id: vertex.vertex_id,
            name: vertex.name.clone(),
            type_name: vertex.type_name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInterface {
    #[serde(default)]
    pub inputs: Vec<Vertex>,
    #[serde(default)]
    pub outputs: Vec<Vertex>,
}

/// Default override for one input vertex of a node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VertexLiteral {
    pub vertex_id: Guid,
    pub value: Literal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Editor display data. Carried, never interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    #[serde(default)]
    pub locations: Vec<(Guid, Position)>,
    #[serde(default)]
    pub is_private: bool,
}

/// One instance of a [`ClassDescriptor`] placed in a graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Guid,
    pub class_id: Guid,
    pub name: SmolStr,
    #[serde(default)]
    pub interface: NodeInterface,
    #[serde(default)]
    pub input_literals: Vec<VertexLiteral>,
    #[serde(default)]
    pub style: NodeStyle,
}

impl Node {
    /// Instantiates `class` with vertex ids copied from the class interface.
    pub fn from_class(class: &ClassDescriptor, id: Guid) -> Self {
        Self {
            id,
            class_id: class.id,
            name: class.metadata.class_name.name.clone(),
            interface: NodeInterface {
                inputs: class.interface.inputs.iter().map(Vertex::from).collect(),
                outputs: class.interface.outputs.iter().map(Vertex::from).collect(),
            },
            input_literals: Vec::new(),
            style: NodeStyle::default(),
        }
    }

    pub fn find_input(&self, vertex_id: &Guid) -> Option<&Vertex> {
        self.interface
            .inputs
            .iter()
            .find(|vertex| vertex.vertex_id == *vertex_id)
    }

    pub fn find_output(&self, vertex_id: &Guid) -> Option<&Vertex> {
        self.interface
            .outputs
            .iter()
            .find(|vertex| vertex.vertex_id == *vertex_id)
    }

    pub fn find_input_by_name(&self, name: &str) -> Option<&Vertex> {
        self.interface.inputs.iter().find(|vertex| vertex.name == name)
    }

    pub fn find_output_by_name(&self, name: &str) -> Option<&Vertex> {
        self.interface.outputs.iter().find(|vertex| vertex.name == name)
    }

    pub fn input_literal(&self, vertex_id: &Guid) -> Option<&Literal> {
        self.input_literals
            .iter()
            .find(|literal| literal.vertex_id == *vertex_id)
            .map(|literal| &literal.value)
    }
}

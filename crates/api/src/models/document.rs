use super::class::{
    ClassDescriptor, ClassInterface, ClassMetadata, ClassName, ClassType, VersionNumber,
};
use super::edge::Edge;
use super::interface::InterfaceVersion;
use super::node::Node;
use super::Guid;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::{BTreeSet, HashSet};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default = "default_editable")]
    pub is_editable: bool,
}

fn default_editable() -> bool {
    true
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            is_editable: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetOptions {
    #[serde(default)]
    pub is_preset: bool,
    #[serde(default)]
    pub inputs_inheriting_default: HashSet<SmolStr>,
}

/// The document's own graph: its class identity, declared members and body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphClass {
    pub id: Guid,
    pub metadata: ClassMetadata,
    /// Declared graph inputs and outputs, each backed by a member node.
    #[serde(default)]
    pub interface: ClassInterface,
    #[serde(default)]
    pub graph: Graph,
    #[serde(default)]
    pub preset_options: PresetOptions,
}

impl Default for GraphClass {
    fn default() -> Self {
        Self {
            id: Guid::new_v4(),
            metadata: ClassMetadata::new(
                ClassName::default(),
                VersionNumber::new(1, 0),
                ClassType::Graph,
            ),
            interface: ClassInterface::default(),
            graph: Graph::default(),
            preset_options: PresetOptions::default(),
        }
    }
}

impl GraphClass {
    /// Class descriptor other documents register when referencing this graph.
    pub fn to_class(&self) -> ClassDescriptor {
        ClassDescriptor {
            id: self.id,
            metadata: self.metadata.clone(),
            interface: self.interface.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub version: u32,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
        }
    }
}

/// Mutable node graph with its class dependencies and declared interfaces.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub root_graph: GraphClass,
    #[serde(default)]
    pub dependencies: Vec<ClassDescriptor>,
    #[serde(default)]
    pub interfaces: BTreeSet<InterfaceVersion>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.root_graph.graph.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.root_graph.graph.edges
    }

    pub fn len_of(&self, array: DocumentArray) -> usize {
        match array {
            DocumentArray::Dependencies => self.dependencies.len(),
            DocumentArray::Nodes => self.root_graph.graph.nodes.len(),
            DocumentArray::Edges => self.root_graph.graph.edges.len(),
        }
    }

    /// Swap-removes the element at `index` of `array`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn swap_remove(&mut self, array: DocumentArray, index: usize) {
        match array {
            DocumentArray::Dependencies => {
                self.dependencies.swap_remove(index);
            }
            DocumentArray::Nodes => {
                self.root_graph.graph.nodes.swap_remove(index);
            }
            DocumentArray::Edges => {
                self.root_graph.graph.edges.swap_remove(index);
            }
        }
    }
}

/// The three index-cached arrays of a [`Document`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentArray {
    Dependencies,
    Nodes,
    Edges,
}

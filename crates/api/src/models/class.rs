use super::literal::Literal;
use super::Guid;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Kind of a node class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    /// Natively implemented or referenced from another graph.
    External,
    /// A graph defined by a document. Never stored as a dependency kind.
    Graph,
    /// Member node feeding a graph input into the graph.
    Input,
    /// Member node collecting a graph output.
    Output,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::External => "external",
            ClassType::Graph => "graph",
            ClassType::Input => "input",
            ClassType::Output => "output",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-part class name. The full name joins the non-empty parts with `.`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    #[serde(default)]
    pub namespace: SmolStr,
    pub name: SmolStr,
    #[serde(default)]
    pub variant: SmolStr,
}

impl ClassName {
    pub fn new(
        namespace: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        variant: impl Into<SmolStr>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            variant: variant.into(),
        }
    }

    pub fn full_name(&self) -> String {
        [&self.namespace, &self.name, &self.variant]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

impl VersionNumber {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub class_name: ClassName,
    pub version: VersionNumber,
    pub class_type: ClassType,
    #[serde(default)]
    pub author: String,
}

impl ClassMetadata {
    pub fn new(class_name: ClassName, version: VersionNumber, class_type: ClassType) -> Self {
        Self {
            class_name,
            version,
            class_type,
            author: String::new(),
        }
    }
}

/// How a vertex's data is accessed by the connected node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Read once at construction; never changes afterwards.
    Value,
    /// Shared data that may change on every execution.
    #[default]
    Reference,
}

impl AccessType {
    /// Whether an output of access type `output` may feed an input of
    /// access type `input`.
    ///
    /// | output \ input | Value | Reference |
    /// |----------------|-------|-----------|
    /// | Value          | yes   | yes       |
    /// | Reference      | no    | yes       |
    pub fn can_connect(output: AccessType, input: AccessType) -> bool {
        match output {
            AccessType::Reference => input == AccessType::Reference,
            AccessType::Value => true,
        }
    }
}

/// Declared vertex on a class (or on a graph's own interface).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassVertex {
    /// Member node backing this vertex when declared on a graph interface.
    #[serde(default)]
    pub node_id: Guid,
    pub vertex_id: Guid,
    pub name: SmolStr,
    pub type_name: SmolStr,
    #[serde(default)]
    pub access_type: AccessType,
    #[serde(default)]
    pub default_literal: Option<Literal>,
    #[serde(default)]
    pub sort_order_index: i32,
}

impl ClassVertex {
    /// New vertex with a fresh vertex id and no backing node.
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            node_id: Guid::nil(),
            vertex_id: Guid::new_v4(),
            name: name.into(),
            type_name: type_name.into(),
            access_type: AccessType::default(),
            default_literal: None,
            sort_order_index: 0,
        }
    }

    pub fn with_access_type(mut self, access_type: AccessType) -> Self {
        self.access_type = access_type;
        self
    }

    pub fn with_default(mut self, literal: Literal) -> Self {
        self.default_literal = Some(literal);
        self
    }

    pub fn with_node_id(mut self, node_id: Guid) -> Self {
        self.node_id = node_id;
        self
    }

    /// Splits `namespace:name` at the last `:`.
    pub fn split_name(&self) -> (&str, &str) {
        match self.name.rsplit_once(':') {
            Some((namespace, param)) => (namespace, param),
            None => ("", self.name.as_str()),
        }
    }

    /// Same name, type and access; ids are ignored.
    pub fn is_functional_equivalent(&self, other: &ClassVertex) -> bool {
        self.name == other.name
            && self.type_name == other.type_name
            && self.access_type == other.access_type
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClassInterface {
    #[serde(default)]
    pub inputs: Vec<ClassVertex>,
    #[serde(default)]
    pub outputs: Vec<ClassVertex>,
}

/// Reusable description of a node type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub id: Guid,
    pub metadata: ClassMetadata,
    #[serde(default)]
    pub interface: ClassInterface,
}

impl ClassDescriptor {
    pub fn new(metadata: ClassMetadata, interface: ClassInterface) -> Self {
        Self {
            id: Guid::new_v4(),
            metadata,
            interface,
        }
    }

    pub fn find_input(&self, vertex_id: &Guid) -> Option<&ClassVertex> {
        self.interface
            .inputs
            .iter()
            .find(|vertex| vertex.vertex_id == *vertex_id)
    }

    pub fn find_output(&self, vertex_id: &Guid) -> Option<&ClassVertex> {
        self.interface
            .outputs
            .iter()
            .find(|vertex| vertex.vertex_id == *vertex_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_empty_parts() {
        assert_eq!(ClassName::new("UE", "Sine", "Audio").full_name(), "UE.Sine.Audio");
        assert_eq!(ClassName::new("", "Sine", "").full_name(), "Sine");
    }

    #[test]
    fn test_access_type_table() {
        use AccessType::*;
        assert!(AccessType::can_connect(Value, Value));
        assert!(AccessType::can_connect(Value, Reference));
        assert!(AccessType::can_connect(Reference, Reference));
        assert!(!AccessType::can_connect(Reference, Value));
    }

    #[test]
    fn test_split_name() {
        let vertex = ClassVertex::new("UE.Source:OnPlay", "Trigger");
        assert_eq!(vertex.split_name(), ("UE.Source", "OnPlay"));
        let bare = ClassVertex::new("Freq", "Float");
        assert_eq!(bare.split_name(), ("", "Freq"));
    }
}

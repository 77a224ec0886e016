use super::class::{ClassVertex, VersionNumber};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Name and version of an interface. Also the interface registry key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceVersion {
    pub name: SmolStr,
    pub number: VersionNumber,
}

impl InterfaceVersion {
    pub fn new(name: impl Into<SmolStr>, major: u32, minor: u32) -> Self {
        Self {
            name: name.into(),
            number: VersionNumber::new(major, minor),
        }
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.number)
    }
}

/// Per document class options for an interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InterfaceClassOptions {
    pub class_path: String,
    /// Whether builders of this class may add or remove the interface.
    #[serde(default = "default_true")]
    pub is_modifiable: bool,
    /// Whether new documents of this class declare the interface.
    #[serde(default)]
    pub is_default: bool,
}

fn default_true() -> bool {
    true
}

/// Named, versioned bundle of expected graph inputs and outputs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InterfaceDescriptor {
    pub version: InterfaceVersion,
    #[serde(default)]
    pub inputs: Vec<ClassVertex>,
    #[serde(default)]
    pub outputs: Vec<ClassVertex>,
    #[serde(default)]
    pub class_options: Vec<InterfaceClassOptions>,
}

impl InterfaceDescriptor {
    pub fn new(version: InterfaceVersion) -> Self {
        Self {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            class_options: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: ClassVertex) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: ClassVertex) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_class_options(mut self, options: InterfaceClassOptions) -> Self {
        self.class_options.push(options);
        self
    }

    pub fn find_class_options(&self, class_path: &str) -> Option<&InterfaceClassOptions> {
        self.class_options
            .iter()
            .find(|options| options.class_path == class_path)
    }
}

/// One output-name to input-name pair of an interface binding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    pub output_name: SmolStr,
    pub input_name: SmolStr,
}

impl VertexBinding {
    pub fn new(output_name: impl Into<SmolStr>, input_name: impl Into<SmolStr>) -> Self {
        Self {
            output_name: output_name.into(),
            input_name: input_name.into(),
        }
    }
}

/// Rule describing which vertices to connect when a node implementing
/// `output_interface` is wired into a node implementing `input_interface`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InterfaceBindingEntry {
    pub input_interface: InterfaceVersion,
    pub output_interface: InterfaceVersion,
    /// Lower values win.
    pub priority: i32,
    pub vertex_bindings: Vec<VertexBinding>,
}

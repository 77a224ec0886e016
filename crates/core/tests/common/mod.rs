#![allow(dead_code)]

use soundgraph_api::{
    ClassDescriptor, ClassInterface, ClassMetadata, ClassName, ClassType, ClassVertex, Document,
    Guid, InterfaceBindingEntry, InterfaceClassOptions, InterfaceDescriptor, InterfaceVersion,
    LiteralType, VersionNumber, VertexBinding,
};
use soundgraph_core::registry::{
    InMemoryAssetManager, InMemoryDataTypeRegistry, InMemoryInterfaceBindingRegistry,
    InMemoryInterfaceRegistry, InMemoryNodeClassRegistry,
};
use soundgraph_core::{BuilderConfig, DocumentBuilder, Registries};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const CLASS_PATH: &str = "/Script/Soundgraph.Source";

/// Concrete in-memory registries, kept so tests can register more after construction.
pub struct Fixture {
    pub interfaces: Arc<InMemoryInterfaceRegistry>,
    pub bindings: Arc<InMemoryInterfaceBindingRegistry>,
    pub node_classes: Arc<InMemoryNodeClassRegistry>,
    pub data_types: Arc<InMemoryDataTypeRegistry>,
    pub assets: Arc<InMemoryAssetManager>,
}

impl Fixture {
    pub fn new() -> Self {
        let data_types = InMemoryDataTypeRegistry::new();
        data_types
            .register("Float", [LiteralType::Float, LiteralType::Int])
            .unwrap();
        data_types.register("Audio", []).unwrap();
        data_types.register("Trigger", [LiteralType::Bool]).unwrap();

        let node_classes = InMemoryNodeClassRegistry::new();
        node_classes.register(sine_class()).unwrap();
        node_classes.register(gain_class()).unwrap();

        Self {
            interfaces: Arc::new(InMemoryInterfaceRegistry::new()),
            bindings: Arc::new(InMemoryInterfaceBindingRegistry::new()),
            node_classes: Arc::new(node_classes),
            data_types: Arc::new(data_types),
            assets: Arc::new(InMemoryAssetManager::new()),
        }
    }

    pub fn registries(&self) -> Registries {
        Registries::new()
            .with_interfaces(self.interfaces.clone())
            .with_bindings(self.bindings.clone())
            .with_node_classes(self.node_classes.clone())
            .with_data_types(self.data_types.clone())
            .with_assets(self.assets.clone())
    }

    pub fn builder(&self) -> DocumentBuilder {
        DocumentBuilder::new(Document::new(), self.registries()).with_config(
            BuilderConfig::default()
                .with_verify_cache(true)
                .with_class_path(CLASS_PATH),
        )
    }
}

pub fn external(
    name: &str,
    inputs: Vec<ClassVertex>,
    outputs: Vec<ClassVertex>,
) -> ClassDescriptor {
    ClassDescriptor::new(
        ClassMetadata::new(
            ClassName::new("UE", name, "Audio"),
            VersionNumber::new(1, 0),
            ClassType::External,
        ),
        ClassInterface { inputs, outputs },
    )
}

/// Float frequency in, audio out.
pub fn sine_class() -> ClassDescriptor {
    external(
        "Sine",
        vec![ClassVertex::new("Frequency", "Float")],
        vec![ClassVertex::new("Audio", "Audio")],
    )
}

/// Audio in, audio out.
pub fn gain_class() -> ClassDescriptor {
    external(
        "Gain",
        vec![ClassVertex::new("In", "Audio")],
        vec![ClassVertex::new("Out", "Audio")],
    )
}

pub fn member(name: &str, type_name: &str) -> ClassVertex {
    ClassVertex::new(name, type_name).with_node_id(Guid::new_v4())
}

pub fn mono_output() -> InterfaceDescriptor {
    InterfaceDescriptor::new(InterfaceVersion::new("UE.OutputFormat.Mono", 1, 0))
        .with_output(ClassVertex::new("UE.OutputFormat.Mono:Audio:0", "Audio"))
        .with_class_options(InterfaceClassOptions {
            class_path: CLASS_PATH.to_string(),
            is_modifiable: true,
            is_default: true,
        })
}

pub fn source_interface() -> InterfaceDescriptor {
    InterfaceDescriptor::new(InterfaceVersion::new("UE.Source", 1, 0))
        .with_input(ClassVertex::new("UE.Source:OnPlay", "Trigger"))
        .with_output(ClassVertex::new("UE.Source:OnFinished", "Trigger"))
        .with_class_options(InterfaceClassOptions {
            class_path: CLASS_PATH.to_string(),
            is_modifiable: true,
            is_default: true,
        })
}

pub fn binding(
    input: &InterfaceVersion,
    output: &InterfaceVersion,
    priority: i32,
    pairs: &[(&str, &str)],
) -> InterfaceBindingEntry {
    InterfaceBindingEntry {
        input_interface: input.clone(),
        output_interface: output.clone(),
        priority,
        vertex_bindings: pairs
            .iter()
            .map(|(output, input)| VertexBinding::new(*output, *input))
            .collect(),
    }
}

pub fn versions(versions: &[&InterfaceVersion]) -> BTreeSet<InterfaceVersion> {
    versions.iter().map(|version| (*version).clone()).collect()
}

pub fn vertex_id(vertices: &[ClassVertex], name: &str) -> Guid {
    vertices
        .iter()
        .find(|vertex| vertex.name == name)
        .map(|vertex| vertex.vertex_id)
        .unwrap()
}

//! Collaborators injected into a builder, plus in-memory implementations.

pub mod asset;
pub mod binding;
pub mod data_type;
pub mod interface;
pub mod node_class;

pub use asset::InMemoryAssetManager;
pub use binding::InMemoryInterfaceBindingRegistry;
pub use data_type::InMemoryDataTypeRegistry;
pub use interface::InMemoryInterfaceRegistry;
pub use node_class::InMemoryNodeClassRegistry;

use soundgraph_api::{
    AssetManager, DataTypeRegistry, InterfaceBindingRegistry, InterfaceRegistry, NodeClassRegistry,
};
use std::sync::Arc;

/// Registry handles shared by builders. Cloning shares the registries.
#[derive(Clone)]
pub struct Registries {
    pub interfaces: Arc<dyn InterfaceRegistry>,
    pub bindings: Arc<dyn InterfaceBindingRegistry>,
    pub node_classes: Arc<dyn NodeClassRegistry>,
    pub data_types: Arc<dyn DataTypeRegistry>,
    pub assets: Arc<dyn AssetManager>,
}

impl Registries {
    /// Empty in-memory registries.
    pub fn new() -> Self {
        Self {
            interfaces: Arc::new(InMemoryInterfaceRegistry::new()),
            bindings: Arc::new(InMemoryInterfaceBindingRegistry::new()),
            node_classes: Arc::new(InMemoryNodeClassRegistry::new()),
            data_types: Arc::new(InMemoryDataTypeRegistry::new()),
            assets: Arc::new(InMemoryAssetManager::new()),
        }
    }

    pub fn with_interfaces(mut self, interfaces: Arc<dyn InterfaceRegistry>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_bindings(mut self, bindings: Arc<dyn InterfaceBindingRegistry>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_node_classes(mut self, node_classes: Arc<dyn NodeClassRegistry>) -> Self {
        self.node_classes = node_classes;
        self
    }

    pub fn with_data_types(mut self, data_types: Arc<dyn DataTypeRegistry>) -> Self {
        self.data_types = data_types;
        self
    }

    pub fn with_assets(mut self, assets: Arc<dyn AssetManager>) -> Self {
        self.assets = assets;
        self
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

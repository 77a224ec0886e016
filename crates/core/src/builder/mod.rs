//! Document builder: the sole mutator of a document.
//!
//! Every structural edit goes through the builder, which keeps the
//! [`DocumentCache`] in step with the document arrays. Appends notify
//! `on_added`; removals use [`DocumentBuilder::remove_at_swap`].

mod bindings;
mod edges;
mod interfaces;
mod members;

pub use bindings::interface_bound_edges;
pub use edges::EdgeBatch;
pub use interfaces::{ModifyInterfaceOptions, NamePairingFn};

use crate::analysis::GraphTopology;
use crate::cache::{DocumentCache, DocumentObserver};
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::registry::Registries;
use soundgraph_api::{
    ClassDescriptor, ClassMetadata, ClassName, ClassRegistryKey, ClassType, Document,
    DocumentArray, DocumentHandle, GraphClass, Guid, Node, VersionNumber,
};
use tracing::{debug, warn};

pub struct DocumentBuilder<D: DocumentHandle = Document> {
    handle: D,
    cache: DocumentCache,
    registries: Registries,
    config: BuilderConfig,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl<D: DocumentHandle> DocumentBuilder<D> {
    /// Wraps `handle` and builds the cache from its document.
    pub fn new(handle: D, registries: Registries) -> Self {
        let cache = DocumentCache::new(handle.document());
        Self {
            handle,
            cache,
            registries,
            config: BuilderConfig::default(),
            observers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn document(&self) -> &Document {
        self.handle.document()
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn into_handle(self) -> D {
        self.handle
    }

    /// Class path used for interface options: the configured one, else the handle's.
    pub fn class_path(&self) -> &str {
        if self.config.class_path.is_empty() {
            self.handle.class_path()
        } else {
            &self.config.class_path
        }
    }

    /// Registers an observer notified of every index delta after the cache.
    pub fn add_observer(&mut self, observer: Box<dyn DocumentObserver>) {
        self.observers.push(observer);
    }

    /// Rebuilds the cache from scratch and tells observers.
    pub fn reload_cache(&mut self) {
        let document = self.handle.document();
        self.cache.reload(document);
        for observer in &mut self.observers {
            observer.on_reloaded(document);
        }
    }

    /// Checks the cache against the document.
    pub fn verify_cache(&self) -> Result<()> {
        self.cache.verify(self.document())
    }

    /// Panics on cache desync when verification is enabled.
    fn check_cache(&self) {
        if !self.config.verify_cache {
            return;
        }
        if let Err(err) = self.verify_cache() {
            tracing::error!("{}", err);
            panic!("document cache desync: {err}");
        }
    }

    // ---- Cache protocol ----

    fn notify_added(&mut self, array: DocumentArray, index: usize) {
        let document = self.handle.document();
        self.cache.on_added(array, document, index);
        for observer in &mut self.observers {
            observer.on_added(array, document, index);
        }
    }

    fn notify_removing(&mut self, array: DocumentArray, index: usize) {
        let document = self.handle.document();
        self.cache.on_removing(array, document, index);
        for observer in &mut self.observers {
            observer.on_removing(array, document, index);
        }
    }

    /// Swap-removes `index` from `array`, keeping caches in step.
    ///
    /// The element at the last slot moves into `index`, so it is unindexed
    /// before the swap and indexed again at its new position afterwards.
    fn remove_at_swap(&mut self, array: DocumentArray, index: usize) {
        let len = self.document().len_of(array);
        assert!(index < len, "swap removal of {array:?}[{index}] out of range (len {len})");
        let last = len - 1;

        self.notify_removing(array, index);
        if index != last {
            self.notify_removing(array, last);
        }
        self.handle.document_mut().swap_remove(array, index);
        if index != last {
            self.notify_added(array, index);
        }
        debug!("Swap-removed {:?}[{}] (last was {})", array, index, last);
    }

    // ---- Dependencies ----

    /// Appends a copy of `class` as a dependency with a fresh id.
    ///
    /// Graph classes are recorded as external. Returns `None` when a
    /// dependency with the same registry key already exists.
    pub fn add_dependency(&mut self, class: &ClassDescriptor) -> Option<&ClassDescriptor> {
        let mut dependency = class.clone();
        if dependency.metadata.class_type == ClassType::Graph {
            dependency.metadata.class_type = ClassType::External;
        }

        let key = ClassRegistryKey::from(&dependency.metadata);
        if self.cache.dependencies.find_index_by_key(&key).is_some() {
            warn!("Dependency {} already present on document", key);
            return None;
        }

        dependency.id = Guid::new_v4();
        self.handle.document_mut().dependencies.push(dependency);
        let index = self.document().dependencies.len() - 1;
        self.notify_added(DocumentArray::Dependencies, index);
        debug!("Added dependency {} at {}", key, index);
        self.check_cache();
        self.document().dependencies.get(index)
    }

    /// Adds a dependency on a registered native class.
    pub fn add_native_dependency(&mut self, metadata: &ClassMetadata) -> Option<&ClassDescriptor> {
        let key = ClassRegistryKey::from(metadata);
        let Some(class) = self.registries.node_classes.find_class(&key) else {
            warn!("Node class {} is not registered", key);
            return None;
        };
        self.add_dependency(&class)
    }

    /// Adds a dependency on another document's graph class.
    pub fn add_graph_dependency(&mut self, graph_class: &GraphClass) -> Option<&ClassDescriptor> {
        self.add_dependency(&graph_class.to_class())
    }

    pub fn find_dependency(&self, metadata: &ClassMetadata) -> Option<&ClassDescriptor> {
        debug_assert!(
            metadata.class_type != ClassType::Graph,
            "dependencies are never stored with the graph class type"
        );
        self.cache
            .dependencies
            .find_by_key(self.document(), &ClassRegistryKey::from(metadata))
    }

    pub fn find_dependency_by_id(&self, class_id: &Guid) -> Option<&ClassDescriptor> {
        self.cache.dependencies.find(self.document(), class_id)
    }

    pub fn is_dependency_referenced(&self, class_id: &Guid) -> bool {
        self.cache.nodes.contains_nodes_of_class(class_id)
    }

    /// Removes the dependency and every node instancing it.
    pub fn remove_dependency(
        &mut self,
        class_type: ClassType,
        class_name: &ClassName,
        version: VersionNumber,
    ) -> bool {
        let key = ClassRegistryKey::new(class_type, class_name, version);
        let Some(index) = self.cache.dependencies.find_index_by_key(&key) else {
            debug!("Dependency {} not found on document", key);
            return false;
        };
        let class_id = self.document().dependencies[index].id;
        self.remove_dependency_by_id(&class_id)
    }

    pub fn remove_dependency_by_id(&mut self, class_id: &Guid) -> bool {
        if self.cache.dependencies.find_index(class_id).is_none() {
            return false;
        }

        let node_ids: Vec<Guid> = self
            .cache
            .nodes
            .find_nodes_of_class(self.document(), class_id)
            .into_iter()
            .map(|node| node.id)
            .collect();
        for node_id in node_ids {
            self.remove_node(&node_id);
        }

        // Node removal leaves dependency indices untouched.
        let Some(index) = self.cache.dependencies.find_index(class_id) else {
            return false;
        };
        self.remove_at_swap(DocumentArray::Dependencies, index);
        self.check_cache();
        true
    }

    /// Removes every dependency no node instances. Returns whether any was removed.
    pub fn remove_unused_dependencies(&mut self) -> bool {
        let mut removed = false;
        // Backwards, so swap-ins come from already visited slots.
        for index in (0..self.document().dependencies.len()).rev() {
            let Some(class_id) = self.document().dependencies.get(index).map(|class| class.id)
            else {
                continue;
            };
            if !self.cache.nodes.contains_nodes_of_class(&class_id) {
                removed |= self.remove_dependency_by_id(&class_id);
            }
        }
        removed
    }

    // ---- Nodes ----

    /// Instantiates the dependency registered under `metadata`'s key.
    ///
    /// A nil `node_id` is replaced by a fresh one. Returns `None` when the
    /// dependency is missing or the id is already used.
    pub fn add_node(&mut self, metadata: &ClassMetadata, node_id: Guid) -> Option<&Node> {
        self.add_node_internal(metadata, node_id, |_| {})
    }

    pub(crate) fn add_node_internal(
        &mut self,
        metadata: &ClassMetadata,
        node_id: Guid,
        finalize: impl FnOnce(&mut Node),
    ) -> Option<&Node> {
        let key = ClassRegistryKey::from(metadata);
        let Some(dependency) = self.cache.dependencies.find_by_key(self.document(), &key) else {
            warn!("Cannot add node: dependency {} not registered on document", key);
            return None;
        };

        let node_id = if node_id.is_nil() { Guid::new_v4() } else { node_id };
        if self.cache.nodes.contains(&node_id) {
            warn!("Cannot add node: id {} already in use", node_id);
            return None;
        }

        let mut node = Node::from_class(dependency, node_id);
        finalize(&mut node);

        self.handle.document_mut().root_graph.graph.nodes.push(node);
        let index = self.document().nodes().len() - 1;
        self.notify_added(DocumentArray::Nodes, index);
        debug!("Added node {} of {} at {}", node_id, key, index);
        self.check_cache();
        self.document().nodes().get(index)
    }

    /// Adds a node of the highest registered minor version of `class_name`.
    ///
    /// Member classes (inputs and outputs) are rejected.
    pub fn add_node_by_class_name(
        &mut self,
        class_name: &ClassName,
        major_version: u32,
        node_id: Guid,
    ) -> Option<&Node> {
        let Some(mut class) = self
            .registries
            .node_classes
            .find_class_with_highest_minor_version(class_name, major_version)
        else {
            warn!("Failed to add node by class name '{}': class not found", class_name);
            return None;
        };

        let class_type = class.metadata.class_type;
        if !matches!(class_type, ClassType::External | ClassType::Graph) {
            warn!(
                "Failed to add node by class name '{}': {} classes cannot be added directly",
                class_name, class_type
            );
            return None;
        }

        class.metadata.class_type = ClassType::External;
        if self.find_dependency(&class.metadata).is_none()
            && self.add_dependency(&class).is_none()
        {
            return None;
        }
        self.add_node(&class.metadata, node_id)
    }

    /// Adds a node referencing another document's graph.
    pub fn add_graph_node(&mut self, graph_class: &GraphClass, node_id: Guid) -> Option<&Node> {
        let mut metadata = graph_class.metadata.clone();
        metadata.class_type = ClassType::External;
        if self.find_dependency(&metadata).is_none()
            && self.add_graph_dependency(graph_class).is_none()
        {
            return None;
        }
        self.add_node(&metadata, node_id)
    }

    pub fn find_node(&self, node_id: &Guid) -> Option<&Node> {
        self.cache.nodes.find(self.document(), node_id)
    }

    pub fn contains_node(&self, node_id: &Guid) -> bool {
        self.cache.nodes.contains(node_id)
    }

    /// Removes the node and every edge touching it.
    ///
    /// Edges are only removed once the node is known to exist, and removing
    /// an unconnected vertex is not a failure, so either everything goes or
    /// nothing changes. Removing a graph member node also drops its
    /// declared input or output.
    pub fn remove_node(&mut self, node_id: &Guid) -> bool {
        let Some(node) = self.find_node(node_id) else {
            debug!("Node {} not found on document", node_id);
            return false;
        };
        let class_type = self
            .find_dependency_by_id(&node.class_id)
            .map(|class| class.metadata.class_type);
        let inputs: Vec<Guid> = node.interface.inputs.iter().map(|v| v.vertex_id).collect();
        let outputs: Vec<Guid> = node.interface.outputs.iter().map(|v| v.vertex_id).collect();

        for vertex_id in inputs {
            self.remove_edge_to_node_input(node_id, &vertex_id);
        }
        for vertex_id in outputs {
            self.remove_edges_from_node_output(node_id, &vertex_id);
        }

        let Some(index) = self.cache.nodes.find_index(node_id) else {
            return false;
        };
        self.remove_at_swap(DocumentArray::Nodes, index);
        if let Some(class_type) = class_type {
            self.remove_member_declaration(node_id, class_type);
        }
        debug!("Removed node {}", node_id);
        self.check_cache();
        true
    }

    // ---- Document ----

    /// Empties the graph, its members, declared interfaces and dependencies.
    pub fn clear_graph(&mut self) {
        let document = self.handle.document_mut();
        let root_graph = &mut document.root_graph;
        root_graph.graph.nodes.clear();
        root_graph.graph.edges.clear();
        root_graph.interface.inputs.clear();
        root_graph.interface.outputs.clear();
        root_graph.preset_options.inputs_inheriting_default.clear();
        document.interfaces.clear();

        self.reload_cache();
        self.remove_unused_dependencies();
        self.check_cache();
    }

    pub fn is_preset(&self) -> bool {
        self.document().root_graph.preset_options.is_preset
    }

    /// Turns a preset back into an editable graph. `false` if it was not a preset.
    pub fn convert_from_preset(&mut self) -> bool {
        if !self.is_preset() {
            return false;
        }
        let root_graph = &mut self.handle.document_mut().root_graph;
        root_graph.preset_options.is_preset = false;
        root_graph.preset_options.inputs_inheriting_default.clear();
        root_graph.graph.is_editable = true;
        true
    }

    // ---- Analysis ----

    pub fn topology(&self) -> GraphTopology {
        GraphTopology::from_document(self.document())
    }

    pub fn has_cycle(&self) -> bool {
        self.topology().has_cycle()
    }

    /// Node ids ordered so every edge points forward.
    pub fn topological_node_order(&self) -> Result<Vec<Guid>> {
        self.topology().topological_order()
    }
}

impl DocumentBuilder<Document> {
    pub fn into_document(self) -> Document {
        self.handle
    }
}

/// Clones the document and builds a fresh cache; observers are not carried over.
impl<D: DocumentHandle + Clone> Clone for DocumentBuilder<D> {
    fn clone(&self) -> Self {
        DocumentBuilder::new(self.handle.clone(), self.registries.clone())
            .with_config(self.config.clone())
    }
}

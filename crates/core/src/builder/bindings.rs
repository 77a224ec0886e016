//! Automatic wiring between nodes through registered interface bindings.

use super::{DocumentBuilder, EdgeBatch};
use indexmap::IndexSet;
use soundgraph_api::{
    ClassRegistryKey, DocumentHandle, Guid, InterfaceBindingRegistry, InterfaceVersion, NamedEdge,
};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Named edges implied by binding rules between the interfaces of two nodes.
///
/// For every interface of the destination node, its binding entries are
/// applied in ascending priority order, skipping entries whose output
/// interface the source node does not implement. An input name already
/// claimed by an earlier binding is never bound again.
pub fn interface_bound_edges(
    from_node_id: Guid,
    from_interfaces: &BTreeSet<InterfaceVersion>,
    to_node_id: Guid,
    to_interfaces: &BTreeSet<InterfaceVersion>,
    bindings: &dyn InterfaceBindingRegistry,
) -> IndexSet<NamedEdge> {
    let mut named_edges = IndexSet::new();
    let mut bound_inputs = HashSet::new();

    for input_interface in to_interfaces {
        let mut entries = bindings.find_interface_binding_entries(input_interface);
        entries.sort_by_key(|entry| entry.priority);

        for entry in entries
            .iter()
            .filter(|entry| from_interfaces.contains(&entry.output_interface))
        {
            for binding in &entry.vertex_bindings {
                if bound_inputs.insert(binding.input_name.clone()) {
                    named_edges.insert(NamedEdge::new(
                        from_node_id,
                        binding.output_name.clone(),
                        to_node_id,
                        binding.input_name.clone(),
                    ));
                }
            }
        }
    }
    named_edges
}

impl<D: DocumentHandle> DocumentBuilder<D> {
    /// Interfaces implemented by the class of `node_id`.
    ///
    /// Graph classes backed by a loadable asset report the interfaces the
    /// asset declares; otherwise the node class registry is asked.
    pub fn find_node_class_interfaces(&self, node_id: &Guid) -> Option<BTreeSet<InterfaceVersion>> {
        let node = self.find_node(node_id)?;
        let class = self.find_dependency_by_id(&node.class_id)?;
        let key = ClassRegistryKey::from(&class.metadata);

        if let Some(asset) = self.registries.assets.try_load_asset_from_key(&key) {
            return Some(asset.interfaces.clone());
        }
        self.registries.node_classes.find_implemented_interfaces(&key)
    }

    fn bound_edges_between(
        &self,
        from_node_id: &Guid,
        to_node_id: &Guid,
    ) -> Option<IndexSet<NamedEdge>> {
        let Some(from_interfaces) = self.find_node_class_interfaces(from_node_id) else {
            debug!("No interfaces known for node {}", from_node_id);
            return None;
        };
        let Some(to_interfaces) = self.find_node_class_interfaces(to_node_id) else {
            debug!("No interfaces known for node {}", to_node_id);
            return None;
        };
        Some(interface_bound_edges(
            *from_node_id,
            &from_interfaces,
            *to_node_id,
            &to_interfaces,
            self.registries.bindings.as_ref(),
        ))
    }

    /// Connects `from` to `to` along every vertex binding of their class interfaces.
    pub fn add_edges_by_node_class_interface_bindings(
        &mut self,
        from_node_id: &Guid,
        to_node_id: &Guid,
    ) -> bool {
        match self.bound_edges_between(from_node_id, to_node_id) {
            Some(named_edges) => self.add_named_edges(&named_edges).success,
            None => false,
        }
    }

    /// Disconnects every edge the class interface bindings of `from` and `to` imply.
    pub fn remove_edges_by_node_class_interface_bindings(
        &mut self,
        from_node_id: &Guid,
        to_node_id: &Guid,
    ) -> bool {
        match self.bound_edges_between(from_node_id, to_node_id) {
            Some(named_edges) => self.remove_named_edges(&named_edges).success,
            None => false,
        }
    }

    /// Wires the node's outputs to the graph outputs of every interface the
    /// node and the document both declare.
    pub fn add_edges_from_matching_interface_node_outputs_to_graph_outputs(
        &mut self,
        node_id: &Guid,
    ) -> EdgeBatch {
        let Some(common) = self.common_interfaces(node_id) else {
            return EdgeBatch::default();
        };

        let mut named_edges = IndexSet::new();
        let mut resolved = true;
        for version in &common {
            let Some(interface) = self.registries.interfaces.find_interface_registry_entry(version)
            else {
                continue;
            };
            for output in &interface.outputs {
                let edge = self.find_node_output_by_name(node_id, &output.name).and_then(|vertex| {
                    let member = self.find_graph_output_node(&output.name)?;
                    let member_input = member.interface.inputs.last()?;
                    Some(NamedEdge::new(
                        *node_id,
                        vertex.name.clone(),
                        member.id,
                        member_input.name.clone(),
                    ))
                });
                match edge {
                    Some(edge) => {
                        named_edges.insert(edge);
                    }
                    None => {
                        warn!(
                            "Interface output '{}' has no matching node output or graph output",
                            output.name
                        );
                        resolved = false;
                    }
                }
            }
        }

        let mut batch = self.add_named_edges(&named_edges);
        batch.success &= resolved;
        batch
    }

    /// Wires the graph inputs of every interface the node and the document
    /// both declare into the node's inputs.
    pub fn add_edges_from_matching_interface_node_inputs_to_graph_inputs(
        &mut self,
        node_id: &Guid,
    ) -> EdgeBatch {
        let Some(common) = self.common_interfaces(node_id) else {
            return EdgeBatch::default();
        };

        let mut named_edges = IndexSet::new();
        let mut resolved = true;
        for version in &common {
            let Some(interface) = self.registries.interfaces.find_interface_registry_entry(version)
            else {
                continue;
            };
            for input in &interface.inputs {
                let edge = self.find_node_input_by_name(node_id, &input.name).and_then(|vertex| {
                    let member = self.find_graph_input_node(&input.name)?;
                    let member_output = member.interface.outputs.last()?;
                    Some(NamedEdge::new(
                        member.id,
                        member_output.name.clone(),
                        *node_id,
                        vertex.name.clone(),
                    ))
                });
                match edge {
                    Some(edge) => {
                        named_edges.insert(edge);
                    }
                    None => {
                        warn!(
                            "Interface input '{}' has no matching node input or graph input",
                            input.name
                        );
                        resolved = false;
                    }
                }
            }
        }

        let mut batch = self.add_named_edges(&named_edges);
        batch.success &= resolved;
        batch
    }

    fn common_interfaces(&self, node_id: &Guid) -> Option<BTreeSet<InterfaceVersion>> {
        let node_interfaces = self.find_node_class_interfaces(node_id)?;
        Some(
            node_interfaces
                .intersection(&self.document().interfaces)
                .cloned()
                .collect(),
        )
    }
}

//! Declared interfaces and the transform that reshapes graph members to match them.

use super::DocumentBuilder;
use crate::error::{FrontendError, Result};
use soundgraph_api::{
    ClassName, ClassType, ClassVertex, DOCUMENT_VERSION, DocumentHandle, Guid,
    InterfaceDescriptor, InterfaceRegistry, InterfaceVersion, Node, VersionNumber,
};
use tracing::{debug, error, info, warn};

/// Decides whether an added member (first argument) replaces a removed one
/// (second argument) of the same data type.
pub type NamePairingFn = Box<dyn Fn(&str, &str) -> bool>;

/// Interfaces to remove from and add to a document in one transform.
#[derive(Default)]
pub struct ModifyInterfaceOptions {
    pub interfaces_to_remove: Vec<InterfaceDescriptor>,
    pub interfaces_to_add: Vec<InterfaceDescriptor>,
    /// Overrides pairing by parameter name when set.
    pub name_pairing: Option<NamePairingFn>,
}

impl ModifyInterfaceOptions {
    pub fn new(
        interfaces_to_remove: Vec<InterfaceDescriptor>,
        interfaces_to_add: Vec<InterfaceDescriptor>,
    ) -> Self {
        Self {
            interfaces_to_remove,
            interfaces_to_add,
            name_pairing: None,
        }
    }

    pub fn with_name_pairing(mut self, pairing: impl Fn(&str, &str) -> bool + 'static) -> Self {
        self.name_pairing = Some(Box::new(pairing));
        self
    }

    /// Resolves versions against `registry`.
    pub fn from_versions(
        registry: &dyn InterfaceRegistry,
        to_remove: &[InterfaceVersion],
        to_add: &[InterfaceVersion],
    ) -> Result<Self> {
        let resolve = |versions: &[InterfaceVersion]| -> Result<Vec<InterfaceDescriptor>> {
            versions
                .iter()
                .map(|version| {
                    registry
                        .find_interface_registry_entry(version)
                        .ok_or_else(|| FrontendError::InterfaceNotFound(version.to_string()))
                })
                .collect()
        };
        Ok(Self::new(resolve(to_remove)?, resolve(to_add)?))
    }

    fn pairs(&self, added: &ClassVertex, removed: &ClassVertex) -> bool {
        if added.type_name != removed.type_name {
            return false;
        }
        match &self.name_pairing {
            Some(pairing) => pairing(&added.name, &removed.name),
            None => added.split_name().1 == removed.split_name().1,
        }
    }
}

/// Member edits computed from a [`ModifyInterfaceOptions`] before touching the document.
#[derive(Debug, Default)]
struct MemberPlan {
    inputs_to_remove: Vec<ClassVertex>,
    outputs_to_remove: Vec<ClassVertex>,
    inputs_to_add: Vec<ClassVertex>,
    outputs_to_add: Vec<ClassVertex>,
    /// `(removed, added)` pairs swapped in place.
    paired_inputs: Vec<(ClassVertex, ClassVertex)>,
    paired_outputs: Vec<(ClassVertex, ClassVertex)>,
}

impl MemberPlan {
    fn new(options: &ModifyInterfaceOptions) -> Self {
        let mut plan = MemberPlan::default();
        for interface in &options.interfaces_to_remove {
            plan.inputs_to_remove.extend(interface.inputs.iter().cloned());
            plan.outputs_to_remove.extend(interface.outputs.iter().cloned());
        }

        let fresh = |vertex: &ClassVertex| {
            let mut vertex = vertex.clone();
            vertex.node_id = Guid::new_v4();
            vertex.vertex_id = Guid::new_v4();
            vertex
        };
        for interface in &options.interfaces_to_add {
            plan.inputs_to_add.extend(interface.inputs.iter().map(fresh));
            plan.outputs_to_add.extend(interface.outputs.iter().map(fresh));
        }

        plan.paired_inputs = pair(options, &mut plan.inputs_to_add, &mut plan.inputs_to_remove);
        plan.paired_outputs = pair(options, &mut plan.outputs_to_add, &mut plan.outputs_to_remove);
        plan
    }
}

/// Moves matching vertices out of both lists into pairs.
fn pair(
    options: &ModifyInterfaceOptions,
    to_add: &mut Vec<ClassVertex>,
    to_remove: &mut Vec<ClassVertex>,
) -> Vec<(ClassVertex, ClassVertex)> {
    let mut pairs = Vec::new();
    // Backwards, so swap removal only moves entries already visited.
    for add_index in (0..to_add.len()).rev() {
        let Some(remove_index) = to_remove
            .iter()
            .position(|removed| options.pairs(&to_add[add_index], removed))
        else {
            continue;
        };
        let removed = to_remove.swap_remove(remove_index);
        let added = to_add.swap_remove(add_index);
        pairs.push((removed, added));
    }
    pairs
}

impl<D: DocumentHandle> DocumentBuilder<D> {
    /// Removes and adds interfaces, reshaping graph members to match.
    ///
    /// Members of removed interfaces that an added interface declares again
    /// (same data type and parameter name) are swapped in place so their
    /// connections survive. Returns whether the document changed.
    pub fn modify_interfaces(&mut self, options: ModifyInterfaceOptions) -> bool {
        let plan = MemberPlan::new(&options);
        let mut did_edit = false;

        let interfaces = &mut self.handle.document_mut().interfaces;
        for interface in &options.interfaces_to_remove {
            did_edit |= interfaces.remove(&interface.version);
        }
        for interface in &options.interfaces_to_add {
            did_edit |= interfaces.insert(interface.version.clone());
        }

        did_edit |= self.remove_unsupported_members(&plan);

        let mut unswapped_inputs = Vec::new();
        for (removed, added) in &plan.paired_inputs {
            if self.swap_graph_input(removed, added.clone()) {
                did_edit = true;
            } else {
                unswapped_inputs.push(added.clone());
            }
        }
        let mut unswapped_outputs = Vec::new();
        for (removed, added) in &plan.paired_outputs {
            if self.swap_graph_output(removed, added.clone()) {
                did_edit = true;
            } else {
                unswapped_outputs.push(added.clone());
            }
        }

        // A pair whose old member was never declared still needs its new member.
        for input in plan.inputs_to_add.iter().cloned().chain(unswapped_inputs) {
            did_edit |= self.add_graph_input(input).is_some();
        }
        for output in plan.outputs_to_add.iter().cloned().chain(unswapped_outputs) {
            did_edit |= self.add_graph_output(output).is_some();
        }

        if did_edit {
            self.remove_unused_dependencies();
        }
        self.reload_cache();
        self.check_cache();
        did_edit
    }

    fn remove_unsupported_members(&mut self, plan: &MemberPlan) -> bool {
        let mut removed = false;
        for input in &plan.inputs_to_remove {
            let declared = self
                .find_graph_input(&input.name)
                .is_some_and(|declared| declared.is_functional_equivalent(input));
            if declared {
                removed |= self.remove_graph_input(&input.name);
            }
        }
        for output in &plan.outputs_to_remove {
            let declared = self
                .find_graph_output(&output.name)
                .is_some_and(|declared| declared.is_functional_equivalent(output));
            if declared {
                removed |= self.remove_graph_output(&output.name);
            }
        }
        removed
    }

    /// Declares the highest registered version of interface `name`.
    ///
    /// Succeeds without changes when it is already declared. Fails when the
    /// interface is unknown or not modifiable for this builder's class path.
    pub fn add_interface(&mut self, name: &str) -> bool {
        let Some(interface) = self.modifiable_interface(name) else {
            return false;
        };
        if self.document().interfaces.contains(&interface.version) {
            debug!("Interface '{}' already declared, skipping add", name);
            return true;
        }
        if !self.check_modifiable(&interface) {
            return false;
        }
        info!("Adding interface {}", interface.version);
        self.modify_interfaces(ModifyInterfaceOptions::new(Vec::new(), vec![interface]));
        true
    }

    /// Removes the highest registered version of interface `name` and its members.
    ///
    /// Succeeds without changes when it is not declared.
    pub fn remove_interface(&mut self, name: &str) -> bool {
        let Some(interface) = self.modifiable_interface(name) else {
            return false;
        };
        if !self.document().interfaces.contains(&interface.version) {
            debug!("Interface '{}' not declared, skipping remove", name);
            return true;
        }
        if !self.check_modifiable(&interface) {
            return false;
        }
        info!("Removing interface {}", interface.version);
        self.modify_interfaces(ModifyInterfaceOptions::new(vec![interface], Vec::new()))
    }

    fn modifiable_interface(&self, name: &str) -> Option<InterfaceDescriptor> {
        let interfaces = &self.registries.interfaces;
        let Some(highest) = interfaces.find_interface_with_highest_version(name) else {
            warn!("Interface '{}' is not registered", name);
            return None;
        };
        interfaces
            .find_interface_registry_entry(&highest.version)
            .or(Some(highest))
    }

    fn check_modifiable(&self, interface: &InterfaceDescriptor) -> bool {
        let class_path = self.class_path();
        match interface.find_class_options(class_path) {
            Some(options) if !options.is_modifiable => {
                error!(
                    "Interface '{}' is not modifiable for class '{}'",
                    interface.version.name, class_path
                );
                false
            }
            _ => true,
        }
    }

    /// Whether the highest registered version of `name` is declared.
    pub fn is_interface_declared(&self, name: &str) -> bool {
        self.registries
            .interfaces
            .find_interface_with_highest_version(name)
            .is_some_and(|interface| self.is_interface_version_declared(&interface.version))
    }

    pub fn is_interface_version_declared(&self, version: &InterfaceVersion) -> bool {
        self.document().interfaces.contains(version)
    }

    /// Registry entries of every declared interface.
    ///
    /// Fails with the first declared version missing from the registry.
    pub fn find_declared_interfaces(&self) -> Result<Vec<InterfaceDescriptor>> {
        self.document()
            .interfaces
            .iter()
            .map(|version| {
                self.registries
                    .interfaces
                    .find_interface_registry_entry(version)
                    .ok_or_else(|| {
                        warn!("No registered interface matching declared version {}", version);
                        FrontendError::InterfaceNotFound(version.to_string())
                    })
            })
            .collect()
    }

    /// Input member nodes of declared interface `name`, in interface order.
    ///
    /// `None` if the interface is not declared or any member is missing.
    pub fn find_interface_input_nodes(&self, name: &str) -> Option<Vec<&Node>> {
        self.find_interface_member_nodes(name, ClassType::Input)
    }

    /// Output member nodes of declared interface `name`, in interface order.
    pub fn find_interface_output_nodes(&self, name: &str) -> Option<Vec<&Node>> {
        self.find_interface_member_nodes(name, ClassType::Output)
    }

    fn find_interface_member_nodes(&self, name: &str, class_type: ClassType) -> Option<Vec<&Node>> {
        let interface = self
            .registries
            .interfaces
            .find_interface_with_highest_version(name)?;
        if !self.is_interface_version_declared(&interface.version) {
            return None;
        }
        let vertices = match class_type {
            ClassType::Input => &interface.inputs,
            _ => &interface.outputs,
        };
        let nodes = self.find_member_nodes(class_type, vertices.iter().map(|vertex| &vertex.name));
        (nodes.len() == vertices.len()).then_some(nodes)
    }

    /// Resets the graph class identity and declares the default interfaces
    /// of this builder's class path.
    pub fn init_document(&mut self) -> Result<()> {
        let document = self.handle.document_mut();
        document.metadata.version = DOCUMENT_VERSION;
        let metadata = &mut document.root_graph.metadata;
        metadata.class_name = ClassName::new("", Guid::new_v4().to_string(), "");
        metadata.version = VersionNumber::new(1, 0);
        metadata.class_type = ClassType::Graph;

        let registry = &self.registries.interfaces;
        let versions = registry.find_default_interface_versions(self.class_path());
        let options = ModifyInterfaceOptions::from_versions(registry.as_ref(), &[], &versions)?;
        debug!(
            "Initializing document with {} default interfaces",
            options.interfaces_to_add.len()
        );
        self.modify_interfaces(options);
        if let Some(missing) = versions.iter().find(|v| !self.is_interface_version_declared(v)) {
            return Err(FrontendError::InvalidDocument(format!(
                "default interface {missing} was not declared"
            )));
        }
        Ok(())
    }
}

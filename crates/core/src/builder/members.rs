//! Graph members: the input and output nodes backing a graph's declared interface.

use super::DocumentBuilder;
use smol_str::SmolStr;
use soundgraph_api::{
    ClassDescriptor, ClassType, ClassVertex, DocumentHandle, Edge, Guid, Literal, Node,
    Position, VertexLiteral,
};
use tracing::{debug, error, warn};

/// Which side of the graph interface a member sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Input,
    Output,
}

impl<D: DocumentHandle> DocumentBuilder<D> {
    /// Declares a graph input and creates its member node.
    ///
    /// Returns the existing member node when an input of the same name is
    /// already declared.
    ///
    /// # Panics
    /// Panics if the vertex has a nil node id or vertex id.
    pub fn add_graph_input(&mut self, input: ClassVertex) -> Option<&Node> {
        self.add_graph_member(Member::Input, input)
    }

    /// Declares a graph output and creates its member node.
    ///
    /// # Panics
    /// Panics if the vertex has a nil node id or vertex id.
    pub fn add_graph_output(&mut self, output: ClassVertex) -> Option<&Node> {
        self.add_graph_member(Member::Output, output)
    }

    fn add_graph_member(&mut self, member: Member, vertex: ClassVertex) -> Option<&Node> {
        assert!(
            !vertex.node_id.is_nil(),
            "graph member '{}' requires a node id",
            vertex.name
        );
        assert!(
            !vertex.vertex_id.is_nil(),
            "graph member '{}' requires a vertex id",
            vertex.name
        );

        if vertex.type_name.is_empty() {
            warn!("Cannot add graph member '{}': type name is not set", vertex.name);
            return None;
        }

        let declared = match member {
            Member::Input => self.find_graph_input(&vertex.name),
            Member::Output => self.find_graph_output(&vertex.name),
        }
        .map(|declared| declared.node_id);
        let by_name = match member {
            Member::Input => self.cache.nodes.find_input_node_index(&vertex.name),
            Member::Output => self.cache.nodes.find_output_node_index(&vertex.name),
        };
        if declared.is_some() || by_name.is_some() {
            let index = declared
                .and_then(|node_id| self.cache.nodes.find_index(&node_id))
                .or(by_name);
            debug!("Graph member '{}' already declared", vertex.name);
            return index.and_then(|index| self.document().nodes().get(index));
        }

        let data_types = &self.registries.data_types;
        let class = match member {
            Member::Input => data_types.input_class(&vertex.type_name, vertex.access_type),
            Member::Output => data_types.output_class(&vertex.type_name, vertex.access_type),
        };
        let Some(class) = class else {
            warn!(
                "Cannot add graph member '{}': no member class for data type '{}'",
                vertex.name, vertex.type_name
            );
            return None;
        };

        let node_id = vertex.node_id;
        if !self.add_member_node(&class, node_id, &vertex.name, &vertex.type_name) {
            return None;
        }

        let interface = &mut self.handle.document_mut().root_graph.interface;
        match member {
            Member::Input => interface.inputs.push(vertex),
            Member::Output => interface.outputs.push(vertex),
        }
        self.find_node(&node_id)
    }

    /// Instantiates a member class, naming the node and its pass-through
    /// vertices after the member.
    fn add_member_node(
        &mut self,
        class: &ClassDescriptor,
        node_id: Guid,
        name: &SmolStr,
        type_name: &SmolStr,
    ) -> bool {
        if self.find_dependency(&class.metadata).is_none()
            && self.add_dependency(class).is_none()
        {
            return false;
        }

        self.add_node_internal(&class.metadata, node_id, |node| {
            node.name = name.clone();
            for vertex in node
                .interface
                .inputs
                .iter_mut()
                .chain(node.interface.outputs.iter_mut())
            {
                if vertex.type_name == *type_name {
                    vertex.name = name.clone();
                }
            }
        })
        .is_some()
    }

    pub fn find_graph_input(&self, name: &str) -> Option<&ClassVertex> {
        self.document()
            .root_graph
            .interface
            .inputs
            .iter()
            .find(|input| input.name == name)
    }

    pub fn find_graph_output(&self, name: &str) -> Option<&ClassVertex> {
        self.document()
            .root_graph
            .interface
            .outputs
            .iter()
            .find(|output| output.name == name)
    }

    pub fn find_graph_input_node(&self, name: &str) -> Option<&Node> {
        self.cache.nodes.find_input_node(self.document(), name)
    }

    pub fn find_graph_output_node(&self, name: &str) -> Option<&Node> {
        self.cache.nodes.find_output_node(self.document(), name)
    }

    /// Removes the input member node, its declaration and, once unreferenced,
    /// its member class dependency.
    pub fn remove_graph_input(&mut self, name: &str) -> bool {
        self.remove_graph_member(Member::Input, name)
    }

    /// Removes the output member node, its declaration and, once unreferenced,
    /// its member class dependency.
    pub fn remove_graph_output(&mut self, name: &str) -> bool {
        self.remove_graph_member(Member::Output, name)
    }

    fn remove_graph_member(&mut self, member: Member, name: &str) -> bool {
        let node = match member {
            Member::Input => self.find_graph_input_node(name),
            Member::Output => self.find_graph_output_node(name),
        };
        let Some((node_id, class_id)) = node.map(|node| (node.id, node.class_id)) else {
            debug!("Graph member '{}' not found", name);
            return false;
        };

        // Node removal also drops the declaration.
        if !self.remove_node(&node_id) {
            return false;
        }
        if !self.is_dependency_referenced(&class_id) {
            self.remove_dependency_by_id(&class_id);
        }
        true
    }

    /// Drops the declaration backing a removed member node, if any.
    pub(super) fn remove_member_declaration(&mut self, node_id: &Guid, class_type: ClassType) {
        let root_graph = &mut self.handle.document_mut().root_graph;
        let declared = match class_type {
            ClassType::Input => &mut root_graph.interface.inputs,
            ClassType::Output => &mut root_graph.interface.outputs,
            _ => return,
        };
        let Some(position) = declared.iter().position(|vertex| vertex.node_id == *node_id) else {
            return;
        };
        let vertex = declared.remove(position);
        if class_type == ClassType::Input {
            root_graph
                .preset_options
                .inputs_inheriting_default
                .remove(vertex.name.as_str());
        }
        debug!("Removed declaration of graph member '{}'", vertex.name);
    }

    /// Replaces a declared input, keeping its node id, display locations
    /// and outgoing connections.
    ///
    /// `existing` must be functionally equivalent to the declared input.
    /// Connections the new vertex cannot accept are dropped with a warning.
    pub fn swap_graph_input(&mut self, existing: &ClassVertex, new_input: ClassVertex) -> bool {
        self.swap_graph_member(Member::Input, existing, new_input)
    }

    /// Replaces a declared output, keeping its node id, display locations
    /// and incoming connection.
    pub fn swap_graph_output(&mut self, existing: &ClassVertex, new_output: ClassVertex) -> bool {
        self.swap_graph_member(Member::Output, existing, new_output)
    }

    fn swap_graph_member(
        &mut self,
        member: Member,
        existing: &ClassVertex,
        mut replacement: ClassVertex,
    ) -> bool {
        let declared = match member {
            Member::Input => self.find_graph_input(&existing.name),
            Member::Output => self.find_graph_output(&existing.name),
        };
        let Some(declared) = declared.filter(|declared| declared.is_functional_equivalent(existing))
        else {
            return false;
        };
        let node_id = declared.node_id;

        if replacement.name != existing.name
            && self.is_member_name_taken(member, &replacement.name)
        {
            warn!(
                "Cannot swap graph member '{}': '{}' is already declared",
                existing.name, replacement.name
            );
            return false;
        }

        let Some(node) = self.find_node(&node_id) else {
            error!("Declared graph member '{}' has no member node", existing.name);
            return false;
        };
        let locations: Vec<(Guid, Position)> = node.style.locations.clone();
        // Inputs connect through their last output, outputs through their last input.
        let vertex = match member {
            Member::Input => node.interface.outputs.last(),
            Member::Output => node.interface.inputs.last(),
        };
        let edges: Vec<Edge> = vertex
            .map(|vertex| {
                self.cache
                    .edges
                    .find_edges(self.document(), node_id, vertex.vertex_id)
                    .into_iter()
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        if !self.remove_graph_member(member, &existing.name) {
            error!("Failed to remove graph member '{}' while swapping", existing.name);
            return false;
        }

        replacement.node_id = node_id;
        let Some(new_node) = self.add_graph_member(member, replacement) else {
            error!("Failed to add replacement for graph member '{}'", existing.name);
            return false;
        };
        let new_vertex_id = match member {
            Member::Input => new_node.interface.outputs.last(),
            Member::Output => new_node.interface.inputs.last(),
        }
        .map(|vertex| vertex.vertex_id);

        if let Some(index) = self.cache.nodes.find_index(&node_id) {
            self.handle.document_mut().root_graph.graph.nodes[index]
                .style
                .locations = locations;
        }

        let Some(new_vertex_id) = new_vertex_id else {
            return true;
        };
        for mut edge in edges {
            match member {
                Member::Input => {
                    edge.from_node_id = node_id;
                    edge.from_vertex_id = new_vertex_id;
                }
                Member::Output => {
                    edge.to_node_id = node_id;
                    edge.to_vertex_id = new_vertex_id;
                }
            }
            if self.add_edge(edge).is_none() {
                warn!(
                    "Dropped connection of graph member '{}' not accepted by its replacement",
                    existing.name
                );
            }
        }
        true
    }

    fn is_member_name_taken(&self, member: Member, name: &str) -> bool {
        match member {
            Member::Input => {
                self.find_graph_input(name).is_some()
                    || self.cache.nodes.find_input_node_index(name).is_some()
            }
            Member::Output => {
                self.find_graph_output(name).is_some()
                    || self.cache.nodes.find_output_node_index(name).is_some()
            }
        }
    }

    // ---- Defaults ----

    /// Marks a preset input as inheriting (or overriding) its referenced default.
    ///
    /// Only presets track inheritance; returns `false` otherwise.
    pub fn set_graph_input_inherits_default(&mut self, name: &str, inherits: bool) -> bool {
        let preset_options = &mut self.handle.document_mut().root_graph.preset_options;
        if !preset_options.is_preset {
            return false;
        }
        if inherits {
            preset_options
                .inputs_inheriting_default
                .insert(SmolStr::new(name));
            true
        } else {
            preset_options.inputs_inheriting_default.remove(name)
        }
    }

    /// Sets the declared default of a graph input.
    ///
    /// The literal type must be supported by the input's data type. On a
    /// preset the input stops inheriting its default.
    pub fn set_graph_input_default(&mut self, name: &str, literal: Literal) -> bool {
        let Some(input) = self.find_graph_input(name) else {
            return false;
        };
        let literal_type = literal.literal_type();
        if !self
            .registries
            .data_types
            .is_literal_type_supported(&input.type_name, literal_type)
        {
            error!(
                "Attempting to set graph input of type '{}' with unsupported literal type {:?}",
                input.type_name, literal_type
            );
            return false;
        }

        let inputs = &mut self.handle.document_mut().root_graph.interface.inputs;
        if let Some(input) = inputs.iter_mut().find(|input| input.name == name) {
            input.default_literal = Some(literal);
        }

        if self.is_preset() {
            return self.set_graph_input_inherits_default(name, false);
        }
        true
    }

    /// Sets or replaces a node's default override for one input vertex.
    pub fn set_node_input_default(
        &mut self,
        node_id: &Guid,
        vertex_id: &Guid,
        literal: Literal,
    ) -> bool {
        let Some(index) = self.node_index_with_input(node_id, vertex_id) else {
            return false;
        };
        let node = &mut self.handle.document_mut().root_graph.graph.nodes[index];
        match node
            .input_literals
            .iter_mut()
            .find(|entry| entry.vertex_id == *vertex_id)
        {
            Some(entry) => entry.value = literal,
            None => node.input_literals.push(VertexLiteral {
                vertex_id: *vertex_id,
                value: literal,
            }),
        }
        true
    }

    /// Drops a node's default override for one input vertex.
    pub fn remove_node_input_default(&mut self, node_id: &Guid, vertex_id: &Guid) -> bool {
        let Some(index) = self.node_index_with_input(node_id, vertex_id) else {
            return false;
        };
        let literals = &mut self.handle.document_mut().root_graph.graph.nodes[index].input_literals;
        match literals.iter().position(|entry| entry.vertex_id == *vertex_id) {
            Some(position) => {
                literals.swap_remove(position);
                true
            }
            None => false,
        }
    }

    /// The node's own override for the input, if set.
    pub fn node_input_default(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&Literal> {
        let node = self.find_node(node_id)?;
        node.find_input(vertex_id)?;
        node.input_literal(vertex_id)
    }

    /// The default declared by the node's class for the input.
    pub fn node_input_class_default(&self, node_id: &Guid, vertex_id: &Guid) -> Option<&Literal> {
        self.find_node(node_id)?.find_input(vertex_id)?;
        self.find_node_class_input(node_id, vertex_id)?
            .default_literal
            .as_ref()
    }

    fn node_index_with_input(&self, node_id: &Guid, vertex_id: &Guid) -> Option<usize> {
        let index = self.cache.nodes.find_index(node_id)?;
        self.document().nodes().get(index)?.find_input(vertex_id)?;
        Some(index)
    }

    /// Member nodes of the given class type whose names match `names`.
    pub(crate) fn find_member_nodes<'a>(
        &self,
        class_type: ClassType,
        names: impl IntoIterator<Item = &'a SmolStr>,
    ) -> Vec<&Node> {
        names
            .into_iter()
            .filter_map(|name| match class_type {
                ClassType::Input => self.find_graph_input_node(name),
                ClassType::Output => self.find_graph_output_node(name),
                _ => None,
            })
            .collect()
    }
}

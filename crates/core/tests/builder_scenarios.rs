mod common;

use common::{Fixture, gain_class, member, sine_class, vertex_id};
use soundgraph_api::{ClassType, Document, Edge, GraphClass, Guid, Literal, NamedEdge};
use indexmap::IndexSet;
use soundgraph_core::{DocumentBuilder, FrontendError};

#[test]
fn test_simple_graph_construction() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();

    let freq = builder
        .add_graph_input(member("Freq", "Float").with_default(Literal::Float(440.0)))
        .map(|node| node.id)
        .unwrap();
    let out = builder
        .add_graph_output(member("Out", "Audio"))
        .map(|node| node.id)
        .unwrap();
    let sine = builder
        .add_node_by_class_name(&sine_class().metadata.class_name, 1, Guid::new_v4())
        .map(|node| node.id)
        .unwrap();

    let batch = builder.add_named_edges(&IndexSet::from([
        NamedEdge::new(freq, "Freq", sine, "Frequency"),
        NamedEdge::new(sine, "Audio", out, "Out"),
    ]));
    assert!(batch.success);
    assert_eq!(batch.edges.len(), 2);

    assert_eq!(builder.find_graph_input_node("Freq").map(|node| node.id), Some(freq));
    assert_eq!(builder.find_graph_output_node("Out").map(|node| node.id), Some(out));
    assert!(builder.nodes_are_connected(&freq, &sine));
    assert!(builder.nodes_are_connected(&sine, &out));
    assert!(!builder.nodes_are_connected(&out, &sine));
    assert_eq!(
        builder.find_graph_input("Freq").unwrap().default_literal,
        Some(Literal::Float(440.0))
    );
    assert_eq!(builder.topological_node_order().unwrap(), vec![freq, sine, out]);
    assert!(builder.verify_cache().is_ok());
}

#[test]
fn test_duplicate_input_name_returns_existing_node() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();

    let first = builder.add_graph_input(member("Freq", "Float")).unwrap().id;
    let second = builder.add_graph_input(member("Freq", "Float")).unwrap().id;

    assert_eq!(first, second);
    let declared: Vec<_> = builder
        .document()
        .root_graph
        .interface
        .inputs
        .iter()
        .filter(|input| input.name == "Freq")
        .collect();
    assert_eq!(declared.len(), 1);
    assert_eq!(builder.document().nodes().len(), 1);
}

#[test]
fn test_remove_middle_of_chain_cascades() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let gain = gain_class();
    builder.add_dependency(&gain);

    let ids: Vec<Guid> = (0..3)
        .map(|_| builder.add_node(&gain.metadata, Guid::nil()).unwrap().id)
        .collect();
    let out = vertex_id(&gain.interface.outputs, "Out");
    let input = vertex_id(&gain.interface.inputs, "In");
    builder.add_edge(Edge::new(ids[0], out, ids[1], input)).unwrap();
    builder.add_edge(Edge::new(ids[1], out, ids[2], input)).unwrap();

    assert!(builder.remove_node(&ids[1]));

    assert!(builder.document().edges().is_empty());
    assert!(builder.contains_node(&ids[0]));
    assert!(builder.contains_node(&ids[2]));
    assert!(!builder.contains_node(&ids[1]));
    assert!(!builder.is_node_output_connected(&ids[0], &out));
    assert!(!builder.is_node_input_connected(&ids[2], &input));
    assert!(!builder.remove_node(&ids[1]));
    assert!(builder.verify_cache().is_ok());
}

#[test]
fn test_type_mismatch_rejected() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let sine = sine_class();
    builder.add_dependency(&sine);
    let a = builder.add_node(&sine.metadata, Guid::nil()).unwrap().id;
    let b = builder.add_node(&sine.metadata, Guid::nil()).unwrap().id;

    // Audio output into a Float input.
    let edge = Edge::new(
        a,
        vertex_id(&sine.interface.outputs, "Audio"),
        b,
        vertex_id(&sine.interface.inputs, "Frequency"),
    );
    assert!(!builder.can_add_edge(&edge));
    assert!(builder.add_edge(edge).is_none());
    assert!(builder.document().edges().is_empty());
}

#[test]
fn test_edge_round_trip() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let sine = builder
        .add_node_by_class_name(&sine_class().metadata.class_name, 1, Guid::nil())
        .unwrap()
        .id;
    let gain = builder
        .add_node_by_class_name(&gain_class().metadata.class_name, 1, Guid::nil())
        .unwrap()
        .id;
    let edge = Edge::new(
        sine,
        builder.find_node_output_by_name(&sine, "Audio").unwrap().vertex_id,
        gain,
        builder.find_node_input_by_name(&gain, "In").unwrap().vertex_id,
    );

    assert!(builder.add_edge(edge).is_some());
    assert!(builder.contains_edge(&edge));
    assert!(builder.remove_edge(&edge));
    assert!(!builder.contains_edge(&edge));
}

#[test]
fn test_graph_node_references_other_document() {
    let fixture = Fixture::new();
    let mut patch = fixture.builder();
    patch.init_document().unwrap();
    patch.add_graph_input(member("Cutoff", "Float")).unwrap();
    patch.add_graph_output(member("Audio", "Audio")).unwrap();
    let patch_class: GraphClass = patch.document().root_graph.clone();

    let mut builder = fixture.builder();
    let node = builder.add_graph_node(&patch_class, Guid::nil()).unwrap();
    assert_eq!(node.interface.inputs.len(), 1);
    assert_eq!(node.interface.outputs.len(), 1);
    let class_id = node.class_id;
    let dependency = builder.find_dependency_by_id(&class_id).unwrap();
    assert_eq!(dependency.metadata.class_type, ClassType::External);

    // A second node shares the dependency.
    builder.add_graph_node(&patch_class, Guid::nil()).unwrap();
    assert_eq!(builder.document().dependencies.len(), 1);
}

#[test]
fn test_remove_unused_dependencies() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    builder.add_dependency(&sine_class());
    builder.add_dependency(&gain_class());
    let gain = builder
        .add_node(&gain_class().metadata, Guid::nil())
        .unwrap()
        .id;

    assert!(builder.remove_unused_dependencies());
    assert_eq!(builder.document().dependencies.len(), 1);
    assert!(builder.contains_node(&gain));
    assert!(!builder.remove_unused_dependencies());
}

#[test]
fn test_document_survives_json_round_trip() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let freq = builder.add_graph_input(member("Freq", "Float")).unwrap().id;
    let sine = builder
        .add_node_by_class_name(&sine_class().metadata.class_name, 1, Guid::nil())
        .unwrap()
        .id;
    let batch = builder.add_named_edges(&IndexSet::from([NamedEdge::new(
        freq,
        "Freq",
        sine,
        "Frequency",
    )]));
    assert!(batch.success);

    let json = serde_json::to_string(&builder.into_document()).unwrap();
    let document: Document = serde_json::from_str(&json).unwrap();

    let mut reloaded = DocumentBuilder::new(document, fixture.registries());
    assert!(reloaded.verify_cache().is_ok());
    assert_eq!(reloaded.find_graph_input_node("Freq").map(|node| node.id), Some(freq));
    assert!(reloaded.nodes_are_connected(&freq, &sine));
    assert!(reloaded.remove_graph_input("Freq"));
    assert!(!reloaded.nodes_are_connected(&freq, &sine));
}

#[test]
fn test_cycle_detected() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let gain = gain_class();
    builder.add_dependency(&gain);
    let a = builder.add_node(&gain.metadata, Guid::nil()).unwrap().id;
    let b = builder.add_node(&gain.metadata, Guid::nil()).unwrap().id;
    let out = vertex_id(&gain.interface.outputs, "Out");
    let input = vertex_id(&gain.interface.inputs, "In");
    builder.add_edge(Edge::new(a, out, b, input)).unwrap();
    assert!(!builder.has_cycle());

    builder.add_edge(Edge::new(b, out, a, input)).unwrap();
    assert!(builder.has_cycle());
    assert!(matches!(
        builder.topological_node_order(),
        Err(FrontendError::GraphCycle(_))
    ));
}

#[test]
fn test_convert_from_preset() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    builder.add_graph_input(member("Freq", "Float")).unwrap();
    assert!(!builder.convert_from_preset());

    let mut document = builder.into_document();
    document.root_graph.preset_options.is_preset = true;
    document.root_graph.graph.is_editable = false;
    let mut builder = DocumentBuilder::new(document, fixture.registries());
    assert!(builder.set_graph_input_inherits_default("Freq", true));

    assert!(builder.convert_from_preset());
    assert!(!builder.is_preset());
    assert!(builder.document().root_graph.graph.is_editable);
    assert!(builder
        .document()
        .root_graph
        .preset_options
        .inputs_inheriting_default
        .is_empty());
}

mod common;

use common::{Fixture, gain_class, member, vertex_id};
use soundgraph_api::{Document, Edge, Guid};
use soundgraph_core::{DocumentBuilder, DocumentCache};
use std::collections::HashSet;

fn assert_invariants(builder: &DocumentBuilder) {
    let document = builder.document();
    builder.verify_cache().unwrap();
    assert_eq!(*builder.cache(), DocumentCache::new(document));

    let mut inputs = HashSet::new();
    for edge in document.edges() {
        assert!(inputs.insert(edge.input_key()), "fan-in on {:?}", edge.input_key());
        assert!(builder.find_node_output(&edge.from_node_id, &edge.from_vertex_id).is_some());
        assert!(builder.find_node_input(&edge.to_node_id, &edge.to_vertex_id).is_some());
    }
    for node in document.nodes() {
        assert!(builder.find_dependency_by_id(&node.class_id).is_some());
    }

    let mut names = HashSet::new();
    for input in &document.root_graph.interface.inputs {
        assert!(names.insert(input.name.clone()), "input '{}' declared twice", input.name);
        let node = builder.find_graph_input_node(&input.name).unwrap();
        assert_eq!(node.id, input.node_id);
    }
}

#[test]
fn test_random_edits_keep_cache_consistent() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let gain = gain_class();
    builder.add_dependency(&gain);
    let out = vertex_id(&gain.interface.outputs, "Out");
    let input = vertex_id(&gain.interface.inputs, "In");

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut member_count = 0;
    for _ in 0..500 {
        let node_ids: Vec<Guid> = builder.document().nodes().iter().map(|node| node.id).collect();
        match rng.u8(0..6) {
            0 | 1 => {
                builder.add_node(&gain.metadata, Guid::nil());
            }
            2 if !node_ids.is_empty() => {
                let node_id = node_ids[rng.usize(0..node_ids.len())];
                assert!(builder.remove_node(&node_id));
            }
            3 if !node_ids.is_empty() => {
                let from = node_ids[rng.usize(0..node_ids.len())];
                let to = node_ids[rng.usize(0..node_ids.len())];
                let edge = Edge::new(from, out, to, input);
                let expected = builder.can_add_edge(&edge);
                assert_eq!(builder.add_edge(edge).is_some(), expected);
            }
            4 if !builder.document().edges().is_empty() => {
                let edges = builder.document().edges();
                let edge = edges[rng.usize(0..edges.len())];
                assert!(builder.remove_edge(&edge));
            }
            5 => {
                if rng.bool() || member_count == 0 {
                    member_count += 1;
                    let name = format!("In{member_count}");
                    assert!(builder.add_graph_input(member(&name, "Audio")).is_some());
                } else {
                    let name = format!("In{}", rng.usize(1..=member_count));
                    builder.remove_graph_input(&name);
                }
            }
            _ => {}
        }
        assert_invariants(&builder);
    }
}

#[test]
fn test_fan_in_forbidden() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let gain = gain_class();
    builder.add_dependency(&gain);
    let out = vertex_id(&gain.interface.outputs, "Out");
    let input = vertex_id(&gain.interface.inputs, "In");
    let a = builder.add_node(&gain.metadata, Guid::nil()).unwrap().id;
    let b = builder.add_node(&gain.metadata, Guid::nil()).unwrap().id;
    let sink = builder.add_node(&gain.metadata, Guid::nil()).unwrap().id;

    assert!(builder.add_edge(Edge::new(a, out, sink, input)).is_some());
    assert!(builder.add_edge(Edge::new(b, out, sink, input)).is_none());
    assert!(builder.is_node_input_connected(&sink, &input));

    // Freeing the input makes room for the other source.
    assert!(builder.remove_edge_to_node_input(&sink, &input));
    assert!(builder.add_edge(Edge::new(b, out, sink, input)).is_some());
    assert!(builder.nodes_are_connected(&b, &sink));
    assert!(!builder.nodes_are_connected(&a, &sink));
}

#[test]
fn test_swap_pop_reindexes_moved_node() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    let gain = gain_class();
    builder.add_dependency(&gain);
    let ids: Vec<Guid> = (0..4)
        .map(|_| builder.add_node(&gain.metadata, Guid::nil()).unwrap().id)
        .collect();

    assert!(builder.remove_node(&ids[1]));

    let nodes = builder.cache().nodes.clone();
    assert_eq!(nodes.find_index(&ids[3]), Some(1));
    assert_eq!(nodes.find_index(&ids[0]), Some(0));
    assert_eq!(nodes.find_index(&ids[2]), Some(2));
    assert_eq!(nodes.find_index(&ids[1]), None);
    assert_eq!(builder.document().nodes()[1].id, ids[3]);

    // Removing the last element needs no move.
    assert!(builder.remove_node(&ids[2]));
    assert_eq!(builder.cache().nodes.find_index(&ids[3]), Some(1));
    assert_invariants(&builder);
}

#[test]
fn test_reload_matches_incremental_cache() {
    let fixture = Fixture::new();
    let mut builder = fixture.builder();
    builder.add_graph_input(member("A", "Audio")).unwrap();
    builder.add_graph_output(member("B", "Audio")).unwrap();
    let incremental = builder.cache().clone();

    builder.reload_cache();
    assert_eq!(*builder.cache(), incremental);
}

#[test]
fn test_verify_reports_desync() {
    let fixture = Fixture::new();
    let mut document = Document::new();
    let gain = gain_class();
    {
        let mut builder = DocumentBuilder::new(&mut document, fixture.registries());
        builder.add_dependency(&gain);
        builder.add_node(&gain.metadata, Guid::nil()).unwrap();
    }

    let builder = DocumentBuilder::new(document.clone(), fixture.registries());
    document.root_graph.graph.nodes.clear();
    let stale = builder.cache().clone();
    assert!(stale.verify(&document).is_err());
    assert!(builder.verify_cache().is_ok());
}

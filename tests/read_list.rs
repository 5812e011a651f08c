use rdflist::builder::ListBuilder;
use rdflist::construct::{rdf, Iri, Literal, Node, Triple, Value};
use rdflist::graph::{Graph, MemoryGraph, TripleSource};
use rdflist::reader::ListReader;
use rdflist::{Defect, ListError};

fn subject() -> Node {
    Node::named("http://examples.net/testsubject/1")
}

fn predicate() -> Iri {
    Iri::new("http://more.example.org/testpredicate/1")
}

fn three_values() -> Vec<Value> {
    vec![
        Node::blank("element").into(),
        Literal::new("testobjectliteral1").into(),
        Node::named("http://example.org/testobject/1").into(),
    ]
}

fn graph_with_list_at_node(values: &[Value]) -> (MemoryGraph, Node) {
    let mut graph = MemoryGraph::new();
    let head = ListBuilder::default()
        .add_list_at_node(&mut graph, &subject(), &predicate(), values, &[])
        .unwrap()
        .unwrap();
    (graph, head)
}

// removes the triple that ends the list, breaking it
fn cut_nil(graph: &mut MemoryGraph) {
    let last: Vec<Triple> = graph
        .triples(None, Some(&rdf::REST), Some(&Value::Node(rdf::NIL)), &[])
        .unwrap()
        .map(|t| t.unwrap())
        .collect();
    assert_eq!(last.len(), 1);
    assert!(graph.remove(&last[0]).unwrap());
    assert!(!graph.contains(&last[0]).unwrap());
}

#[test]
fn get_list_after_add_list_at_node() {
    let (graph, head) = graph_with_list_at_node(&three_values());
    assert_eq!(graph.size().unwrap(), 7);
    let read = ListReader::default().get_list(&graph, &head, &[None]).unwrap();
    assert_eq!(read, three_values());
}

#[test]
fn get_list_at_node_round_trips() {
    let (graph, _) = graph_with_list_at_node(&three_values());
    let read = ListReader::default()
        .get_list_at_node(&graph, &subject(), &predicate(), &[None])
        .unwrap();
    assert_eq!(read, three_values());
}

#[test]
fn round_trip_keeps_order_and_duplicates() {
    let values: Vec<Value> = (0..50)
        .map(|i| Literal::new((i % 7).to_string()).into())
        .collect();
    for head in [Node::named("http://examples.net/testlisthead/1"), Node::blank("h")] {
        let mut graph = MemoryGraph::new();
        ListBuilder::default().add_list(&mut graph, &head, &values, &[]).unwrap();
        assert_eq!(graph.size().unwrap(), 100);
        let read = ListReader::default().get_list(&graph, &head, &[]).unwrap();
        assert_eq!(read, values);
    }
}

#[test]
fn get_list_at_node_after_removing_nil() {
    let (mut graph, _) = graph_with_list_at_node(&three_values());
    cut_nil(&mut graph);
    let err = ListReader::default()
        .get_list_at_node(&graph, &subject(), &predicate(), &[None])
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::IncompleteStructure { defect: Defect::MissingRest, .. }
    ));
    assert!(err.is_structural());
    assert!(err.to_string().starts_with("List structure was not complete"));
}

#[test]
fn get_list_on_named_head_after_removing_nil() {
    let mut graph = MemoryGraph::new();
    let head = Node::named("http://examples.net/testlisthead/1");
    ListBuilder::default()
        .add_list(&mut graph, &head, &three_values(), &[])
        .unwrap();
    cut_nil(&mut graph);
    let err = ListReader::default().get_list(&graph, &head, &[None]).unwrap_err();
    assert!(err.to_string().contains("not complete"), "{err}");
}

#[test]
fn missing_entry_is_not_found() {
    let graph = MemoryGraph::new();
    let reader = ListReader::default();
    let err = reader
        .get_list_at_node(&graph, &subject(), &predicate(), &[])
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_structural());
    let err = reader
        .get_lists_at_node(&graph, &subject(), &predicate(), &[])
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn two_entries_are_ambiguous() {
    let mut graph = MemoryGraph::new();
    let mut builder = ListBuilder::default();
    builder
        .add_list_at_node(&mut graph, &subject(), &predicate(), &three_values(), &[])
        .unwrap();
    builder
        .add_list_at_node(&mut graph, &subject(), &predicate(), &three_values(), &[])
        .unwrap();
    let reader = ListReader::default();
    let err = reader
        .get_list_at_node(&graph, &subject(), &predicate(), &[])
        .unwrap_err();
    assert!(matches!(err, ListError::AmbiguousEntry { count: 2, .. }));
    let err = reader
        .get_lists_at_node(&graph, &subject(), &predicate(), &[])
        .unwrap_err();
    assert!(matches!(err, ListError::AmbiguousEntry { .. }));
}

#[test]
fn literal_entry_is_a_type_mismatch() {
    let mut graph = MemoryGraph::new();
    graph.insert(Triple::new(subject(), predicate(), Literal::new("not a list")));
    let err = ListReader::default()
        .get_list_at_node(&graph, &subject(), &predicate(), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ListError::IncompleteStructure { defect: Defect::LiteralHead, .. }
    ));
}

#[test]
fn literal_rest_is_incomplete() {
    let head = Node::blank("a");
    let graph: MemoryGraph = [
        Triple::new(head.clone(), rdf::FIRST, Literal::new("x")),
        Triple::new(head.clone(), rdf::REST, Literal::new("nil")),
    ]
    .into_iter()
    .collect();
    let err = ListReader::default().get_list(&graph, &head, &[]).unwrap_err();
    assert!(matches!(
        err,
        ListError::IncompleteStructure { defect: Defect::LiteralRest, .. }
    ));
}

#[test]
fn two_first_links_are_incomplete_not_forked() {
    let head = Node::blank("a");
    let graph: MemoryGraph = [
        Triple::new(head.clone(), rdf::FIRST, Literal::new("x")),
        Triple::new(head.clone(), rdf::FIRST, Literal::new("y")),
        Triple::new(head.clone(), rdf::REST, rdf::NIL),
    ]
    .into_iter()
    .collect();
    let reader = ListReader::default();
    let err = reader.get_list(&graph, &head, &[]).unwrap_err();
    assert!(matches!(
        err,
        ListError::IncompleteStructure { defect: Defect::MultipleFirst(2), .. }
    ));
    assert!(reader.get_lists(&graph, [&head], &[]).unwrap().is_empty());
}

#[test]
fn cycle_is_incomplete() {
    let a = Node::blank("a");
    let b = Node::blank("b");
    let graph: MemoryGraph = [
        Triple::new(a.clone(), rdf::FIRST, Literal::new("1")),
        Triple::new(a.clone(), rdf::REST, b.clone()),
        Triple::new(b.clone(), rdf::FIRST, Literal::new("2")),
        Triple::new(b.clone(), rdf::REST, a.clone()),
    ]
    .into_iter()
    .collect();
    let reader = ListReader::default();
    let err = reader.get_list(&graph, &a, &[]).unwrap_err();
    match err {
        ListError::IncompleteStructure { node, defect } => {
            assert_eq!(node, a);
            assert_eq!(defect, Defect::Cycle);
        }
        other => panic!("unexpected {other}"),
    }
    assert!(reader.get_lists(&graph, [&a], &[]).unwrap().is_empty());
}

#[test]
fn nil_head_is_the_empty_list() {
    let graph = MemoryGraph::new();
    let read = ListReader::default().get_list(&graph, &rdf::NIL, &[]).unwrap();
    assert!(read.is_empty());
}

#[test]
fn contexts_filter_the_walk() {
    let mut graph = MemoryGraph::new();
    let head = Node::blank("h");
    let one = Some(Node::named("http://example.org/graph/1"));
    let two = Some(Node::named("http://example.org/graph/2"));
    ListBuilder::default()
        .add_list(&mut graph, &head, &three_values(), &[one.clone(), two])
        .unwrap();
    let reader = ListReader::default();
    // the same links asserted in two contexts read as one list
    assert_eq!(reader.get_list(&graph, &head, &[]).unwrap(), three_values());
    assert_eq!(reader.get_list(&graph, &head, &[one]).unwrap(), three_values());
    let err = reader.get_list(&graph, &head, &[None]).unwrap_err();
    assert!(matches!(
        err,
        ListError::IncompleteStructure { defect: Defect::MissingFirst, .. }
    ));
}

use rdflist::builder::ListBuilder;
use rdflist::construct::{rdf, BlankNodeGenerator, Iri, Literal, Node, Triple, Value};
use rdflist::graph::{Graph, TripleSource};
use rdflist::persist::{PersistenceMode, Persistor};
use rdflist::reader::ListReader;
use rdflist::ListError;

fn subject() -> Node {
    Node::named("http://examples.net/testsubject/1")
}

fn predicate() -> Iri {
    Iri::new("http://more.example.org/testpredicate/1")
}

fn mixed_values() -> Vec<Value> {
    vec![
        Node::blank("element").into(),
        Literal::new("plain").into(),
        Literal::with_language("chat", "fr").into(),
        Literal::typed("42", Iri::new("http://www.w3.org/2001/XMLSchema#integer")).into(),
        Node::named("http://example.org/testobject/1").into(),
    ]
}

#[test]
fn in_memory_mode_round_trips_a_list() {
    let connection = PersistenceMode::InMemory.connect().expect("connection");
    let mut persistor = Persistor::new(&connection).expect("schema");
    let head = ListBuilder::default()
        .add_list_at_node(&mut persistor, &subject(), &predicate(), &mixed_values(), &[])
        .unwrap()
        .unwrap();
    assert_eq!(persistor.size().unwrap(), 11);
    assert!(persistor
        .contains(&Triple::new(subject(), predicate(), head))
        .unwrap());
    let read = ListReader::default()
        .get_list_at_node(&persistor, &subject(), &predicate(), &[None])
        .unwrap();
    assert_eq!(read, mixed_values());
}

#[test]
fn duplicate_adds_are_ignored() {
    let connection = PersistenceMode::InMemory.connect().unwrap();
    let mut persistor = Persistor::new(&connection).unwrap();
    let triple = Triple::new(Node::blank("a"), rdf::REST, rdf::NIL);
    assert!(persistor.add(triple.clone()).unwrap());
    assert!(!persistor.add(triple.clone()).unwrap());
    assert!(persistor.add(triple.clone().in_context(Some(Node::blank("g")))).unwrap());
    assert_eq!(persistor.size().unwrap(), 2);
    assert!(persistor.remove(&triple).unwrap());
    assert!(!persistor.remove(&triple).unwrap());
    assert_eq!(persistor.size().unwrap(), 1);
}

#[test]
fn removing_nil_breaks_a_persisted_list() {
    let connection = PersistenceMode::InMemory.connect().unwrap();
    let mut persistor = Persistor::new(&connection).unwrap();
    let head = Node::named("http://examples.net/testlisthead/1");
    ListBuilder::default()
        .add_list(&mut persistor, &head, &mixed_values(), &[])
        .unwrap();
    let last: Vec<Triple> = persistor
        .triples(None, Some(&rdf::REST), Some(&Value::Node(rdf::NIL)), &[])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(last.len(), 1);
    assert!(persistor.remove(&last[0]).unwrap());
    let err = ListReader::default().get_list(&persistor, &head, &[]).unwrap_err();
    assert!(err.to_string().contains("not complete"));
}

#[test]
fn inferred_statements_follow_the_switch() {
    let connection = PersistenceMode::InMemory.connect().unwrap();
    let mut persistor = Persistor::new(&connection).unwrap();
    let head = Node::blank("h");
    persistor
        .add(Triple::new(head.clone(), rdf::FIRST, Literal::new("asserted")))
        .unwrap();
    persistor
        .add_inferred(Triple::new(head.clone(), rdf::REST, rdf::NIL))
        .unwrap();
    let reader = ListReader::default();

    let with_inferred = persistor.triple_source(true);
    assert!(with_inferred.include_inferred());
    assert_eq!(
        reader.get_list(&with_inferred, &head, &[]).unwrap(),
        vec![Value::from(Literal::new("asserted"))]
    );

    let explicit_only = persistor.triple_source(false);
    let err = reader.get_list(&explicit_only, &head, &[]).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn explicit_add_upgrades_an_inferred_statement() {
    let connection = PersistenceMode::InMemory.connect().unwrap();
    let mut persistor = Persistor::new(&connection).unwrap();
    let triple = Triple::new(Node::blank("h"), rdf::FIRST, Literal::new("both"));
    assert!(persistor.add_inferred(triple.clone()).unwrap());
    let explicit_only = persistor.triple_source(false);
    assert_eq!(explicit_only.triples(None, None, None, &[]).unwrap().count(), 0);

    assert!(persistor.add(triple.clone()).unwrap());
    assert!(!persistor.add(triple.clone()).unwrap());
    assert!(!persistor.add_inferred(triple.clone()).unwrap());
    assert_eq!(persistor.size().unwrap(), 1);
    let explicit: Vec<Triple> = explicit_only
        .triples(None, None, None, &[])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(explicit, vec![triple]);
}

#[test]
fn connection_failures_surface_as_accessor_errors() {
    let connection = PersistenceMode::InMemory.connect().unwrap();
    let persistor = Persistor::new(&connection).unwrap();
    let source = persistor.triple_source(true);
    connection.execute_batch("drop table Statement").unwrap();
    let err = ListReader::default()
        .get_list(&source, &Node::blank("h"), &[])
        .unwrap_err();
    match &err {
        ListError::Accessor { .. } => {
            assert!(std::error::Error::source(&err).is_some());
        }
        other => panic!("unexpected {other}"),
    }
    assert!(!err.is_not_found());
    assert!(!err.is_structural());
}

#[test]
fn file_mode_keeps_blank_labels_fresh() {
    let path = std::env::temp_dir()
        .join(format!("rdflist_test_{}.db", std::process::id()))
        .to_string_lossy()
        .into_owned();
    let _ = std::fs::remove_file(&path);
    let mode = PersistenceMode::File(path.clone());
    {
        let connection = mode.connect().unwrap();
        let mut persistor = Persistor::new(&connection).unwrap();
        ListBuilder::default()
            .add_list_at_node(&mut persistor, &subject(), &predicate(), &mixed_values(), &[])
            .unwrap();
    }
    let connection = mode.connect().unwrap();
    let mut persistor = Persistor::new(&connection).unwrap();
    let mut generator = BlankNodeGenerator::default();
    persistor.restore_blank_nodes(&mut generator).unwrap();
    assert_eq!(generator.lower_bound(), 5);

    let other = Node::named("http://examples.net/testsubject/2");
    ListBuilder::new(generator)
        .add_list_at_node(&mut persistor, &other, &predicate(), &mixed_values(), &[])
        .unwrap();
    let reader = ListReader::default();
    assert_eq!(
        reader.get_list_at_node(&persistor, &subject(), &predicate(), &[]).unwrap(),
        mixed_values()
    );
    assert_eq!(
        reader.get_list_at_node(&persistor, &other, &predicate(), &[]).unwrap(),
        mixed_values()
    );
    drop(persistor);
    drop(connection);
    let _ = std::fs::remove_file(&path);
}

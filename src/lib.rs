//! rdflist – build and decode RDF collections over any triple store.
//!
//! An RDF collection is a linked list spelled out in triples. Every cell has
//! an `rdf:first` link to its element and an `rdf:rest` link to the next cell,
//! and the last cell rests on `rdf:nil`:
//! * A [`construct::Node`] is either a blank node (graph scoped) or a named node.
//! * A [`construct::Value`] is a node or a [`construct::Literal`]; any value can be an element.
//! * A [`construct::Triple`] relates a subject node through a predicate IRI to a
//!   value, optionally inside a context.
//!
//! Graphs are reached only through the [`graph::TripleSource`] and
//! [`graph::Graph`] traits, so lists can be written to and read from any
//! store that can match and add triples.
//!
//! ## Modules
//! * [`construct`] – Terms, triples, the `rdf:` vocabulary and blank node generation.
//! * [`graph`] – The accessor traits plus [`graph::MemoryGraph`], an indexed in-memory graph.
//! * [`builder`] – [`builder::ListBuilder`] writes lists.
//! * [`reader`] – [`reader::ListReader`] reads them back and reports broken ones.
//! * [`persist`] – SQLite-backed graph and a read-only view over a live connection.
//! * [`settings`] – Reader limits and builder labelling, loaded with `config`.
//!
//! ## Reading untrusted graphs
//! A graph may hold lists that are incomplete (a cell lacks a link), forked
//! (a cell has several `rdf:rest` targets) or cyclic. The strict
//! [`reader::ListReader::get_list`] refuses all of them, telling them apart
//! through [`ListError`]. [`reader::ListReader::get_lists`] follows forks and
//! returns every complete branch instead. A missing list
//! ([`ListError::NotFound`]) is never reported as a broken one.
//!
//! ## Quick Start
//! ```
//! use rdflist::builder::ListBuilder;
//! use rdflist::construct::{Iri, Literal, Node, Value};
//! use rdflist::graph::{Graph, MemoryGraph};
//! use rdflist::reader::ListReader;
//!
//! let mut graph = MemoryGraph::new();
//! let mut builder = ListBuilder::default();
//! let subject = Node::named("http://example.org/recipe");
//! let predicate = Iri::new("http://example.org/steps");
//! let steps: Vec<Value> = ["chop", "fry", "serve"]
//!     .into_iter()
//!     .map(|s| Literal::new(s).into())
//!     .collect();
//! builder.add_list_at_node(&mut graph, &subject, &predicate, &steps, &[]).unwrap();
//! assert_eq!(graph.size().unwrap(), 7);
//!
//! let read = ListReader::default()
//!     .get_list_at_node(&graph, &subject, &predicate, &[])
//!     .unwrap();
//! assert_eq!(read, steps);
//! ```

pub mod builder;
pub mod construct;
pub mod error;
pub mod graph;
pub mod persist;
pub mod reader;
pub mod settings;

pub use error::{Defect, ListError, Result};

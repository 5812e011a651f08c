//! Writing lists into a graph.
//!
//! A list of `n` values becomes `n` cells. Each cell has one `rdf:first` link
//! to its value and one `rdf:rest` link to the next cell, and the last cell
//! rests on `rdf:nil`:
//!
//! ```text
//! head  rdf:first v0 ; rdf:rest _:c1 .
//! _:c1  rdf:first v1 ; rdf:rest _:c2 .
//! _:c2  rdf:first v2 ; rdf:rest rdf:nil .
//! ```

use tracing::{debug, trace};

use crate::construct::{rdf, BlankNodeGenerator, Context, Iri, Node, NodeFactory, Triple, Value};
use crate::error::Result;
use crate::graph::{Graph, TripleSource};
use crate::settings::BuilderSettings;

pub struct ListBuilder<F: NodeFactory = BlankNodeGenerator> {
    factory: F,
}

impl ListBuilder<BlankNodeGenerator> {
    pub fn from_settings(settings: &BuilderSettings) -> Self {
        Self::new(BlankNodeGenerator::new(settings.blank_node_prefix.clone()))
    }
}

impl Default for ListBuilder<BlankNodeGenerator> {
    fn default() -> Self {
        Self::new(BlankNodeGenerator::default())
    }
}

impl<F: NodeFactory> ListBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
    pub fn factory(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Writes `values` as a list whose first cell is `head`.
    ///
    /// Nothing is written for an empty `values`, leaving `head` unlinked. The
    /// remaining cells are blank nodes not yet mentioned in `graph`. Every triple is asserted once per
    /// context, or once in the default partition when `contexts` is empty.
    /// Writing a second list at the same head is not detected.
    pub fn add_list<G: Graph + ?Sized>(
        &mut self,
        graph: &mut G,
        head: &Node,
        values: &[Value],
        contexts: &[Context],
    ) -> Result<()> {
        let mut cell = head.clone();
        for (i, value) in values.iter().enumerate() {
            let next = if i + 1 == values.len() {
                rdf::NIL
            } else {
                self.fresh_node(graph)?
            };
            trace!(%cell, %value, "list cell");
            assert_in(graph, Triple::new(cell.clone(), rdf::FIRST, value.clone()), contexts)?;
            assert_in(graph, Triple::new(cell, rdf::REST, next.clone()), contexts)?;
            cell = next;
        }
        debug!(%head, length = values.len(), "list added");
        Ok(())
    }

    /// Links a fresh list from `subject` through `predicate` and returns its
    /// head. An empty `values` writes nothing at all and returns `None`.
    pub fn add_list_at_node<G: Graph + ?Sized>(
        &mut self,
        graph: &mut G,
        subject: &Node,
        predicate: &Iri,
        values: &[Value],
        contexts: &[Context],
    ) -> Result<Option<Node>> {
        if values.is_empty() {
            return Ok(None);
        }
        let head = self.fresh_node(graph)?;
        assert_in(
            graph,
            Triple::new(subject.clone(), predicate.clone(), head.clone()),
            contexts,
        )?;
        self.add_list(graph, &head, values, contexts)?;
        Ok(Some(head))
    }

    // Skips factory output the graph already uses, so that builders sharing
    // a graph never write into each other's cells.
    fn fresh_node<G: Graph + ?Sized>(&mut self, graph: &G) -> Result<Node> {
        loop {
            let node = self.factory.blank_node();
            if !mentions(graph, &node)? {
                return Ok(node);
            }
            trace!(%node, "blank node already in use");
        }
    }
}

fn mentions<S: TripleSource + ?Sized>(source: &S, node: &Node) -> Result<bool> {
    if source.triples(Some(node), None, None, &[])?.next().transpose()?.is_some() {
        return Ok(true);
    }
    let object = Value::Node(node.clone());
    Ok(source.triples(None, None, Some(&object), &[])?.next().transpose()?.is_some())
}

fn assert_in<G: Graph + ?Sized>(graph: &mut G, triple: Triple, contexts: &[Context]) -> Result<()> {
    match contexts {
        [] => {
            graph.add(triple)?;
        }
        [context] => {
            graph.add(triple.in_context(context.clone()))?;
        }
        _ => {
            for context in contexts {
                graph.add(triple.clone().in_context(context.clone()))?;
            }
        }
    }
    Ok(())
}

//! Reading lists back out of a graph.
//!
//! The graph is not trusted. A cell may lack a link, carry several, rest on a
//! literal, or rest on an earlier cell. [`ListReader::get_list`] is strict and
//! fails on any of these, including a fork (a cell with several `rdf:rest`
//! targets). [`ListReader::get_lists`] instead follows every fork and returns
//! each complete branch, dropping the ones that dead-end.
//!
//! Both walk the same way: an explicit stack of branches, each carrying the
//! values collected so far and the cells it has visited, so cycles end the
//! branch instead of the walk looping. The number of branches walked per head
//! is capped by [`ReaderSettings::max_branches`] since every fork multiplies
//! them. A strict read stops as soon as it has seen two ways through, so a
//! wide fork fails as [`ListError::Forked`] before the cap is reached.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::construct::{rdf, Context, Iri, Node, Value};
use crate::error::{Defect, ListError, Result};
use crate::graph::{OtherHasher, TripleSource};
use crate::settings::ReaderSettings;

#[derive(Debug, Clone, Default)]
pub struct ListReader {
    settings: ReaderSettings,
}

struct Branch {
    node: Node,
    values: Vec<Value>,
    visited: HashSet<Node, OtherHasher>,
    // split off at a fork and not yet charged against the branch bound
    spawned: bool,
}

#[derive(Default)]
struct Walk {
    complete: Vec<Vec<Value>>,
    dead: Vec<(Node, Defect)>,
    fork: Option<(Node, usize)>,
}

impl ListReader {
    pub fn new(settings: ReaderSettings) -> Self {
        Self { settings }
    }
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Reads the single list hanging off `(subject, predicate)`.
    pub fn get_list_at_node<S: TripleSource + ?Sized>(
        &self,
        source: &S,
        subject: &Node,
        predicate: &Iri,
        contexts: &[Context],
    ) -> Result<Vec<Value>> {
        let head = entry(source, subject, predicate, contexts)?;
        self.get_list(source, &head, contexts)
    }

    /// Reads the list starting at `head`, which must resolve to exactly one
    /// complete chain. `rdf:nil` itself reads as the empty list.
    pub fn get_list<S: TripleSource + ?Sized>(
        &self,
        source: &S,
        head: &Node,
        contexts: &[Context],
    ) -> Result<Vec<Value>> {
        let mut walk = self.walk(source, head, contexts, true)?;
        match (walk.fork.take(), walk.complete.len()) {
            (None, 1) => {
                let values = walk.complete.pop().unwrap_or_default();
                debug!(%head, length = values.len(), "list read");
                Ok(values)
            }
            (_, 0) => {
                let (node, defect) = walk
                    .dead
                    .into_iter()
                    .next()
                    .unwrap_or((head.clone(), Defect::MissingFirst));
                Err(ListError::IncompleteStructure { node, defect })
            }
            (fork, complete) => {
                let (node, branches) = fork.unwrap_or((head.clone(), complete));
                Err(ListError::Forked { node, branches })
            }
        }
    }

    /// Reads every complete list reachable from the head linked at
    /// `(subject, predicate)`, following forks.
    pub fn get_lists_at_node<S: TripleSource + ?Sized>(
        &self,
        source: &S,
        subject: &Node,
        predicate: &Iri,
        contexts: &[Context],
    ) -> Result<Vec<Vec<Value>>> {
        let head = entry(source, subject, predicate, contexts)?;
        self.get_lists(source, [&head], contexts)
    }

    /// Reads every complete list reachable from each of `heads`.
    ///
    /// A fork at `rdf:rest` yields one list per way through it; branches that
    /// turn out incomplete are left out. Lists are grouped by head in the
    /// order the heads are given, repeated heads being read once.
    pub fn get_lists<'h, S, I>(
        &self,
        source: &S,
        heads: I,
        contexts: &[Context],
    ) -> Result<Vec<Vec<Value>>>
    where
        S: TripleSource + ?Sized,
        I: IntoIterator<Item = &'h Node>,
    {
        let mut seen = HashSet::<&Node, OtherHasher>::default();
        let mut lists = Vec::new();
        for head in heads {
            if !seen.insert(head) {
                continue;
            }
            let walk = self.walk(source, head, contexts, false)?;
            debug!(
                %head,
                complete = walk.complete.len(),
                pruned = walk.dead.len(),
                "lists read"
            );
            lists.extend(walk.complete);
        }
        Ok(lists)
    }

    fn walk<S: TripleSource + ?Sized>(
        &self,
        source: &S,
        head: &Node,
        contexts: &[Context],
        strict: bool,
    ) -> Result<Walk> {
        let limit = self.settings.max_branches;
        let mut walk = Walk::default();
        let mut walked = 1;
        let mut stack = vec![Branch {
            node: head.clone(),
            values: Vec::new(),
            visited: HashSet::default(),
            spawned: false,
        }];
        while let Some(mut branch) = stack.pop() {
            // a strict read only needs to know that there is more than one list
            let proven = walk.complete.len() > 1
                || (walk.fork.is_some() && !walk.complete.is_empty());
            if strict && proven {
                break;
            }
            // branches are charged when they are walked, not when they split off
            if branch.spawned {
                branch.spawned = false;
                walked += 1;
                if walked > limit {
                    warn!(%head, limit, "too many list branches");
                    return Err(ListError::BranchLimitExceeded {
                        head: head.clone(),
                        limit,
                    });
                }
            }
            if branch.node.is_nil() {
                walk.complete.push(branch.values);
                continue;
            }
            if !branch.visited.insert(branch.node.clone()) {
                walk.dead.push((branch.node, Defect::Cycle));
                continue;
            }
            trace!(node = %branch.node, position = branch.values.len(), "list step");

            let mut firsts = targets(source, &branch.node, &rdf::FIRST, contexts)?;
            match firsts.len() {
                1 => branch.values.extend(firsts.pop()),
                0 => {
                    walk.dead.push((branch.node, Defect::MissingFirst));
                    continue;
                }
                n => {
                    walk.dead.push((branch.node, Defect::MultipleFirst(n)));
                    continue;
                }
            }

            let rests = targets(source, &branch.node, &rdf::REST, contexts)?;
            if rests.is_empty() {
                walk.dead.push((branch.node, Defect::MissingRest));
                continue;
            }
            if rests.len() > 1 {
                debug!(node = %branch.node, branches = rests.len(), "list forks");
                if walk.fork.is_none() {
                    walk.fork = Some((branch.node.clone(), rests.len()));
                }
            }
            let mut nexts = Vec::with_capacity(rests.len());
            for rest in rests {
                match rest.into_node() {
                    Some(next) => nexts.push(next),
                    None => walk.dead.push((branch.node.clone(), Defect::LiteralRest)),
                }
            }
            // pushed in reverse so the first matched rest is walked first
            let mut nexts = nexts.into_iter();
            if let Some(first) = nexts.next() {
                let others: Vec<Node> = nexts.collect();
                for next in others.into_iter().rev() {
                    stack.push(Branch {
                        node: next,
                        values: branch.values.clone(),
                        visited: branch.visited.clone(),
                        spawned: true,
                    });
                }
                branch.node = first;
                stack.push(branch);
            }
        }
        Ok(walk)
    }
}

// Resolves the single head linked from (subject, predicate).
fn entry<S: TripleSource + ?Sized>(
    source: &S,
    subject: &Node,
    predicate: &Iri,
    contexts: &[Context],
) -> Result<Node> {
    let objects = targets(source, subject, predicate, contexts)?;
    match objects.as_slice() {
        [] => Err(ListError::NotFound {
            subject: subject.clone(),
            predicate: predicate.clone(),
        }),
        [Value::Node(head)] => Ok(head.clone()),
        [Value::Literal(_)] => Err(ListError::IncompleteStructure {
            node: subject.clone(),
            defect: Defect::LiteralHead,
        }),
        _ => Err(ListError::AmbiguousEntry {
            subject: subject.clone(),
            predicate: predicate.clone(),
            count: objects.len(),
        }),
    }
}

// Distinct objects of (subject, predicate, ?) in match order. The same link
// asserted in several contexts counts once.
fn targets<S: TripleSource + ?Sized>(
    source: &S,
    subject: &Node,
    predicate: &Iri,
    contexts: &[Context],
) -> Result<Vec<Value>> {
    let mut objects = Vec::new();
    for triple in source.triples(Some(subject), Some(predicate), None, contexts)? {
        let object = triple?.object;
        if !objects.contains(&object) {
            objects.push(object);
        }
    }
    Ok(objects)
}

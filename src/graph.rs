//! The graph accessor capability and an in-memory implementation of it.
//!
//! List building and reading never touch a store directly. They go through
//! [`TripleSource`] (pattern matching) and [`Graph`] (mutation), so the same
//! code runs over [`MemoryGraph`], the SQLite [`crate::persist::Persistor`], or
//! any adapter a caller writes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::sync::Arc;

use seahash::SeaHasher;

use crate::construct::{Context, Iri, Node, Triple, Value};
use crate::error::Result;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

/// A cursor over matched triples. Dropping it releases whatever the
/// underlying store holds for the iteration.
pub type Triples<'a> = Box<dyn Iterator<Item = Result<Triple>> + 'a>;

/// Pattern matching over a collection of triples.
pub trait TripleSource {
    /// Every triple matching the pattern. `None` components are wildcards;
    /// an empty `contexts` slice matches triples in any context.
    fn triples<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Value>,
        contexts: &[Context],
    ) -> Result<Triples<'a>>;
}

/// A mutable collection of triples.
pub trait Graph: TripleSource {
    /// Returns false if the triple was already present.
    fn add(&mut self, triple: Triple) -> Result<bool>;
    /// Returns false if the triple was not present.
    fn remove(&mut self, triple: &Triple) -> Result<bool>;
    fn contains(&self, triple: &Triple) -> Result<bool>;
    fn size(&self) -> Result<usize>;
}

// ------------- Pattern -------------
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Pattern {
    pub subject: Option<Node>,
    pub predicate: Option<Iri>,
    pub object: Option<Value>,
    pub contexts: Vec<Context>,
}
impl Pattern {
    pub fn new(
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Value>,
        contexts: &[Context],
    ) -> Self {
        Self {
            subject: subject.cloned(),
            predicate: predicate.cloned(),
            object: object.cloned(),
            contexts: contexts.to_vec(),
        }
    }
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().is_none_or(|s| *s == triple.subject)
            && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
            && self.object.as_ref().is_none_or(|o| *o == triple.object)
            && triple.in_any(&self.contexts)
    }
}

// ------------- Lookups -------------
// Keys map to the insertion sequence numbers of the triples they occur in,
// kept ordered so that matches come back in insertion order.
#[derive(Debug)]
pub(crate) struct Lookup<K, H = OtherHasher> {
    index: HashMap<K, BTreeSet<u64>, H>,
}
impl<K: Eq + Hash, H: BuildHasher + Default> Lookup<K, H> {
    pub fn new() -> Self {
        Self {
            index: HashMap::<K, BTreeSet<u64>, H>::default(),
        }
    }
    pub fn insert(&mut self, key: K, sequence: u64) {
        self.index.entry(key).or_default().insert(sequence);
    }
    pub fn remove(&mut self, key: &K, sequence: u64) {
        if let Some(set) = self.index.get_mut(key) {
            set.remove(&sequence);
            if set.is_empty() {
                self.index.remove(key);
            }
        }
    }
    pub fn lookup(&self, key: &K) -> Option<&BTreeSet<u64>> {
        self.index.get(key)
    }
}
impl<K: Eq + Hash, H: BuildHasher + Default> Default for Lookup<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- MemoryGraph -------------
/// An in-memory graph indexed by subject, predicate and object.
///
/// Triples are unique (adding one twice is a no-op) and matches are returned
/// in insertion order, which keeps list reading deterministic.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    sequence: u64,
    kept: HashMap<Arc<Triple>, u64, OtherHasher>,
    ordered: BTreeMap<u64, Arc<Triple>>,
    subject_lookup: Lookup<Node>,
    predicate_lookup: Lookup<Iri>,
    object_lookup: Lookup<Value>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.kept.contains_key(&triple) {
            return false;
        }
        self.sequence += 1;
        let sequence = self.sequence;
        let keepsake = Arc::new(triple);
        self.subject_lookup.insert(keepsake.subject.clone(), sequence);
        self.predicate_lookup
            .insert(keepsake.predicate.clone(), sequence);
        self.object_lookup.insert(keepsake.object.clone(), sequence);
        self.ordered.insert(sequence, Arc::clone(&keepsake));
        self.kept.insert(keepsake, sequence);
        true
    }
    pub fn delete(&mut self, triple: &Triple) -> bool {
        match self.kept.remove(triple) {
            Some(sequence) => {
                self.ordered.remove(&sequence);
                self.subject_lookup.remove(&triple.subject, sequence);
                self.predicate_lookup.remove(&triple.predicate, sequence);
                self.object_lookup.remove(&triple.object, sequence);
                true
            }
            None => false,
        }
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl TripleSource for MemoryGraph {
    fn triples<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Value>,
        contexts: &[Context],
    ) -> Result<Triples<'a>> {
        // scan the narrowest index among the bound components
        let mut narrowest: Option<&'a BTreeSet<u64>> = None;
        let bound = [
            subject.map(|s| self.subject_lookup.lookup(s)),
            predicate.map(|p| self.predicate_lookup.lookup(p)),
            object.map(|o| self.object_lookup.lookup(o)),
        ];
        for candidates in bound.into_iter().flatten() {
            match candidates {
                None => return Ok(Box::new(std::iter::empty())),
                Some(set) => {
                    if narrowest.is_none_or(|n| set.len() < n.len()) {
                        narrowest = Some(set);
                    }
                }
            }
        }
        let pattern = Pattern::new(subject, predicate, object, contexts);
        match narrowest {
            Some(set) => Ok(Box::new(
                set.iter()
                    .filter_map(move |sequence| self.ordered.get(sequence))
                    .filter(move |t| pattern.matches(t))
                    .map(|t| Ok(Triple::clone(t))),
            )),
            None => Ok(Box::new(
                self.ordered
                    .values()
                    .filter(move |t| pattern.matches(t))
                    .map(|t| Ok(Triple::clone(t))),
            )),
        }
    }
}

impl Graph for MemoryGraph {
    fn add(&mut self, triple: Triple) -> Result<bool> {
        Ok(self.insert(triple))
    }
    fn remove(&mut self, triple: &Triple) -> Result<bool> {
        Ok(self.delete(triple))
    }
    fn contains(&self, triple: &Triple) -> Result<bool> {
        Ok(self.kept.contains_key(triple))
    }
    fn size(&self) -> Result<usize> {
        Ok(self.len())
    }
}

impl FromIterator<Triple> for MemoryGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = MemoryGraph::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for MemoryGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

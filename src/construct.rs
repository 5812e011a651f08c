// used for compile time IRIs next to owned ones
use std::borrow::Cow;

// used to print out readable forms of a construct
use std::fmt;

use serde::{Deserialize, Serialize};

// ------------- Iri -------------
/// A named, globally unique identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(Cow<'static, str>);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(Cow::Owned(iri.into()))
    }
    pub const fn from_static(iri: &'static str) -> Self {
        Self(Cow::Borrowed(iri))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// The RDF collection vocabulary.
pub mod rdf {
    use super::{Iri, Node};

    pub const FIRST: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
    pub const REST: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
    pub const NIL: Node = Node::Named(Iri::from_static(
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil",
    ));
}

// ------------- Node -------------
/// Something that can be the subject of a triple.
///
/// Blank labels are only meaningful inside the graph that holds them, while
/// named nodes carry an IRI. Equality is by variant and identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Node {
    Blank(String),
    Named(Iri),
}

impl Node {
    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(label.into())
    }
    pub fn named(iri: impl Into<String>) -> Self {
        Node::Named(Iri::new(iri))
    }
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }
    pub fn is_nil(&self) -> bool {
        *self == rdf::NIL
    }
}
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Blank(label) => write!(f, "_:{}", label),
            Node::Named(iri) => write!(f, "{}", iri),
        }
    }
}
impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Named(iri)
    }
}

// ------------- Literal -------------
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    datatype: Option<Iri>,
    language: Option<String>,
}

impl Literal {
    pub fn new(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype),
            language: None,
        }
    }
    pub fn with_language(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
    pub fn lexical(&self) -> &str {
        &self.lexical
    }
    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let escaped = self.lexical.replace('\\', "\\\\").replace('"', "\\\"");
        write!(f, "\"{}\"", escaped)?;
        if let Some(language) = &self.language {
            write!(f, "@{}", language)
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^{}", datatype)
        } else {
            Ok(())
        }
    }
}

// ------------- Value -------------
/// Anything that may sit in the object position, and therefore in a list.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Value {
    Node(Node),
    Literal(Literal),
}

impl Value {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            Value::Literal(_) => None,
        }
    }
    pub fn into_node(self) -> Option<Node> {
        match self {
            Value::Node(node) => Some(node),
            Value::Literal(_) => None,
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Node(node) => fmt::Display::fmt(node, f),
            Value::Literal(literal) => fmt::Display::fmt(literal, f),
        }
    }
}
impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}
impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Node(Node::Named(iri))
    }
}
impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Value::Literal(literal)
    }
}

// ------------- Triple -------------
/// The graph partition a triple lives in; `None` is the default partition.
pub type Context = Option<Node>;

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Value,
    pub context: Context,
}

impl Triple {
    pub fn new(subject: Node, predicate: Iri, object: impl Into<Value>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
            context: None,
        }
    }
    pub fn in_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
    /// Whether the triple lives in one of `contexts`. No contexts matches all.
    pub fn in_any(&self, contexts: &[Context]) -> bool {
        contexts.is_empty() || contexts.contains(&self.context)
    }
}
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.context {
            Some(context) => write!(
                f,
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, context
            ),
            None => write!(f, "{} {} {} .", self.subject, self.predicate, self.object),
        }
    }
}

// ------------- Blank nodes -------------
/// Source of fresh blank nodes for list cells.
///
/// The builder skips nodes the target graph already mentions, so a factory
/// has to move on to a new node on every call.
pub trait NodeFactory {
    fn blank_node(&mut self) -> Node;
}

impl<F: NodeFactory + ?Sized> NodeFactory for &mut F {
    fn blank_node(&mut self) -> Node {
        (**self).blank_node()
    }
}

pub const GENESIS: u64 = 0;

#[derive(Debug)]
pub struct BlankNodeGenerator {
    prefix: String,
    lower_bound: u64,
}

impl BlankNodeGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            lower_bound: GENESIS,
        }
    }
    // Labels already present in a graph have to be retained when that graph
    // is reopened, or generated labels could collide with them.
    pub fn retain(&mut self, node: &Node) {
        if let Node::Blank(label) = node {
            let counter = label
                .strip_prefix(self.prefix.as_str())
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(n) = counter {
                if n > self.lower_bound {
                    self.lower_bound = n;
                }
            }
        }
    }
    pub fn generate(&mut self) -> Node {
        self.lower_bound += 1;
        Node::Blank(format!("{}{}", self.prefix, self.lower_bound))
    }
    pub fn lower_bound(&self) -> u64 {
        self.lower_bound
    }
}

impl Default for BlankNodeGenerator {
    fn default() -> Self {
        Self::new("list")
    }
}

impl NodeFactory for BlankNodeGenerator {
    fn blank_node(&mut self) -> Node {
        self.generate()
    }
}

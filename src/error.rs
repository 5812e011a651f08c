use std::fmt;

use thiserror::Error;

use crate::construct::{Iri, Node};

/// What was wrong with a list node when the walk gave up on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// The node has no `rdf:first` link.
    MissingFirst,
    /// The node has this many distinct `rdf:first` targets.
    MultipleFirst(usize),
    /// The node has no `rdf:rest` link.
    MissingRest,
    /// An `rdf:rest` link points at a literal.
    LiteralRest,
    /// The entry triple points at a literal instead of a list node.
    LiteralHead,
    /// The node was already visited on the same path.
    Cycle,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Defect::MissingFirst => write!(f, "missing rdf:first"),
            Defect::MultipleFirst(n) => write!(f, "{n} rdf:first links"),
            Defect::MissingRest => write!(f, "missing rdf:rest"),
            Defect::LiteralRest => write!(f, "rdf:rest points at a literal"),
            Defect::LiteralHead => write!(f, "list head is a literal"),
            Defect::Cycle => write!(f, "cycle"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ListError {
    #[error("No list found at ({subject}, {predicate})")]
    NotFound { subject: Node, predicate: Iri },
    #[error("Expected one list at ({subject}, {predicate}) but found {count}")]
    AmbiguousEntry {
        subject: Node,
        predicate: Iri,
        count: usize,
    },
    #[error("List structure was not complete: {defect} at {node}")]
    IncompleteStructure { node: Node, defect: Defect },
    #[error("Found more than one list, possibly due to forking (at {node}, {branches} branches)")]
    Forked { node: Node, branches: usize },
    #[error("Gave up on the list at {head} after {limit} branches")]
    BranchLimitExceeded { head: Node, limit: usize },
    #[error("Graph accessor failed: {message}")]
    Accessor {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Config error: {0}")]
    Config(String),
}

impl ListError {
    /// True when there simply is no list, as opposed to a broken one.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ListError::NotFound { .. })
    }
    /// True for defects of the list encoding itself.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ListError::AmbiguousEntry { .. }
                | ListError::IncompleteStructure { .. }
                | ListError::Forked { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ListError>;

// Helper conversions
impl From<rusqlite::Error> for ListError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Accessor {
            message: e.to_string(),
            source: Box::new(e),
        }
    }
}

impl From<config::ConfigError> for ListError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

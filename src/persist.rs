// used for persistence
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params_from_iter, Connection, Row};
use tracing::{debug, trace};

use crate::construct::{BlankNodeGenerator, Context, Iri, Literal, Node, Triple, Value};
use crate::error::Result;
use crate::graph::{Graph, TripleSource, Triples};

// kinds of terms, stored next to their text so that decoding restores the variant
const NO_TERM: i64 = 0;
const BLANK: i64 = 1;
const NAMED: i64 = 2;
const LITERAL: i64 = 3;

const COLUMNS: &str = "Subject, SubjectKind, Predicate, Object, ObjectKind, Datatype, Language, Context, ContextKind";
const IDENTITY: &str = "
    Subject = ? and SubjectKind = ?
    and Predicate = ?
    and Object = ? and ObjectKind = ? and Datatype = ? and Language = ?
    and Context = ? and ContextKind = ?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}
impl PersistenceMode {
    pub fn connect(&self) -> Result<Connection> {
        let connection = match self {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        Ok(connection)
    }
}

/// A graph kept in a SQLite database.
///
/// Statements are either explicit (added through [`Graph::add`]) or inferred
/// (added through [`Persistor::add_inferred`]). Adding an inferred statement
/// explicitly makes it explicit and counts as a change.
pub struct Persistor<'db> {
    connection: &'db Connection,
}
impl<'db> Persistor<'db> {
    pub fn new(connection: &'db Connection) -> Result<Persistor<'db>> {
        // Empty strings stand in for absent terms, since nulls never collide
        // in a unique constraint.
        connection.execute_batch(
            "
            create table if not exists Statement (
                Subject text not null,
                SubjectKind integer not null,
                Predicate text not null,
                Object text not null,
                ObjectKind integer not null,
                Datatype text not null default '',
                Language text not null default '',
                Context text not null default '',
                ContextKind integer not null default 0,
                Inferred integer not null default 0,
                constraint unique_Statement unique (
                    Subject,
                    SubjectKind,
                    Predicate,
                    Object,
                    ObjectKind,
                    Datatype,
                    Language,
                    Context,
                    ContextKind
                )
            );
            create index if not exists Statement_by_Subject on Statement (
                Subject,
                Predicate
            );
            create index if not exists Statement_by_Object on Statement (
                Object
            );
            ",
        )?;
        debug!("statement schema ready");
        Ok(Persistor { connection })
    }
    /// A read-only view of the statements, optionally including inferred ones.
    pub fn triple_source(&self, include_inferred: bool) -> SqliteTripleSource<'db> {
        SqliteTripleSource::new(self.connection, include_inferred)
    }
    pub fn add_inferred(&mut self, triple: Triple) -> Result<bool> {
        self.persist(&triple, true)
    }
    /// Makes `generator` skip every blank label already stored, so lists
    /// built after reopening a database get fresh cells.
    pub fn restore_blank_nodes(&self, generator: &mut BlankNodeGenerator) -> Result<()> {
        let mut statement = self.connection.prepare_cached(
            "
            select Subject from Statement where SubjectKind = ?1
            union
            select Object from Statement where ObjectKind = ?1
            ",
        )?;
        let labels = statement.query_map([BLANK], |row| row.get::<_, String>(0))?;
        for label in labels {
            generator.retain(&Node::Blank(label?));
        }
        Ok(())
    }
    // An explicit assertion upgrades a statement stored as inferred, while an
    // inferred one never downgrades an explicit statement.
    fn persist(&self, triple: &Triple, inferred: bool) -> Result<bool> {
        let sql = if inferred {
            format!("insert or ignore into Statement ({COLUMNS}, Inferred) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
        } else {
            format!(
                "insert into Statement ({COLUMNS}, Inferred) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                on conflict ({COLUMNS}) do update set Inferred = 0 where Inferred = 1"
            )
        };
        let mut statement = self.connection.prepare_cached(&sql)?;
        let mut params = identity(triple);
        params.push(SqlValue::Integer(inferred as i64));
        let changed = statement.execute(params_from_iter(params.iter()))?;
        trace!(%triple, inferred, changed, "statement persisted");
        Ok(changed > 0)
    }
}

impl TripleSource for Persistor<'_> {
    fn triples<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Value>,
        contexts: &[Context],
    ) -> Result<Triples<'a>> {
        select(self.connection, subject, predicate, object, contexts, true)
    }
}

impl Graph for Persistor<'_> {
    fn add(&mut self, triple: Triple) -> Result<bool> {
        self.persist(&triple, false)
    }
    fn remove(&mut self, triple: &Triple) -> Result<bool> {
        let mut statement = self
            .connection
            .prepare_cached(&format!("delete from Statement where {IDENTITY}"))?;
        let changed = statement.execute(params_from_iter(identity(triple).iter()))?;
        Ok(changed > 0)
    }
    fn contains(&self, triple: &Triple) -> Result<bool> {
        let mut statement = self
            .connection
            .prepare_cached(&format!("select exists (select 1 from Statement where {IDENTITY})"))?;
        let found =
            statement.query_row(params_from_iter(identity(triple).iter()), |r| r.get::<_, bool>(0))?;
        Ok(found)
    }
    fn size(&self) -> Result<usize> {
        let count = self
            .connection
            .query_row("select count(*) from Statement", [], |r| r.get::<_, i64>(0))?;
        Ok(count as usize)
    }
}

/// A read-only view of the statements in a live connection.
///
/// Whether inferred statements show up is fixed when the view is created and
/// applies to every match. Connection failures surface as
/// [`crate::ListError::Accessor`] with the SQLite error as the source.
#[derive(Clone, Copy)]
pub struct SqliteTripleSource<'db> {
    connection: &'db Connection,
    include_inferred: bool,
}
impl<'db> SqliteTripleSource<'db> {
    pub fn new(connection: &'db Connection, include_inferred: bool) -> Self {
        Self {
            connection,
            include_inferred,
        }
    }
    pub fn include_inferred(&self) -> bool {
        self.include_inferred
    }
}

impl TripleSource for SqliteTripleSource<'_> {
    fn triples<'a>(
        &'a self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Value>,
        contexts: &[Context],
    ) -> Result<Triples<'a>> {
        select(
            self.connection,
            subject,
            predicate,
            object,
            contexts,
            self.include_inferred,
        )
    }
}

// The cursor is drained before returning so that the prepared statement goes
// back to the cache on every path out of here.
fn select<'a>(
    connection: &Connection,
    subject: Option<&Node>,
    predicate: Option<&Iri>,
    object: Option<&Value>,
    contexts: &[Context],
    include_inferred: bool,
) -> Result<Triples<'a>> {
    let mut sql = format!("select {COLUMNS} from Statement where 1 = 1");
    let mut params = Vec::new();
    if let Some(subject) = subject {
        sql += " and Subject = ? and SubjectKind = ?";
        params.extend(node_columns(subject));
    }
    if let Some(predicate) = predicate {
        sql += " and Predicate = ?";
        params.push(SqlValue::Text(predicate.as_str().to_string()));
    }
    if let Some(object) = object {
        sql += " and Object = ? and ObjectKind = ? and Datatype = ? and Language = ?";
        params.extend(value_columns(object));
    }
    if !include_inferred {
        sql += " and Inferred = 0";
    }
    sql += " order by rowid";

    let mut statement = connection.prepare_cached(&sql)?;
    let rows = statement.query_map(params_from_iter(params.iter()), decode)?;
    let mut triples: Vec<Result<Triple>> = Vec::new();
    for row in rows {
        let triple = row?;
        if triple.in_any(contexts) {
            triples.push(Ok(triple));
        }
    }
    Ok(Box::new(triples.into_iter()))
}

fn node_columns(node: &Node) -> [SqlValue; 2] {
    match node {
        Node::Blank(label) => [SqlValue::Text(label.clone()), SqlValue::Integer(BLANK)],
        Node::Named(iri) => [SqlValue::Text(iri.as_str().to_string()), SqlValue::Integer(NAMED)],
    }
}

fn value_columns(value: &Value) -> [SqlValue; 4] {
    match value {
        Value::Node(node) => {
            let [text, kind] = node_columns(node);
            [text, kind, SqlValue::Text(String::new()), SqlValue::Text(String::new())]
        }
        Value::Literal(literal) => [
            SqlValue::Text(literal.lexical().to_string()),
            SqlValue::Integer(LITERAL),
            SqlValue::Text(
                literal
                    .datatype()
                    .map(|d| d.as_str().to_string())
                    .unwrap_or_default(),
            ),
            SqlValue::Text(literal.language().unwrap_or_default().to_string()),
        ],
    }
}

fn context_columns(context: &Context) -> [SqlValue; 2] {
    match context {
        Some(node) => node_columns(node),
        None => [SqlValue::Text(String::new()), SqlValue::Integer(NO_TERM)],
    }
}

fn identity(triple: &Triple) -> Vec<SqlValue> {
    let mut params = Vec::with_capacity(10);
    params.extend(node_columns(&triple.subject));
    params.push(SqlValue::Text(triple.predicate.as_str().to_string()));
    params.extend(value_columns(&triple.object));
    params.extend(context_columns(&triple.context));
    params
}

fn decode_node(text: String, kind: i64, column: usize) -> rusqlite::Result<Node> {
    match kind {
        BLANK => Ok(Node::Blank(text)),
        NAMED => Ok(Node::Named(Iri::new(text))),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Integer,
            format!("not a node kind: {other}").into(),
        )),
    }
}

fn decode(row: &Row) -> rusqlite::Result<Triple> {
    let subject = decode_node(row.get(0)?, row.get(1)?, 1)?;
    let predicate = Iri::new(row.get::<_, String>(2)?);
    let object_kind: i64 = row.get(4)?;
    let object = if object_kind == LITERAL {
        let lexical: String = row.get(3)?;
        let datatype: String = row.get(5)?;
        let language: String = row.get(6)?;
        let literal = if !language.is_empty() {
            Literal::with_language(lexical, language)
        } else if !datatype.is_empty() {
            Literal::typed(lexical, Iri::new(datatype))
        } else {
            Literal::new(lexical)
        };
        Value::Literal(literal)
    } else {
        Value::Node(decode_node(row.get(3)?, object_kind, 4)?)
    };
    let context = match row.get::<_, i64>(8)? {
        NO_TERM => None,
        kind => Some(decode_node(row.get(7)?, kind, 8)?),
    };
    Ok(Triple {
        subject,
        predicate,
        object,
        context,
    })
}

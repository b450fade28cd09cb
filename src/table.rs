//! Table references and the resolver that turns the tables referenced by a set
//! of predicates into an ordered, duplicate-free join list.

use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectorError};
use crate::predicate::Predicate;

/// Join condition used for every joined table that does not declare its own.
pub const NATURAL_JOIN: &str = "USING(date, instrument)";

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
    static ref JOIN_CONDITION: Regex = Regex::new(r"(?is)^(USING\s*\(.+\)|ON\s+.+)$").unwrap();
}

/// True when `s` can be used as an unquoted (optionally schema-qualified) identifier.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// A source table, optionally followed by its own join condition, as in
/// `cn_stock_basic_info USING (instrument)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableRef {
    name: String,
    join: Option<String>,
}

impl TableRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let (name, rest) = match reference.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (reference, ""),
        };
        if !is_identifier(name) {
            return Err(SelectorError::Catalog(format!("'{name}' is not a valid table name")));
        }
        let join = if rest.is_empty() {
            None
        } else if JOIN_CONDITION.is_match(rest) {
            Some(String::from(rest))
        } else {
            return Err(SelectorError::Catalog(format!(
                "'{rest}' is not a join condition for table {name}"
            )));
        };
        Ok(Self { name: String::from(name), join })
    }
    /// The bare identifier, i.e. the reference without any join condition.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn join(&self) -> Option<&str> {
        self.join.as_deref()
    }
    /// Prefixes a column with the bare table identifier.
    pub fn qualify(&self, column: &str) -> String {
        format!("{}.{}", self.name, column)
    }
    /// The form used in the FROM list: the primary table stays bare, every
    /// other table carries a join condition.
    pub fn render(&self, primary: &str) -> String {
        match &self.join {
            Some(join) => format!("{} {}", self.name, join),
            None if self.name == primary => self.name.clone(),
            None => format!("{} {}", self.name, NATURAL_JOIN),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.join {
            Some(join) => write!(f, "{} {}", self.name, join),
            None => write!(f, "{}", self.name),
        }
    }
}

impl TryFrom<String> for TableRef {
    type Error = SelectorError;
    fn try_from(reference: String) -> Result<Self> {
        Self::parse(&reference)
    }
}

impl From<TableRef> for String {
    fn from(table: TableRef) -> Self {
        table.to_string()
    }
}

/// Collects the tables the predicates depend on, primary table first.
/// Entries are deduplicated on their rendered form, keeping first-seen order.
pub fn resolve(primary: &str, predicates: &[Predicate]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(predicates.len() + 1);
    let rendered = std::iter::once(String::from(primary))
        .chain(predicates.iter().map(|p| p.table().render(primary)));
    for table in rendered {
        if seen.insert(table.clone()) {
            tables.push(table);
        }
    }
    tables
}

/// Chains the resolved tables into the FROM list.
pub fn render_tables(tables: &[String]) -> String {
    tables.join("\n    JOIN ")
}

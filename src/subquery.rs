//! Materializes an upstream query as a temporary table so the filter query
//! can join against it by name instead of embedding it.

use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, SelectorError};
use crate::table::is_identifier;

#[derive(Parser)]
#[grammar = "script.pest"]
struct ScriptParser;

/// Where the rows to filter come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseQuery {
    /// Raw SQL text, possibly several statements.
    Sql(String),
    /// A stored document with an `sql` field, e.g. the output of another selector.
    Document(Value),
    /// A table that has already been materialized.
    Table(String),
}

/// Statements that create the base table, and the name of that table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub statements: Vec<String>,
    pub table_id: String,
}

impl Materialized {
    /// Every statement terminated by `;` and a newline.
    pub fn preamble(&self) -> String {
        self.statements.iter().map(|s| format!("{s};\n")).collect()
    }
}

/// A fresh identifier for a temporary table. Random, so concurrent
/// compilations never pick the same name.
pub fn generate_table_id() -> String {
    format!("_t_{}", Uuid::new_v4().simple())
}

fn failure(message: impl Into<String>) -> SelectorError {
    SelectorError::Materialization { message: message.into() }
}

/// Splits an SQL script into its top-level statements, trimmed and without
/// terminators. Trailing comments of a statement are dropped so that appending
/// a terminator cannot end up inside a comment; statements made only of
/// comments and whitespace are dropped altogether.
pub fn split_statements(sql: &str) -> Result<Vec<String>> {
    let mut parsed = ScriptParser::parse(Rule::script, sql).map_err(|e| {
        debug!(line_col = ?e.line_col, "script does not parse");
        failure(format!("cannot split script: {e}"))
    })?;
    let Some(script) = parsed.next() else {
        return Err(failure("empty parse"));
    };
    let mut statements = Vec::new();
    for statement in script.into_inner().filter(|p| p.as_rule() == Rule::statement) {
        let start = statement.as_span().start();
        let end = statement
            .into_inner()
            .filter(|p| matches!(p.as_rule(), Rule::code | Rule::literal))
            .last()
            .map(|p| p.as_span().end());
        if let Some(end) = end {
            statements.push(sql[start..end].trim().to_string());
        }
    }
    Ok(statements)
}

/// Rewrites the last statement of the source into a `CREATE TABLE ... AS`
/// under a generated name; the statements before it are kept as they are.
/// A table reference is used directly.
pub fn materialize(source: &BaseQuery) -> Result<Materialized> {
    let sql = match source {
        BaseQuery::Sql(sql) => sql.as_str(),
        BaseQuery::Document(document) => document
            .get("sql")
            .and_then(Value::as_str)
            .ok_or_else(|| failure("document has no string field 'sql'"))?,
        BaseQuery::Table(table_id) => {
            if !is_identifier(table_id) {
                return Err(failure(format!("'{table_id}' is not a table identifier")));
            }
            debug!(%table_id, "base query is a materialized table");
            return Ok(Materialized { statements: Vec::new(), table_id: table_id.clone() });
        }
    };
    let mut statements = split_statements(sql)?;
    let Some(last) = statements.pop() else {
        return Err(failure("base query contains no statement"));
    };
    let table_id = generate_table_id();
    statements.push(format!("CREATE TABLE {table_id} AS {last}"));
    debug!(%table_id, statements = statements.len(), "materialized base query");
    Ok(Materialized { statements, table_id })
}

// used to print out the SQL form of a literal
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value that ends up inlined into the emitted SQL.
///
/// Catalog values arrive either as JSON numbers or JSON strings, so the
/// (de)serialized form is untagged. Integers are tried before floats so that
/// `0` stays `0` and does not turn into `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Renders the literal as SQL. This is the only place where quoting happens.
    pub fn to_sql(&self) -> String {
        match self {
            Literal::Integer(i) => i.to_string(),
            // Debug keeps the decimal point, so 1.0 does not collapse into the integer 1
            Literal::Float(f) if f.is_finite() => format!("{f:?}"),
            Literal::Float(_) => String::from("NULL"),
            Literal::Text(s) => quote(s),
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Literal::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Single-quotes a string, doubling any embedded single quote.
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Renders a value list the way the target engine reads a tuple: a single
/// element keeps its trailing comma, e.g. `(0,)`.
pub fn tuple(values: &[Literal]) -> String {
    match values {
        [single] => format!("({},)", single.to_sql()),
        _ => {
            let rendered: Vec<String> = values.iter().map(Literal::to_sql).collect();
            format!("({})", rendered.join(", "))
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Integer(i)
    }
}
impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}
impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(String::from(s))
    }
}
impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

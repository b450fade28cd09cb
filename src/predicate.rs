//! Predicate records and the builder that derives them from label selections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::catalog::Catalog;
use crate::error::{Result, SelectorError};
use crate::literal::Literal;
use crate::table::TableRef;

/// Every operator a filter may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Gt,
    Ge,
    Eq,
    Le,
    Lt,
    Or,
    Between,
    RankAsc,
    RankDesc,
    In,
    NotIn,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "=",
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::Or => "OR",
            Operator::Between => "between",
            Operator::RankAsc => "rank_asc",
            Operator::RankDesc => "rank_desc",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
        }
    }
    /// Operators that act on a set of alternatives rather than on one value.
    pub fn takes_set(&self) -> bool {
        matches!(self, Operator::Or | Operator::In | Operator::NotIn)
    }
}

impl FromStr for Operator {
    type Err = SelectorError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "=" => Ok(Operator::Eq),
            "<=" => Ok(Operator::Le),
            "<" => Ok(Operator::Lt),
            "OR" => Ok(Operator::Or),
            "between" => Ok(Operator::Between),
            "rank_asc" => Ok(Operator::RankAsc),
            "rank_desc" => Ok(Operator::RankDesc),
            "IN" => Ok(Operator::In),
            "NOT IN" => Ok(Operator::NotIn),
            other => Err(SelectorError::InvalidOperator(String::from(other))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Operator {
    type Error = SelectorError;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        String::from(operator.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Ge,
    Eq,
    Le,
    Lt,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "=",
            Comparison::Le => "<=",
            Comparison::Lt => "<",
        }
    }
}

/// An operator together with the value shape it requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare(Comparison, Literal),
    /// Pre-rendered boolean expressions, any of which may hold.
    Or(Vec<String>),
    Between(Literal, Literal),
    /// Keep rows ranked within the first `n` in ascending order.
    RankAsc(u64),
    RankDesc(u64),
    In(Vec<Literal>),
    NotIn(Vec<Literal>),
}

impl Condition {
    /// Checks that `values` has the shape `operator` needs.
    pub fn from_values(operator: Operator, values: Vec<Literal>) -> Result<Self> {
        let invalid = |message: String| SelectorError::InvalidOperand {
            operator: String::from(operator.as_str()),
            message,
        };
        let compare = |comparison: Comparison, values: Vec<Literal>| -> Result<Self> {
            let [value]: [Literal; 1] = values
                .try_into()
                .map_err(|v: Vec<Literal>| invalid(format!("expected one value, got {}", v.len())))?;
            Ok(Condition::Compare(comparison, value))
        };
        match operator {
            Operator::Gt => compare(Comparison::Gt, values),
            Operator::Ge => compare(Comparison::Ge, values),
            Operator::Eq => compare(Comparison::Eq, values),
            Operator::Le => compare(Comparison::Le, values),
            Operator::Lt => compare(Comparison::Lt, values),
            Operator::Or => values
                .into_iter()
                .map(|v| match v {
                    Literal::Text(expression) => Ok(expression),
                    other => Err(invalid(format!("{other} is not a boolean expression"))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Condition::Or),
            Operator::Between => {
                let [low, high]: [Literal; 2] = values
                    .try_into()
                    .map_err(|v: Vec<Literal>| invalid(format!("expected two bounds, got {}", v.len())))?;
                Ok(Condition::Between(low, high))
            }
            Operator::RankAsc | Operator::RankDesc => {
                let limit = match values.as_slice() {
                    [Literal::Integer(n)] if *n >= 0 => *n as u64,
                    _ => return Err(invalid(String::from("expected a single non-negative integer limit"))),
                };
                Ok(if operator == Operator::RankAsc {
                    Condition::RankAsc(limit)
                } else {
                    Condition::RankDesc(limit)
                })
            }
            Operator::In => Ok(Condition::In(values)),
            Operator::NotIn => Ok(Condition::NotIn(values)),
        }
    }
    pub fn operator(&self) -> Operator {
        match self {
            Condition::Compare(Comparison::Gt, _) => Operator::Gt,
            Condition::Compare(Comparison::Ge, _) => Operator::Ge,
            Condition::Compare(Comparison::Eq, _) => Operator::Eq,
            Condition::Compare(Comparison::Le, _) => Operator::Le,
            Condition::Compare(Comparison::Lt, _) => Operator::Lt,
            Condition::Or(_) => Operator::Or,
            Condition::Between(..) => Operator::Between,
            Condition::RankAsc(_) => Operator::RankAsc,
            Condition::RankDesc(_) => Operator::RankDesc,
            Condition::In(_) => Operator::In,
            Condition::NotIn(_) => Operator::NotIn,
        }
    }
}

/// One constraint of the compiled query and the table it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    column: Option<String>,
    condition: Condition,
    table: TableRef,
}

impl Predicate {
    /// `column` is qualified with the bare table name. Only `OR` conditions,
    /// which carry complete expressions, may go without a column.
    pub fn new(table: TableRef, column: Option<&str>, condition: Condition) -> Result<Self> {
        let column = match column {
            Some(column) => Some(table.qualify(column)),
            None if matches!(condition, Condition::Or(_)) => None,
            None => {
                return Err(SelectorError::InvalidOperand {
                    operator: String::from(condition.operator().as_str()),
                    message: format!("a column is required for table {}", table.name()),
                });
            }
        };
        Ok(Self { column, condition, table })
    }
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
    pub fn operator(&self) -> Operator {
        self.condition.operator()
    }
    pub fn table(&self) -> &TableRef {
        &self.table
    }
}

/// Builds the predicate for one filter dimension.
///
/// Selecting every label of `catalog` constrains nothing, so no predicate is
/// returned. Labels the catalog does not know are skipped with a warning;
/// validating the selection is up to the caller.
pub fn build(
    selection: &[String],
    catalog: &Catalog,
    table: &TableRef,
    column: Option<&str>,
    operator: Operator,
) -> Result<Option<Predicate>> {
    if catalog.covers(selection) {
        trace!(table = table.name(), "all options selected, no predicate");
        return Ok(None);
    }
    let mut values: Vec<Literal> = Vec::with_capacity(selection.len());
    for label in selection {
        match catalog.value(label) {
            Some(value) if !values.contains(value) => values.push(value.clone()),
            Some(_) => (),
            None => warn!(%label, table = table.name(), "label not in catalog, skipped"),
        }
    }
    let condition = Condition::from_values(operator, values)?;
    Predicate::new(table.clone(), column, condition).map(Some)
}

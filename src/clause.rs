//! Renders predicates to boolean SQL and splits them between the WHERE and
//! QUALIFY stages of the query.

use crate::literal::tuple;
use crate::predicate::{Condition, Predicate};

/// What an empty clause renders as, so the template always stays valid.
pub const TAUTOLOGY: &str = "1 = 1";
const CONTRADICTION: &str = "1 = 0";

/// Per-date ranking macro of the execution engine.
pub const RANK_FUNCTION: &str = "c_rank";

const CLAUSE_SEPARATOR: &str = "\n    AND ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Evaluated on the raw rows, before any ranking.
    Where,
    /// Evaluated after window functions such as rankings are computed.
    Qualify,
}

/// Rankings are filtered after the window is computed, everything else before.
pub fn stage(condition: &Condition) -> Stage {
    match condition {
        Condition::RankAsc(_) | Condition::RankDesc(_) => Stage::Qualify,
        _ => Stage::Where,
    }
}

pub fn render(predicate: &Predicate) -> String {
    let column = predicate.column().unwrap_or_default();
    match predicate.condition() {
        Condition::Compare(comparison, value) => {
            format!("{} {} {}", column, comparison.as_str(), value.to_sql())
        }
        Condition::Or(expressions) if expressions.is_empty() => String::from(CONTRADICTION),
        Condition::Or(expressions) => format!("({})", expressions.join(" OR ")),
        Condition::Between(low, high) => {
            format!("{} BETWEEN {} AND {}", column, low.to_sql(), high.to_sql())
        }
        Condition::RankAsc(limit) => format!("{RANK_FUNCTION}({column}) <= {limit}"),
        Condition::RankDesc(limit) => format!("{RANK_FUNCTION}(-1 * {column}) <= {limit}"),
        Condition::In(values) if values.is_empty() => String::from(CONTRADICTION),
        Condition::In(values) => format!("{} IN {}", column, tuple(values)),
        Condition::NotIn(values) if values.is_empty() => String::from(TAUTOLOGY),
        Condition::NotIn(values) => format!("{} NOT IN {}", column, tuple(values)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clauses {
    pub where_clause: String,
    pub qualify_clause: String,
}

pub fn classify(predicates: &[Predicate]) -> Clauses {
    let mut where_filters = Vec::new();
    let mut qualify_filters = Vec::new();
    for predicate in predicates {
        let rendered = render(predicate);
        match stage(predicate.condition()) {
            Stage::Where => where_filters.push(rendered),
            Stage::Qualify => qualify_filters.push(rendered),
        }
    }
    Clauses {
        where_clause: conjunction(&where_filters),
        qualify_clause: conjunction(&qualify_filters),
    }
}

fn conjunction(filters: &[String]) -> String {
    if filters.is_empty() {
        String::from(TAUTOLOGY)
    } else {
        filters.join(CLAUSE_SEPARATOR)
    }
}

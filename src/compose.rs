use crate::subquery::{generate_table_id, Materialized};

/// Names involved in joining the filter query onto a base query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub base_table_id: String,
    pub filter_table_id: String,
    /// Statements that have to run before the final SELECT.
    pub preamble: Vec<String>,
}

/// Joins `filter_sql`, wrapped as a CTE named `filter_table_id`, onto the
/// base table. The inner join keeps only rows present on both sides.
pub fn compose_with_id(base: &Materialized, filter_sql: &str, filter_table_id: &str) -> String {
    format!(
        "{preamble}
WITH {filter_table_id} AS (
{filter_sql}
)
SELECT
    {base_table_id}.*
FROM {base_table_id}
JOIN {filter_table_id} USING(date, instrument)
",
        preamble = base.preamble(),
        base_table_id = base.table_id,
    )
}

/// Like [`compose_with_id`] with a freshly generated CTE name.
pub fn compose(base: Materialized, filter_sql: &str) -> (String, Composition) {
    let filter_table_id = generate_table_id();
    let sql = compose_with_id(&base, filter_sql, &filter_table_id);
    let composition = Composition {
        base_table_id: base.table_id,
        filter_table_id,
        preamble: base.statements,
    };
    (sql, composition)
}

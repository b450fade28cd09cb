use crate::clause::Clauses;
use crate::table::render_tables;

/// Fills the selection template. Rows always come out ordered by (date, instrument).
pub fn assemble(tables: &[String], clauses: &Clauses) -> String {
    format!(
        "
SELECT
    date,
    instrument
FROM
    {tables}
WHERE
    {where_filters}
QUALIFY
    {qualify_filters}
ORDER BY date, instrument
",
        tables = render_tables(tables),
        where_filters = clauses.where_clause,
        qualify_filters = clauses.qualify_clause,
    )
}

//! Entry point tying the stages together:
//! selections → predicates → clauses + tables → SELECT → optional composition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::FilterCatalog;
use crate::clause::classify;
use crate::compose::{compose, Composition};
use crate::error::{Result, SelectorError};
use crate::literal::Literal;
use crate::predicate::{self, Comparison, Condition, Predicate};
use crate::query::assemble;
use crate::subquery::{materialize, BaseQuery};
use crate::table::resolve;

/// What the user picked. Dimensions missing from `selections` keep their
/// default, which is every option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selections: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub drop_suspended: bool,
    #[serde(default)]
    pub base_query: Option<BaseQuery>,
}

impl SelectionRequest {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn select<I, S>(mut self, dimension: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(String::from(dimension), labels.into_iter().map(Into::into).collect());
        self
    }
    pub fn drop_suspended(mut self, drop_suspended: bool) -> Self {
        self.drop_suspended = drop_suspended;
        self
    }
    pub fn base_query(mut self, base_query: BaseQuery) -> Self {
        self.base_query = Some(base_query);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub sql: String,
    /// Present when the filter was applied on top of a base query.
    pub composition: Option<Composition>,
}

impl CompiledQuery {
    /// The `{"sql": ...}` document handed to downstream modules.
    pub fn to_document(&self) -> Value {
        json!({ "sql": self.sql })
    }
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }
}

pub struct Compiler<'a> {
    catalog: &'a FilterCatalog,
}

impl<'a> Compiler<'a> {
    pub fn new(catalog: &'a FilterCatalog) -> Self {
        Self { catalog }
    }

    /// One predicate per constrained dimension, in catalog order, followed by
    /// the suspension filter when requested.
    pub fn build_predicates(&self, request: &SelectionRequest) -> Result<Vec<Predicate>> {
        if let Some(unknown) = request
            .selections
            .keys()
            .find(|name| self.catalog.dimension(name).is_none())
        {
            return Err(SelectorError::UnknownDimension(unknown.clone()));
        }
        let mut predicates = Vec::new();
        for dimension in &self.catalog.dimensions {
            let Some(selection) = request.selections.get(&dimension.name) else {
                continue;
            };
            let built = predicate::build(
                selection,
                &dimension.options,
                &dimension.table,
                dimension.column.as_deref(),
                dimension.operator,
            )?;
            predicates.extend(built);
        }
        if request.drop_suspended {
            let suspension = &self.catalog.suspension;
            predicates.push(Predicate::new(
                suspension.table.clone(),
                Some(&suspension.column),
                Condition::Compare(Comparison::Eq, Literal::Integer(0)),
            )?);
        }
        Ok(predicates)
    }

    /// The standalone selection query, without any base query.
    pub fn filter_sql(&self, request: &SelectionRequest) -> Result<String> {
        let predicates = self.build_predicates(request)?;
        let clauses = classify(&predicates);
        let tables = resolve(&self.catalog.primary_table, &predicates);
        debug!(predicates = predicates.len(), tables = tables.len(), "assembled selection query");
        Ok(assemble(&tables, &clauses))
    }

    pub fn compile(&self, request: &SelectionRequest) -> Result<CompiledQuery> {
        let filter_sql = self.filter_sql(request)?;
        match &request.base_query {
            None => Ok(CompiledQuery { sql: filter_sql, composition: None }),
            Some(base_query) => {
                let base = materialize(base_query)?;
                let (sql, composition) = compose(base, &filter_sql);
                debug!(
                    base_table_id = %composition.base_table_id,
                    filter_table_id = %composition.filter_table_id,
                    "joined selection onto base query"
                );
                Ok(CompiledQuery { sql, composition: Some(composition) })
            }
        }
    }
}

//! Stock selector – compiles A-share basic stock selection filters into SQL.
//!
//! A selection is a set of labels per filter dimension (exchange, listing
//! board, index membership, ST status, margin trading eligibility, SW2021
//! industry) plus a "drop suspended" flag. The compiler turns it into one
//! query returning the qualifying `(date, instrument)` pairs:
//!
//! ```sql
//! SELECT date, instrument
//! FROM cn_stock_bar1d JOIN cn_stock_status USING(date, instrument)
//! WHERE cn_stock_status.st_status IN (0,)
//! QUALIFY 1 = 1
//! ORDER BY date, instrument
//! ```
//!
//! Optionally the result is joined onto an upstream base query, which is
//! first materialized as a temporary table.
//!
//! ## Modules
//! * [`literal`] – SQL literals and the single quoting function.
//! * [`catalog`] – Ordered option catalogs and the filter catalog describing
//!   which table, column and operator each dimension uses.
//! * [`predicate`] – Operators, conditions and the predicate builder. A
//!   dimension whose every option is selected yields no predicate.
//! * [`clause`] – Rendering of predicates and their split into WHERE and
//!   QUALIFY (rankings) clauses.
//! * [`table`] – Table references and the join list resolver.
//! * [`query`] – The SELECT template.
//! * [`subquery`] – Splitting and materializing an upstream query.
//! * [`compose`] – Joining the selection onto the materialized base table.
//! * [`compiler`] – [`compiler::Compiler`], the entry point.
//! * [`settings`] / [`server`] – The HTTP service around the compiler.
//!
//! ## Quick Start
//! ```
//! use stock_selector::{catalog::FilterCatalog, compiler::{Compiler, SelectionRequest}};
//! let catalog = FilterCatalog::cn_stock().unwrap();
//! let compiler = Compiler::new(&catalog);
//! let request = SelectionRequest::new().select("st_statuses", ["正常"]);
//! let compiled = compiler.compile(&request).unwrap();
//! assert!(compiled.sql.contains("cn_stock_status.st_status IN (0,)"));
//! ```
//!
//! The target engine has to support `QUALIFY`, the `c_rank` ranking macro and
//! `USING(...)` joins. Nothing here executes SQL.

pub mod catalog;
pub mod clause;
pub mod compiler;
pub mod compose;
pub mod error;
pub mod literal;
pub mod predicate;
pub mod query;
pub mod server;
pub mod settings;
pub mod subquery;
pub mod table;

pub use error::{Result, SelectorError};

//! Option catalogs: the fixed, ordered label → value mappings each filter
//! dimension offers, and the filter catalog tying them to tables and columns.
//!
//! Catalogs are plain immutable data. They are built once at start (either
//! [`FilterCatalog::cn_stock`] or a JSON file through [`FilterCatalog::load`])
//! and lent to the compiler by reference.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SelectorError};
use crate::literal::Literal;
use crate::predicate::Operator;
use crate::table::{is_identifier, TableRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    pub value: Literal,
}

/// Ordered label → stored value mapping for one filter dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Labels must be unique; their order is the display order.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut labels = HashSet::new();
        for entry in &entries {
            if !labels.insert(entry.label.as_str()) {
                return Err(SelectorError::Catalog(format!("duplicate label '{}'", entry.label)));
            }
        }
        Ok(Self { entries })
    }
    pub fn from_pairs<L, V, I>(pairs: I) -> Result<Self>
    where
        L: Into<String>,
        V: Into<Literal>,
        I: IntoIterator<Item = (L, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, value)| CatalogEntry { label: label.into(), value: value.into() })
                .collect(),
        )
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
    pub fn value(&self, label: &str) -> Option<&Literal> {
        self.entries.iter().find(|e| e.label == label).map(|e| &e.value)
    }
    /// True when `selection`, taken as a set, is exactly the set of labels.
    pub fn covers(&self, selection: &[String]) -> bool {
        let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();
        let labels: HashSet<&str> = self.labels().collect();
        selected == labels
    }
}

impl TryFrom<Vec<CatalogEntry>> for Catalog {
    type Error = SelectorError;
    fn try_from(entries: Vec<CatalogEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<Catalog> for Vec<CatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries
    }
}

/// One user-facing filter: the options offered and where they apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDimension {
    /// Key used in selection requests, e.g. `st_statuses`.
    pub name: String,
    /// Display title of the choice widget.
    pub title: String,
    pub table: TableRef,
    #[serde(default)]
    pub column: Option<String>,
    pub operator: Operator,
    pub options: Catalog,
}

impl FilterDimension {
    pub fn new(
        name: &str,
        title: &str,
        table: &str,
        column: Option<&str>,
        operator: Operator,
        options: Catalog,
    ) -> Result<Self> {
        Ok(Self {
            name: String::from(name),
            title: String::from(title),
            table: TableRef::parse(table)?,
            column: column.map(String::from),
            operator,
            options,
        })
    }
    /// All labels, i.e. the default selection.
    pub fn all_labels(&self) -> Vec<String> {
        self.options.labels().map(String::from).collect()
    }
}

/// Column holding the per-day suspension flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspensionFilter {
    pub table: TableRef,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCatalog {
    /// The time-series bar table every query starts from.
    pub primary_table: String,
    pub dimensions: Vec<FilterDimension>,
    pub suspension: SuspensionFilter,
}

impl FilterCatalog {
    pub fn dimension(&self, name: &str) -> Option<&FilterDimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.primary_table) {
            return Err(SelectorError::Catalog(format!(
                "'{}' is not a valid primary table",
                self.primary_table
            )));
        }
        let mut names = HashSet::new();
        for dimension in &self.dimensions {
            if !names.insert(dimension.name.as_str()) {
                return Err(SelectorError::Catalog(format!("duplicate dimension '{}'", dimension.name)));
            }
            match &dimension.column {
                Some(column) if !is_identifier(column) => {
                    return Err(SelectorError::Catalog(format!(
                        "'{column}' is not a valid column of dimension {}",
                        dimension.name
                    )));
                }
                None if dimension.operator != Operator::Or => {
                    return Err(SelectorError::Catalog(format!(
                        "dimension {} needs a column for operator {}",
                        dimension.name, dimension.operator
                    )));
                }
                _ => (),
            }
            if !dimension.operator.takes_set() {
                return Err(SelectorError::Catalog(format!(
                    "dimension {} uses {}, which cannot test a set of options",
                    dimension.name, dimension.operator
                )));
            }
        }
        if !is_identifier(&self.suspension.column) {
            return Err(SelectorError::Catalog(format!(
                "'{}' is not a valid suspension column",
                self.suspension.column
            )));
        }
        Ok(())
    }

    /// Reads a catalog from a JSON file and validates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SelectorError::Catalog(format!("cannot read {}: {e}", path.display())))?;
        let catalog: FilterCatalog = serde_json::from_str(&text)
            .map_err(|e| SelectorError::Catalog(format!("cannot parse {}: {e}", path.display())))?;
        catalog.validate()?;
        info!(path = %path.display(), dimensions = catalog.dimensions.len(), "loaded filter catalog");
        Ok(catalog)
    }

    /// The A-share basic stock selection catalog.
    pub fn cn_stock() -> Result<Self> {
        let exchanges = Catalog::from_pairs([
            ("上交所", "cn_stock_bar1d.instrument LIKE '%.SH'"),
            ("深交所", "cn_stock_bar1d.instrument LIKE '%.SZ'"),
            ("北交所", "cn_stock_bar1d.instrument LIKE '%.BJ'"),
        ])?;
        let list_sectors = Catalog::from_pairs([
            ("主板", 1i64),
            ("创业板", 2),
            ("科创板", 3),
            ("北交所", 4),
        ])?;
        let indexes = Catalog::from_pairs([
            ("中证500", "cn_stock_factors_base.is_zz500 == 1"),
            ("上证指数", "cn_stock_factors_base.is_szzs == 1"),
            ("创业板指", "cn_stock_factors_base.is_cybz == 1"),
            ("深证成指", "cn_stock_factors_base.is_szcz == 1"),
            ("北证50", "cn_stock_factors_base.is_bz50 == 1"),
            ("上证50", "cn_stock_factors_base.is_sh50 == 1"),
            ("科创50", "cn_stock_factors_base.is_kc50 == 1"),
            ("沪深300", "cn_stock_factors_base.is_hs300 == 1"),
            ("中证1000", "cn_stock_factors_base.is_zz1000 == 1"),
            ("中证100", "cn_stock_factors_base.is_zz100 == 1"),
            ("深证100", "cn_stock_factors_base.is_sz100 == 1"),
        ])?;
        let st_statuses = Catalog::from_pairs([("正常", 0i64), ("ST", 1), ("*ST", 2)])?;
        let margin_tradings = Catalog::from_pairs([("两融标的", 1i64), ("非两融标的", 0)])?;
        let sw2021_industries = Catalog::from_pairs([
            ("农林牧渔", "110000"),
            ("采掘", "210000"),
            ("基础化工", "220000"),
            ("钢铁", "230000"),
            ("有色金属", "240000"),
            ("建筑建材", "250000"),
            ("机械设备", "640000"),
            ("电子", "270000"),
            ("汽车", "280000"),
            ("交运设备", "310000"),
            ("信息设备", "320000"),
            ("家用电器", "330000"),
            ("食品饮料", "340000"),
            ("纺织服饰", "350000"),
            ("轻工制造", "360000"),
            ("医药生物", "370000"),
            ("公用事业", "410000"),
            ("交通运输", "420000"),
            ("房地产", "430000"),
            ("金融服务", "440000"),
            ("商贸零售", "450000"),
            ("社会服务", "460000"),
            ("信息服务", "470000"),
            ("银行", "480000"),
            ("非银金融", "490000"),
            ("综合", "510000"),
            ("建筑材料", "610000"),
            ("建筑装饰", "620000"),
            ("电力设备", "630000"),
            ("国防军工", "650000"),
            ("计算机", "710000"),
            ("传媒", "720000"),
            ("通信", "730000"),
            ("煤炭", "740000"),
            ("石油石化", "750000"),
            ("环保", "760000"),
            ("美容护理", "770000"),
        ])?;

        let catalog = Self {
            primary_table: String::from("cn_stock_bar1d"),
            dimensions: vec![
                FilterDimension::new("exchanges", "交易所", "cn_stock_bar1d", None, Operator::Or, exchanges)?,
                FilterDimension::new(
                    "list_sectors",
                    "上市板块",
                    "cn_stock_basic_info USING (instrument)",
                    Some("list_sector"),
                    Operator::In,
                    list_sectors,
                )?,
                FilterDimension::new("indexes", "指数成分", "cn_stock_factors_base", None, Operator::Or, indexes)?,
                FilterDimension::new(
                    "st_statuses",
                    "ST状态",
                    "cn_stock_status",
                    Some("st_status"),
                    Operator::In,
                    st_statuses,
                )?,
                FilterDimension::new(
                    "margin_tradings",
                    "融资融券",
                    "cn_stock_factors_base",
                    Some("margin_trading_status"),
                    Operator::In,
                    margin_tradings,
                )?,
                FilterDimension::new(
                    "sw2021_industries",
                    "行业/申万2021",
                    "cn_stock_factors_base",
                    Some("sw2021_level1"),
                    Operator::In,
                    sw2021_industries,
                )?,
            ],
            suspension: SuspensionFilter {
                table: TableRef::parse("cn_stock_factors_base")?,
                column: String::from("suspended"),
            },
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

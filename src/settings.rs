//! Service settings, read from an optional `stock_selector.*` file and
//! `STOCK_SELECTOR__`-prefixed environment variables (e.g.
//! `STOCK_SELECTOR__SERVER__ADDRESS=0.0.0.0:8720`).

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::catalog::FilterCatalog;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON file replacing the built-in A-share catalog.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from("stock_selector")
    }

    /// `basename` is looked up with any extension the `config` crate knows.
    pub fn load_from(basename: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.address", "127.0.0.1:8720")?
            .set_default("log.filter", "info")?
            .add_source(File::with_name(basename).required(false))
            .add_source(Environment::with_prefix("STOCK_SELECTOR").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The configured catalog, or the built-in one.
    pub fn filter_catalog(&self) -> Result<FilterCatalog> {
        match &self.catalog.path {
            Some(path) => FilterCatalog::load(path),
            None => FilterCatalog::cn_stock(),
        }
    }
}

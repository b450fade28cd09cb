use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),
    #[error("Invalid operand for {operator}: {message}")]
    InvalidOperand { operator: String, message: String },
    #[error("Materialization error: {message}")]
    Materialization { message: String },
    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Document error: {0}")]
    Document(String),
}

impl SelectorError {
    /// True for errors caused by what the caller sent rather than by the deployment.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperator(_)
                | Self::InvalidOperand { .. }
                | Self::Materialization { .. }
                | Self::UnknownDimension(_)
                | Self::Document(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SelectorError>;

// Helper conversions
impl From<serde_json::Error> for SelectorError {
    fn from(e: serde_json::Error) -> Self { Self::Document(e.to_string()) }
}
impl From<config::ConfigError> for SelectorError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

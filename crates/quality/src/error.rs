use serde::Serialize;
use thiserror::Error;

/// Run-level failures. Any of these aborts the run; no partial report is produced.
#[derive(Debug, Error)]
pub enum QualityError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (threshold out of range, unknown rule, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// The dataset could not be read or decoded.
    #[error("dataset load error: {0}")]
    DatasetLoad(String),
}

/// Per-group failures. Recovered locally: the group is forced to LOW and kept
/// in the report.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupError {
    #[error("invalid group: {count} product(s), at least 2 required")]
    TooFewProducts { count: usize },
    #[error("invalid group: product {position} has no title")]
    MissingTitle { position: usize },
    #[error("invalid group: product {position} has no usable price")]
    MissingPrice { position: usize },
    #[error("invalid price {price} at product {position}: prices must be positive")]
    InvalidPrice { position: usize, price: f64 },
}

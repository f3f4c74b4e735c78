use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid asset key: {0:?}")]
    InvalidAssetKey(String),
    #[error("record is missing the key field '{field}'")]
    MissingKeyField { field: String },
    #[error("key field '{field}' must be a text or number value")]
    InvalidKeyValue { field: String },
    #[error("comparison item {id} has no record on either side")]
    EmptyComparison { id: String },
    #[error("comparison item {id} is inconsistent: {reason}")]
    InconsistentComparison { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;

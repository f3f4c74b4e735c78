use serde::{Deserialize, Serialize};

use bim_model::KEY_FIELD;

/// Options for reading asset sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Column holding the business key. Renamed to `codigoEquipo` on load.
    pub key_column: String,
    /// Turn numeric and boolean CSV cells into typed values.
    pub infer_values: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            key_column: KEY_FIELD.to_string(),
            infer_values: true,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    #[must_use]
    pub fn with_infer_values(mut self, enable: bool) -> Self {
        self.infer_values = enable;
        self
    }
}

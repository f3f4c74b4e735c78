//! Sync configuration file.
//!
//! ```json
//! {
//!   "compare": { "equality": "normalized", "ignored_fields": ["id"] },
//!   "ingest": { "key_column": "codigoEquipo", "infer_values": true },
//!   "user": "ana"
//! }
//! ```
//!
//! Every section is optional. Command-line flags override file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bim_ingest::IngestOptions;
use bim_model::{CompareOptions, EqualityPolicy};

/// User recorded when neither the config nor the command line names one.
pub const DEFAULT_USER: &str = "bim-sync";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub compare: CompareOptions,
    pub ingest: IngestOptions,
    pub user: Option<String>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub normalized: bool,
    pub ignore_fields: Vec<String>,
    pub key_column: Option<String>,
    pub user: Option<String>,
}

impl SyncConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Load `path` when given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.normalized {
            self.compare.equality = EqualityPolicy::Normalized;
        }
        self.compare.ignored_fields.extend(overrides.ignore_fields);
        if let Some(column) = overrides.key_column {
            self.ingest.key_column = column;
        }
        if overrides.user.is_some() {
            self.user = overrides.user;
        }
        self
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }
}

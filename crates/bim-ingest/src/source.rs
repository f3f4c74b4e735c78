//! Async record sources for the sync workflow.
//!
//! The workflow only ever awaits one load at a time; sources are free to do
//! blocking work as long as it happens off the async runtime.

use std::future::Future;
use std::path::PathBuf;

use bim_model::AssetRecord;

use crate::error::{IngestError, Result};
use crate::load::load_records;
use crate::options::IngestOptions;

/// Supplies one side of a reconciliation.
pub trait AssetSource: Send + Sync {
    /// Short description of where records come from, for logs and messages.
    fn describe(&self) -> String;

    /// Load the full collection.
    fn load(&self) -> impl Future<Output = Result<Vec<AssetRecord>>> + Send;
}

/// Load an asset file on the blocking thread pool.
pub async fn load_records_async(path: PathBuf, options: IngestOptions) -> Result<Vec<AssetRecord>> {
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || load_records(&task_path, &options))
        .await
        .map_err(|e| IngestError::TaskFailed {
            path,
            message: e.to_string(),
        })?
}

/// CSV or JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    path: PathBuf,
    options: IngestOptions,
}

impl FileAssetSource {
    pub fn new(path: impl Into<PathBuf>, options: IngestOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl AssetSource for FileAssetSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> impl Future<Output = Result<Vec<AssetRecord>>> + Send {
        load_records_async(self.path.clone(), self.options.clone())
    }
}

/// Records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetSource {
    label: String,
    records: Vec<AssetRecord>,
}

impl StaticAssetSource {
    pub fn new(label: impl Into<String>, records: Vec<AssetRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }
}

impl AssetSource for StaticAssetSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> impl Future<Output = Result<Vec<AssetRecord>>> + Send {
        let records = self.records.clone();
        async move { Ok(records) }
    }
}

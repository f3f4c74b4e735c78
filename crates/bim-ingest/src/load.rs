//! Format dispatch for asset files.

use std::path::Path;
use std::time::Instant;

use bim_model::AssetRecord;

use crate::csv_records::read_asset_csv;
use crate::error::{IngestError, Result};
use crate::json_records::read_asset_json;
use crate::options::IngestOptions;

/// Supported asset file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Csv,
    Json,
}

impl AssetFormat {
    /// Detect format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(AssetFormat::Csv),
            Some("json") => Ok(AssetFormat::Json),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load every record from a CSV or JSON asset file.
///
/// Blocking; async callers go through [`crate::load_records_async`].
pub fn load_records(path: &Path, options: &IngestOptions) -> Result<Vec<AssetRecord>> {
    let format = AssetFormat::from_path(path)?;
    let start = Instant::now();
    let records = match format {
        AssetFormat::Csv => read_asset_csv(path, options)?,
        AssetFormat::Json => read_asset_json(path, options)?,
    };
    tracing::debug!(
        path = %path.display(),
        format = ?format,
        record_count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "loaded asset records"
    );
    Ok(records)
}

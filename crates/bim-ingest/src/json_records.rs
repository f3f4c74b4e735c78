//! JSON asset exports: an array of flat objects.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bim_model::{AssetRecord, FieldValue};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

pub fn read_asset_json(path: &Path, options: &IngestOptions) -> Result<Vec<AssetRecord>> {
    let text = fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    parse_asset_json(&text, path, options)
}

pub fn parse_asset_json(
    text: &str,
    path: &Path,
    options: &IngestOptions,
) -> Result<Vec<AssetRecord>> {
    let rows: Vec<BTreeMap<String, FieldValue>> =
        serde_json::from_str(text).map_err(|source| IngestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    rows.into_iter()
        .enumerate()
        .map(|(index, mut fields)| {
            if let Some(key) = fields.remove(&options.key_column) {
                fields.insert(bim_model::KEY_FIELD.to_string(), key);
            }
            AssetRecord::from_fields(fields, bim_model::KEY_FIELD).map_err(|source| {
                IngestError::InvalidRow {
                    path: path.to_path_buf(),
                    row: index + 1,
                    source,
                }
            })
        })
        .collect()
}

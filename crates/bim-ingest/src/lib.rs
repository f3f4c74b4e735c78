//! Asset record ingestion.
//!
//! Reads PIM asset sheets and Maximo exports (CSV or JSON) into
//! [`bim_model::AssetRecord`] collections, and exposes them to the sync
//! workflow through the async [`AssetSource`] trait.

pub mod csv_records;
pub mod error;
pub mod json_records;
pub mod load;
pub mod options;
pub mod source;

pub use csv_records::{infer_value, parse_asset_csv, read_asset_csv};
pub use error::{IngestError, Result};
pub use json_records::{parse_asset_json, read_asset_json};
pub use load::{AssetFormat, load_records};
pub use options::IngestOptions;
pub use source::{AssetSource, FileAssetSource, StaticAssetSource, load_records_async};

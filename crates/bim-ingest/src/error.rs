//! Error types for asset record ingestion.

use std::path::PathBuf;
use thiserror::Error;

use bim_model::ModelError;

/// Errors that can occur while loading asset records.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("asset file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not name a supported format.
    #[error("unsupported asset file format for {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// UTF-16 and other non UTF-8 encodings are rejected.
    #[error("unsupported encoding {encoding} in {path} (only UTF-8 is supported)")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Required column not present in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A row could not be turned into a record.
    #[error("invalid record at row {row} in {path}: {source}")]
    InvalidRow {
        path: PathBuf,
        row: usize,
        #[source]
        source: ModelError,
    },

    // === JSON Errors ===
    /// JSON document is not an array of flat asset objects.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Async Errors ===
    /// The blocking load task panicked or was cancelled.
    #[error("load task for {path} did not complete: {message}")]
    TaskFailed { path: PathBuf, message: String },
}

impl IngestError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

//! CSV asset sheet reading.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use bim_model::{AssetRecord, FieldValue, KEY_FIELD};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Plain decimal notation only: no exponents, no `inf`/`nan`, and no leading
/// zeros so that codes like `0012` stay text.
fn looks_numeric(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || digits.starts_with('.') || digits.ends_with('.') {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return false;
    }
    let mut seen_dot = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}

/// Infer a typed value from a non-empty CSV cell.
pub fn infer_value(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return FieldValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return FieldValue::Bool(false);
    }
    if looks_numeric(trimmed)
        && let Ok(number) = trimmed.parse::<f64>()
        && number.is_finite()
    {
        return FieldValue::Number(number);
    }
    FieldValue::Text(trimmed.to_string())
}

/// Reject UTF-16 files up front; a UTF-8 BOM is accepted and stripped.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::read(path, e))?;
    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Read an asset sheet exported as CSV.
pub fn read_asset_csv(path: &Path, options: &IngestOptions) -> Result<Vec<AssetRecord>> {
    validate_encoding(path)?;
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    parse_asset_csv(file, path, options)
}

/// Parse CSV content into asset records. `path` is only used in errors.
///
/// The first row is the header. Empty cells are left out of the record, and
/// rows where every cell is empty are skipped.
pub fn parse_asset_csv<R: Read>(
    input: R,
    path: &Path,
    options: &IngestOptions,
) -> Result<Vec<AssetRecord>> {
    let csv_error = |error: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let key_index = headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(&options.key_column))
        .ok_or_else(|| IngestError::MissingColumn {
            column: options.key_column.clone(),
            path: path.to_path_buf(),
        })?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        // Header is row 1.
        let row_number = index + 2;
        if row.iter().all(|cell| normalize_cell(cell).is_empty()) {
            continue;
        }
        let mut fields = BTreeMap::new();
        for (column, cell) in headers.iter().zip(row.iter()) {
            let cell = normalize_cell(cell);
            if column.is_empty() || cell.is_empty() || column == &headers[key_index] {
                continue;
            }
            let value = if options.infer_values {
                infer_value(cell)
            } else {
                FieldValue::Text(cell.to_string())
            };
            fields.insert(column.clone(), value);
        }
        let key = row.get(key_index).map(normalize_cell).unwrap_or_default();
        fields.insert(KEY_FIELD.to_string(), FieldValue::Text(key.to_string()));
        let record =
            AssetRecord::from_fields(fields, KEY_FIELD).map_err(|source| IngestError::InvalidRow {
                path: path.to_path_buf(),
                row: row_number,
                source,
            })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_numbers_but_keeps_codes_as_text() {
        assert_eq!(infer_value("1500"), FieldValue::Number(1500.0));
        assert_eq!(infer_value("-2.5"), FieldValue::Number(-2.5));
        assert_eq!(infer_value("0.75"), FieldValue::Number(0.75));
        assert_eq!(infer_value("0"), FieldValue::Number(0.0));
        assert_eq!(infer_value("0012"), FieldValue::from("0012"));
        assert_eq!(infer_value("01_00_01"), FieldValue::from("01_00_01"));
        assert_eq!(infer_value("2021-03-15"), FieldValue::from("2021-03-15"));
        assert_eq!(infer_value("1e5"), FieldValue::from("1e5"));
        assert_eq!(infer_value("NaN"), FieldValue::from("NaN"));
        assert_eq!(infer_value("TRUE"), FieldValue::Bool(true));
    }

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_header("\u{feff} codigo   Equipo "), "codigo Equipo");
    }
}

//! Flat asset records keyed by `codigoEquipo`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::AssetKey;
use crate::value::FieldValue;

/// Attribute name holding the business key.
pub const KEY_FIELD: &str = "codigoEquipo";

/// Attribute name holding the agrupación (attribute sheet) tag.
pub const AGRUPACION_FIELD: &str = "agrupacionMaximo";

/// One physical asset as described by a single data source.
///
/// The key is held apart from the other attributes; serialized form is one
/// flat object with the key under [`KEY_FIELD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, FieldValue>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct AssetRecord {
    pub key: AssetKey,
    pub attributes: BTreeMap<String, FieldValue>,
}

impl AssetRecord {
    pub fn new(key: AssetKey) -> Self {
        Self {
            key,
            attributes: BTreeMap::new(),
        }
    }

    /// Build a record from a flat field map, taking the key from `key_field`.
    pub fn from_fields(
        mut fields: BTreeMap<String, FieldValue>,
        key_field: &str,
    ) -> Result<Self> {
        let raw = fields
            .remove(key_field)
            .ok_or_else(|| ModelError::MissingKeyField {
                field: key_field.to_string(),
            })?;
        let key = match raw {
            FieldValue::Text(text) => AssetKey::new(text)?,
            FieldValue::Number(number) => AssetKey::new(number.to_string())?,
            FieldValue::Null | FieldValue::Bool(_) => {
                return Err(ModelError::InvalidKeyValue {
                    field: key_field.to_string(),
                });
            }
        };
        Ok(Self {
            key,
            attributes: fields,
        })
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.attributes.get(name)
    }

    /// Cell text for a named column, including the key column.
    pub fn field_text(&self, name: &str) -> Option<String> {
        if name == KEY_FIELD {
            return Some(self.key.to_string());
        }
        self.attributes.get(name).map(FieldValue::render)
    }

    pub fn agrupacion(&self) -> Option<&str> {
        self.get(AGRUPACION_FIELD)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for AssetRecord {
    type Error = ModelError;

    fn try_from(fields: BTreeMap<String, FieldValue>) -> Result<Self> {
        Self::from_fields(fields, KEY_FIELD)
    }
}

impl From<AssetRecord> for BTreeMap<String, FieldValue> {
    fn from(record: AssetRecord) -> Self {
        let mut fields = record.attributes;
        fields.insert(KEY_FIELD.to_string(), FieldValue::Text(record.key.into()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump() -> AssetRecord {
        AssetRecord::new(AssetKey::new("EQ-001").unwrap())
            .with("descripcion", "Bomba de calor")
            .with(AGRUPACION_FIELD, "01_00_01")
            .with("precioCompra", 1200.0)
    }

    #[test]
    fn field_text_covers_key_column() {
        let record = pump();
        assert_eq!(record.field_text(KEY_FIELD).as_deref(), Some("EQ-001"));
        assert_eq!(record.field_text("precioCompra").as_deref(), Some("1200"));
        assert_eq!(record.field_text("marca"), None);
        assert_eq!(record.agrupacion(), Some("01_00_01"));
    }

    #[test]
    fn from_fields_requires_key() {
        let mut fields = BTreeMap::new();
        fields.insert("descripcion".to_string(), FieldValue::from("Valve"));
        let error = AssetRecord::from_fields(fields, KEY_FIELD).unwrap_err();
        assert_eq!(
            error,
            ModelError::MissingKeyField {
                field: KEY_FIELD.to_string()
            }
        );
    }

    #[test]
    fn numeric_key_is_accepted() {
        let mut fields = BTreeMap::new();
        fields.insert(KEY_FIELD.to_string(), FieldValue::Number(4021.0));
        let record = AssetRecord::from_fields(fields, KEY_FIELD).unwrap();
        assert_eq!(record.key.as_str(), "4021");
        assert!(record.attributes.is_empty());
    }
}

//! Comparison results produced by the reconciliation engine.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::AssetRecord;
use crate::error::{ModelError, Result};
use crate::ids::AssetKey;

/// Classification of one key after matching PIM against Maximo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    /// Present in PIM only; will be created in Maximo.
    New,
    /// Present in Maximo only; will be removed from Maximo.
    Deleted,
    /// Present on both sides with at least one differing attribute.
    Modified,
    /// Present on both sides with identical attributes.
    Unchanged,
}

impl ComparisonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonStatus::New => "new",
            ComparisonStatus::Deleted => "deleted",
            ComparisonStatus::Modified => "modified",
            ComparisonStatus::Unchanged => "unchanged",
        }
    }

    /// Capitalized form used in exported sheets.
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonStatus::New => "New",
            ComparisonStatus::Deleted => "Deleted",
            ComparisonStatus::Modified => "Modified",
            ComparisonStatus::Unchanged => "Unchanged",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, ComparisonStatus::Unchanged)
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched key with the record from each side.
///
/// Built only through the constructors below, which keep status, sides,
/// keys and `diff_fields` consistent with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComparisonItem")]
pub struct ComparisonItem {
    id: AssetKey,
    status: ComparisonStatus,
    pim: Option<AssetRecord>,
    maximo: Option<AssetRecord>,
    diff_fields: BTreeSet<String>,
}

impl ComparisonItem {
    /// Record present only in the PIM sheets.
    pub fn added(pim: AssetRecord) -> Self {
        Self {
            id: pim.key.clone(),
            status: ComparisonStatus::New,
            pim: Some(pim),
            maximo: None,
            diff_fields: BTreeSet::new(),
        }
    }

    /// Record present only in Maximo.
    pub fn removed(maximo: AssetRecord) -> Self {
        Self {
            id: maximo.key.clone(),
            status: ComparisonStatus::Deleted,
            pim: None,
            maximo: Some(maximo),
            diff_fields: BTreeSet::new(),
        }
    }

    /// Record present on both sides. Status follows `diff_fields`.
    ///
    /// Both records must share one key, and every name in `diff_fields` must
    /// be an attribute of at least one of them.
    pub fn compared(
        pim: AssetRecord,
        maximo: AssetRecord,
        diff_fields: BTreeSet<String>,
    ) -> Result<Self> {
        if pim.key != maximo.key {
            return Err(ModelError::InconsistentComparison {
                id: pim.key.to_string(),
                reason: format!("Maximo record key is {}", maximo.key),
            });
        }
        if let Some(field) = diff_fields
            .iter()
            .find(|field| pim.get(field).is_none() && maximo.get(field).is_none())
        {
            return Err(ModelError::InconsistentComparison {
                id: pim.key.to_string(),
                reason: format!("differing field {field} is on neither record"),
            });
        }
        let status = if diff_fields.is_empty() {
            ComparisonStatus::Unchanged
        } else {
            ComparisonStatus::Modified
        };
        Ok(Self {
            id: pim.key.clone(),
            status,
            pim: Some(pim),
            maximo: Some(maximo),
            diff_fields,
        })
    }

    pub fn id(&self) -> &AssetKey {
        &self.id
    }

    pub fn status(&self) -> ComparisonStatus {
        self.status
    }

    pub fn pim(&self) -> Option<&AssetRecord> {
        self.pim.as_ref()
    }

    pub fn maximo(&self) -> Option<&AssetRecord> {
        self.maximo.as_ref()
    }

    pub fn diff_fields(&self) -> &BTreeSet<String> {
        &self.diff_fields
    }

    pub fn is_change(&self) -> bool {
        self.status.is_change()
    }

    /// The record an export row is built from: PIM is the base, Maximo only
    /// for deletions.
    pub fn base_record(&self) -> Option<&AssetRecord> {
        self.pim.as_ref().or(self.maximo.as_ref())
    }

    /// Agrupación of the PIM record, falling back to Maximo's.
    pub fn agrupacion(&self) -> Option<&str> {
        self.pim
            .as_ref()
            .and_then(AssetRecord::agrupacion)
            .or_else(|| self.maximo.as_ref().and_then(AssetRecord::agrupacion))
    }
}

#[derive(Deserialize)]
struct RawComparisonItem {
    id: AssetKey,
    status: ComparisonStatus,
    pim: Option<AssetRecord>,
    maximo: Option<AssetRecord>,
    #[serde(default)]
    diff_fields: BTreeSet<String>,
}

impl TryFrom<RawComparisonItem> for ComparisonItem {
    type Error = ModelError;

    fn try_from(raw: RawComparisonItem) -> Result<Self> {
        let item = match (raw.pim, raw.maximo) {
            (Some(pim), None) => Self::added(pim),
            (None, Some(maximo)) => Self::removed(maximo),
            (Some(pim), Some(maximo)) => Self::compared(pim, maximo, raw.diff_fields)?,
            (None, None) => {
                return Err(ModelError::EmptyComparison {
                    id: raw.id.to_string(),
                });
            }
        };
        if item.id != raw.id {
            return Err(ModelError::InconsistentComparison {
                id: raw.id.to_string(),
                reason: format!("record key is {}", item.id),
            });
        }
        if item.status != raw.status {
            return Err(ModelError::InconsistentComparison {
                id: raw.id.to_string(),
                reason: format!("status {} does not match its records", raw.status),
            });
        }
        Ok(item)
    }
}

/// Counts of pending changes by kind. Unchanged items are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub new: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl ChangeSummary {
    pub fn record(&mut self, status: ComparisonStatus) {
        match status {
            ComparisonStatus::New => self.new += 1,
            ComparisonStatus::Modified => self.modified += 1,
            ComparisonStatus::Deleted => self.deleted += 1,
            ComparisonStatus::Unchanged => {}
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.modified + self.deleted
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

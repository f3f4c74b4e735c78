//! Sync history entries recorded after changes are sent to Maximo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comparison::{ChangeSummary, ComparisonItem};

/// Which side the sync treated as the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncBase {
    #[default]
    Pim,
    Maximo,
}

/// One completed sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncHistoryEntry {
    /// Millisecond timestamp of the sync; unique within one history.
    pub id: i64,
    pub date: DateTime<Utc>,
    pub user: String,
    pub base: SyncBase,
    /// Counts over `applied_changes` only.
    pub summary: ChangeSummary,
    pub applied_changes: Vec<ComparisonItem>,
    /// Location of the results workbook in the document store.
    pub acc_link: String,
    pub maximo_link: String,
}

impl SyncHistoryEntry {
    /// Build an entry for changes applied at `date`.
    pub fn new(date: DateTime<Utc>, user: impl Into<String>, applied: Vec<ComparisonItem>) -> Self {
        let id = date.timestamp_millis();
        let mut summary = ChangeSummary::default();
        for item in &applied {
            summary.record(item.status());
        }
        Self {
            id,
            date,
            user: user.into(),
            base: SyncBase::Pim,
            summary,
            applied_changes: applied,
            acc_link: format!("ACC/PIM/Maximo_Sync/results_{id}.xlsx"),
            maximo_link: "#".to_string(),
        }
    }
}

//! In-session log of completed syncs, newest first.

use serde::{Deserialize, Serialize};

use bim_model::SyncHistoryEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncHistory {
    entries: Vec<SyncHistoryEntry>,
}

impl SyncHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries loaded from elsewhere; they are expected newest first.
    pub fn from_entries(entries: Vec<SyncHistoryEntry>) -> Self {
        Self { entries }
    }

    /// Prepend an entry. Ids stay unique: an entry stamped in the same
    /// millisecond as an existing one is moved past the newest id.
    pub fn record(&mut self, mut entry: SyncHistoryEntry) -> &SyncHistoryEntry {
        if self.entries.iter().any(|existing| existing.id == entry.id) {
            let next = self
                .entries
                .iter()
                .map(|existing| existing.id)
                .max()
                .unwrap_or(entry.id)
                + 1;
            entry.acc_link = entry
                .acc_link
                .replace(&entry.id.to_string(), &next.to_string());
            entry.id = next;
        }
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn latest(&self) -> Option<&SyncHistoryEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[SyncHistoryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SyncHistoryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    #[test]
    fn same_millisecond_entries_get_distinct_ids() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut history = SyncHistory::new();
        history.record(SyncHistoryEntry::new(date, "a", vec![]));
        let second = history.record(SyncHistoryEntry::new(date, "b", vec![])).clone();

        assert_eq!(history.len(), 2);
        assert_eq!(second.id, date.timestamp_millis() + 1);
        assert!(second.acc_link.ends_with(&format!("results_{}.xlsx", second.id)));
        assert_eq!(history.latest().map(|e| e.user.as_str()), Some("b"));
    }
}

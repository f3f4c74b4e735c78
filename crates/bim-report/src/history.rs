//! Sync history persistence.

use std::path::Path;

use anyhow::{Context, Result};

use bim_model::SyncHistoryEntry;
use bim_reconcile::SyncHistory;

/// Load a history log. A missing file is an empty history.
pub fn load_history(path: &Path) -> Result<SyncHistory> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no history file, starting empty");
        return Ok(SyncHistory::new());
    }
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let entries: Vec<SyncHistoryEntry> =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    Ok(SyncHistory::from_entries(entries))
}

/// Write a history log as pretty JSON, newest entry first.
pub fn save_history(path: &Path, history: &SyncHistory) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(history.entries())?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = history.len(), "history saved");
    Ok(())
}

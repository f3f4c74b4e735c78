use std::path::PathBuf;

use bim_ingest::IngestOptions;
use bim_model::{AssetKey, ChangeSummary, CompareOptions, ComparisonItem, SyncHistoryEntry};
use bim_reconcile::DecisionSet;

/// Everything needed to run one sync.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub pim: PathBuf,
    pub maximo: PathBuf,
    pub reject: Vec<AssetKey>,
    pub export: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub user: String,
    pub dry_run: bool,
    pub compare: CompareOptions,
    pub ingest: IngestOptions,
}

#[derive(Debug)]
pub struct SyncOutcome {
    pub pim_records: usize,
    pub maximo_records: usize,
    pub comparison: Vec<ComparisonItem>,
    pub decisions: DecisionSet,
    pub summary: ChangeSummary,
    /// Agrupaciones holding at least one change.
    pub changed_groups: Vec<String>,
    pub export: Option<PathBuf>,
    pub history: Option<PathBuf>,
    /// Recorded sync; `None` on a dry run.
    pub entry: Option<SyncHistoryEntry>,
    pub dry_run: bool,
}

impl SyncOutcome {
    pub fn unchanged(&self) -> usize {
        self.comparison.len() - self.summary.total()
    }
}

//! Sync pipeline: load both sides, compare, apply decisions, report.

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};

use bim_ingest::{FileAssetSource, IngestOptions, load_records};
use bim_model::{AssetRecord, ComparisonItem};
use bim_reconcile::{ChangeSink, PublishError, SyncHistory, SyncSession, SyncWorkflow};
use bim_report::{load_history, save_history, write_comparison_file};

use crate::types::{SyncOutcome, SyncRequest};

/// Sink that logs each accepted change.
///
/// Maximo is not reachable from the CLI; changes are reported through the
/// log and the history entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ChangeSink for LogSink {
    fn describe(&self) -> String {
        "change log".to_string()
    }

    fn publish(
        &self,
        applied: &[ComparisonItem],
    ) -> impl Future<Output = std::result::Result<(), PublishError>> + Send {
        for item in applied {
            info!(
                codigo = %item.id(),
                status = %item.status(),
                fields = item.diff_fields().len(),
                "apply change"
            );
        }
        async { Ok(()) }
    }
}

/// Run the whole sync workflow for `request`.
pub async fn run_sync(request: &SyncRequest, now: DateTime<Utc>) -> Result<SyncOutcome> {
    let span = info_span!("sync", user = %request.user, dry_run = request.dry_run);
    sync_stages(request, now).instrument(span).await
}

async fn sync_stages(request: &SyncRequest, now: DateTime<Utc>) -> Result<SyncOutcome> {
    let started = Instant::now();

    let history = match &request.history {
        Some(path) => load_history(path)?,
        None => SyncHistory::new(),
    };
    let session = SyncSession::new(request.compare.clone()).with_history(history);
    let mut workflow = SyncWorkflow::new(session, request.user.clone());

    let pim_records = workflow
        .load_pim(&FileAssetSource::new(&request.pim, request.ingest.clone()))
        .await?;
    let maximo_records = workflow
        .load_maximo(&FileAssetSource::new(&request.maximo, request.ingest.clone()))
        .await?;

    for id in &request.reject {
        workflow
            .session_mut()
            .set_decision(id, false)
            .with_context(|| format!("reject {id}"))?;
    }

    let session = workflow.session();
    let comparison = session.comparison().to_vec();
    let decisions = session.decisions().clone();
    let summary = session.summary();
    let changed_groups = session.changed_groups().into_iter().collect();

    if let Some(path) = &request.export {
        write_comparison_file(path, &comparison, &decisions)?;
        info!(path = %path.display(), rows = comparison.len(), "comparison exported");
    }

    let entry = if request.dry_run {
        None
    } else {
        let entry = workflow.apply(&LogSink, now).await?.clone();
        if let Some(path) = &request.history {
            save_history(path, workflow.session().history())?;
        }
        Some(entry)
    };

    info!(
        new = summary.new,
        modified = summary.modified,
        deleted = summary.deleted,
        duration_ms = started.elapsed().as_millis(),
        "sync complete"
    );

    Ok(SyncOutcome {
        pim_records,
        maximo_records,
        comparison,
        decisions,
        summary,
        changed_groups,
        export: request.export.clone(),
        history: if request.dry_run {
            None
        } else {
            request.history.clone()
        },
        entry,
        dry_run: request.dry_run,
    })
}

/// Load one asset file for the `sheets` command.
pub fn load_sheet_records(path: &Path, options: &IngestOptions) -> Result<Vec<AssetRecord>> {
    load_records(path, options).with_context(|| format!("load {}", path.display()))
}

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use bim_cli::config::{ConfigOverrides, SyncConfig};
use bim_cli::pipeline::{load_sheet_records, run_sync};
use bim_cli::types::{SyncOutcome, SyncRequest};
use bim_ingest::IngestOptions;
use bim_model::{AssetKey, columns_for_agrupacion};
use bim_reconcile::group_by_agrupacion;
use bim_report::load_history;

use crate::cli::{HistoryArgs, SheetsArgs, SyncArgs};
use crate::summary::{print_history, print_sheet};

pub fn run_sync_command(args: &SyncArgs) -> Result<SyncOutcome> {
    let config = SyncConfig::load_or_default(args.config.as_deref())?.with_overrides(
        ConfigOverrides {
            normalized: args.normalized,
            ignore_fields: args.ignore_field.clone(),
            key_column: args.key_column.clone(),
            user: args.user.clone(),
        },
    );
    let reject = args
        .reject
        .iter()
        .map(|id| AssetKey::new(id.as_str()).with_context(|| format!("--reject {id:?}")))
        .collect::<Result<Vec<_>>>()?;
    let request = SyncRequest {
        pim: args.pim.clone(),
        maximo: args.maximo.clone(),
        reject,
        export: args.export.clone(),
        history: args.history.clone(),
        user: config.user().to_string(),
        dry_run: args.dry_run,
        compare: config.compare,
        ingest: config.ingest,
    };
    debug!(?request, "sync request");

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let spinner = create_spinner("Comparing PIM against Maximo...");
    let outcome = runtime.block_on(run_sync(&request, Utc::now()));
    spinner.finish_and_clear();
    outcome
}

pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    let mut options = IngestOptions::default();
    if let Some(column) = &args.key_column {
        options = options.with_key_column(column.clone());
    }
    let records = load_sheet_records(&args.file, &options)?;
    let groups = group_by_agrupacion(&records);
    let mut printed = 0usize;
    for (agrupacion, members) in &groups {
        if args
            .agrupacion
            .as_deref()
            .is_some_and(|wanted| wanted.trim() != agrupacion)
        {
            continue;
        }
        print_sheet(agrupacion, &columns_for_agrupacion(agrupacion), members);
        printed += 1;
    }
    if printed == 0 {
        println!("No assets found.");
    }
    Ok(())
}

pub fn run_history(args: &HistoryArgs) -> Result<()> {
    let history = load_history(&args.file)?;
    print_history(history.entries(), args.details);
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

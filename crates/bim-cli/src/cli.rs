//! CLI argument definitions for bim-sync.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bim-sync",
    version,
    about = "Reconcile PIM asset sheets against Maximo",
    long_about = "Reconcile PIM asset sheets against Maximo.\n\n\
                  Compares both asset lists by codigoEquipo, lets changes be\n\
                  rejected, exports the comparison as CSV and records each sync\n\
                  in a history log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix each log line with a timestamp (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare PIM against Maximo and apply the accepted changes.
    Sync(SyncArgs),

    /// Print an asset file grouped by agrupación sheet.
    Sheets(SheetsArgs),

    /// Print a saved sync history log.
    History(HistoryArgs),
}

#[derive(Parser)]
pub struct SyncArgs {
    /// PIM asset export (CSV or JSON), the source of truth.
    #[arg(long = "pim", value_name = "FILE")]
    pub pim: PathBuf,

    /// Maximo asset export (CSV or JSON).
    #[arg(long = "maximo", value_name = "FILE")]
    pub maximo: PathBuf,

    /// Reject the change for this asset code (repeatable).
    #[arg(long = "reject", value_name = "ID")]
    pub reject: Vec<String>,

    /// Write the comparison with decisions to this CSV file.
    #[arg(long = "export", value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// History log to append the sync to (JSON).
    #[arg(long = "history", value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// User recorded in the history entry.
    #[arg(long = "user", value_name = "NAME")]
    pub user: Option<String>,

    /// Compare and report without applying changes or writing history.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Compare values after trimming and number/boolean coercion.
    ///
    /// By default values compare exactly: the number 0 and the text "0"
    /// differ, and a missing attribute differs from an empty one.
    #[arg(long = "normalized")]
    pub normalized: bool,

    /// Attribute to leave out of the comparison (repeatable).
    #[arg(long = "ignore-field", value_name = "FIELD")]
    pub ignore_field: Vec<String>,

    /// Column holding the asset code in both files.
    #[arg(long = "key-column", value_name = "COLUMN")]
    pub key_column: Option<String>,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Asset file (CSV or JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only print this agrupación.
    #[arg(long = "agrupacion", value_name = "CODE")]
    pub agrupacion: Option<String>,

    /// Column holding the asset code.
    #[arg(long = "key-column", value_name = "COLUMN")]
    pub key_column: Option<String>,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// History log written by `sync --history`.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also list the changes applied in each sync.
    #[arg(long = "details")]
    pub details: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

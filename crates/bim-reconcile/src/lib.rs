//! Reconciliation of PIM asset sheets against Maximo.
//!
//! - [`engine`]: pure comparison of two record collections.
//! - [`decisions`]: the per-change accept/ignore set.
//! - [`session`]: the sync state machine that owns one comparison.
//! - [`workflow`]: async driver wiring sessions to sources and sinks.

pub mod compare;
pub mod decisions;
pub mod engine;
pub mod error;
pub mod history;
pub mod session;
pub mod workflow;

pub use compare::{diff_fields, values_equal};
pub use decisions::{DecisionSet, apply_decisions, initialize_decisions, toggle_decision};
pub use engine::{
    RecordIndex, changed_groups, duplicate_keys, group_by_agrupacion, index_records, reconcile,
    reconcile_default, status_counts, summarize,
};
pub use error::{PublishError, ReconcileError, Result, SessionError, Side, WorkflowError};
pub use history::SyncHistory;
pub use session::{Failure, SyncAction, SyncSession, SyncStep};
pub use workflow::{ChangeSink, DryRunSink, SyncWorkflow};

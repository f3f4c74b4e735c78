//! Sync session state machine.
//!
//! ```text
//! idle -> loading_pim -> validating_pim -> loading_maximo -> validating_maximo
//!      -> comparing -> applying -> complete
//! ```
//!
//! `failed` is reachable from the three I/O steps (`loading_pim`,
//! `loading_maximo`, `applying`); `retry` returns to the step that failed.
//! `reset` goes back to `idle` from anywhere and drops every loaded record,
//! the comparison and the decisions. The sync history survives resets.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bim_model::{
    AssetKey, AssetRecord, ChangeSummary, CompareOptions, ComparisonItem, SyncHistoryEntry,
};

use crate::decisions::{DecisionSet, apply_decisions};
use crate::engine::{changed_groups, duplicate_keys, reconcile, summarize};
use crate::error::SessionError;
use crate::history::SyncHistory;

/// Workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    #[default]
    Idle,
    LoadingPim,
    ValidatingPim,
    LoadingMaximo,
    ValidatingMaximo,
    Comparing,
    Applying,
    Complete,
    Failed,
}

impl SyncStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStep::Idle => "idle",
            SyncStep::LoadingPim => "loading_pim",
            SyncStep::ValidatingPim => "validating_pim",
            SyncStep::LoadingMaximo => "loading_maximo",
            SyncStep::ValidatingMaximo => "validating_maximo",
            SyncStep::Comparing => "comparing",
            SyncStep::Applying => "applying",
            SyncStep::Complete => "complete",
            SyncStep::Failed => "failed",
        }
    }

    /// Steps that perform I/O and may fail.
    pub fn can_fail(&self) -> bool {
        matches!(
            self,
            SyncStep::LoadingPim | SyncStep::LoadingMaximo | SyncStep::Applying
        )
    }
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested of a session, used when reporting invalid transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Start,
    LoadPim,
    ConfirmPim,
    LoadMaximo,
    ConfirmMaximo,
    ChangeDecision,
    ConfirmApply,
    FinishApply,
    Fail,
    Retry,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyncAction::Start => "start",
            SyncAction::LoadPim => "load PIM records",
            SyncAction::ConfirmPim => "confirm PIM records",
            SyncAction::LoadMaximo => "load Maximo records",
            SyncAction::ConfirmMaximo => "confirm Maximo records",
            SyncAction::ChangeDecision => "change a decision",
            SyncAction::ConfirmApply => "confirm changes",
            SyncAction::FinishApply => "finish applying",
            SyncAction::Fail => "record a failure",
            SyncAction::Retry => "retry",
        };
        f.write_str(text)
    }
}

/// Why and where a session failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Step to return to on retry.
    pub step: SyncStep,
    pub reason: String,
}

/// All state of one PIM → Maximo sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSession {
    step: SyncStep,
    options: CompareOptions,
    pim: Vec<AssetRecord>,
    maximo: Vec<AssetRecord>,
    comparison: Vec<ComparisonItem>,
    decisions: DecisionSet,
    /// Changes captured at confirm time, waiting to be sent.
    pending: Vec<ComparisonItem>,
    failure: Option<Failure>,
    history: SyncHistory,
}

impl SyncSession {
    pub fn new(options: CompareOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Session that continues an existing history.
    #[must_use]
    pub fn with_history(mut self, history: SyncHistory) -> Self {
        self.history = history;
        self
    }

    pub fn step(&self) -> SyncStep {
        self.step
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    pub fn pim_records(&self) -> &[AssetRecord] {
        &self.pim
    }

    pub fn maximo_records(&self) -> &[AssetRecord] {
        &self.maximo
    }

    pub fn comparison(&self) -> &[ComparisonItem] {
        &self.comparison
    }

    pub fn decisions(&self) -> &DecisionSet {
        &self.decisions
    }

    /// Changes captured by [`Self::confirm_apply`] that have not been sent.
    pub fn pending(&self) -> &[ComparisonItem] {
        &self.pending
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn history(&self) -> &SyncHistory {
        &self.history
    }

    pub fn summary(&self) -> ChangeSummary {
        summarize(&self.comparison)
    }

    pub fn changed_groups(&self) -> BTreeSet<String> {
        changed_groups(&self.comparison)
    }

    fn expect_step(&self, expected: SyncStep, action: SyncAction) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }

    fn enter(&mut self, step: SyncStep) {
        debug!(from = %self.step, to = %step, "sync step");
        self.step = step;
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_step(SyncStep::Idle, SyncAction::Start)?;
        self.enter(SyncStep::LoadingPim);
        Ok(())
    }

    pub fn pim_loaded(&mut self, records: Vec<AssetRecord>) -> Result<(), SessionError> {
        self.expect_step(SyncStep::LoadingPim, SyncAction::LoadPim)?;
        warn_duplicates("PIM", &records);
        info!(record_count = records.len(), "PIM records loaded");
        self.pim = records;
        self.enter(SyncStep::ValidatingPim);
        Ok(())
    }

    pub fn confirm_pim(&mut self) -> Result<(), SessionError> {
        self.expect_step(SyncStep::ValidatingPim, SyncAction::ConfirmPim)?;
        self.enter(SyncStep::LoadingMaximo);
        Ok(())
    }

    pub fn maximo_loaded(&mut self, records: Vec<AssetRecord>) -> Result<(), SessionError> {
        self.expect_step(SyncStep::LoadingMaximo, SyncAction::LoadMaximo)?;
        warn_duplicates("Maximo", &records);
        info!(record_count = records.len(), "Maximo records loaded");
        self.maximo = records;
        self.enter(SyncStep::ValidatingMaximo);
        Ok(())
    }

    /// Enter `comparing`: reconcile from scratch and reset every decision.
    pub fn confirm_maximo(&mut self) -> Result<&[ComparisonItem], SessionError> {
        self.expect_step(SyncStep::ValidatingMaximo, SyncAction::ConfirmMaximo)?;
        self.comparison = reconcile(&self.pim, &self.maximo, &self.options);
        self.decisions = DecisionSet::initialize(&self.comparison);
        let summary = self.summary();
        info!(
            items = self.comparison.len(),
            new = summary.new,
            modified = summary.modified,
            deleted = summary.deleted,
            "comparison ready"
        );
        self.enter(SyncStep::Comparing);
        Ok(&self.comparison)
    }

    /// Flip one decision; returns the new value.
    pub fn toggle_decision(&mut self, id: &AssetKey) -> Result<bool, SessionError> {
        self.expect_step(SyncStep::Comparing, SyncAction::ChangeDecision)?;
        Ok(self.decisions.toggle(id)?)
    }

    pub fn set_decision(&mut self, id: &AssetKey, accept: bool) -> Result<(), SessionError> {
        self.expect_step(SyncStep::Comparing, SyncAction::ChangeDecision)?;
        Ok(self.decisions.set(id, accept)?)
    }

    /// Enter `applying` with the changes accepted right now.
    pub fn confirm_apply(&mut self) -> Result<&[ComparisonItem], SessionError> {
        self.expect_step(SyncStep::Comparing, SyncAction::ConfirmApply)?;
        self.pending = apply_decisions(&self.comparison, &self.decisions);
        info!(changes = self.pending.len(), "changes confirmed");
        self.enter(SyncStep::Applying);
        Ok(&self.pending)
    }

    /// Record the sync in history and enter `complete`.
    pub fn apply_finished(
        &mut self,
        user: &str,
        at: DateTime<Utc>,
    ) -> Result<&SyncHistoryEntry, SessionError> {
        self.expect_step(SyncStep::Applying, SyncAction::FinishApply)?;
        let applied = std::mem::take(&mut self.pending);
        self.enter(SyncStep::Complete);
        let entry = self.history.record(SyncHistoryEntry::new(at, user, applied));
        info!(sync_id = entry.id, user = %entry.user, "sync recorded");
        Ok(entry)
    }

    /// Move to `failed` from an I/O step.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        if !self.step.can_fail() {
            return Err(SessionError::InvalidTransition {
                step: self.step,
                action: SyncAction::Fail,
            });
        }
        let reason = reason.into();
        warn!(step = %self.step, reason = %reason, "sync step failed");
        self.failure = Some(Failure {
            step: self.step,
            reason,
        });
        self.enter(SyncStep::Failed);
        Ok(())
    }

    /// Return to the step that failed.
    pub fn retry(&mut self) -> Result<SyncStep, SessionError> {
        let Some(failure) = self.failure.take().filter(|_| self.step == SyncStep::Failed) else {
            return Err(SessionError::InvalidTransition {
                step: self.step,
                action: SyncAction::Retry,
            });
        };
        self.enter(failure.step);
        Ok(failure.step)
    }

    /// Make sure the session is at the I/O step `expected`, retrying a
    /// failure recorded there. Any other state is left untouched.
    pub fn resume(&mut self, expected: SyncStep, action: SyncAction) -> Result<(), SessionError> {
        let failed_here = self.step == SyncStep::Failed
            && self
                .failure
                .as_ref()
                .is_some_and(|failure| failure.step == expected);
        if failed_here {
            self.retry()?;
            return Ok(());
        }
        self.expect_step(expected, action)
    }

    /// Back to `idle`, discarding everything except history.
    pub fn reset(&mut self) {
        self.pim.clear();
        self.maximo.clear();
        self.comparison.clear();
        self.decisions = DecisionSet::default();
        self.pending.clear();
        self.failure = None;
        self.enter(SyncStep::Idle);
    }
}

fn warn_duplicates(side: &str, records: &[AssetRecord]) {
    let duplicates = duplicate_keys(records);
    if !duplicates.is_empty() {
        let sample: Vec<&str> = duplicates.iter().take(5).map(AssetKey::as_str).collect();
        warn!(
            side,
            duplicate_count = duplicates.len(),
            examples = %sample.join(", "),
            "duplicate asset keys, keeping the last record for each"
        );
    }
}

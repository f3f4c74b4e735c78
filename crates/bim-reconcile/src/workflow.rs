//! Async driver for a [`SyncSession`].
//!
//! Wraps the session state machine with the I/O around it: loading each
//! side from an [`AssetSource`] and sending accepted changes to a
//! [`ChangeSink`]. Failures move the session to `failed`; calling the same
//! step again retries it. Each call checks the session step before touching
//! its source or sink, so a call out of order leaves the session as it was.

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};

use bim_ingest::AssetSource;
use bim_model::{ComparisonItem, SyncHistoryEntry};

use crate::error::{PublishError, Side, WorkflowError};
use crate::session::{SyncAction, SyncSession, SyncStep};

/// Destination for accepted changes.
pub trait ChangeSink: Send + Sync {
    fn describe(&self) -> String;

    /// Send every accepted change. Either all are taken or the call fails.
    fn publish(
        &self,
        applied: &[ComparisonItem],
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Sink that accepts everything and sends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl ChangeSink for DryRunSink {
    fn describe(&self) -> String {
        "dry run".to_string()
    }

    fn publish(
        &self,
        _applied: &[ComparisonItem],
    ) -> impl Future<Output = Result<(), PublishError>> + Send {
        async { Ok(()) }
    }
}

#[derive(Debug, Clone)]
pub struct SyncWorkflow {
    session: SyncSession,
    user: String,
}

impl SyncWorkflow {
    pub fn new(session: SyncSession, user: impl Into<String>) -> Self {
        Self {
            session,
            user: user.into(),
        }
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SyncSession {
        &mut self.session
    }

    pub fn into_session(self) -> SyncSession {
        self.session
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Load and confirm the PIM side. Starts the session when idle.
    pub async fn load_pim<S: AssetSource>(&mut self, source: &S) -> Result<usize, WorkflowError> {
        if self.session.step() == SyncStep::Idle {
            self.session.start()?;
        } else {
            self.session.resume(SyncStep::LoadingPim, SyncAction::LoadPim)?;
        }
        let origin = source.describe();
        let span = info_span!("load", side = %Side::Pim, origin = %origin);
        let started = Instant::now();
        let result = source.load().instrument(span).await;
        match result {
            Ok(records) => {
                let count = records.len();
                info!(
                    side = %Side::Pim,
                    record_count = count,
                    duration_ms = started.elapsed().as_millis(),
                    "load complete"
                );
                self.session.pim_loaded(records)?;
                self.session.confirm_pim()?;
                Ok(count)
            }
            Err(source_err) => {
                self.session.fail(source_err.to_string())?;
                Err(WorkflowError::Load {
                    side: Side::Pim,
                    origin,
                    source: source_err,
                })
            }
        }
    }

    /// Load and confirm the Maximo side, which builds the comparison.
    pub async fn load_maximo<S: AssetSource>(
        &mut self,
        source: &S,
    ) -> Result<usize, WorkflowError> {
        self.session.resume(SyncStep::LoadingMaximo, SyncAction::LoadMaximo)?;
        let origin = source.describe();
        let span = info_span!("load", side = %Side::Maximo, origin = %origin);
        let started = Instant::now();
        let result = source.load().instrument(span).await;
        match result {
            Ok(records) => {
                let count = records.len();
                info!(
                    side = %Side::Maximo,
                    record_count = count,
                    duration_ms = started.elapsed().as_millis(),
                    "load complete"
                );
                self.session.maximo_loaded(records)?;
                self.session.confirm_maximo()?;
                Ok(count)
            }
            Err(source_err) => {
                self.session.fail(source_err.to_string())?;
                Err(WorkflowError::Load {
                    side: Side::Maximo,
                    origin,
                    source: source_err,
                })
            }
        }
    }

    /// Current comparison; only meaningful once both sides are loaded.
    pub fn comparison(&self) -> &[ComparisonItem] {
        self.session.comparison()
    }

    /// Send the accepted changes and record the sync in history.
    ///
    /// From `comparing` this confirms the current decisions first; from a
    /// failed apply it resends the changes captured at confirm time.
    pub async fn apply<K: ChangeSink>(
        &mut self,
        sink: &K,
        now: DateTime<Utc>,
    ) -> Result<&SyncHistoryEntry, WorkflowError> {
        if self.session.step() == SyncStep::Comparing {
            self.session.confirm_apply()?;
        } else {
            self.session.resume(SyncStep::Applying, SyncAction::ConfirmApply)?;
        }

        let target = sink.describe();
        let span = info_span!("apply", sink = %target, changes = self.session.pending().len());
        let started = Instant::now();
        let result = sink.publish(self.session.pending()).instrument(span).await;
        match result {
            Ok(()) => {
                info!(
                    sink = %target,
                    changes = self.session.pending().len(),
                    duration_ms = started.elapsed().as_millis(),
                    "changes sent"
                );
                Ok(self.session.apply_finished(&self.user, now)?)
            }
            Err(source) => {
                self.session.fail(source.to_string())?;
                Err(WorkflowError::Publish { target, source })
            }
        }
    }
}

//! Error types for reconciliation, sessions and the sync workflow.

use std::fmt;

use thiserror::Error;

use bim_ingest::IngestError;
use bim_model::AssetKey;

use crate::session::{SyncAction, SyncStep};

/// Errors from decision-set operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The id has no decision: it is unchanged or was never compared.
    #[error("no pending change for asset {0}")]
    UnknownDecision(AssetKey),
}

/// Errors from driving a [`crate::SyncSession`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while the session is {step}")]
    InvalidTransition { step: SyncStep, action: SyncAction },
    #[error(transparent)]
    Decision(#[from] ReconcileError),
}

/// Which side of the comparison a load refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Pim,
    Maximo,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Pim => f.write_str("PIM"),
            Side::Maximo => f.write_str("Maximo"),
        }
    }
}

/// Boxed error returned by a [`crate::ChangeSink`].
pub type PublishError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the async sync workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to load {side} records from {origin}")]
    Load {
        side: Side,
        origin: String,
        #[source]
        source: IngestError,
    },

    #[error("failed to send changes to {target}")]
    Publish {
        target: String,
        #[source]
        source: PublishError,
    },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

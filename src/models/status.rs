//! Lifecycle of a submitted mint transaction.

use serde::Serialize;
use std::fmt;

/// Client-side view of where a transaction is in its lifecycle.
///
/// Created `Unsent` at build time; every later transition is driven by an RPC
/// response. `Finalized` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfirmationStatus {
    Unsent,
    Submitted,
    Confirmed,
    Finalized,
    Failed(String),
}

impl ConfirmationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConfirmationStatus::Finalized | ConfirmationStatus::Failed(_)
        )
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationStatus::Unsent => write!(f, "unsent"),
            ConfirmationStatus::Submitted => write!(f, "submitted"),
            ConfirmationStatus::Confirmed => write!(f, "confirmed"),
            ConfirmationStatus::Finalized => write!(f, "finalized"),
            ConfirmationStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of waiting for confirmation.
///
/// A timed-out wait is deliberately not a failure: the transaction may still
/// land after the deadline, so callers must treat the two differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfirmationOutcome {
    Finalized,
    /// The chain rejected the transaction; the reason is surfaced verbatim.
    Failed(String),
    /// The wait deadline elapsed; carries the last status observed on chain.
    TimedOut(ConfirmationStatus),
}

/// Commitment level reported by the chain for a known signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionSignatureStatus {
    Processed,
    Confirmed,
    Finalized,
    /// Execution error string as reported by the chain, uninterpreted.
    Failed(String),
}

//! Outcome types and failure reporting for remote itinerary calls.
//!
//! Every remote failure ends up in [`report_failure`]; nothing here is ever
//! propagated to the caller of a session operation.

use tourplan_remote::RemoteError;

/// Which persistence call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOp {
    Load,
    Save,
    Clear,
}

impl std::fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteOp::Load => write!(f, "load"),
            RemoteOp::Save => write!(f, "save"),
            RemoteOp::Clear => write!(f, "clear"),
        }
    }
}

/// What an identity sync did to the local itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Remote itinerary replaced local state wholesale.
    Replaced { items: usize },
    /// Nothing saved remotely yet; local state reset to empty.
    Empty,
    /// Identity became anonymous; local state reset to empty.
    SignedOut,
    /// Identity still resolving; nothing done.
    Pending,
    /// The identity changed while the request was in flight; response dropped.
    Superseded,
    /// The request failed; local state left untouched.
    Failed,
}

impl LoadOutcome {
    /// `true` when local state now mirrors the remote record (or its absence).
    #[must_use]
    pub fn is_synced(self) -> bool {
        matches!(self, LoadOutcome::Replaced { .. } | LoadOutcome::Empty)
    }
}

/// Logs a remote failure at the level its kind deserves.
pub(crate) fn report_failure(op: RemoteOp, user_id: &str, err: &RemoteError) {
    match err {
        RemoteError::NotFound { .. } => {
            tracing::debug!(%op, user_id, "no remote itinerary yet");
        }
        RemoteError::Http(e) if e.is_timeout() || e.is_connect() => {
            tracing::warn!(%op, user_id, error = %err, "itinerary service unreachable");
        }
        RemoteError::Http(_)
        | RemoteError::UnexpectedStatus { .. }
        | RemoteError::Deserialize { .. }
        | RemoteError::InvalidBaseUrl { .. } => {
            tracing::error!(%op, user_id, error = %err, "remote itinerary call failed");
        }
    }
}

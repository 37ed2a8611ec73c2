use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure taxonomy of the orchestration layer.
///
/// None of these are fatal: each one is recovered locally by re-triggering the
/// operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// Network, connectivity or protocol failure. Retryable by user action only.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// Well-formed rejection from the data source (unknown address, rate limited, ...).
    #[error("request rejected by api: {code}")]
    Domain { code: String },

    /// An out-of-order completion was suppressed. Never shown to the user.
    #[error("stale result discarded (seq {seq}, latest {current})")]
    StaleResultDiscarded { seq: u64, current: u64 },

    /// Requested historical instant lies outside `[earliest, latest]`.
    #[error("instant {requested} outside permitted range [{earliest}, {latest}]")]
    Validation {
        requested: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    /// Client-side state could not be loaded or saved.
    #[error("client state storage failure: {reason}")]
    Storage { reason: String },
}

impl ExplorerError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn domain(code: impl Into<String>) -> Self {
        Self::Domain { code: code.into() }
    }

    /// Localisation key the presentation layer resolves into a message.
    pub fn message_key(&self) -> String {
        match self {
            Self::Transport { reason } => format!("error.{}", reason),
            Self::Domain { code } => format!("error-api.{}", code),
            Self::StaleResultDiscarded { .. } => "error.stale".to_string(),
            Self::Validation { .. } => "error.time-machine-out-of-range".to_string(),
            Self::Storage { .. } => "error.storage".to_string(),
        }
    }

    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::StaleResultDiscarded { .. })
    }
}

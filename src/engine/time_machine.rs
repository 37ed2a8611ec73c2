use chrono::{DateTime, Utc};

use crate::ExplorerError;
use crate::domain::TimeSelection;

/// Candidate / confirmed historical instant for one viewing session.
///
/// Selecting a candidate has no effect on what is fetched. Only `confirm` moves the
/// exposed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMachine {
    #[default]
    Live,
    Pinned {
        candidate: DateTime<Utc>,
        confirmed: Option<DateTime<Utc>>,
    },
}

impl TimeMachine {
    /// Starts already confirmed, e.g. from a `ledgerTimestamp` in the entry URL.
    pub fn pinned_at(instant: DateTime<Utc>) -> Self {
        TimeMachine::Pinned {
            candidate: instant,
            confirmed: Some(instant),
        }
    }

    /// Expects an instant already validated with [`validate_instant`].
    pub fn select(&mut self, instant: DateTime<Utc>) {
        let confirmed = match *self {
            TimeMachine::Live => None,
            TimeMachine::Pinned { confirmed, .. } => confirmed,
        };
        *self = TimeMachine::Pinned {
            candidate: instant,
            confirmed,
        };
    }

    /// Returns true when the exposed selection changed.
    pub fn confirm(&mut self) -> bool {
        match *self {
            TimeMachine::Live => false,
            TimeMachine::Pinned {
                candidate,
                confirmed,
            } => {
                *self = TimeMachine::Pinned {
                    candidate,
                    confirmed: Some(candidate),
                };
                confirmed != Some(candidate)
            }
        }
    }

    /// Back to live, clearing both instants. Returns true when the exposed selection changed.
    pub fn reset(&mut self) -> bool {
        let was = self.selection();
        *self = TimeMachine::Live;
        !was.is_live()
    }

    pub fn candidate(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeMachine::Live => None,
            TimeMachine::Pinned { candidate, .. } => Some(*candidate),
        }
    }

    pub fn selection(&self) -> TimeSelection {
        match self {
            TimeMachine::Pinned {
                confirmed: Some(t), ..
            } => TimeSelection::At(*t),
            _ => TimeSelection::Live,
        }
    }
}

/// Boundary check for a candidate: `[inception, now]`. No inception means no lower bound.
pub fn validate_instant(
    requested: DateTime<Utc>,
    inception: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ExplorerError> {
    let earliest = inception.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    if requested < earliest || requested > now {
        return Err(ExplorerError::Validation {
            requested,
            earliest,
            latest: now,
        });
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;

    fn t(secs: i64) -> DateTime<Utc> {
        TimeUtils::from_unix_secs(secs).unwrap()
    }

    #[test]
    fn candidate_alone_keeps_selection() {
        let mut tm = TimeMachine::default();
        tm.select(t(100));
        assert_eq!(tm.selection(), TimeSelection::Live);
        assert!(tm.confirm());
        assert_eq!(tm.selection(), TimeSelection::At(t(100)));

        tm.select(t(200));
        assert_eq!(tm.selection(), TimeSelection::At(t(100)));
        assert_eq!(tm.candidate(), Some(t(200)));
    }

    #[test]
    fn confirm_same_instant_is_not_a_change() {
        let mut tm = TimeMachine::pinned_at(t(100));
        assert!(!tm.confirm());
        assert!(!TimeMachine::Live.confirm());
    }

    #[test]
    fn reset_clears_both_and_cycles() {
        let mut tm = TimeMachine::pinned_at(t(100));
        assert!(tm.reset());
        assert_eq!(tm, TimeMachine::Live);
        assert!(!tm.reset());
        tm.select(t(50));
        tm.confirm();
        assert_eq!(tm.selection(), TimeSelection::At(t(50)));
    }

    #[test]
    fn validation_bounds() {
        let now = t(1_000);
        assert!(validate_instant(t(500), Some(t(100)), now).is_ok());
        assert!(validate_instant(t(100), Some(t(100)), now).is_ok());
        assert!(validate_instant(t(99), Some(t(100)), now).is_err());
        assert!(matches!(
            validate_instant(t(1_001), None, now),
            Err(ExplorerError::Validation { .. })
        ));
    }
}

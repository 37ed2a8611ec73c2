use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which ledger state is being viewed: the current one, or the one as of a past instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeSelection {
    #[default]
    Live,
    At(DateTime<Utc>),
}

impl TimeSelection {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeSelection::Live => None,
            TimeSelection::At(t) => Some(*t),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, TimeSelection::Live)
    }
}

impl std::fmt::Display for TimeSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TimeSelection::Live => write!(f, "live"),
            TimeSelection::At(t) => write!(f, "{}", crate::utils::format_instant(t)),
        }
    }
}

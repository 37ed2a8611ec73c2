use std::sync::Arc;

use super::sequencer::{RequestSequencer, Seq};
use crate::ExplorerError;
use crate::domain::{AccountSnapshot, TimeSelection};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Everything a transport task needs to run one account fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: Seq,
    pub address: String,
    pub time: TimeSelection,
    pub bypass_cache: bool,
}

/// Front buffer for the viewed account.
///
/// The snapshot is swapped whole on a successful latest fetch. Failures only set the
/// error; out-of-order completions are dropped.
#[derive(Debug, Default)]
pub struct AccountFetcher {
    sequencer: RequestSequencer,
    outstanding: Option<Seq>,
    snapshot: Option<Arc<AccountSnapshot>>,
    /// Bumped on every snapshot swap. Downstream derived values key on it.
    revision: u64,
    last_error: Option<ExplorerError>,
}

impl AccountFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes any fetch still in flight.
    pub fn issue(&mut self, address: &str, time: TimeSelection, bypass_cache: bool) -> FetchTicket {
        let seq = self.sequencer.issue();
        self.outstanding = Some(seq);

        #[cfg(debug_assertions)]
        if DF.log_fetcher {
            log::info!(
                "FETCH #{}: {} @ {} (bypass cache: {})",
                seq.value(),
                address,
                time,
                bypass_cache
            );
        }

        FetchTicket {
            seq,
            address: address.to_string(),
            time,
            bypass_cache,
        }
    }

    /// `Ok` when a snapshot was swapped in. `Err` is either the stale suppression or
    /// the fetch failure that is now on display.
    pub fn apply(
        &mut self,
        seq: Seq,
        result: Result<AccountSnapshot, ExplorerError>,
    ) -> Result<(), ExplorerError> {
        if let Err(stale) = self.sequencer.check(seq) {
            #[cfg(debug_assertions)]
            if DF.log_fetcher {
                log::debug!("FETCH #{} dropped: {}", seq.value(), stale);
            }
            return Err(stale);
        }

        self.outstanding = None;

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(Arc::new(snapshot));
                self.revision += 1;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Account fetch #{} failed: {}", seq.value(), e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<AccountSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn error(&self) -> Option<&ExplorerError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(address: &str) -> AccountSnapshot {
        AccountSnapshot {
            address: address.into(),
            username: None,
            service: None,
            ledger_info: None,
            xaman_meta: None,
            inception: None,
        }
    }

    #[test]
    fn late_older_result_is_discarded() {
        let mut f = AccountFetcher::new();
        let a = f.issue("rX", TimeSelection::Live, false);
        let b = f.issue("rY", TimeSelection::Live, false);

        assert!(f.apply(b.seq, Ok(snap("rY"))).is_ok());
        let late = f.apply(a.seq, Ok(snap("rX")));
        assert!(matches!(late, Err(ExplorerError::StaleResultDiscarded { .. })));
        assert_eq!(f.snapshot().unwrap().address, "rY");
        assert_eq!(f.revision(), 1);
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut f = AccountFetcher::new();
        let t = f.issue("rX", TimeSelection::Live, false);
        f.apply(t.seq, Ok(snap("rX"))).unwrap();

        let t = f.issue("rX", TimeSelection::Live, true);
        assert!(f.is_loading());
        let err = f
            .apply(t.seq, Err(ExplorerError::domain("rateLimited")))
            .unwrap_err();
        assert_eq!(err, ExplorerError::domain("rateLimited"));
        assert!(!f.is_loading());
        assert_eq!(f.snapshot().unwrap().address, "rX");
        assert_eq!(f.error(), Some(&ExplorerError::domain("rateLimited")));

        let t = f.issue("rX", TimeSelection::Live, false);
        f.apply(t.seq, Ok(snap("rX"))).unwrap();
        assert!(f.error().is_none());
    }

    #[test]
    fn stale_failure_does_not_set_error() {
        let mut f = AccountFetcher::new();
        let a = f.issue("rX", TimeSelection::Live, false);
        let _b = f.issue("rY", TimeSelection::Live, false);
        let _ = f.apply(a.seq, Err(ExplorerError::transport("timeout")));
        assert!(f.error().is_none());
        assert!(f.is_loading());
    }
}

use super::sequencer::{RequestSequencer, Seq};
use crate::ExplorerError;
use crate::domain::{FiatCurrency, FiatRate, TimeSelection};

#[cfg(debug_assertions)]
use crate::config::DF;

/// The rate's dependency list.
pub type RateKey = (FiatCurrency, TimeSelection);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTicket {
    pub seq: Seq,
    pub currency: FiatCurrency,
    pub time: TimeSelection,
}

/// Resolves a fiat rate per (currency, time selection), last-request-wins.
#[derive(Debug, Default)]
pub struct RateResolver {
    sequencer: RequestSequencer,
    requested: Option<(Seq, RateKey)>,
    outstanding: Option<Seq>,
    /// The rate on display and the key it was resolved for.
    resolved: Option<(RateKey, FiatRate)>,
    last_error: Option<ExplorerError>,
}

impl RateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket only when the key differs from the last request.
    pub fn request_if_changed(
        &mut self,
        currency: FiatCurrency,
        time: TimeSelection,
    ) -> Option<RateTicket> {
        let key = (currency, time);
        if self.requested.as_ref().is_some_and(|(_, k)| *k == key) {
            return None;
        }
        Some(self.request(currency, time))
    }

    pub fn request(&mut self, currency: FiatCurrency, time: TimeSelection) -> RateTicket {
        let seq = self.sequencer.issue();
        self.requested = Some((seq, (currency, time)));
        self.outstanding = Some(seq);

        #[cfg(debug_assertions)]
        if DF.log_rates {
            log::info!("RATE #{}: {} @ {}", seq.value(), currency, time);
        }

        RateTicket {
            seq,
            currency,
            time,
        }
    }

    pub fn apply(
        &mut self,
        seq: Seq,
        result: Result<FiatRate, ExplorerError>,
    ) -> Result<(), ExplorerError> {
        if let Err(stale) = self.sequencer.check(seq) {
            #[cfg(debug_assertions)]
            if DF.log_rates {
                log::debug!("RATE #{} dropped: {}", seq.value(), stale);
            }
            return Err(stale);
        }
        self.outstanding = None;
        let Some((_, key)) = self.requested else {
            return Ok(());
        };

        match result {
            Ok(rate) => {
                self.resolved = Some((key, rate));
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rate resolution for {} @ {} failed: {}", key.0, key.1, e);
                // A previous rate for the same key stays; a rate for another key is not ours.
                if self.resolved.as_ref().is_none_or(|(k, _)| *k != key) {
                    self.resolved = Some((key, FiatRate::Unavailable));
                }
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Rate for the latest requested key. Anything resolved for an older key is unavailable.
    pub fn current(&self) -> FiatRate {
        match (&self.requested, &self.resolved) {
            (Some((_, wanted)), Some((key, rate))) if wanted == key => *rate,
            _ => FiatRate::Unavailable,
        }
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
    use crate::utils::TimeUtils;

    fn at(secs: i64) -> TimeSelection {
        TimeSelection::At(TimeUtils::from_unix_secs(secs).unwrap())
    }

    #[test]
    fn unchanged_key_issues_nothing() {
        let mut r = RateResolver::new();
        assert!(r.request_if_changed(FiatCurrency::Usd, TimeSelection::Live).is_some());
        assert!(r.request_if_changed(FiatCurrency::Usd, TimeSelection::Live).is_none());
        assert!(r.request_if_changed(FiatCurrency::Eur, TimeSelection::Live).is_some());
    }

    #[test]
    fn stale_rate_never_overwrites_newer_selection() {
        let mut r = RateResolver::new();
        let old = r.request_if_changed(FiatCurrency::Usd, at(1_600_000_000)).unwrap();
        let new = r.request_if_changed(FiatCurrency::Usd, at(1_700_000_000)).unwrap();

        assert!(r.is_loading());
        r.apply(new.seq, Ok(FiatRate::Known(0.6))).unwrap();
        assert!(!r.is_loading());
        assert!(r.apply(old.seq, Ok(FiatRate::Known(0.2))).is_err());
        assert_eq!(r.current(), FiatRate::Known(0.6));
    }

    #[test]
    fn rate_for_previous_key_is_not_shown() {
        let mut r = RateResolver::new();
        let live = r.request_if_changed(FiatCurrency::Usd, TimeSelection::Live).unwrap();
        r.apply(live.seq, Ok(FiatRate::Known(0.5))).unwrap();

        let pinned = r.request_if_changed(FiatCurrency::Usd, at(1_600_000_000)).unwrap();
        assert_eq!(r.current(), FiatRate::Unavailable);
        assert!(r.apply(pinned.seq, Err(ExplorerError::transport("timeout"))).is_err());
        assert_eq!(r.current(), FiatRate::Unavailable);
    }

    #[test]
    fn failed_refresh_of_same_key_keeps_rate() {
        let mut r = RateResolver::new();
        let t = r.request(FiatCurrency::Usd, TimeSelection::Live);
        r.apply(t.seq, Ok(FiatRate::Known(0.5))).unwrap();
        let t = r.request(FiatCurrency::Usd, TimeSelection::Live);
        let _ = r.apply(t.seq, Err(ExplorerError::transport("timeout")));
        assert_eq!(r.current(), FiatRate::Known(0.5));
        assert!(r.error().is_some());
    }
}

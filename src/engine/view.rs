use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::balances::{self, BalanceBuckets, FiatBuckets};
use super::derived::Derived;
use super::fetcher::{AccountFetcher, FetchTicket};
use super::network_params::SharedNetworkParams;
use super::rates::{RateResolver, RateTicket};
use super::sequencer::Seq;
use super::time_machine::{TimeMachine, validate_instant};
use crate::ExplorerError;
use crate::domain::{AccountSnapshot, EntryContext, FiatCurrency, FiatRate, TimeSelection};
use crate::utils::TimeUtils;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Per-page view state for one account: what is being looked at, as of when, and what it holds.
///
/// Every control method that needs the network returns a ticket for the caller to run.
/// The view itself never touches the network or the active identity.
#[derive(Debug)]
pub struct AccountView {
    address: Option<String>,
    time_machine: TimeMachine,
    fetcher: AccountFetcher,
    rates: RateResolver,
    /// Keyed on (snapshot revision, network parameters revision).
    balances: Derived<(u64, u64), Option<BalanceBuckets>>,
}

impl AccountView {
    pub fn new(entry: &EntryContext) -> Self {
        let time_machine = entry
            .ledger_timestamp
            .map(TimeMachine::pinned_at)
            .unwrap_or_default();
        Self {
            address: entry.address.clone(),
            time_machine,
            fetcher: AccountFetcher::new(),
            rates: RateResolver::new(),
            balances: Derived::new(None),
        }
    }

    /// `None` when the address is blank or unchanged.
    pub fn set_address(&mut self, address: &str) -> Option<FetchTicket> {
        let address = address.trim();
        if address.is_empty() || self.address.as_deref() == Some(address) {
            return None;
        }
        self.address = Some(address.to_string());
        self.load(false)
    }

    /// Switches to `address` and always fetches, even when it is already on display.
    pub fn show(&mut self, address: &str, bypass_cache: bool) -> Option<FetchTicket> {
        let address = address.trim();
        if !address.is_empty() {
            self.address = Some(address.to_string());
        }
        self.load(bypass_cache)
    }

    /// Fetches the current address at the confirmed selection, superseding anything in flight.
    pub fn load(&mut self, bypass_cache: bool) -> Option<FetchTicket> {
        let address = self.address.as_deref()?;
        Some(
            self.fetcher
                .issue(address, self.time_machine.selection(), bypass_cache),
        )
    }

    /// Stores a candidate instant. Nothing is fetched until it is confirmed.
    pub fn select_instant(
        &mut self,
        instant: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), ExplorerError> {
        // Right after an address switch the snapshot on display is still the previous account's.
        let inception = self
            .fetcher
            .snapshot()
            .filter(|s| self.address.as_deref() == Some(s.address.as_str()))
            .and_then(|s| s.inception)
            .and_then(TimeUtils::from_unix_secs);
        let instant = validate_instant(instant, inception, now)?;
        self.time_machine.select(instant);
        Ok(())
    }

    pub fn confirm_instant(&mut self) -> Option<FetchTicket> {
        if !self.time_machine.confirm() {
            return None;
        }
        self.load(false)
    }

    pub fn reset_time_machine(&mut self) -> Option<FetchTicket> {
        if !self.time_machine.reset() {
            return None;
        }
        self.load(false)
    }

    pub fn apply_fetch(
        &mut self,
        seq: Seq,
        result: Result<AccountSnapshot, ExplorerError>,
    ) -> Result<(), ExplorerError> {
        self.fetcher.apply(seq, result)
    }

    /// Re-runs reconciliation when the snapshot or the network parameters changed. Returns
    /// true when it ran.
    pub fn recompute_balances(&mut self, network: &SharedNetworkParams) -> bool {
        let key = (self.fetcher.revision(), network.revision());
        let snapshot = self.fetcher.snapshot();
        let params = network.get();
        self.balances.refresh(key, || {
            let buckets = match (snapshot, params) {
                (Some(snapshot), Some(params)) => balances::reconcile(snapshot, &params),
                _ => None,
            };

            #[cfg(debug_assertions)]
            if DF.log_balances {
                log::info!("BALANCES (rev {:?}, params {:?}): {:?}", key, params, buckets);
            }

            buckets
        })
    }

    /// Requests a rate when the currency or the confirmed selection changed.
    pub fn rate_ticket(&mut self, currency: FiatCurrency) -> Option<RateTicket> {
        self.rates
            .request_if_changed(currency, self.time_machine.selection())
    }

    /// Unconditional re-resolution for a manual refresh.
    pub fn refresh_rate(&mut self, currency: FiatCurrency) -> RateTicket {
        self.rates.request(currency, self.time_machine.selection())
    }

    pub fn apply_rate(
        &mut self,
        seq: Seq,
        result: Result<FiatRate, ExplorerError>,
    ) -> Result<(), ExplorerError> {
        self.rates.apply(seq, result)
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn snapshot(&self) -> Option<&Arc<AccountSnapshot>> {
        self.fetcher.snapshot()
    }

    pub fn balances(&self) -> Option<BalanceBuckets> {
        *self.balances.get()
    }

    pub fn fiat_rate(&self) -> FiatRate {
        self.rates.current()
    }

    pub fn fiat_balances(&self) -> Option<FiatBuckets> {
        self.balances()?.in_fiat(self.fiat_rate())
    }

    pub fn selection(&self) -> TimeSelection {
        self.time_machine.selection()
    }

    pub fn time_machine(&self) -> &TimeMachine {
        &self.time_machine
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn error(&self) -> Option<&ExplorerError> {
        self.fetcher.error()
    }

    pub fn is_rate_loading(&self) -> bool {
        self.rates.is_loading()
    }

    pub fn rate_error(&self) -> Option<&ExplorerError> {
        self.rates.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LedgerInfo, NetworkParameters};

    fn t(secs: i64) -> DateTime<Utc> {
        TimeUtils::from_unix_secs(secs).unwrap()
    }

    fn snap(address: &str, balance: u64) -> AccountSnapshot {
        AccountSnapshot {
            address: address.into(),
            username: None,
            service: None,
            ledger_info: Some(LedgerInfo {
                balance,
                owner_count: 3,
                activated: true,
                blackholed: false,
                domain: None,
                did: None,
                reward_lgr_first: None,
            }),
            xaman_meta: None,
            inception: Some(1_000),
        }
    }

    fn view(address: &str) -> AccountView {
        AccountView::new(&EntryContext {
            address: Some(address.into()),
            ..Default::default()
        })
    }

    #[test]
    fn unconfirmed_candidate_keeps_displayed_snapshot() {
        let mut v = view("rAlice");
        let now = t(10_000);
        v.load(false).unwrap();

        v.select_instant(t(5_000), now).unwrap();
        let t1 = v.confirm_instant().unwrap();
        assert_eq!(t1.time, TimeSelection::At(t(5_000)));
        v.apply_fetch(t1.seq, Ok(snap("rAlice", 20_000_000))).unwrap();

        v.select_instant(t(6_000), now).unwrap();
        assert_eq!(v.selection(), TimeSelection::At(t(5_000)));
        assert!(!v.is_loading());
        assert_eq!(v.snapshot().unwrap().ledger_info.as_ref().unwrap().balance, 20_000_000);
    }

    #[test]
    fn late_result_for_previous_address_is_dropped() {
        let mut v = view("rX");
        let x = v.load(false).unwrap();
        let y = v.set_address("rY").unwrap();

        v.apply_fetch(y.seq, Ok(snap("rY", 1))).unwrap();
        assert!(v.apply_fetch(x.seq, Ok(snap("rX", 2))).is_err());
        assert_eq!(v.snapshot().unwrap().address, "rY");
        assert_eq!(v.address(), Some("rY"));
        assert!(v.set_address(" rY ").is_none());
    }

    #[test]
    fn instant_before_inception_is_rejected() {
        let mut v = view("rAlice");
        let s = v.load(false).unwrap();
        v.apply_fetch(s.seq, Ok(snap("rAlice", 1))).unwrap();

        let err = v.select_instant(t(500), t(10_000)).unwrap_err();
        assert!(matches!(err, ExplorerError::Validation { .. }));
        assert!(v.time_machine().candidate().is_none());
        assert!(v.confirm_instant().is_none());
    }

    #[test]
    fn previous_accounts_inception_does_not_bound_new_address() {
        let mut v = view("rAlice");
        let s = v.load(false).unwrap();
        v.apply_fetch(s.seq, Ok(snap("rAlice", 1))).unwrap();

        v.set_address("rBob").unwrap();
        assert_eq!(v.snapshot().unwrap().address, "rAlice");
        v.select_instant(t(500), t(10_000)).unwrap();
        assert_eq!(v.time_machine().candidate(), Some(t(500)));
    }

    #[test]
    fn balances_follow_either_input() {
        let mut v = view("rAlice");
        let network = SharedNetworkParams::new();
        let s = v.load(false).unwrap();
        v.apply_fetch(s.seq, Ok(snap("rAlice", 20_000_000))).unwrap();

        assert!(v.recompute_balances(&network));
        assert!(v.balances().is_none());

        network.begin_refresh();
        network.complete_refresh(Ok(NetworkParameters {
            reserve_base: 10_000_000,
            reserve_increment: 2_000_000,
        }));
        assert!(v.recompute_balances(&network));
        assert_eq!(v.balances().unwrap().available, 4_000_000);
        assert!(!v.recompute_balances(&network));

        network.begin_refresh();
        network.complete_refresh(Ok(NetworkParameters {
            reserve_base: 1_000_000,
            reserve_increment: 200_000,
        }));
        assert!(v.recompute_balances(&network));
        assert_eq!(v.balances().unwrap().reserved, 1_600_000);
        assert!(v.fiat_balances().is_none());
    }

    #[test]
    fn entry_timestamp_starts_pinned() {
        let v = AccountView::new(&EntryContext {
            address: Some("rAlice".into()),
            ledger_timestamp: Some(t(5_000)),
            correlation_id: None,
        });
        assert_eq!(v.selection(), TimeSelection::At(t(5_000)));
    }
}

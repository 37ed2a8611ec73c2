use serde::Serialize;

use crate::config::NATIVE_SCALE;
use crate::domain::{AccountSnapshot, FiatRate, LedgerInfo, NetworkParameters};

/// Total / reserved / available split of an account's native balance, in minor units.
///
/// Always satisfies `reserved <= total` and `available <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceBuckets {
    pub total: u64,
    pub reserved: u64,
    pub available: u64,
}

/// The same buckets converted at one fiat rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiatBuckets {
    pub total: f64,
    pub reserved: f64,
    pub available: f64,
}

/// Pure: same inputs, same buckets. `None` when the snapshot carries no ledger state.
pub fn reconcile(snapshot: &AccountSnapshot, params: &NetworkParameters) -> Option<BalanceBuckets> {
    snapshot
        .ledger_info
        .as_ref()
        .map(|ledger| reconcile_ledger(ledger, params))
}

pub fn reconcile_ledger(ledger: &LedgerInfo, params: &NetworkParameters) -> BalanceBuckets {
    let total = ledger.balance;

    let raw_reserved = params
        .reserve_base
        .saturating_add(ledger.owner_count.saturating_mul(params.reserve_increment));

    // An account never owes more than it holds.
    let reserved = raw_reserved.min(total);
    let available = total.saturating_sub(reserved);

    BalanceBuckets {
        total,
        reserved,
        available,
    }
}

pub fn minor_to_native(amount: u64) -> f64 {
    amount as f64 / NATIVE_SCALE as f64
}

impl BalanceBuckets {
    /// `None` for an unavailable rate. Missing data is not zero.
    pub fn in_fiat(&self, rate: FiatRate) -> Option<FiatBuckets> {
        let rate = rate.value()?;
        Some(FiatBuckets {
            total: minor_to_native(self.total) * rate,
            reserved: minor_to_native(self.reserved) * rate,
            available: minor_to_native(self.available) * rate,
        })
    }
}

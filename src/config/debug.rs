//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Account fetch issue / apply / stale-drop events.
    pub log_fetcher: bool,

    /// Fiat rate resolution, including stale drops.
    pub log_rates: bool,

    /// Sign session transitions and polling.
    pub log_sign_session: bool,

    /// Every balance recompute with its inputs.
    pub log_balances: bool,

    /// Client state load/save.
    pub log_persistence: bool,
}

pub const DF: LogFlags = LogFlags {
    log_fetcher: true,
    log_sign_session: true,

    log_rates: false,
    log_balances: false,
    log_persistence: false,
};

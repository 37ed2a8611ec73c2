//! Remote indexing API endpoints and client defaults.
use std::time::Duration;

pub struct ApiConfig {
    /// Explorer server root.
    pub server: &'static str,
    /// Prefix used by browser builds (the API is reached through the CORS proxy).
    pub cors_prefix: &'static str,
    /// Prefix for direct (native) access.
    pub direct_prefix: &'static str,
    /// Path template for address lookups. The trailing `{address}` becomes one encoded segment.
    pub address_path: &'static str,
    /// Network-wide reserve parameters.
    pub server_info_path: &'static str,
    /// Live spot rate, `{currency}` is substituted.
    pub rate_current_path: &'static str,
    /// Nearest historical sample, `{currency}` is substituted. Takes `?date=<ms>`.
    pub rate_history_path: &'static str,
    pub sign_payload_path: &'static str,
    pub request_timeout: Duration,
    /// Header carrying a developer API token when one is configured.
    pub token_header: &'static str,
}

/// Every detail block the account page renders. Sent on each address lookup.
pub const ADDRESS_QUERY_FLAGS: &[&str] = &[
    "username",
    "service",
    "verifiedDomain",
    "parent",
    "nickname",
    "inception",
    "flare",
    "blacklist",
    "payString",
    "ledgerInfo",
    "xamanMeta",
    "bithomp",
];

pub const API: ApiConfig = ApiConfig {
    server: "https://bithomp.com",
    cors_prefix: "/api/cors/",
    direct_prefix: "/api/",
    address_path: "v2/address/{address}",
    server_info_path: "v2/server",
    rate_current_path: "v2/rates/current/{currency}",
    rate_history_path: "v2/rates/history/nearest/{currency}",
    sign_payload_path: "app/xumm/payload",
    request_timeout: Duration::from_secs(20),
    token_header: "x-bithomp-token",
};

impl ApiConfig {
    /// Browser builds go through the CORS proxy, native builds talk to the API directly.
    pub fn default_base_url(&self) -> String {
        let prefix = if cfg!(target_arch = "wasm32") {
            self.cors_prefix
        } else {
            self.direct_prefix
        };
        format!("{}{}", self.server, prefix)
    }
}

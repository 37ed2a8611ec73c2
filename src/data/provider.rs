use async_trait::async_trait;

use crate::ExplorerError;
use crate::domain::{
    AccountSnapshot, CorrelationId, FiatCurrency, FiatRate, NetworkParameters, SessionPoll,
    SignRequest, TimeSelection,
};

/// Abstract interface to the remote indexing API.
///
/// Futures are `Send` on native so they can run on the tokio runtime. The browser
/// runs everything on one thread, so the bound is dropped there.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ExplorerApi: Send + Sync {
    /// Full account detail at `time`. `bypass_cache` defeats intermediary caches.
    async fn fetch_account(
        &self,
        address: &str,
        time: TimeSelection,
        bypass_cache: bool,
    ) -> Result<AccountSnapshot, ExplorerError>;

    /// Username-only lookup used when adopting a freshly signed identity.
    async fn fetch_username(&self, address: &str) -> Result<Option<String>, ExplorerError>;

    async fn fetch_network_parameters(&self) -> Result<NetworkParameters, ExplorerError>;

    /// Spot rate for `Live`, nearest historical sample for `At`.
    async fn fetch_rate(
        &self,
        currency: FiatCurrency,
        time: TimeSelection,
    ) -> Result<FiatRate, ExplorerError>;
}

/// The wallet-signing counterparty, reduced to its correlation contract.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SignService: Send + Sync {
    /// Registers a request with the wallet service and returns its correlation id.
    async fn open(&self, request: &SignRequest) -> Result<CorrelationId, ExplorerError>;

    async fn poll(&self, id: CorrelationId) -> Result<SessionPoll, ExplorerError>;
}

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use super::fetcher::FetchTicket;
use super::messages::EngineEvent;
use super::rates::RateTicket;
use super::sign_session::OpenTicket;
use crate::data::{ExplorerApi, SignService};
use crate::domain::CorrelationId;

/// Runs network-bound tasks off the event loop.
///
/// Native: a tokio runtime handle. WASM: the browser's microtask queue.
#[derive(Clone)]
pub struct TaskSpawner {
    #[cfg(not(target_arch = "wasm32"))]
    handle: tokio::runtime::Handle,
}

#[cfg(not(target_arch = "wasm32"))]
impl TaskSpawner {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller is running on.
    pub fn current() -> anyhow::Result<Self> {
        Ok(Self::new(tokio::runtime::Handle::try_current()?))
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(task);
    }
}

#[cfg(target_arch = "wasm32")]
impl TaskSpawner {
    pub fn new() -> Self {
        Self {}
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for TaskSpawner {
    fn default() -> Self {
        Self::new()
    }
}

// A send error only means the engine is gone; the completion has nobody to go to.

pub(crate) fn spawn_account_fetch(
    spawner: &TaskSpawner,
    api: Arc<dyn ExplorerApi>,
    ticket: FetchTicket,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = api
            .fetch_account(&ticket.address, ticket.time, ticket.bypass_cache)
            .await;
        let _ = tx.send(EngineEvent::AccountFetched {
            seq: ticket.seq,
            result,
        });
    });
}

pub(crate) fn spawn_rate(
    spawner: &TaskSpawner,
    api: Arc<dyn ExplorerApi>,
    ticket: RateTicket,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = api.fetch_rate(ticket.currency, ticket.time).await;
        let _ = tx.send(EngineEvent::RateResolved {
            seq: ticket.seq,
            result,
        });
    });
}

pub(crate) fn spawn_network_parameters(
    spawner: &TaskSpawner,
    api: Arc<dyn ExplorerApi>,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = api.fetch_network_parameters().await;
        let _ = tx.send(EngineEvent::NetworkParameters(result));
    });
}

pub(crate) fn spawn_username(
    spawner: &TaskSpawner,
    api: Arc<dyn ExplorerApi>,
    address: String,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = api.fetch_username(&address).await;
        let _ = tx.send(EngineEvent::UsernameResolved { address, result });
    });
}

pub(crate) fn spawn_session_open(
    spawner: &TaskSpawner,
    signer: Arc<dyn SignService>,
    ticket: OpenTicket,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = signer.open(&ticket.request).await;
        let _ = tx.send(EngineEvent::SessionOpened {
            seq: ticket.seq,
            result,
        });
    });
}

pub(crate) fn spawn_session_poll(
    spawner: &TaskSpawner,
    signer: Arc<dyn SignService>,
    id: CorrelationId,
    tx: Sender<EngineEvent>,
) {
    spawner.spawn(async move {
        let result = signer.poll(id).await;
        let _ = tx.send(EngineEvent::SessionPolled { id, result });
    });
}

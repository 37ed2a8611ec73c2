#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use account_explorer::data::{ClientStateStore, ExplorerApi, MemoryStateStore, SignService};
use account_explorer::domain::{
    AccountIdentity, AccountSnapshot, CorrelationId, EntryContext, FiatCurrency, FiatRate,
    LedgerInfo, NetworkParameters, SessionPoll, SignRequest, TimeSelection, WalletKind,
};
use account_explorer::{ExplorerEngine, ExplorerError, ExplorerSettings, TaskSpawner};

pub const WAIT: Duration = Duration::from_secs(2);

pub type AccountResponder =
    Box<dyn Fn(&str, TimeSelection, bool) -> Result<AccountSnapshot, ExplorerError> + Send + Sync>;

/// An account fetch held until the test replies to it.
pub struct GatedFetch {
    pub address: String,
    pub time: TimeSelection,
    pub bypass_cache: bool,
    reply: oneshot::Sender<Result<AccountSnapshot, ExplorerError>>,
}

impl GatedFetch {
    pub fn reply(self, result: Result<AccountSnapshot, ExplorerError>) {
        let _ = self.reply.send(result);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
    pub address: String,
    pub time: TimeSelection,
    pub bypass_cache: bool,
}

/// Scripted explorer API and wallet service.
///
/// Ungated calls answer straight from the script. With `gate_fetches` set, every account
/// fetch waits on a oneshot the test resolves, so tests pick the completion order.
pub struct FakeApi {
    responder: AccountResponder,
    gate_fetches: bool,
    gated: Mutex<VecDeque<GatedFetch>>,
    pub fetches: Mutex<Vec<FetchCall>>,
    pub params: Mutex<VecDeque<Result<NetworkParameters, ExplorerError>>>,
    pub params_calls: AtomicUsize,
    pub rate: Mutex<Result<FiatRate, ExplorerError>>,
    pub rate_calls: Mutex<Vec<(FiatCurrency, TimeSelection)>>,
    pub usernames: Mutex<HashMap<String, String>>,
    pub opened: Mutex<Vec<(CorrelationId, SignRequest)>>,
    pub polls: Mutex<HashMap<CorrelationId, SessionPoll>>,
    /// When set, `open` never answers.
    pub hang_open: AtomicBool,
}

impl FakeApi {
    pub fn new(
        responder: impl Fn(&str, TimeSelection, bool) -> Result<AccountSnapshot, ExplorerError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            gate_fetches: false,
            gated: Mutex::new(VecDeque::new()),
            fetches: Mutex::new(Vec::new()),
            params: Mutex::new(VecDeque::new()),
            params_calls: AtomicUsize::new(0),
            rate: Mutex::new(Ok(FiatRate::Known(0.5))),
            rate_calls: Mutex::new(Vec::new()),
            usernames: Mutex::new(HashMap::new()),
            opened: Mutex::new(Vec::new()),
            polls: Mutex::new(HashMap::new()),
            hang_open: AtomicBool::new(false),
        }
    }

    /// Every address resolves to a funded account with three owned objects.
    pub fn funded() -> Self {
        Self::new(|address, _, _| Ok(snapshot(address, 20_000_000, 3)))
    }

    pub fn gated() -> Self {
        let mut api = Self::funded();
        api.gate_fetches = true;
        api
    }

    pub fn with_params(self, params: NetworkParameters) -> Self {
        self.params.lock().unwrap().push_back(Ok(params));
        self
    }

    pub fn pending_fetches(&self) -> usize {
        self.gated.lock().unwrap().len()
    }

    /// Takes the held fetch for `address`, oldest first.
    pub fn take_fetch(&self, address: &str) -> Option<GatedFetch> {
        let mut gated = self.gated.lock().unwrap();
        let pos = gated.iter().position(|f| f.address == address)?;
        gated.remove(pos)
    }

    pub fn fetch_calls(&self) -> Vec<FetchCall> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn set_poll(&self, id: CorrelationId, poll: SessionPoll) {
        self.polls.lock().unwrap().insert(id, poll);
    }

    pub fn params_fetches(&self) -> usize {
        self.params_calls.load(Ordering::SeqCst)
    }

    pub fn opened_ids(&self) -> Vec<CorrelationId> {
        self.opened.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl ExplorerApi for FakeApi {
    async fn fetch_account(
        &self,
        address: &str,
        time: TimeSelection,
        bypass_cache: bool,
    ) -> Result<AccountSnapshot, ExplorerError> {
        self.fetches.lock().unwrap().push(FetchCall {
            address: address.to_string(),
            time,
            bypass_cache,
        });
        if !self.gate_fetches {
            return (self.responder)(address, time, bypass_cache);
        }

        let (tx, rx) = oneshot::channel();
        self.gated.lock().unwrap().push_back(GatedFetch {
            address: address.to_string(),
            time,
            bypass_cache,
            reply: tx,
        });
        rx.await
            .unwrap_or_else(|_| Err(ExplorerError::transport("dropped")))
    }

    async fn fetch_username(&self, address: &str) -> Result<Option<String>, ExplorerError> {
        Ok(self.usernames.lock().unwrap().get(address).cloned())
    }

    async fn fetch_network_parameters(&self) -> Result<NetworkParameters, ExplorerError> {
        self.params_calls.fetch_add(1, Ordering::SeqCst);
        self.params
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(default_params()))
    }

    async fn fetch_rate(
        &self,
        currency: FiatCurrency,
        time: TimeSelection,
    ) -> Result<FiatRate, ExplorerError> {
        self.rate_calls.lock().unwrap().push((currency, time));
        self.rate.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignService for FakeApi {
    async fn open(&self, request: &SignRequest) -> Result<CorrelationId, ExplorerError> {
        if self.hang_open.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let id = CorrelationId::from(Uuid::new_v4());
        self.opened.lock().unwrap().push((id, request.clone()));
        Ok(id)
    }

    async fn poll(&self, id: CorrelationId) -> Result<SessionPoll, ExplorerError> {
        Ok(self
            .polls
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(SessionPoll::Pending))
    }
}

pub fn default_params() -> NetworkParameters {
    NetworkParameters {
        reserve_base: 10_000_000,
        reserve_increment: 2_000_000,
    }
}

pub fn snapshot(address: &str, balance: u64, owner_count: u64) -> AccountSnapshot {
    AccountSnapshot {
        address: address.to_string(),
        username: None,
        service: None,
        ledger_info: Some(LedgerInfo {
            balance,
            owner_count,
            activated: true,
            blackholed: false,
            domain: None,
            did: None,
            reward_lgr_first: None,
        }),
        xaman_meta: None,
        inception: Some(1_500_000_000),
    }
}

pub fn xaman(address: &str) -> AccountIdentity {
    AccountIdentity {
        address: address.to_string(),
        wallet: WalletKind::Xaman,
        username: None,
    }
}

pub fn entry(address: &str) -> EntryContext {
    EntryContext {
        address: Some(address.to_string()),
        ..Default::default()
    }
}

/// Must be called from inside a tokio runtime.
pub fn engine(api: &Arc<FakeApi>, store: &MemoryStateStore, entry: EntryContext) -> ExplorerEngine {
    let store: Box<dyn ClientStateStore> = Box::new(store.clone());
    ExplorerEngine::new(
        api.clone(),
        api.clone(),
        store,
        TaskSpawner::current().unwrap(),
        ExplorerSettings::default(),
        entry,
    )
}

/// Lets completions already in flight land without waiting on any condition.
pub async fn drain(engine: &mut ExplorerEngine) {
    engine.pump_until(|_| false, Duration::from_millis(50)).await;
}

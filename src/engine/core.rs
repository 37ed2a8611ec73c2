use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::ExplorerError;
use crate::config::{ENGINE, ExplorerSettings};
use crate::data::{ClientState, ClientStateStore, ExplorerApi, PendingSessionRecord, SignService};
use crate::domain::{
    AccountIdentity, CorrelationId, EntryContext, FiatCurrency, NetworkParameters, PostSignIntent,
    SignRequest,
};
use crate::utils::{AppInstant, TimeUtils};

#[cfg(debug_assertions)]
use crate::config::DF;

use super::actions::{OfferedAction, offered_actions};
use super::fetcher::FetchTicket;
use super::identity::{IdentityHandle, identity_store};
use super::messages::EngineEvent;
use super::network_params::SharedNetworkParams;
use super::sign_session::{
    AbandonedOpen, SessionStatus, SignSession, SignSessionCoordinator, TickAction,
};
use super::view::AccountView;
use super::worker::{self, TaskSpawner};

pub struct ExplorerEngine {
    api: Arc<dyn ExplorerApi>,
    signer: Arc<dyn SignService>,
    store: Box<dyn ClientStateStore>,
    spawner: TaskSpawner,

    // Completions from spawned tasks
    event_tx: Sender<EngineEvent>,
    event_rx: Receiver<EngineEvent>,

    /// Process-wide reserve parameters, shared with any other view.
    network: SharedNetworkParams,
    view: AccountView,
    sessions: SignSessionCoordinator,
    identity: IdentityHandle,
    currency: FiatCurrency,
    settings: ExplorerSettings,

    /// Correlation id from the entry URL, consumed by `start`.
    entry_session: Option<CorrelationId>,
    /// Bookkeeping loaded from storage, consumed by the first resume.
    restored_session: Option<PendingSessionRecord>,
    last_sign_outcome: Option<SignSession>,
    abandoned_open: Option<AbandonedOpen>,
    sign_error: Option<ExplorerError>,
}

impl ExplorerEngine {
    /// Builds the engine from persisted client state and the page's entry context.
    /// Nothing touches the network until `start`.
    pub fn new(
        api: Arc<dyn ExplorerApi>,
        signer: Arc<dyn SignService>,
        store: Box<dyn ClientStateStore>,
        spawner: TaskSpawner,
        settings: ExplorerSettings,
        entry: EntryContext,
    ) -> Self {
        let restored = match store.load() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                log::warn!(
                    "{}",
                    ExplorerError::Storage {
                        reason: format!("{:#}", e)
                    }
                );
                ClientState::default()
            }
        };

        #[cfg(debug_assertions)]
        if DF.log_persistence {
            log::info!("STATE loaded: {:?}", restored);
        }

        // A bare /account page shows the signed-in account.
        let mut entry = entry;
        if entry.address.is_none() {
            entry.address = restored.account.as_ref().map(|a| a.address.clone());
        }

        let (identity, writer) = identity_store(restored.account);
        let (event_tx, event_rx) = channel();

        Self {
            api,
            signer,
            store,
            spawner,
            event_tx,
            event_rx,
            network: SharedNetworkParams::new(),
            view: AccountView::new(&entry),
            sessions: SignSessionCoordinator::new(writer),
            identity,
            currency: restored.currency,
            settings,
            entry_session: entry.correlation_id,
            restored_session: restored.pending_session,
            last_sign_outcome: None,
            abandoned_open: None,
            sign_error: None,
        }
    }

    /// Shares reserve parameters already loaded by another view instead of fetching them.
    pub fn with_network_parameters(mut self, network: SharedNetworkParams) -> Self {
        self.network = network;
        self
    }

    /// Initial loads: network parameters once per session, the entry account, and the
    /// sign session named by the entry URL.
    pub fn start(&mut self) {
        if self.network.needs_initial_load() {
            self.refresh_network_parameters();
        }

        if let Some(ticket) = self.view.load(false) {
            self.spawn_fetch(ticket);
        }

        match self.entry_session.take() {
            Some(id) => self.resume_session(id),
            None => {
                // Leftover from a redirect that never came back.
                if self.restored_session.take().is_some() {
                    log::info!("Dropping pending sign session with no matching redirect");
                    self.persist();
                }
            }
        }
    }

    /// One pass of the event loop.
    pub fn update(&mut self) {
        // Completions
        let t1 = AppInstant::now();
        let mut events = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            events += 1;
        }
        let d1 = t1.elapsed().as_micros();

        // Sign session timeout / polling
        let t2 = AppInstant::now();
        self.tick_sessions(t2);
        let d2 = t2.elapsed().as_micros();

        // Derived values
        let t3 = AppInstant::now();
        self.view.recompute_balances(&self.network);
        if let Some(ticket) = self.view.rate_ticket(self.currency) {
            worker::spawn_rate(&self.spawner, self.api.clone(), ticket, self.event_tx.clone());
        }
        let d3 = t3.elapsed().as_micros();

        if t1.elapsed() > ENGINE.slow_update_threshold {
            log::warn!(
                "ENGINE SLOW: Events ({}): {}us | Sessions: {}us | Derived: {}us",
                events,
                d1,
                d2,
                d3
            );
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::AccountFetched { seq, result } => {
                // Failures are already on the view; stale drops are simply ignored.
                let _ = self.view.apply_fetch(seq, result);
            }
            EngineEvent::RateResolved { seq, result } => {
                let _ = self.view.apply_rate(seq, result);
            }
            EngineEvent::NetworkParameters(result) => {
                self.network.complete_refresh(result);
            }
            EngineEvent::SessionOpened { seq, result } => {
                match self.sessions.opened(seq, result, AppInstant::now()) {
                    Ok((abandoned, _)) => {
                        if abandoned.is_some() {
                            self.last_sign_outcome = abandoned;
                        }
                        self.sign_error = None;
                        self.persist();
                    }
                    Err(ExplorerError::StaleResultDiscarded { .. }) => {}
                    Err(e) => self.sign_error = Some(e),
                }
            }
            EngineEvent::SessionPolled { id, result } => {
                if let Some(done) = self.sessions.poll_completed(id, result) {
                    self.finish_session(done);
                }
            }
            EngineEvent::UsernameResolved { address, result } => match result {
                Ok(username) => {
                    if self.sessions.attach_username(&address, username) {
                        self.persist();
                    }
                }
                Err(e) => log::warn!("Username lookup for {} failed: {}", address, e),
            },
        }
    }

    fn tick_sessions(&mut self, now: AppInstant) {
        match self.sessions.tick(now) {
            TickAction::Idle => {}
            TickAction::Poll(id) => {
                worker::spawn_session_poll(
                    &self.spawner,
                    self.signer.clone(),
                    id,
                    self.event_tx.clone(),
                );
            }
            TickAction::TimedOut(session) => self.finish_session(session),
            TickAction::OpenTimedOut(open) => {
                log::warn!("Sign service never answered the open for {:?}", open.request.action);
                self.abandoned_open = Some(open);
            }
        }
    }

    /// Follow-up work once a session leaves `Pending`.
    fn finish_session(&mut self, session: SignSession) {
        if session.status == SessionStatus::Resolved {
            if let Some(identity) = session.result_identity.clone() {
                match session.intent {
                    PostSignIntent::AdoptIdentity => self.adopted(&identity),
                    PostSignIntent::OneOff => {
                        if session.submits_transaction() {
                            if let Some(ticket) = self.view.load(true) {
                                self.spawn_fetch(ticket);
                            }
                        }
                    }
                }
            }
        }
        self.last_sign_outcome = Some(session);
        self.persist();
    }

    fn adopted(&mut self, identity: &AccountIdentity) {
        if let Some(ticket) = self.view.show(&identity.address, true) {
            self.spawn_fetch(ticket);
        }
        if identity.username.is_none() {
            worker::spawn_username(
                &self.spawner,
                self.api.clone(),
                identity.address.clone(),
                self.event_tx.clone(),
            );
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        worker::spawn_account_fetch(&self.spawner, self.api.clone(), ticket, self.event_tx.clone());
    }

    fn persist(&self) {
        let state = ClientState {
            currency: self.currency,
            account: self.identity.current(),
            pending_session: self.sessions.pending_record(),
        };

        #[cfg(debug_assertions)]
        if DF.log_persistence {
            log::info!("STATE save: {:?}", state);
        }

        if let Err(e) = self.store.save(&state) {
            log::warn!(
                "{}",
                ExplorerError::Storage {
                    reason: format!("{:#}", e)
                }
            );
        }
    }

    // --- Controls ---

    pub fn set_address(&mut self, address: &str) {
        if let Some(ticket) = self.view.set_address(address) {
            self.spawn_fetch(ticket);
        }
    }

    /// Manual refresh: refetches past any cache and re-resolves the rate.
    pub fn refresh(&mut self) {
        if let Some(ticket) = self.view.load(true) {
            self.spawn_fetch(ticket);
            let rate = self.view.refresh_rate(self.currency);
            worker::spawn_rate(&self.spawner, self.api.clone(), rate, self.event_tx.clone());
        }
    }

    pub fn select_instant(&mut self, instant: DateTime<Utc>) -> Result<(), ExplorerError> {
        self.view.select_instant(instant, TimeUtils::now_utc())
    }

    /// Returns true when a fetch for the newly confirmed instant was issued.
    pub fn confirm_instant(&mut self) -> bool {
        match self.view.confirm_instant() {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    pub fn reset_time_machine(&mut self) -> bool {
        match self.view.reset_time_machine() {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    /// The rate is re-resolved on the next `update`.
    pub fn set_currency(&mut self, currency: FiatCurrency) {
        if self.currency == currency {
            return;
        }
        self.currency = currency;
        self.persist();
    }

    pub fn request_sign(&mut self, request: SignRequest) {
        let (abandoned, ticket) = self.sessions.initiate(request, AppInstant::now());
        if abandoned.is_some() {
            self.last_sign_outcome = abandoned;
        }
        self.abandoned_open = None;
        self.sign_error = None;
        worker::spawn_session_open(
            &self.spawner,
            self.signer.clone(),
            ticket,
            self.event_tx.clone(),
        );
        self.persist();
    }

    pub fn dismiss_sign(&mut self) {
        if let Some(abandoned) = self.sessions.dismiss() {
            self.last_sign_outcome = Some(abandoned);
        }
        self.persist();
    }

    /// Resumes a session handed over by an external redirect.
    pub fn resume_session(&mut self, id: CorrelationId) {
        let record = self.restored_session.take();
        if let Some(abandoned) = self.sessions.resume(id, record.as_ref(), AppInstant::now()) {
            self.last_sign_outcome = Some(abandoned);
        }
        self.persist();
    }

    pub fn sign_out(&mut self) {
        self.sessions.sign_out();
        self.persist();
    }

    /// No-op while a refresh is already running.
    pub fn refresh_network_parameters(&mut self) {
        if self.network.begin_refresh() {
            worker::spawn_network_parameters(
                &self.spawner,
                self.api.clone(),
                self.event_tx.clone(),
            );
        }
    }

    pub fn set_session_timing(&mut self, poll_interval: Duration, timeout: Duration) {
        self.sessions.set_timing(poll_interval, timeout);
    }

    // --- Accessors ---

    pub fn view(&self) -> &AccountView {
        &self.view
    }

    pub fn offered_actions(&self) -> Vec<OfferedAction> {
        match self.view.snapshot() {
            Some(snapshot) => offered_actions(
                snapshot,
                self.identity.current().as_ref(),
                self.settings.network,
            ),
            None => Vec::new(),
        }
    }

    pub fn identity(&self) -> &IdentityHandle {
        &self.identity
    }

    pub fn active_identity(&self) -> Option<AccountIdentity> {
        self.identity.current()
    }

    pub fn currency(&self) -> FiatCurrency {
        self.currency
    }

    pub fn network(&self) -> &SharedNetworkParams {
        &self.network
    }

    pub fn network_parameters(&self) -> Option<NetworkParameters> {
        self.network.get()
    }

    pub fn pending_session(&self) -> Option<&SignSession> {
        self.sessions.pending()
    }

    pub fn is_signing(&self) -> bool {
        !self.sessions.is_idle()
    }

    pub fn last_sign_outcome(&self) -> Option<&SignSession> {
        self.last_sign_outcome.as_ref()
    }

    /// The last request whose open was given up before the sign service answered.
    pub fn abandoned_open(&self) -> Option<&AbandonedOpen> {
        self.abandoned_open.as_ref()
    }

    pub fn sign_error(&self) -> Option<&ExplorerError> {
        self.sign_error.as_ref()
    }

    /// No account fetch, rate or network parameters refresh in flight.
    pub fn is_settled(&self) -> bool {
        !self.view.is_loading() && !self.view.is_rate_loading() && !self.network.is_refreshing()
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    /// NATIVE ONLY: alternates `update` with short sleeps until `done` holds or the
    /// timeout passes. Returns whether `done` was reached.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn pump_until(
        &mut self,
        mut done: impl FnMut(&Self) -> bool,
        timeout: Duration,
    ) -> bool {
        let deadline = AppInstant::now() + timeout;
        loop {
            self.update();
            if done(&*self) {
                return true;
            }
            if AppInstant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(ENGINE.pump_interval).await;
        }
    }
}

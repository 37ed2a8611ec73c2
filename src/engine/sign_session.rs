use std::time::Duration;

use super::identity::IdentityWriter;
use super::sequencer::{RequestSequencer, Seq};
use crate::ExplorerError;
use crate::config::SESSION;
use crate::data::PendingSessionRecord;
use crate::domain::{AccountIdentity, CorrelationId, PostSignIntent, SessionPoll, SignRequest};
use crate::utils::AppInstant;

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Resolved,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    Dismissed,
    TimedOut,
    /// A newer session was initiated or resumed.
    Superseded,
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct SignSession {
    pub correlation_id: CorrelationId,
    pub status: SessionStatus,
    pub request: Option<SignRequest>,
    pub intent: PostSignIntent,
    pub result_identity: Option<AccountIdentity>,
    pub abandon_reason: Option<AbandonReason>,
    started_at: AppInstant,
    last_poll: Option<AppInstant>,
    poll_in_flight: bool,
}

impl SignSession {
    fn pending(
        correlation_id: CorrelationId,
        request: Option<SignRequest>,
        intent: PostSignIntent,
        now: AppInstant,
    ) -> Self {
        Self {
            correlation_id,
            status: SessionStatus::Pending,
            request,
            intent,
            result_identity: None,
            abandon_reason: None,
            started_at: now,
            last_poll: None,
            poll_in_flight: false,
        }
    }

    pub fn submits_transaction(&self) -> bool {
        self.request
            .as_ref()
            .is_some_and(|r| r.operation.is_some() && !r.sign_only)
    }
}

/// A request waiting for the sign service to hand out its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTicket {
    pub seq: Seq,
    pub request: SignRequest,
}

/// An open that never got its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonedOpen {
    pub request: SignRequest,
    pub reason: AbandonReason,
}

#[derive(Debug)]
struct Opening {
    request: SignRequest,
    started_at: AppInstant,
}

#[derive(Debug)]
pub enum TickAction {
    Idle,
    Poll(CorrelationId),
    TimedOut(SignSession),
    OpenTimedOut(AbandonedOpen),
}

/// Owns the single pending session and the only write access to the active identity.
#[derive(Debug)]
pub struct SignSessionCoordinator {
    pending: Option<SignSession>,
    identity: IdentityWriter,
    opening_sequencer: RequestSequencer,
    opening: Option<Opening>,
    poll_interval: Duration,
    timeout: Duration,
}

impl SignSessionCoordinator {
    pub fn new(identity: IdentityWriter) -> Self {
        Self::with_timing(identity, SESSION.poll_interval, SESSION.timeout)
    }

    pub fn with_timing(
        identity: IdentityWriter,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            pending: None,
            identity,
            opening_sequencer: RequestSequencer::new(),
            opening: None,
            poll_interval,
            timeout,
        }
    }

    pub fn set_timing(&mut self, poll_interval: Duration, timeout: Duration) {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
    }

    /// Abandons any pending session before anything new is opened. The timeout runs from `now`.
    pub fn initiate(
        &mut self,
        request: SignRequest,
        now: AppInstant,
    ) -> (Option<SignSession>, OpenTicket) {
        let abandoned = self.abandon(AbandonReason::Superseded);
        let seq = self.opening_sequencer.issue();
        self.opening = Some(Opening {
            request: request.clone(),
            started_at: now,
        });

        #[cfg(debug_assertions)]
        if DF.log_sign_session {
            log::info!("SIGN open #{}: {:?}", seq.value(), request.action);
        }

        (abandoned, OpenTicket { seq, request })
    }

    /// Completes an open. The new session becomes pending only if this open is still the latest.
    pub fn opened(
        &mut self,
        seq: Seq,
        result: Result<CorrelationId, ExplorerError>,
        now: AppInstant,
    ) -> Result<(Option<SignSession>, CorrelationId), ExplorerError> {
        self.opening_sequencer.check(seq)?;
        let Some(Opening { request, .. }) = self.opening.take() else {
            return Err(ExplorerError::StaleResultDiscarded {
                seq: seq.value(),
                current: seq.value(),
            });
        };
        let id = result.inspect_err(|e| log::warn!("Opening sign session failed: {}", e))?;
        let intent = request.intent();
        let abandoned = self.begin(id, Some(request), intent, now);
        Ok((abandoned, id))
    }

    /// Picks up a session started before a redirect. A record for another id is ignored.
    pub fn resume(
        &mut self,
        id: CorrelationId,
        record: Option<&PendingSessionRecord>,
        now: AppInstant,
    ) -> Option<SignSession> {
        self.cancel_opening();
        let (request, intent) = match record {
            Some(r) if r.correlation_id == id => (r.request.clone(), r.intent),
            _ => (None, PostSignIntent::AdoptIdentity),
        };
        self.begin(id, request, intent, now)
    }

    fn begin(
        &mut self,
        id: CorrelationId,
        request: Option<SignRequest>,
        intent: PostSignIntent,
        now: AppInstant,
    ) -> Option<SignSession> {
        let abandoned = self.abandon(AbandonReason::Superseded);

        #[cfg(debug_assertions)]
        if DF.log_sign_session {
            log::info!("SIGN pending {} ({:?})", id, intent);
        }

        self.pending = Some(SignSession::pending(id, request, intent, now));
        abandoned
    }

    /// Invalidates an in-flight open so its completion is dropped.
    fn cancel_opening(&mut self) {
        if self.opening.take().is_some() {
            self.opening_sequencer.issue();
        }
    }

    pub fn abandon(&mut self, reason: AbandonReason) -> Option<SignSession> {
        let mut session = self.pending.take()?;

        #[cfg(debug_assertions)]
        if DF.log_sign_session {
            log::info!("SIGN abandoned {}: {:?}", session.correlation_id, reason);
        }

        session.status = SessionStatus::Abandoned;
        session.abandon_reason = Some(reason);
        Some(session)
    }

    /// User closed the dialog: drops both the pending session and any open in flight.
    pub fn dismiss(&mut self) -> Option<SignSession> {
        self.cancel_opening();
        self.abandon(AbandonReason::Dismissed)
    }

    /// Enforces the timeout and hands out at most one poll per interval.
    pub fn tick(&mut self, now: AppInstant) -> TickAction {
        if let Some(opening) = &self.opening {
            if now.saturating_duration_since(opening.started_at) < self.timeout {
                return TickAction::Idle;
            }
            let request = opening.request.clone();
            self.cancel_opening();

            #[cfg(debug_assertions)]
            if DF.log_sign_session {
                log::info!("SIGN open timed out: {:?}", request.action);
            }

            return TickAction::OpenTimedOut(AbandonedOpen {
                request,
                reason: AbandonReason::TimedOut,
            });
        }

        let Some(session) = self.pending.as_mut() else {
            return TickAction::Idle;
        };
        if now.saturating_duration_since(session.started_at) >= self.timeout {
            return match self.abandon(AbandonReason::TimedOut) {
                Some(s) => TickAction::TimedOut(s),
                None => TickAction::Idle,
            };
        }
        if session.poll_in_flight {
            return TickAction::Idle;
        }
        let due = session
            .last_poll
            .is_none_or(|t| now.saturating_duration_since(t) >= self.poll_interval);
        if !due {
            return TickAction::Idle;
        }
        session.poll_in_flight = true;
        session.last_poll = Some(now);
        TickAction::Poll(session.correlation_id)
    }

    /// `Some` when the poll ended the session. Polls for a session no longer pending are ignored.
    pub fn poll_completed(
        &mut self,
        id: CorrelationId,
        result: Result<SessionPoll, ExplorerError>,
    ) -> Option<SignSession> {
        let session = self.pending.as_mut().filter(|s| s.correlation_id == id)?;
        session.poll_in_flight = false;

        match result {
            Ok(SessionPoll::Pending) => None,
            Ok(SessionPoll::Signed(identity)) => self.resolve(id, identity),
            Ok(SessionPoll::Rejected { reason }) => self.abandon(AbandonReason::Rejected(reason)),
            Err(e) => {
                // Retried on the next interval until the timeout.
                log::warn!("Polling sign session {} failed: {}", id, e);
                None
            }
        }
    }

    /// The only place the active identity is set.
    pub fn resolve(&mut self, id: CorrelationId, identity: AccountIdentity) -> Option<SignSession> {
        if self.pending.as_ref().is_none_or(|s| s.correlation_id != id) {
            return None;
        }
        let mut session = self.pending.take()?;

        #[cfg(debug_assertions)]
        if DF.log_sign_session {
            log::info!(
                "SIGN resolved {}: {} via {} ({:?})",
                id,
                identity.address,
                identity.wallet,
                session.intent
            );
        }

        if session.intent == PostSignIntent::AdoptIdentity {
            self.identity.adopt(identity.clone());
        }
        session.status = SessionStatus::Resolved;
        session.result_identity = Some(identity);
        Some(session)
    }

    pub fn attach_username(&self, address: &str, username: Option<String>) -> bool {
        self.identity.set_username(address, username)
    }

    pub fn sign_out(&self) {
        log::info!("Signed out");
        self.identity.clear();
    }

    pub fn pending(&self) -> Option<&SignSession> {
        self.pending.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.opening.is_none()
    }

    pub fn pending_record(&self) -> Option<PendingSessionRecord> {
        self.pending.as_ref().map(|s| PendingSessionRecord {
            correlation_id: s.correlation_id,
            request: s.request.clone(),
            intent: s.intent,
        })
    }
}

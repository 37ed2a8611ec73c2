use super::sequencer::Seq;
use crate::ExplorerError;
use crate::domain::{AccountSnapshot, CorrelationId, FiatRate, NetworkParameters, SessionPoll};

/// Completion of a spawned network task, sent back to the engine's event loop.
#[derive(Debug)]
pub enum EngineEvent {
    AccountFetched {
        seq: Seq,
        result: Result<AccountSnapshot, ExplorerError>,
    },
    RateResolved {
        seq: Seq,
        result: Result<FiatRate, ExplorerError>,
    },
    NetworkParameters(Result<NetworkParameters, ExplorerError>),
    SessionOpened {
        seq: Seq,
        result: Result<CorrelationId, ExplorerError>,
    },
    SessionPolled {
        id: CorrelationId,
        result: Result<SessionPoll, ExplorerError>,
    },
    UsernameResolved {
        address: String,
        result: Result<Option<String>, ExplorerError>,
    },
}

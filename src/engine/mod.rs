mod actions;
mod balances;
mod core;
mod derived;
mod fetcher;
mod identity;
mod messages;
mod network_params;
mod rates;
mod sequencer;
mod sign_session;
mod time_machine;
mod view;
mod worker;

pub use core::ExplorerEngine;

pub use actions::{OfferedAction, offered_actions};
pub use balances::{BalanceBuckets, FiatBuckets, minor_to_native, reconcile, reconcile_ledger};
pub use derived::Derived;
pub use fetcher::{AccountFetcher, FetchTicket};
pub use identity::{IdentityHandle, IdentityWriter, identity_store};
pub use messages::EngineEvent;
pub use network_params::SharedNetworkParams;
pub use rates::{RateKey, RateResolver, RateTicket};
pub use sequencer::{RequestSequencer, Seq};
pub use sign_session::{
    AbandonReason, AbandonedOpen, OpenTicket, SessionStatus, SignSession, SignSessionCoordinator,
    TickAction,
};
pub use time_machine::{TimeMachine, validate_instant};
pub use view::AccountView;
pub use worker::TaskSpawner;

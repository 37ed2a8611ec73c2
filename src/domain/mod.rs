// Domain types and value objects
mod account;
mod amount;
mod currency;
mod entry;
mod identity;
mod network;
mod sign;
mod time_selection;

// Re-export commonly used types to the world
pub use account::{
    AccountSnapshot, GlobalId, LedgerInfo, Monetisation, PageIdentity, ServiceInfo, XamanMeta,
    XummProfile,
};
pub use currency::{FiatCurrency, FiatRate};
pub use entry::EntryContext;
pub use identity::{AccountIdentity, WalletKind};
pub use network::NetworkParameters;
pub use sign::{ActionKind, CorrelationId, Operation, PostSignIntent, SessionPoll, SignRequest};
pub use time_selection::TimeSelection;

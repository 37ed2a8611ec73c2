//! Configuration module for the account explorer.

// Can all be private now because we have a public re-export.
mod api;
mod debug;
mod engine;
mod network;
mod persistence;
mod session;
mod settings;

// Re-export commonly used items
pub use api::{API, ADDRESS_QUERY_FLAGS, ApiConfig};
pub use debug::DF;
pub use engine::{ENGINE, EngineConfig};
pub use network::{NATIVE_SCALE, NetworkKind, REWARDS_HOOK_ISSUER};
pub use persistence::PERSISTENCE;
pub use session::{SESSION, SessionConfig};
pub use settings::ExplorerSettings;

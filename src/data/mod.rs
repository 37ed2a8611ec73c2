mod http;
mod payload;
mod provider;
mod storage;

pub use {
    http::HttpExplorerApi,
    provider::{ExplorerApi, SignService},
    storage::{ClientState, ClientStateStore, MemoryStateStore, PendingSessionRecord},
};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStateStore;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;

//! Client-side state persistence configuration

/// Native: JSON file next to the binary's working directory.
pub struct FilePersistenceConfig {
    pub state_path: &'static str,
}

/// Browser: a single localStorage entry.
pub struct BrowserPersistenceConfig {
    pub storage_key: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub file: FilePersistenceConfig,
    pub browser: BrowserPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    file: FilePersistenceConfig {
        state_path: ".explorer_state.json",
    },
    browser: BrowserPersistenceConfig {
        storage_key: "account-explorer-state",
    },
};

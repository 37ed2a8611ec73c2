use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

#[cfg(not(target_arch = "wasm32"))]
use {
    anyhow::Context,
    std::fs::File,
    std::io::{BufReader, BufWriter, Write},
    std::path::PathBuf,
};

use crate::domain::{AccountIdentity, CorrelationId, FiatCurrency, PostSignIntent, SignRequest};

/// Bookkeeping that lets a sign session survive the wallet redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSessionRecord {
    pub correlation_id: CorrelationId,
    #[serde(default)]
    pub request: Option<SignRequest>,
    pub intent: PostSignIntent,
}

/// Everything kept across page loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientState {
    pub currency: FiatCurrency,
    pub account: Option<AccountIdentity>,
    pub pending_session: Option<PendingSessionRecord>,
}

/// Abstract interface for client state storage (Native vs WASM)
pub trait ClientStateStore: Send + Sync {
    fn load(&self) -> Result<Option<ClientState>>;
    fn save(&self, state: &ClientState) -> Result<()>;
}

// --- IN-MEMORY IMPLEMENTATION ---

/// Clones share the same slot, so a test can keep a handle and inspect what the engine saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<Option<ClientState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ClientState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(state))),
        }
    }

    pub fn snapshot(&self) -> Option<ClientState> {
        self.inner.read().unwrap().clone()
    }
}

impl ClientStateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<ClientState>> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &ClientState) -> Result<()> {
        *self.inner.write().unwrap() = Some(state.clone());
        Ok(())
    }
}

// --- NATIVE IMPLEMENTATION ---

#[cfg(not(target_arch = "wasm32"))]
pub struct FileStateStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ClientStateStore for FileStateStore {
    fn load(&self) -> Result<Option<ClientState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let state = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &ClientState) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        Ok(())
    }
}

// --- WASM IMPLEMENTATION ---

#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| anyhow::anyhow!("localStorage unavailable"))
    }
}

#[cfg(target_arch = "wasm32")]
impl ClientStateStore for LocalStorageStore {
    fn load(&self) -> Result<Option<ClientState>> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| anyhow::anyhow!("localStorage read failed"))?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &ClientState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|_| anyhow::anyhow!("localStorage write failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WalletKind;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_store_round_trips_state() {
        let path = std::env::temp_dir().join(format!(
            "account-explorer-state-{}.json",
            uuid::Uuid::new_v4()
        ));
        let store = FileStateStore::new(&path);
        assert!(store.load().unwrap().is_none());

        let state = ClientState {
            currency: FiatCurrency::Eur,
            account: Some(AccountIdentity {
                address: "rAlice".into(),
                wallet: WalletKind::Ledger,
                username: None,
            }),
            pending_session: None,
        };
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
        let _ = std::fs::remove_file(path);
    }

    // Writes to /dev/full only fail once the buffer is flushed.
    #[cfg(target_os = "linux")]
    #[test]
    fn file_store_reports_failed_flush() {
        let store = FileStateStore::new("/dev/full");
        assert!(store.save(&ClientState::default()).is_err());
    }

    #[test]
    fn partial_state_fills_defaults() {
        let state: ClientState = serde_json::from_str(r#"{ "currency": "jpy" }"#).unwrap();
        assert_eq!(state.currency, FiatCurrency::Jpy);
        assert!(state.account.is_none());
    }
}

use std::sync::{Arc, RwLock};

use crate::ExplorerError;
use crate::domain::NetworkParameters;

#[derive(Debug, Default)]
struct ParamsSlot {
    current: Option<NetworkParameters>,
    revision: u64,
    refresh_in_flight: bool,
    last_error: Option<ExplorerError>,
}

/// Process-wide reserve parameters.
///
/// Readers always see the latest successfully fetched value, or the previous one while
/// a refresh is in flight.
#[derive(Debug, Clone, Default)]
pub struct SharedNetworkParams {
    // Arc lets every view share ownership. RwLock lets the engine publish safely.
    inner: Arc<RwLock<ParamsSlot>>,
}

impl SharedNetworkParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<NetworkParameters> {
        self.inner.read().unwrap().current
    }

    /// Bumped on every publish; balance recomputation keys on it.
    pub fn revision(&self) -> u64 {
        self.inner.read().unwrap().revision
    }

    /// Claims the refresh slot. False when one is already running.
    pub fn begin_refresh(&self) -> bool {
        let mut slot = self.inner.write().unwrap();
        if slot.refresh_in_flight {
            return false;
        }
        slot.refresh_in_flight = true;
        true
    }

    /// Lazy once-per-session load: true if nothing was ever published and no refresh runs.
    pub fn needs_initial_load(&self) -> bool {
        let slot = self.inner.read().unwrap();
        slot.current.is_none() && !slot.refresh_in_flight
    }

    pub fn complete_refresh(&self, result: Result<NetworkParameters, ExplorerError>) {
        let mut slot = self.inner.write().unwrap();
        slot.refresh_in_flight = false;
        match result {
            Ok(params) => {
                slot.current = Some(params);
                slot.revision += 1;
                slot.last_error = None;
            }
            Err(e) => {
                log::warn!("Network parameters refresh failed: {}", e);
                slot.last_error = Some(e);
            }
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.read().unwrap().refresh_in_flight
    }

    pub fn error(&self) -> Option<ExplorerError> {
        self.inner.read().unwrap().last_error.clone()
    }
}

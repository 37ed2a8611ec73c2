use std::sync::{Arc, RwLock};

use crate::domain::AccountIdentity;

/// Read side of the active-account identity. Cheap to clone; every clone comes from the
/// same `identity_store` call, so readers in one engine see one identity.
#[derive(Debug, Clone, Default)]
pub struct IdentityHandle {
    inner: Arc<RwLock<Option<AccountIdentity>>>,
}

/// Write side. Exactly one exists per store, owned by the sign-session coordinator.
#[derive(Debug)]
pub struct IdentityWriter {
    inner: Arc<RwLock<Option<AccountIdentity>>>,
}

pub fn identity_store(initial: Option<AccountIdentity>) -> (IdentityHandle, IdentityWriter) {
    let inner = Arc::new(RwLock::new(initial));
    (
        IdentityHandle {
            inner: inner.clone(),
        },
        IdentityWriter { inner },
    )
}

impl IdentityHandle {
    pub fn current(&self) -> Option<AccountIdentity> {
        self.inner.read().unwrap().clone()
    }

    pub fn address(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .as_ref()
            .map(|i| i.address.clone())
    }
}

impl IdentityWriter {
    pub(super) fn adopt(&self, identity: AccountIdentity) {
        *self.inner.write().unwrap() = Some(identity);
    }

    pub(super) fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    /// Only applies while `address` is still the active account.
    pub(super) fn set_username(&self, address: &str, username: Option<String>) -> bool {
        let mut slot = self.inner.write().unwrap();
        match slot.as_mut() {
            Some(identity) if identity.address == address => {
                identity.username = username;
                true
            }
            _ => false,
        }
    }
}

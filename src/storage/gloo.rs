//! Browser storage through `window.sessionStorage` / `window.localStorage`
//!
//! Both getters throw when the page may not touch storage (blocked cookies,
//! sandboxed iframes), so the constructors return `None` instead.

use super::KeyValueStore;
use crate::error::{ErrorKind, Result};

/// `sessionStorage` or `localStorage`
pub struct WebStorage {
    raw: web_sys::Storage,
}

impl WebStorage {
    /// Tab-scoped namespace
    pub fn session() -> Option<Self> {
        let raw = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self { raw })
    }

    /// Namespace that survives browser restarts
    pub fn local() -> Option<Self> {
        let raw = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { raw })
    }
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.raw.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.raw
            .set_item(key, value)
            .map_err(|e| ErrorKind::StorageError(format!("{e:?}")).into())
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = self.raw.remove_item(key) {
            log::warn!("Failed to remove {key} from web storage: {e:?}");
        }
    }
}

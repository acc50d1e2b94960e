//! Key/value persistence behind the chatbot widget
//!
//! The widget needs two namespaces: one scoped to the tab session (open flag,
//! chat history) and one that survives restarts (voice navigation preference).
//! Values are strings; structured values go through [`read_json`] / [`write_json`].

use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

mod memory;
pub use memory::MemoryStore;

#[cfg(feature = "no-wasm")]
mod file;
#[cfg(feature = "no-wasm")]
pub use file::JsonFileStore;

#[cfg(feature = "wasm")]
mod gloo;
#[cfg(feature = "wasm")]
pub use gloo::WebStorage;

/// Session flag: popup was visible when the page was left
pub const OPEN_FLAG_KEY: &str = "chatbotOpen";
/// Session list: the conversation so far
pub const HISTORY_KEY: &str = "chatHistory";
/// Durable flag: redirects on keyword or server hint are allowed
pub const VOICE_NAV_KEY: &str = "voiceNavEnabled";

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str);
}

/// Read and decode a JSON value; unreadable values count as absent
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable value under {key}: {e}");
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}

/// The platform store, or a fresh in-memory one when the platform refuses access
pub fn or_memory<S: KeyValueStore + 'static>(
    store: Option<S>,
    namespace: &str,
) -> Rc<dyn KeyValueStore> {
    match store {
        Some(store) => Rc::new(store),
        None => {
            log::warn!("{namespace} storage unavailable, state will not outlive this page");
            Rc::new(MemoryStore::new())
        }
    }
}

//! Conversation kept in session storage so it survives page navigations

use crate::error::Result;
use crate::model::structs::ChatMessage;
use crate::storage::{HISTORY_KEY, KeyValueStore, read_json, write_json};

pub struct ChatHistory;

impl ChatHistory {
    /// Stored messages in append order; missing or corrupt history is empty
    pub fn load(store: &dyn KeyValueStore) -> Vec<ChatMessage> {
        read_json(store, HISTORY_KEY).unwrap_or_default()
    }

    /// Append one message and write the whole list back immediately
    pub fn push(store: &dyn KeyValueStore, message: &ChatMessage) -> Result<()> {
        let mut messages = Self::load(store);
        messages.push(message.clone());
        write_json(store, HISTORY_KEY, &messages)
    }

    pub fn clear(store: &dyn KeyValueStore) {
        store.remove_item(HISTORY_KEY);
    }
}

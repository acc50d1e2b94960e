use std::cell::RefCell;
use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::Result;

/// Store that lives as long as the process; stands in for `sessionStorage` off the browser
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_forgets_the_key() {
        let store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.remove_item("a");
        assert_eq!(store.get_item("a"), None);
        assert_eq!(store.get_item("b").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }
}

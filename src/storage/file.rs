use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::Result;

/// Durable store kept as one JSON object on disk; stands in for `localStorage`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Opened durable store at {}", path.display());
        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&*self.items.borrow())?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&self, key: &str) {
        let removed = self.items.borrow_mut().remove(key).is_some();
        if removed {
            if let Err(e) = self.flush() {
                log::warn!("Failed to persist removal of {key}: {e}");
            }
        }
    }
}

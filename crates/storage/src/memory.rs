use std::cell::RefCell;
use std::collections::BTreeMap;

use flextrack_domain as domain;

use super::KeyValueStore;

/// In-memory store for tests and targets without browser storage. An
/// optional quota on the total stored bytes makes writes fail the way a
/// full browser store does.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, domain::StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), domain::StorageError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(domain::StorageError::Unavailable(
                    "quota exceeded".to_string(),
                ));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), domain::StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

use flextrack_domain as domain;
use gloo_storage::Storage as GlooStorage;

use super::KeyValueStore;

/// Browser local storage. Documents are stored as raw strings so that
/// other tools sharing the same keys can read them unchanged.
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, domain::StorageError> {
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .map_err(|err| domain::StorageError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| domain::StorageError::Unavailable(format!("{err:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::raw()
            .remove_item(key)
            .map_err(|err| domain::StorageError::Unavailable(format!("{err:?}")))
    }
}

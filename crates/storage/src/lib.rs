#![warn(clippy::pedantic)]

use flextrack_domain as domain;

#[allow(clippy::module_name_repetitions)]
pub mod archive;
#[allow(clippy::module_name_repetitions)]
pub mod document;
#[allow(clippy::module_name_repetitions)]
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;


/// A string-keyed store of string documents, matching the shape of the
/// browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, domain::StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), domain::StorageError>;
    fn remove(&self, key: &str) -> Result<(), domain::StorageError>;
}

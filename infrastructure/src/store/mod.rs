//! Local key-value store adapters.
//!
//! Provides [`FileKeyValueStore`], a JSON file implementing the
//! [`KeyValueStore`](nutri_application::KeyValueStore) port.

mod file_store;

pub use file_store::FileKeyValueStore;

//! `window.localStorage` as a key-value backend

use ai_chatbot_core::storage::KeyValueBackend;
use ai_chatbot_core::StorageError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// Backend over the page's `localStorage`.
///
/// Holds no handle; the storage object is looked up on every call, so the
/// type stays `Send + Sync` like every other backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    /// Backend for the current window
    pub fn new() -> Self {
        Self
    }

    /// Whether `localStorage` is reachable (it is not in workers or with
    /// storage disabled)
    pub fn is_available() -> bool {
        storage().is_ok()
    }
}

fn storage() -> Result<Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::backend("no window"))?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| StorageError::backend("localStorage is not available"))
}

fn js_error(value: JsValue) -> StorageError {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return StorageError::backend(format!("{}: {}", exception.name(), exception.message()));
    }
    StorageError::backend(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl KeyValueBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        storage()?.remove_item(key).map_err(js_error)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let storage = storage()?;
        let len = storage.length().map_err(js_error)?;
        let mut keys = Vec::with_capacity(len as usize);
        for index in 0..len {
            if let Some(key) = storage.key(index).map_err(js_error)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

//! JS-facing per-user storage

use ai_chatbot_core::storage::{derive_key, migrate_legacy_data, Store};
use ai_chatbot_core::{log_error, log_warn, ReadOutcome, UserId};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::local_storage::LocalStorageBackend;
use crate::utils::{from_js, to_js, user_or_none};

/// Per-user storage over `localStorage`, exported to JavaScript
#[wasm_bindgen]
pub struct BrowserStore {
    store: Store<LocalStorageBackend>,
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BrowserStore {
    /// Store for the current page
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        if !LocalStorageBackend::is_available() {
            log_warn!("localStorage is not available; reads will return defaults");
        }
        Self {
            store: Store::new(LocalStorageBackend::new()),
        }
    }

    /// Namespaced key for `key`
    #[wasm_bindgen(js_name = storageKey)]
    pub fn storage_key(&self, user_id: Option<String>, key: &str) -> String {
        derive_key(user_or_none(user_id).as_deref(), key)
    }

    /// Stored value, or `default_value` when absent or unreadable
    #[wasm_bindgen(js_name = getUserData)]
    pub fn get_user_data(&self, user_id: Option<String>, key: &str, default_value: JsValue) -> JsValue {
        let user_id = user_or_none(user_id);
        match self.store.read_entry::<Value>(user_id.as_deref(), key) {
            ReadOutcome::Found(value) => to_js(&value).unwrap_or(default_value),
            _ => default_value,
        }
    }

    /// Store `value` under the user's `key`; failures are logged
    #[wasm_bindgen(js_name = setUserData)]
    pub fn set_user_data(&self, user_id: Option<String>, key: &str, value: JsValue) {
        match from_js(value) {
            Ok(value) => self.store.write(user_or_none(user_id).as_deref(), key, &value),
            Err(e) => log_error!("Error saving user data under '{}': {:?}", key, e),
        }
    }

    /// Remove the user's `key`
    #[wasm_bindgen(js_name = removeUserData)]
    pub fn remove_user_data(&self, user_id: Option<String>, key: &str) {
        self.store.delete(user_or_none(user_id).as_deref(), key)
    }

    /// Move legacy `chats` records into the user's namespace; returns the
    /// migration report
    #[wasm_bindgen(js_name = migrateExistingData)]
    pub fn migrate_existing_data(&self, user_id: &str) -> Result<JsValue, JsValue> {
        let user_id = UserId::new(user_id).ok_or_else(|| JsValue::from_str("user id is required"))?;
        let report = migrate_legacy_data(&self.store, &user_id);
        to_js(&report)
    }

    /// Remove every key of the user; returns how many were removed
    #[wasm_bindgen(js_name = clearUserData)]
    pub fn clear_user_data(&self, user_id: &str) -> u32 {
        self.store.clear_all(user_id) as u32
    }
}

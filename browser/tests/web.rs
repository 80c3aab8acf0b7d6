#![cfg(target_arch = "wasm32")]

use ai_chatbot_browser::{BrowserStore, LocalStorageBackend};
use ai_chatbot_core::storage::KeyValueBackend;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn reset() {
    let backend = LocalStorageBackend::new();
    for key in backend.keys().unwrap() {
        backend.remove(&key).unwrap();
    }
}

#[wasm_bindgen_test]
fn set_then_get_round_trips_through_local_storage() {
    reset();
    let store = BrowserStore::new();
    store.set_user_data(Some("u1".into()), "theme", JsValue::from_str("dark"));

    assert_eq!(store.get_user_data(Some("u1".into()), "theme", JsValue::NULL), "dark");
    assert_eq!(
        LocalStorageBackend::new().get("user_u1_theme").unwrap().as_deref(),
        Some("\"dark\"")
    );

    store.remove_user_data(Some("u1".into()), "theme");
    assert!(store.get_user_data(Some("u1".into()), "theme", JsValue::NULL).is_null());
}

#[wasm_bindgen_test]
fn missing_user_uses_temp_namespace() {
    reset();
    let store = BrowserStore::new();
    assert_eq!(store.storage_key(None, "chats"), "temp_chats");
    assert_eq!(store.storage_key(Some("  ".into()), "chats"), "temp_chats");
    assert_eq!(store.storage_key(Some("u1".into()), "chats"), "user_u1_chats");
}

#[wasm_bindgen_test]
fn migration_and_clear() {
    reset();
    let backend = LocalStorageBackend::new();
    backend.set("chats", r#"[{"id":"c1"}]"#).unwrap();
    backend.set("c1", r#"[{"type":"prompt","text":"hi"}]"#).unwrap();

    let store = BrowserStore::new();
    store.migrate_existing_data("u1").unwrap();

    assert_eq!(backend.get("chats").unwrap(), None);
    assert_eq!(backend.get("c1").unwrap(), None);
    assert!(backend.get("user_u1_chat_c1").unwrap().is_some());

    assert_eq!(store.clear_user_data("u1"), 2);
    assert!(backend.keys().unwrap().is_empty());
}

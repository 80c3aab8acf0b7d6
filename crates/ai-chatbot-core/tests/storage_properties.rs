use ai_chatbot_core::storage::{derive_key, MemoryBackend, Store};
use proptest::prelude::*;
use serde_json::{json, Value};

fn user_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,12}"
}

fn logical_key() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,16}"
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn derived_keys_are_deterministic(user in user_id(), key in logical_key()) {
        prop_assert_eq!(derive_key(Some(user.as_str()), &key), derive_key(Some(user.as_str()), &key));
    }

    #[test]
    fn derived_keys_are_injective_for_delimiter_free_ids(
        a in (user_id(), logical_key()),
        b in (user_id(), logical_key()),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(derive_key(Some(a.0.as_str()), &a.1), derive_key(Some(b.0.as_str()), &b.1));
    }

    #[test]
    fn write_then_read_returns_value(user in user_id(), key in logical_key(), value in json_value()) {
        let store = Store::new(MemoryBackend::new());
        store.write(Some(user.as_str()), &key, &value);
        prop_assert_eq!(store.read(Some(user.as_str()), &key, Value::Null), value);
    }

    #[test]
    fn deleted_keys_read_as_default(user in user_id(), key in logical_key(), value in json_value()) {
        let store = Store::new(MemoryBackend::new());
        store.write(Some(user.as_str()), &key, &value);
        store.delete(Some(user.as_str()), &key);
        prop_assert_eq!(store.read(Some(user.as_str()), &key, json!("default")), json!("default"));
    }

    #[test]
    fn clear_all_leaves_other_users_alone(
        keys in prop::collection::btree_set(logical_key(), 1..6),
    ) {
        let store = Store::new(MemoryBackend::new());
        for key in &keys {
            store.write(Some("alice"), key, &json!(1));
            store.write(Some("bob"), key, &json!(2));
        }

        prop_assert_eq!(store.clear_all("alice"), keys.len());
        for key in &keys {
            prop_assert_eq!(store.read(Some("alice"), key, json!(0)), json!(0));
            prop_assert_eq!(store.read(Some("bob"), key, json!(0)), json!(2));
        }
    }
}

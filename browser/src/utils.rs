use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert a Rust value into a plain JS value (objects, not `Map`s)
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a JS value into JSON; `undefined` becomes `null`
pub fn from_js(value: JsValue) -> Result<serde_json::Value, JsValue> {
    if value.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Blank strings from JS mean "no user"
pub fn user_or_none(user_id: Option<String>) -> Option<String> {
    user_id.filter(|id| !id.trim().is_empty())
}

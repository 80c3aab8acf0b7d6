//! # AI Chatbot Browser WASM
//!
//! WebAssembly bindings exposing per-user namespaced storage over the page's
//! `localStorage`, including the one-shot migration of legacy records.

use wasm_bindgen::prelude::*;

use ai_chatbot_core::log_info;

// Module declarations
mod local_storage;
mod store;
mod utils;

pub use local_storage::LocalStorageBackend;
pub use store::BrowserStore;

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

// Initialize WASM environment
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    log_info!("AI Chatbot storage initialised");
}

//! Cross-platform logging utilities
//!
//! Logging macros that work across both native and WASM targets. On native
//! targets they forward to the `tracing` crate; on WASM targets they write to
//! the browser's console.

#[doc(hidden)]
pub use tracing as __tracing;

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub use web_sys as __web_sys;

/// Info level logging - general information messages
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        $crate::core::logging::__web_sys::console::log_1(&format!($($arg)*).into());

        #[cfg(not(target_arch = "wasm32"))]
        $crate::core::logging::__tracing::info!($($arg)*);
    }};
}

/// Warning level logging - potentially problematic situations
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        $crate::core::logging::__web_sys::console::warn_1(&format!($($arg)*).into());

        #[cfg(not(target_arch = "wasm32"))]
        $crate::core::logging::__tracing::warn!($($arg)*);
    }};
}

/// Error level logging - error conditions
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        $crate::core::logging::__web_sys::console::error_1(&format!($($arg)*).into());

        #[cfg(not(target_arch = "wasm32"))]
        $crate::core::logging::__tracing::error!($($arg)*);
    }};
}

/// Debug level logging - detailed information for debugging
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        $crate::core::logging::__web_sys::console::debug_1(&format!($($arg)*).into());

        #[cfg(not(target_arch = "wasm32"))]
        $crate::core::logging::__tracing::debug!($($arg)*);
    }};
}

/// Trace level logging - very detailed tracing information
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        $crate::core::logging::__web_sys::console::log_1(&format!("TRACE: {}", format!($($arg)*)).into());

        #[cfg(not(target_arch = "wasm32"))]
        $crate::core::logging::__tracing::trace!($($arg)*);
    }};
}

//! Switchable logging for the noisier pipeline stages.
//!
//! A module opts in by declaring its flag and importing the macros:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("refresh finished: {} records", accepted);
//! ```
//! With the flag set to `false` the calls compile down to nothing, so a chatty
//! stage (per-lookup ingest tracing, the SQLite worker) can be silenced without
//! touching `RUST_LOG`.

/// Forwards to [`log::log!`] when the calling module's `ENABLE_LOGS` is set.
#[doc(hidden)]
#[macro_export]
macro_rules! log_if_enabled {
    ($level:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::log!($level, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log_if_enabled!(log::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log_if_enabled!(log::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log_if_enabled!(log::Level::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log_if_enabled!(log::Level::Error, $($arg)*)
    };
}

//! Logging helpers.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate.
//! Without it they expand to nothing, so the list itself carries no logging
//! cost by default.
//!
//! ```bash
//! RUST_LOG=indexed_skiplist=trace cargo test --features tracing
//! ```

#![allow(unused_macros)]

/// Trace-level logging (per node events).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging (bulk operations, height growth).
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

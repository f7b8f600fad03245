//! Environment variable names read by [`Config::from_env`](crate::config::Config::from_env).
//!
//! These are purely helpers; loggers themselves never touch the
//! environment.

/// Minimum level, e.g. `info` or `-2`.
pub const CTXLOG_LEVEL_ENV: &str = "CTXLOG_LEVEL";

/// Fixed text added to every message.
pub const CTXLOG_PREFIX_ENV: &str = "CTXLOG_PREFIX";

/// Flag names separated by `|` or `,`, e.g. `DATE|TIME|UTC`.
pub const CTXLOG_FLAGS_ENV: &str = "CTXLOG_FLAGS";

/// Where records go: `stderr`, `stdout`, `discard` or `file://<path>`.
pub const CTXLOG_DESTINATION_ENV: &str = "CTXLOG_DESTINATION";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable if it is set.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

//! The process-wide default logger.
//!
//! [`default_logger`] is created on first use, writes to stderr with an
//! empty prefix and [`Flags::STD`], and lives until the process exits. It is
//! the only global state in the crate; everything else is reached through
//! explicitly constructed [`Logger`]s.

use std::sync::{Arc, OnceLock};

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::flags::Flags;
use crate::level::Level;
use crate::logger::Logger;
use crate::scope::Ctx;
use crate::sink::LogSink;
use crate::value::Fields;

static DEFAULT: OnceLock<Arc<Logger>> = OnceLock::new();

/// The default logger used by the package-level functions.
pub fn default_logger() -> &'static Arc<Logger> {
    DEFAULT.get_or_init(|| Arc::new(Logger::new(Arc::new(std::io::stderr()), "", Flags::STD)))
}

/// Reconfigure the default logger from `CTXLOG_*` environment variables.
pub fn init_from_env() -> Result<&'static Arc<Logger>, ConfigError> {
    let logger = default_logger();
    Config::from_env()?.apply(logger)?;
    Ok(logger)
}

pub fn level() -> Level {
    default_logger().level()
}

pub fn set_level(level: Level) {
    default_logger().set_level(level)
}

pub fn prefix() -> String {
    default_logger().prefix()
}

pub fn set_prefix(prefix: impl Into<String>) {
    default_logger().set_prefix(prefix)
}

pub fn flags() -> Flags {
    default_logger().flags()
}

pub fn set_flags(flags: Flags) {
    default_logger().set_flags(flags)
}

pub fn writer() -> Arc<dyn LogSink> {
    default_logger().writer()
}

pub fn set_output(out: Arc<dyn LogSink>) {
    default_logger().set_output(out)
}

/// Write an un-levelled record through the default logger.
#[track_caller]
pub fn print(msg: &str) -> Result<()> {
    default_logger().print(msg)
}

#[track_caller]
pub fn trace(ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
    default_logger().trace(ctx, msg, fields)
}

#[track_caller]
pub fn debug(ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
    default_logger().debug(ctx, msg, fields)
}

#[track_caller]
pub fn info(ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
    default_logger().info(ctx, msg, fields)
}

#[track_caller]
pub fn warn(ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
    default_logger().warn(ctx, msg, fields)
}

#[track_caller]
pub fn error(ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
    default_logger().error(ctx, msg, fields)
}

/// Write a `fatal` record through the default logger and exit with status 1.
#[track_caller]
pub fn fatal(ctx: &Ctx, msg: &str, fields: &Fields) -> ! {
    default_logger().fatal(ctx, msg, fields)
}

/// Write a `panic` record through the default logger, then panic.
#[track_caller]
pub fn panic(ctx: &Ctx, msg: &str, fields: &Fields) -> ! {
    default_logger().panic(ctx, msg, fields)
}

#[cfg(feature = "subscriber")]
pub use self::subscriber::*;

#[cfg(feature = "subscriber")]
mod subscriber {
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    use crate::layer::JsonLineLayer;
    use crate::logger::Logger;

    /// Configuration of the global `tracing` subscriber.
    ///
    /// **Fields**
    /// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
    ///   installed next to the [`JsonLineLayer`] so events are also printed
    ///   in human-readable form.
    #[derive(Clone, Debug, Default)]
    pub struct LayerConfig {
        pub enable_stdout: bool,
    }

    /// Install a [`Registry`] combined with a [`JsonLineLayer`] writing
    /// through `logger` as the global default subscriber.
    ///
    /// Returns the installed layer's counters so callers can observe how
    /// many events were written or failed.
    pub fn init_tracing_with_config(
        logger: Arc<Logger>,
        config: LayerConfig,
    ) -> Result<LayerStats, tracing::subscriber::SetGlobalDefaultError> {
        let layer = JsonLineLayer::new(logger);
        let stats = LayerStats {
            total_events: layer.total_events.clone(),
            written_events: layer.written_events.clone(),
            failed_events: layer.failed_events.clone(),
        };

        // The two subscriber shapes have different types, so each branch
        // installs its own.
        if config.enable_stdout {
            let fmt_layer = tracing_subscriber::fmt::layer();
            let subscriber = Registry::default().with(layer).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        } else {
            let subscriber = Registry::default().with(layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Ok(stats)
    }

    /// Install the JSON line layer over the default logger.
    ///
    /// Equivalent to calling [`init_tracing_with_config`] with
    /// [`super::default_logger`] and [`LayerConfig::default`].
    pub fn init_tracing() -> Result<LayerStats, tracing::subscriber::SetGlobalDefaultError> {
        init_tracing_with_config(super::default_logger().clone(), LayerConfig::default())
    }

    /// Counters shared with an installed [`JsonLineLayer`].
    #[derive(Clone, Debug)]
    pub struct LayerStats {
        pub total_events: Arc<std::sync::atomic::AtomicU64>,
        pub written_events: Arc<std::sync::atomic::AtomicU64>,
        pub failed_events: Arc<std::sync::atomic::AtomicU64>,
    }
}

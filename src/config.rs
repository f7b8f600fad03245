use serde::Deserialize;

use crate::destination::make_sink_from_str;
use crate::env::{
    env_opt, env_or, CTXLOG_DESTINATION_ENV, CTXLOG_FLAGS_ENV, CTXLOG_LEVEL_ENV,
    CTXLOG_PREFIX_ENV,
};
use crate::error::ConfigError;
use crate::flags::Flags;
use crate::level::Level;
use crate::logger::Logger;

/// Logger configuration.
///
/// **Fields**
/// - `level`: minimum level that gets written.
/// - `prefix`: fixed text added to every message.
/// - `flags`: timestamp, source location and prefix options.
/// - `destination`: where records go, see
///   [`parse_destination`](crate::destination::parse_destination).
///
/// Deserializes from any serde format; levels and flags are given by name,
/// e.g. `{"level": "info", "flags": "DATE | TIME | UTC"}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub level: Level,
    pub prefix: String,
    pub flags: Flags,
    pub destination: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            prefix: String::new(),
            flags: Flags::STD,
            destination: "stderr".to_string(),
        }
    }
}

impl Config {
    /// Build a configuration from `CTXLOG_*` environment variables, falling
    /// back to [`Config::default`] for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let level = match env_opt(CTXLOG_LEVEL_ENV) {
            Some(level) => level.parse()?,
            None => defaults.level,
        };
        let flags = match env_opt(CTXLOG_FLAGS_ENV) {
            Some(flags) => Flags::parse(&flags)
                .map_err(|e| ConfigError::InvalidFlags(flags.clone(), e.to_string()))?,
            None => defaults.flags,
        };

        Ok(Config {
            level,
            prefix: env_or(CTXLOG_PREFIX_ENV, &defaults.prefix),
            flags,
            destination: env_or(CTXLOG_DESTINATION_ENV, &defaults.destination),
        })
    }

    /// Apply this configuration to an existing logger.
    pub fn apply(&self, logger: &Logger) -> Result<(), ConfigError> {
        let sink = make_sink_from_str(&self.destination)?;
        logger.set_output(sink);
        logger.set_prefix(self.prefix.clone());
        logger.set_flags(self.flags);
        logger.set_level(self.level);
        Ok(())
    }
}

impl Logger {
    /// Create a logger from a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let sink = make_sink_from_str(&config.destination)?;
        let logger = Logger::new(sink, config.prefix.clone(), config.flags);
        logger.set_level(config.level);
        Ok(logger)
    }
}

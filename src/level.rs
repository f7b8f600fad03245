use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Severity of a record.
///
/// Levels are ordered numerically: `TRACE` is `-1`, `DEBUG` is `0` and so on
/// up to `PANIC`. Values below `TRACE` are allowed as custom, even more
/// verbose levels and are written as their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i8);

impl Level {
    pub const TRACE: Level = Level(-1);
    pub const DEBUG: Level = Level(0);
    pub const INFO: Level = Level(1);
    pub const WARN: Level = Level(2);
    pub const ERROR: Level = Level(3);
    pub const FATAL: Level = Level(4);
    pub const PANIC: Level = Level(5);
    /// Un-levelled records written by [`Logger::print`](crate::logger::Logger::print).
    pub const NO: Level = Level(6);
    /// As a threshold, blocks every gated call.
    pub const DISABLED: Level = Level(7);

    /// A custom level, e.g. `Level::custom(-3)` for something below trace.
    pub const fn custom(n: i8) -> Level {
        Level(n)
    }

    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// The canonical lowercase name, or the number for custom levels.
    pub fn name(self) -> Cow<'static, str> {
        match self.as_str() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.0.to_string()),
        }
    }

    fn as_str(self) -> Option<&'static str> {
        Some(match self {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
            Level::FATAL => "fatal",
            Level::PANIC => "panic",
            Level::NO => "no",
            Level::DISABLED => "disabled",
            _ => return None,
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let level = match lower.as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            "fatal" => Level::FATAL,
            "panic" => Level::PANIC,
            "no" => Level::NO,
            "disabled" | "off" => Level::DISABLED,
            other => other
                .parse::<i8>()
                .map(Level)
                .map_err(|_| ConfigError::UnknownLevel(s.to_string()))?,
        };
        Ok(level)
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level::TRACE
        } else if level == tracing::Level::DEBUG {
            Level::DEBUG
        } else if level == tracing::Level::INFO {
            Level::INFO
        } else if level == tracing::Level::WARN {
            Level::WARN
        } else {
            Level::ERROR
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        let names: Vec<_> = [
            Level::TRACE,
            Level::DEBUG,
            Level::INFO,
            Level::WARN,
            Level::ERROR,
            Level::FATAL,
            Level::PANIC,
        ]
        .iter()
        .map(|l| l.to_string())
        .collect();
        assert_eq!(names, ["trace", "debug", "info", "warn", "error", "fatal", "panic"]);
    }

    #[test]
    fn custom_levels_below_trace_are_numeric() {
        assert_eq!(Level::custom(-2).name(), "-2");
        assert_eq!(Level::custom(-100).to_string(), "-100");
        assert!(Level::custom(-2) < Level::TRACE);
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Level::TRACE < Level::DEBUG);
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::ERROR < Level::FATAL);
        assert!(Level::PANIC < Level::DISABLED);
        assert_eq!(Level::default(), Level::DEBUG);
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::INFO);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::WARN);
        assert_eq!("-4".parse::<Level>().unwrap(), Level::custom(-4));
        assert!(matches!("loud".parse::<Level>(), Err(ConfigError::UnknownLevel(_))));
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&Level::WARN).unwrap();
        assert_eq!(json, "\"warn\"");
        let level: Level = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(level, Level::TRACE);
    }
}

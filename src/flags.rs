use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Formatting options for a [`Logger`](crate::logger::Logger).
    ///
    /// The bits mirror the classic line-logger flags: they pick which parts
    /// of the timestamp are written, whether the caller's source location is
    /// recorded and where the fixed prefix goes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Flags: u32 {
        /// The date: `2009-01-23`.
        const DATE = 1 << 0;
        /// The time of day: `01:23:23`.
        const TIME = 1 << 1;
        /// Microsecond resolution: `01:23:23.123123`. Implies `TIME`.
        const MICROSECONDS = 1 << 2;
        /// Full file name and line number of the caller.
        const LONG_FILE = 1 << 3;
        /// Final file name element and line number. Overrides `LONG_FILE`.
        const SHORT_FILE = 1 << 4;
        /// Render timestamps in UTC and append `Z`.
        const UTC = 1 << 5;
        /// Put the prefix after the message text instead of before it.
        const MSG_PREFIX = 1 << 6;

        /// Initial flags of the default logger.
        const STD = Self::DATE.bits() | Self::TIME.bits() | Self::MICROSECONDS.bits();
    }
}

impl Flags {
    /// Whether any part of the timestamp is requested.
    pub fn has_timestamp(self) -> bool {
        self.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS)
    }

    /// Whether the caller's file and line are recorded.
    pub fn has_location(self) -> bool {
        self.intersects(Flags::LONG_FILE | Flags::SHORT_FILE)
    }

    /// Parse flag names separated by `|` or `,`, e.g. `"DATE | TIME, UTC"`.
    ///
    /// An empty string yields no flags.
    pub fn parse(s: &str) -> Result<Flags, bitflags::parser::ParseError> {
        let normalized = s.replace(',', "|").to_ascii_uppercase();
        bitflags::parser::from_str(&normalized)
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::STD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_is_date_time_micro() {
        assert!(Flags::STD.contains(Flags::DATE | Flags::TIME | Flags::MICROSECONDS));
        assert!(!Flags::STD.contains(Flags::UTC));
        assert!(Flags::STD.has_timestamp());
        assert!(!Flags::STD.has_location());
    }

    #[test]
    fn parse_accepts_pipes_commas_and_case() {
        assert_eq!(Flags::parse("date|time").unwrap(), Flags::DATE | Flags::TIME);
        assert_eq!(
            Flags::parse("DATE, UTC , short_file").unwrap(),
            Flags::DATE | Flags::UTC | Flags::SHORT_FILE
        );
        assert_eq!(Flags::parse("").unwrap(), Flags::empty());
        assert!(Flags::parse("DATE|NOPE").is_err());
    }
}

use crate::sink::LogSink;
use std::io;

/// A sink that simply drops all records.
///
/// Loggers writing here skip formatting altogether, which makes it useful
/// for measuring the cost of the call path itself and for tests that don't
/// care about output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl LogSink for Discard {
    fn write_line(&self, _line: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn is_discard(&self) -> bool {
        true
    }
}

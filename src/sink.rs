use std::io::{self, Write};
use std::sync::Mutex;

/// Destination for encoded records.
///
/// A logger hands each sink exactly one complete line per record, while
/// holding its own lock, so implementations never see interleaved writes
/// from the same logger.
pub trait LogSink: Send + Sync {
    /// Write one complete record line.
    ///
    /// **Returns**
    /// - `Ok(())` if every byte was accepted.
    /// - `Err(..)` on failure or short write. The logger propagates this
    ///   to its caller as-is and never retries.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;

    /// Flush any buffered bytes. Default implementation is a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Whether this sink throws everything away. Loggers use this to skip
    /// formatting entirely.
    fn is_discard(&self) -> bool {
        false
    }
}

/// Any writer behind a mutex is a sink, e.g. `Mutex<File>` or
/// `Mutex<Vec<u8>>` for capturing output in tests.
impl<W: Write + Send> LogSink for Mutex<W> {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut w = self.lock().unwrap_or_else(|e| e.into_inner());
        w.write_all(line)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().unwrap_or_else(|e| e.into_inner()).flush()
    }
}

impl LogSink for io::Stderr {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl LogSink for io::Stdout {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

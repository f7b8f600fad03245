use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};

use crate::error::ConfigError;
use crate::noop_sink::Discard;
use crate::sink::LogSink;

/// Supported destination kinds that can be selected by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationKind {
    Stderr,
    Stdout,
    Discard,
    /// Append to the file at this path.
    File(String),
}

/// Parse a destination string.
///
/// Examples:
/// - "stderr"
/// - "stdout"
/// - "discard"
/// - "file:///var/log/app.jsonl"
pub fn parse_destination(dest: &str) -> Result<DestinationKind, ConfigError> {
    let trimmed = dest.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower == "stderr" || lower.is_empty() {
        Ok(DestinationKind::Stderr)
    } else if lower == "stdout" {
        Ok(DestinationKind::Stdout)
    } else if lower == "discard" || lower == "null" {
        Ok(DestinationKind::Discard)
    } else if lower.starts_with("file://") {
        let path = &trimmed["file://".len()..];
        if path.is_empty() {
            return Err(ConfigError::UnknownDestination(dest.to_string()));
        }
        Ok(DestinationKind::File(path.to_string()))
    } else {
        Err(ConfigError::UnknownDestination(dest.to_string()))
    }
}

/// Create a concrete sink for `kind`.
///
/// Files are opened in append mode and created if missing.
pub fn make_sink(kind: &DestinationKind) -> Result<Arc<dyn LogSink>, ConfigError> {
    let sink: Arc<dyn LogSink> = match kind {
        DestinationKind::Stderr => Arc::new(io::stderr()),
        DestinationKind::Stdout => Arc::new(io::stdout()),
        DestinationKind::Discard => Arc::new(Discard),
        DestinationKind::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ConfigError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            Arc::new(Mutex::new(file))
        }
    };
    Ok(sink)
}

/// [`parse_destination`] followed by [`make_sink`].
pub fn make_sink_from_str(dest: &str) -> Result<Arc<dyn LogSink>, ConfigError> {
    make_sink(&parse_destination(dest)?)
}

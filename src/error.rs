/// Error returned when a record cannot be encoded or written.
///
/// Encoding failures and sink failures are reported the same way: as the
/// result of the call that produced the record. Bytes that already reached
/// the sink for that call are not retracted.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A float with no JSON representation (`NaN`, `inf`, `-inf`).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// The general-purpose encoder used for structured values failed.
    #[error("failed to encode structured value: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination sink rejected or short-wrote the record.
    #[error("failed to write log record: {0}")]
    Sink(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type returned when building a logger from configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),

    #[error("invalid flags {0:?}: {1}")]
    InvalidFlags(String, String),

    #[error("unknown or unsupported destination: {0:?}")]
    UnknownDestination(String),

    #[error("failed to open log file {path:?}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_errors_keep_their_source() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::WriteZero, "short write"));
        assert!(matches!(err, Error::Sink(ref e) if e.kind() == std::io::ErrorKind::WriteZero));
        assert_eq!(err.to_string(), "failed to write log record: short write");
    }

    #[test]
    fn unsupported_value_message() {
        let err = Error::UnsupportedValue("NaN".to_string());
        assert_eq!(err.to_string(), "unsupported value: NaN");
    }
}

//! Scoped structured logging, one JSON object per line.
//!
//! Attributes come from the call site and from a chain of nested scopes
//! carried in a [`Ctx`]. When a name is defined more than once, the most
//! local definition wins. Caller attributes can never overwrite the
//! built-in `time`, `level`, `file`, `line` and `message` fields; they are
//! written as `field.<name>` instead.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use ctxlog::{fields, Ctx, Flags, Logger};
//!
//! let out = Arc::new(Mutex::new(Vec::new()));
//! let logger = Logger::new(out.clone(), "", Flags::empty());
//!
//! let ctx = Ctx::background().with(fields! { "service" => "auth", "attempt" => 1 });
//! logger.info(&ctx, "login", &fields! { "attempt" => 2, "level" => "admin" }).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out.lock().unwrap().clone()).unwrap(),
//!     "{\"level\":\"info\",\"message\":\"login\",\"attempt\":2,\"field.level\":\"admin\",\"service\":\"auth\"}\n",
//! );
//! ```

pub mod config;
pub mod destination;
pub mod env;
pub mod error;
pub mod flags;
pub mod init;
pub mod level;
pub mod logger;
pub mod merge;
pub mod noop_sink;
pub mod record;
pub mod render;
pub mod scope;
pub mod sink;
pub mod value;

#[cfg(feature = "subscriber")]
pub mod layer;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use flags::Flags;
pub use init::default_logger;
pub use level::Level;
pub use logger::{Clock, Logger, SystemClock};
pub use noop_sink::Discard;
pub use scope::{Ctx, Scope};
pub use sink::LogSink;
pub use value::{Fields, Value};

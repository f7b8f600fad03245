use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::flags::Flags;
use crate::level::Level;
use crate::record::{EncodeOptions, Location, Record};
use crate::scope::Ctx;
use crate::sink::LogSink;
use crate::value::Fields;

/// Buffers that grew past this are dropped instead of kept for reuse.
const MAX_RETAINED_BUF: usize = 64 * 1024;

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

struct Inner {
    prefix: String,
    flags: Flags,
    out: Arc<dyn LogSink>,
    // Exclusively owned by whoever holds the lock.
    buf: Vec<u8>,
}

/// Writes one JSON line per record to a [`LogSink`].
///
/// A logger can be shared freely between threads. Rendering and writing a
/// record happen under one lock, so lines never interleave and a concurrent
/// `set_*` call is never observed half-applied.
pub struct Logger {
    inner: Mutex<Inner>,
    level: AtomicI8,
    is_discard: AtomicBool,
    clock: Box<dyn Clock>,
}

impl Logger {
    /// Create a logger writing to `out`.
    ///
    /// **Parameters**
    /// - `out`: destination for encoded records.
    /// - `prefix`: fixed text added to every message, before it or, with
    ///   [`Flags::MSG_PREFIX`], after it.
    /// - `flags`: timestamp, source location and prefix options.
    ///
    /// The level threshold starts at [`Level::DEBUG`].
    pub fn new(out: Arc<dyn LogSink>, prefix: impl Into<String>, flags: Flags) -> Self {
        let is_discard = AtomicBool::new(out.is_discard());
        Logger {
            inner: Mutex::new(Inner {
                prefix: prefix.into(),
                flags,
                out,
                buf: Vec::with_capacity(256),
            }),
            level: AtomicI8::new(Level::DEBUG.as_i8()),
            is_discard,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used to stamp records.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn writer(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.lock().out)
    }

    pub fn set_output(&self, out: Arc<dyn LogSink>) {
        let mut inner = self.lock();
        self.is_discard.store(out.is_discard(), Ordering::Relaxed);
        inner.out = out;
    }

    pub fn level(&self) -> Level {
        Level::custom(self.level.load(Ordering::Relaxed))
    }

    /// Calls below `level` are dropped before any formatting happens.
    pub fn set_level(&self, level: Level) {
        let _inner = self.lock();
        self.level.store(level.as_i8(), Ordering::Relaxed);
    }

    pub fn prefix(&self) -> String {
        self.lock().prefix.clone()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.lock().prefix = prefix.into();
    }

    pub fn flags(&self) -> Flags {
        self.lock().flags
    }

    pub fn set_flags(&self, flags: Flags) {
        self.lock().flags = flags;
    }

    /// Whether a call at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        !self.is_discard.load(Ordering::Relaxed) && level >= self.level()
    }

    /// Write a record at `level` with the fields of `ctx` and `fields`.
    #[track_caller]
    pub fn log(&self, ctx: &Ctx, level: Level, msg: &str, fields: &Fields) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(ctx, level, msg, fields, Some(Location::from(std::panic::Location::caller())))
    }

    /// Like [`Logger::log`] with an explicit source location, for bridges
    /// whose events carry their own.
    pub fn log_at(
        &self,
        ctx: &Ctx,
        level: Level,
        msg: &str,
        fields: &Fields,
        location: Option<Location<'_>>,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(ctx, level, msg, fields, location)
    }

    #[track_caller]
    pub fn trace(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
        self.log(ctx, Level::TRACE, msg, fields)
    }

    #[track_caller]
    pub fn debug(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
        self.log(ctx, Level::DEBUG, msg, fields)
    }

    #[track_caller]
    pub fn info(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
        self.log(ctx, Level::INFO, msg, fields)
    }

    #[track_caller]
    pub fn warn(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
        self.log(ctx, Level::WARN, msg, fields)
    }

    #[track_caller]
    pub fn error(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> Result<()> {
        self.log(ctx, Level::ERROR, msg, fields)
    }

    /// Write an un-levelled record (level `"no"`) without any scope.
    #[track_caller]
    pub fn print(&self, msg: &str) -> Result<()> {
        self.log(&Ctx::background(), Level::NO, msg, &Fields::new())
    }

    /// Write a `fatal` record, then exit the process with status 1.
    ///
    /// The record is written regardless of the level threshold or a discard
    /// sink. A failure to write it is reported through `tracing` and does
    /// not prevent the exit.
    #[track_caller]
    pub fn fatal(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> ! {
        self.emit_terminal(ctx, Level::FATAL, msg, fields);
        std::process::exit(1)
    }

    /// Write a `panic` record, then panic with `msg`.
    ///
    /// Like [`Logger::fatal`], the record is always attempted.
    #[track_caller]
    pub fn panic(&self, ctx: &Ctx, msg: &str, fields: &Fields) -> ! {
        self.emit_terminal(ctx, Level::PANIC, msg, fields);
        panic!("{msg}")
    }

    #[track_caller]
    fn emit_terminal(&self, ctx: &Ctx, level: Level, msg: &str, fields: &Fields) {
        let location = Location::from(std::panic::Location::caller());
        if let Err(e) = self.emit(ctx, level, msg, fields, Some(location)) {
            tracing::warn!(target: "ctxlog", error = %e, %level, "failed to write terminal log record");
        }
        if let Err(e) = self.writer().flush() {
            tracing::warn!(target: "ctxlog", error = %e, "failed to flush log sink");
        }
    }

    fn emit(
        &self,
        ctx: &Ctx,
        level: Level,
        message: &str,
        fields: &Fields,
        location: Option<Location<'_>>,
    ) -> Result<()> {
        let time = self.clock.now();

        let mut guard = self.lock();
        let Inner {
            prefix,
            flags,
            out,
            buf,
        } = &mut *guard;

        buf.clear();
        let record = Record {
            time,
            level,
            message,
            location,
            fields,
            scope: ctx.scope().map(|s| &**s),
        };
        let result = record
            .encode(
                &EncodeOptions {
                    flags: *flags,
                    prefix,
                },
                buf,
            )
            .and_then(|()| out.write_line(buf).map_err(Into::into));

        if buf.capacity() > MAX_RETAINED_BUF {
            *buf = Vec::with_capacity(256);
        }
        result
    }
}

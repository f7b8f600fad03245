use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanRecord};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::{LookupSpan, SpanRef};

use crate::level::Level;
use crate::logger::Logger;
use crate::record::Location;
use crate::scope::Ctx;
use crate::value::{Fields, Value};

/// Target of this crate's own diagnostics; never fed back into a logger.
pub(crate) const SELF_TARGET: &str = "ctxlog";

/// The fields a span contributes, stored in the span's extensions.
///
/// Only the span's own fields are kept. The chain is assembled per event, so
/// values recorded on a parent after a child span was created are still seen
/// through the child.
struct SpanFields(Fields);

fn fields_of<'a, S: LookupSpan<'a>>(span: &SpanRef<'a, S>) -> Option<Fields> {
    let extensions = span.extensions();
    extensions
        .get::<SpanFields>()
        .filter(|f| !f.0.is_empty())
        .map(|f| f.0.clone())
}

fn visit(record: impl FnOnce(&mut FieldVisitor<'_>)) -> (Fields, Option<String>) {
    let mut fields = Fields::new();
    let mut message = None;
    record(&mut FieldVisitor {
        fields: &mut fields,
        message: &mut message,
    });
    (fields, message)
}

/// `tracing_subscriber` layer that writes every event as a JSON line
/// through a [`Logger`].
///
/// Span fields become nested scopes: an event inherits the fields of every
/// span it is inside, with the innermost span winning on conflicts and the
/// event's own fields winning over all of them.
pub struct JsonLineLayer {
    logger: Arc<Logger>,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events written to the logger's sink.
    pub written_events: Arc<AtomicU64>,
    /// Events that failed to encode or write.
    pub failed_events: Arc<AtomicU64>,
}

impl JsonLineLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            total_events: Arc::new(AtomicU64::new(0)),
            written_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl<S> Layer<S> for JsonLineLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let (mut fields, message) = visit(|v| attrs.record(v));
        // A span has no message of its own; keep it as an ordinary field.
        if let Some(message) = message {
            fields.insert("message".to_string(), Value::Str(message));
        }
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(&self, id: &Id, values: &SpanRecord<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let (mut fields, message) = visit(|v| values.record(v));
        if let Some(message) = message {
            fields.insert("message".to_string(), Value::Str(message));
        }
        if fields.is_empty() {
            return;
        }

        let mut extensions = span.extensions_mut();
        if let Some(own) = extensions.get_mut::<SpanFields>() {
            own.0.extend(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() == SELF_TARGET {
            return;
        }
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let level = Level::from(*meta.level());
        if !self.logger.enabled(level) {
            return;
        }

        let (fields, message) = visit(|v| event.record(v));

        let mut scope = Ctx::background();
        if let Some(spans) = ctx.event_scope(event) {
            for span in spans.from_root() {
                if let Some(own) = fields_of(&span) {
                    scope = scope.with(own);
                }
            }
        }
        let location = meta.file().map(|file| Location {
            file,
            line: meta.line().unwrap_or(0),
        });

        let message = message.as_deref().unwrap_or("");
        match self.logger.log_at(&scope, level, message, &fields, location) {
            Ok(()) => {
                self.written_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields.insert(field.name().to_string(), Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), Value::from(format!("{:?}", value)));
        }
    }
}

//! Tracing layer that writes formatted events to a console sink.
//!
//! On wasm the sink is the browser console; natively any [`ConsoleSink`]
//! works, which keeps formatting testable without a browser.
//!
//! ```ignore
//! use roster_web::console_log::{ConsoleConfig, ConsoleLayer};
//! use tracing_subscriber::prelude::*;
//!
//! let layer = ConsoleLayer::new(sink, ConsoleConfig::default());
//! tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))?;
//! ```

use std::fmt::{self, Write as FmtWrite};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Destination for formatted log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// What the console layer prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Most verbose level emitted. Default: `INFO`.
    pub max_level: Level,
    /// Prefix lines with the event target. Default: true.
    pub show_target: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_level: Level::INFO,
            show_target: true,
        }
    }
}

/// A `tracing_subscriber::Layer` routing events into a [`ConsoleSink`].
pub struct ConsoleLayer<S> {
    sink: S,
    config: ConsoleConfig,
}

impl<S: ConsoleSink> ConsoleLayer<S> {
    #[must_use]
    pub fn new(sink: S, config: ConsoleConfig) -> Self {
        Self { sink, config }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: String,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Format one event as `LEVEL target: message key=value ...`.
fn format_event(event: &Event<'_>, show_target: bool) -> String {
    let mut collector = FieldCollector::default();
    event.record(&mut collector);

    let meta = event.metadata();
    let mut line = String::with_capacity(collector.message.len() + collector.fields.len() + 32);
    let _ = write!(line, "{:<5}", meta.level().as_str());
    if show_target {
        let _ = write!(line, " {}:", meta.target());
    }
    if !collector.message.is_empty() {
        line.push(' ');
        line.push_str(&collector.message);
    }
    line.push_str(&collector.fields);
    line
}

impl<S, Sub> Layer<Sub> for ConsoleLayer<S>
where
    S: ConsoleSink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let level = *event.metadata().level();
        // More verbose levels compare greater.
        if level > self.config.max_level {
            return;
        }
        self.sink
            .write_line(level, &format_event(event, self.config.show_target));
    }
}

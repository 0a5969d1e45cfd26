//! src/logging.rs
//! ============================================================================
//! # Logging: Tracing Setup with Rolling File Output
//!
//! Daily-rolling file logs plus an optional stderr layer, with a compact
//! sequence-numbered event format so interleaved coordinator activity can be
//! ordered after the fact.

use std::{
    fs,
    path::Path,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::rolling::{RollingFileAppender, daily};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of the host program.
    pub fn init_tracing(log_dir: &Path, default_level: &str) {
        fs::create_dir_all(log_dir).expect("cannot create log dir");

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <log_dir>/postlist-YYYY-MM-DD.log
        let file: RollingFileAppender = daily(log_dir, "postlist");

        let directive = default_level
            .parse()
            .unwrap_or_else(|_| "info".parse().expect("static directive parses"));

        let file_layer = fmt::layer()
            .event_format(SeqModFormat)
            .with_writer(file)
            .with_ansi(false)
            .with_filter(EnvFilter::from_default_env().add_directive(directive));

        // optional stderr layer for live debugging
        let stderr_layer = fmt::layer()
            .event_format(SeqModFormat)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_filter(EnvFilter::from_default_env().add_directive(
                default_level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().expect("static directive parses")),
            ));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .init();
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [mod::path] message`
struct SeqModFormat;

impl<S, N> FormatEvent<S, N> for SeqModFormat
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically increasing sequence number
        let seq: usize = SEQ
            .get()
            .expect("SEQ not initialised")
            .fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}] ",
            meta.level(),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key-value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

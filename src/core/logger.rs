//! Main logger implementation

use super::{
    buffer::BufferPool,
    caller::{self, CallerResolver, TrackCallerResolver},
    config::LoggerConfig,
    encoder::{FieldOrder, LineEncoder},
    error::{LoggerError, Result},
    field::{Field, FieldValue, Fields},
    log_entry::Record,
    log_level::{should_log, LogLevel},
    metrics::LoggerMetrics,
    terminator::{ProcessExit, Terminator, FATAL_EXIT_CODE},
    timestamp::{Clock, SystemClock, TimestampFormat},
};
use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

/// Callback receiving sink failures; logging calls never return them
pub type WriteErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Byte-stream destination for encoded lines
pub type Sink = Box<dyn Write + Send>;

/// Runtime-adjustable settings
#[derive(Debug, Clone)]
struct Settings {
    level: LogLevel,
    color: bool,
    caller: bool,
    caller_skip: usize,
    timestamp_format: TimestampFormat,
    field_order: FieldOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            color: false,
            caller: false,
            caller_skip: 0,
            timestamp_format: TimestampFormat::default(),
            field_order: FieldOrder::Insertion,
        }
    }
}

/// State shared by a logger and every handle derived from it
struct Shared {
    settings: RwLock<Settings>,
    sink: Mutex<Sink>,
    pool: BufferPool,
    metrics: LoggerMetrics,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn CallerResolver>,
    terminator: Arc<dyn Terminator>,
    on_write_error: WriteErrorHandler,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.sink.get_mut().flush() {
            (self.on_write_error)(&LoggerError::sink_write(e));
        }
    }
}

/// logfmt logger
///
/// Cloning is cheap and yields a handle on the same sink and settings.
/// [`Logger::with_fields`] and [`Logger::with_error`] return a derived handle
/// carrying extra default fields; the parent is left unchanged.
///
/// # Example
///
/// ```
/// use logfmt_logger::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder().writer(buffer.clone()).build();
///
/// logger.warn_with("testing fields", &Fields::new().with_field("stack", "testing"));
/// assert!(buffer.contents().contains(r#"level=warn message="testing fields" stack=testing"#));
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    default_fields: Arc<Fields>,
}

impl Logger {
    /// Logger writing to stderr at Info level
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.shared.settings.write().level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.shared.settings.read().level
    }

    /// Whether a record at `level` would be written
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        should_log(level, self.level())
    }

    pub fn set_color_output(&self, color: bool) {
        self.shared.settings.write().color = color;
    }

    pub fn color_output(&self) -> bool {
        self.shared.settings.read().color
    }

    /// Enable or disable the `caller` key and set the frames to skip
    pub fn set_caller_frame(&self, enabled: bool, skip: usize) {
        let mut settings = self.shared.settings.write();
        settings.caller = enabled;
        settings.caller_skip = skip;
    }

    pub fn caller_frame(&self) -> (bool, usize) {
        let settings = self.shared.settings.read();
        (settings.caller, settings.caller_skip)
    }

    pub fn set_timestamp_format(&self, format: TimestampFormat) {
        self.shared.settings.write().timestamp_format = format;
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.shared.settings.read().timestamp_format.clone()
    }

    pub fn set_field_order(&self, order: FieldOrder) {
        self.shared.settings.write().field_order = order;
    }

    pub fn field_order(&self) -> FieldOrder {
        self.shared.settings.read().field_order
    }

    /// Replace the sink; the previous one is flushed and dropped.
    pub fn set_writer<W: Write + Send + 'static>(&self, writer: W) {
        let previous = {
            let mut sink = self.shared.sink.lock();
            std::mem::replace(&mut *sink, Box::new(writer))
        };
        self.flush_sink(previous);
    }

    /// Default fields carried by this handle
    pub fn default_fields(&self) -> &Fields {
        &self.default_fields
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.shared
            .sink
            .lock()
            .flush()
            .map_err(LoggerError::sink_write)
    }

    /// Derived logger whose lines also carry `fields`
    #[must_use]
    pub fn with_fields(&self, fields: impl Into<Fields>) -> Logger {
        let mut merged = (*self.default_fields).clone();
        merged.extend_from(&fields.into());
        Logger {
            shared: Arc::clone(&self.shared),
            default_fields: Arc::new(merged),
        }
    }

    /// Derived logger with one extra default field
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
        self.with_fields(Fields::new().with_field(key, value))
    }

    /// Derived logger with `error` set to the error's message
    #[must_use]
    pub fn with_error<E: std::error::Error + ?Sized>(&self, err: &E) -> Logger {
        self.with_field("error", FieldValue::error(err))
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.dispatch(level, message.as_ref(), &[], Location::caller());
    }

    /// Log with call-site fields, emitted after the default fields
    #[track_caller]
    pub fn log_with(&self, level: LogLevel, message: impl AsRef<str>, fields: &Fields) {
        self.dispatch(level, message.as_ref(), fields.as_slice(), Location::caller());
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Write a fatal line, then terminate the process with status 1.
    #[track_caller]
    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }

    #[track_caller]
    #[inline]
    pub fn debug_with(&self, message: impl AsRef<str>, fields: &Fields) {
        self.log_with(LogLevel::Debug, message, fields);
    }

    #[track_caller]
    #[inline]
    pub fn info_with(&self, message: impl AsRef<str>, fields: &Fields) {
        self.log_with(LogLevel::Info, message, fields);
    }

    #[track_caller]
    #[inline]
    pub fn warn_with(&self, message: impl AsRef<str>, fields: &Fields) {
        self.log_with(LogLevel::Warn, message, fields);
    }

    #[track_caller]
    #[inline]
    pub fn error_with(&self, message: impl AsRef<str>, fields: &Fields) {
        self.log_with(LogLevel::Error, message, fields);
    }

    #[track_caller]
    #[inline]
    pub fn fatal_with(&self, message: impl AsRef<str>, fields: &Fields) {
        self.log_with(LogLevel::Fatal, message, fields);
    }

    fn dispatch(
        &self,
        level: LogLevel,
        message: &str,
        fields: &[Field],
        origin: &'static Location<'static>,
    ) {
        self.emit(level, message, fields, origin);

        if level == LogLevel::Fatal {
            if let Err(e) = self.flush() {
                self.shared.metrics.record_write_failure();
                (self.shared.on_write_error)(&e);
            }
            self.shared.terminator.terminate(FATAL_EXIT_CODE);
        }
    }

    /// Filter, encode and write one record
    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: &[Field],
        origin: &'static Location<'static>,
    ) {
        let shared = &self.shared;
        // Snapshot: the clock and resolver may call back into the setters.
        let settings = {
            let guard = shared.settings.read();
            if !should_log(level, guard.level) {
                shared.metrics.record_filtered();
                return;
            }
            guard.clone()
        };

        let mut record = Record::new(shared.clock.now(), level, message)
            .with_fields(self.default_fields.as_slice(), fields);
        if settings.caller {
            record = record.with_caller(caller::resolve_or_unknown(
                shared.resolver.as_ref(),
                origin,
                settings.caller_skip,
            ));
        }

        let mut buf = shared.pool.acquire();
        LineEncoder::new(&settings.timestamp_format)
            .with_color(settings.color)
            .with_field_order(settings.field_order)
            .encode(&record, &mut buf);

        self.write_line(&buf);
    }

    fn write_line(&self, line: &[u8]) {
        let result = self.shared.sink.lock().write_all(line);
        match result {
            Ok(()) => {
                self.shared.metrics.record_written();
            }
            Err(e) => {
                self.shared.metrics.record_write_failure();
                (self.shared.on_write_error)(&LoggerError::sink_write(e));
            }
        }
    }

    fn flush_sink(&self, mut sink: Sink) {
        if let Err(e) = sink.flush() {
            (self.shared.on_write_error)(&LoggerError::sink_write(e));
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("settings", &*self.shared.settings.read())
            .field("default_fields", &self.default_fields)
            .finish_non_exhaustive()
    }
}

fn default_write_error_handler() -> WriteErrorHandler {
    Arc::new(|err: &LoggerError| eprintln!("[LOGGER ERROR] {}", err))
}

/// Builder for creating a Logger with custom configuration
///
/// # Example
///
/// ```
/// use logfmt_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .writer(std::io::sink())
///     .color(false)
///     .caller(true, 0)
///     .field("service", "api")
///     .build();
///
/// logger.debug("ready");
/// ```
pub struct LoggerBuilder {
    writer: Option<Sink>,
    settings: Settings,
    default_fields: Fields,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn CallerResolver>,
    terminator: Arc<dyn Terminator>,
    on_write_error: WriteErrorHandler,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: None,
            settings: Settings::default(),
            default_fields: Fields::new(),
            clock: Arc::new(SystemClock),
            resolver: Arc::new(TrackCallerResolver),
            terminator: Arc::new(ProcessExit),
            on_write_error: default_write_error_handler(),
        }
    }

    /// Start from a deserialized configuration
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let timestamp_format = config.timestamp_format()?;
        Ok(Self::new()
            .level(config.level)
            .color(config.color)
            .caller(config.caller, config.caller_skip)
            .timestamp_format(timestamp_format)
            .field_order(config.field_order)
            .fields(config.default_fields.iter().cloned().collect::<Fields>()))
    }

    /// Set the sink (stderr when unset)
    #[must_use]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.settings.level = level;
        self
    }

    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.settings.color = color;
        self
    }

    #[must_use]
    pub fn caller(mut self, enabled: bool, skip: usize) -> Self {
        self.settings.caller = enabled;
        self.settings.caller_skip = skip;
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.settings.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn field_order(mut self, order: FieldOrder) -> Self {
        self.settings.field_order = order;
        self
    }

    /// Add a default field included in every line
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.default_fields.push(key, value);
        self
    }

    /// Add several default fields
    #[must_use]
    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.default_fields.extend_from(&fields.into());
        self
    }

    #[must_use]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub fn caller_resolver<R: CallerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replace the action taken after a fatal line (process exit by default)
    #[must_use]
    pub fn terminator<T: Terminator + 'static>(mut self, terminator: T) -> Self {
        self.terminator = Arc::new(terminator);
        self
    }

    /// Set the handler for sink failures (stderr diagnostic by default)
    #[must_use]
    pub fn on_write_error(mut self, handler: WriteErrorHandler) -> Self {
        self.on_write_error = handler;
        self
    }

    pub fn build(self) -> Logger {
        let sink = self
            .writer
            .unwrap_or_else(|| Box::new(io::stderr()) as Sink);
        Logger {
            shared: Arc::new(Shared {
                settings: RwLock::new(self.settings),
                sink: Mutex::new(sink),
                pool: BufferPool::new(),
                metrics: LoggerMetrics::new(),
                clock: self.clock,
                resolver: self.resolver,
                terminator: self.terminator,
                on_write_error: self.on_write_error,
            }),
            default_fields: Arc::new(self.default_fields),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::caller::CallSite;
    use crate::core::timestamp::FixedClock;
    use crate::writers::SharedBuffer;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_clock() -> FixedClock {
        FixedClock(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
                .unwrap(),
        )
    }

    fn test_logger() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .writer(buffer.clone())
            .clock(fixed_clock())
            .build();
        (logger, buffer)
    }

    #[derive(Default, Clone)]
    struct CountingExit(Arc<AtomicUsize>);

    impl Terminator for CountingExit {
        fn terminate(&self, code: i32) {
            assert_eq!(code, 1);
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().writer(io::sink()).build();
        assert_eq!(logger.level(), LogLevel::Info);
        assert!(!logger.color_output());
        assert_eq!(logger.caller_frame(), (false, 0));
        assert_eq!(logger.timestamp_format(), TimestampFormat::Rfc3339Millis);
        assert_eq!(logger.field_order(), FieldOrder::Insertion);
        assert!(logger.default_fields().is_empty());
    }

    #[test]
    fn test_full_line() {
        let (logger, buffer) = test_logger();
        logger.info("hello world");
        assert_eq!(
            buffer.contents(),
            "timestamp=2025-01-08T10:30:45.000Z level=info message=\"hello world\"\n"
        );
    }

    #[test]
    fn test_level_filter() {
        let (logger, buffer) = test_logger();
        logger.debug("debug log");
        assert!(buffer.is_empty());
        assert_eq!(logger.metrics().filtered(), 1);

        logger.set_level(LogLevel::Debug);
        logger.debug("debug log");
        assert!(buffer.contents().contains(r#"level=debug message="debug log""#));
    }

    #[test]
    fn test_setters_apply_to_clones() {
        let (logger, buffer) = test_logger();
        let clone = logger.clone();
        clone.set_timestamp_format(TimestampFormat::Unix);
        clone.set_color_output(true);

        logger.info("x");
        assert!(buffer
            .contents()
            .starts_with("\x1b[36mtimestamp\x1b[0m=1736332245 "));
    }

    #[test]
    fn test_with_fields_does_not_touch_parent() {
        let (logger, buffer) = test_logger();
        let child = logger.with_field("request_id", "3MG91VKP");
        let grandchild = child.with_fields(vec![("method", "GET")]);

        logger.info("parent");
        child.info("child");
        grandchild.info("grandchild");

        let lines = buffer.lines();
        assert!(lines[0].ends_with("message=parent"));
        assert!(lines[1].ends_with("message=child request_id=3MG91VKP"));
        assert!(lines[2].ends_with("message=grandchild request_id=3MG91VKP method=GET"));
        assert!(logger.default_fields().is_empty());
        assert_eq!(child.default_fields().len(), 1);
    }

    #[test]
    fn test_with_error() {
        let (logger, buffer) = test_logger();
        let err = io::Error::new(io::ErrorKind::Other, "this is a dummy error");
        logger.with_error(&err).error("error fetching details");
        assert!(buffer.contents().contains(
            r#"level=error message="error fetching details" error="this is a dummy error""#
        ));
    }

    #[test]
    fn test_fatal_writes_then_terminates_once() {
        let buffer = SharedBuffer::new();
        let exit = CountingExit::default();
        let logger = Logger::builder()
            .writer(buffer.clone())
            .level(LogLevel::Fatal)
            .terminator(exit.clone())
            .build();

        logger.fatal("goodbye world");
        assert_eq!(exit.0.load(Ordering::SeqCst), 1);
        assert!(buffer.contents().contains(r#"level=fatal message="goodbye world""#));
    }

    #[test]
    fn test_write_error_is_reported_not_raised() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "dummy error"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let logger = Logger::builder()
            .writer(FailingWriter)
            .on_write_error(Arc::new(move |err: &LoggerError| {
                sink.lock().push(err.to_string())
            }))
            .build();

        logger.info("hello world");
        assert_eq!(*reported.lock(), vec!["error logging: dummy error".to_string()]);
        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(logger.metrics().lines_written(), 0);
    }

    #[test]
    fn test_fatal_flush_failure_is_counted() {
        struct UnflushableWriter(SharedBuffer);

        impl Write for UnflushableWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.write(buf)
            }

            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::Other, "flush refused"))
            }
        }

        let buffer = SharedBuffer::new();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let exit = CountingExit::default();
        let logger = Logger::builder()
            .writer(UnflushableWriter(buffer.clone()))
            .terminator(exit.clone())
            .on_write_error(Arc::new(move |err: &LoggerError| {
                sink.lock().push(err.to_string())
            }))
            .build();

        logger.fatal("goodbye world");
        assert_eq!(exit.0.load(Ordering::SeqCst), 1);
        assert_eq!(logger.metrics().lines_written(), 1);
        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(*reported.lock(), vec!["error logging: flush refused".to_string()]);
        assert!(buffer.contents().contains("level=fatal"));
    }

    #[test]
    fn test_capabilities_may_call_setters() {
        use std::sync::OnceLock;

        #[derive(Clone, Default)]
        struct Slot(Arc<OnceLock<Logger>>);

        impl CallerResolver for Slot {
            fn resolve(&self, origin: &'static Location<'static>, _skip: usize) -> Option<CallSite> {
                if let Some(logger) = self.0.get() {
                    logger.set_color_output(false);
                }
                Some(CallSite::from(origin))
            }
        }

        impl Clock for Slot {
            fn now(&self) -> chrono::DateTime<chrono::FixedOffset> {
                if let Some(logger) = self.0.get() {
                    logger.set_level(LogLevel::Debug);
                }
                fixed_clock().now()
            }
        }

        let buffer = SharedBuffer::new();
        let slot = Slot::default();
        let logger = Logger::builder()
            .writer(buffer.clone())
            .caller(true, 0)
            .clock(slot.clone())
            .caller_resolver(slot.clone())
            .build();
        let _ = slot.0.set(logger.clone());

        logger.info("reentrant");
        assert!(buffer.contents().contains("message=reentrant caller="));
        assert_eq!(logger.level(), LogLevel::Debug);
    }

    #[test]
    fn test_set_writer_redirects_output() {
        let (logger, first) = test_logger();
        let second = SharedBuffer::new();
        logger.info("one");
        logger.set_writer(second.clone());
        logger.info("two");

        assert_eq!(first.lines().len(), 1);
        assert_eq!(second.lines().len(), 1);
        assert!(second.contents().contains("message=two"));
    }
}

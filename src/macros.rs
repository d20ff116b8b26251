//! Logging macros for ergonomic log message formatting.
//!
//! Every leveled macro accepts either `format!` arguments or a message
//! followed by `;` and a list of `key => value` fields.
//!
//! # Examples
//!
//! ```
//! use logfmt_logger::prelude::*;
//! use logfmt_logger::{info, kv};
//!
//! let logger = Logger::builder().writer(std::io::sink()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! info!(logger, "request completed"; "component" => "api", "bytes" => 1 << 18);
//!
//! // From a flat key, value list
//! logger.info_with("request completed", &kv!["method", "GET", "status", 200]);
//! ```

/// Build [`Fields`](crate::Fields) from `key => value` pairs.
///
/// ```
/// use logfmt_logger::fields;
///
/// let fields = fields!["user" => "karan", "admin" => false];
/// assert_eq!(fields.to_string(), "user=karan admin=false");
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::Fields::new()$(.with_field($key, $value))*
    };
}

/// Build [`Fields`](crate::Fields) from a flat `key, value, key, value` list.
///
/// A trailing key without a value is dropped.
///
/// ```
/// use logfmt_logger::kv;
///
/// let fields = kv!["key1", "val1", "key2"];
/// assert_eq!(fields.to_string(), "key1=val1");
/// ```
#[macro_export]
macro_rules! kv {
    ($($item:expr),* $(,)?) => {{
        let items: ::std::vec::Vec<$crate::FieldValue> =
            ::std::vec![$($crate::FieldValue::from($item)),*];
        $crate::Fields::from_flat(items)
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use logfmt_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build();
/// use logfmt_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, "slow query"; "elapsed_ms" => 812);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log_with($level, $msg, &$crate::fields!($($key => $value),+))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logfmt_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build();
/// use logfmt_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logfmt_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build();
/// use logfmt_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and terminate the process.
///
/// # Examples
///
/// ```no_run
/// # use logfmt_logger::prelude::*;
/// # let logger = Logger::new();
/// use logfmt_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, Terminator};
    use crate::writers::SharedBuffer;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn logger() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .writer(buffer.clone())
            .level(LogLevel::Debug)
            .build();
        (logger, buffer)
    }

    #[test]
    fn test_log_macro() {
        let (logger, buffer) = logger();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);

        let lines = buffer.lines();
        assert!(lines[0].ends_with(r#"message="Test message""#));
        assert!(lines[1].ends_with(r#"message="Formatted: 42""#));
    }

    #[test]
    fn test_field_arm() {
        let (logger, buffer) = logger();
        warn!(logger, "testing fields"; "stack" => "testing");
        assert!(buffer
            .contents()
            .contains(r#"level=warn message="testing fields" stack=testing"#));
    }

    #[test]
    fn test_level_macros() {
        let (logger, buffer) = logger();
        debug!(logger, "d");
        info!(logger, "i {}", 1);
        warn!(logger, "w");
        error!(logger, "e"; "code" => 500);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("level=debug"));
        assert!(lines[1].contains(r#"level=info message="i 1""#));
        assert!(lines[2].contains("level=warn"));
        assert!(lines[3].ends_with("level=error message=e code=500"));
    }

    #[test]
    fn test_fatal_macro() {
        #[derive(Clone, Default)]
        struct Flag(Arc<AtomicBool>);

        impl Terminator for Flag {
            fn terminate(&self, _code: i32) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let flag = Flag::default();
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .writer(buffer.clone())
            .terminator(flag.clone())
            .build();

        fatal!(logger, "Critical failure: {}", "system");
        assert!(flag.0.load(Ordering::SeqCst));
        assert!(buffer.contents().contains("level=fatal"));
    }

    #[test]
    fn test_kv_macro_drops_odd_key() {
        let fields = kv!["key1", "val1", "key2"];
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.to_string(), "key1=val1");

        let empty = kv![];
        assert!(empty.is_empty());
    }
}

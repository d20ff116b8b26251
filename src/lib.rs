//! # logfmt logger
//!
//! A small structured logger that writes each record as one logfmt line:
//!
//! ```text
//! timestamp=2025-01-08T10:30:45.123Z level=warn message="testing fields" stack=testing
//! ```
//!
//! ## Features
//!
//! - **Leveled**: debug, info, warn, error and fatal, filtered by a minimum level
//! - **Structured**: typed key/value fields in a stable order
//! - **Safe output**: values are quoted and escaped so every record stays on one line
//! - **Thread safe**: lines are written whole, never interleaved
//!
//! ```
//! use logfmt_logger::prelude::*;
//! use logfmt_logger::info;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder().writer(buffer.clone()).build();
//!
//! info!(logger, "hello world");
//! info!(logger, "request done"; "status" => 200, "path" => "/health");
//!
//! assert!(buffer.contents().contains(r#"level=info message="hello world""#));
//! assert!(buffer.contents().contains("status=200 path=/health"));
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        CallSite, CallerResolver, Clock, Field, FieldOrder, FieldValue, Fields, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, Terminator,
        TimestampFormat,
    };
    pub use crate::writers::SharedBuffer;
}

pub use crate::core::{
    level_name, should_log, BufferPool, CallSite, CallerResolver, Clock, Field, FieldOrder,
    FieldValue, Fields, FixedClock, LineEncoder, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, ProcessExit, Record, Result, Sink, SystemClock, Terminator,
    TimestampFormat, TrackCallerResolver, WriteErrorHandler, FATAL_EXIT_CODE, INVALID_LEVEL_NAME,
};
pub use writers::SharedBuffer;
#[cfg(feature = "file")]
pub use writers::FileWriter;

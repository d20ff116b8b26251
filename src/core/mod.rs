//! Core logger types and traits

pub mod buffer;
pub mod caller;
pub mod config;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod terminator;
pub mod timestamp;

pub use buffer::{BufferPool, PooledBuffer};
pub use caller::{CallSite, CallerResolver, TrackCallerResolver};
pub use config::LoggerConfig;
pub use encoder::{FieldOrder, LineEncoder};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue, Fields};
pub use log_entry::Record;
pub use log_level::{level_name, should_log, LogLevel, INVALID_LEVEL_NAME};
pub use logger::{Logger, LoggerBuilder, Sink, WriteErrorHandler};
pub use metrics::LoggerMetrics;
pub use terminator::{ProcessExit, Terminator, FATAL_EXIT_CODE};
pub use timestamp::{Clock, FixedClock, SystemClock, TimestampFormat};

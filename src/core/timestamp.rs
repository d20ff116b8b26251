//! Timestamp formatting utilities
//!
//! Provides the presets and custom strftime patterns used for the
//! `timestamp` key, plus the clock the logger reads the current time from.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use logfmt_logger::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let ts = FixedOffset::east_opt(0)
///     .unwrap()
///     .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
///     .unwrap();
/// assert_eq!(TimestampFormat::Rfc3339Millis.format(&ts), "2025-01-08T10:30:45.000Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with milliseconds and the local offset:
    /// `2025-01-08T10:30:45.123+05:30`, or `...Z` in UTC.
    ///
    /// This is the default format.
    #[default]
    Rfc3339Millis,

    /// RFC 3339 with whole seconds: `2025-01-08T10:30:45+05:30`
    Rfc3339,

    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456789+05:30`
    Rfc3339Nanos,

    /// ISO 8601 in UTC with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format, e.g. `%d/%b/%Y:%H:%M:%S %z`
    ///
    /// Build it with [`TimestampFormat::custom`] to have the pattern checked.
    Custom(String),
}

impl TimestampFormat {
    /// Create a custom strftime format, rejecting patterns that cannot be
    /// rendered (unknown or parse-only specifiers).
    ///
    /// ```
    /// use logfmt_logger::TimestampFormat;
    ///
    /// assert!(TimestampFormat::custom("%Y-%m-%d").is_ok());
    /// assert!(TimestampFormat::custom("%Q").is_err());
    /// ```
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if render_custom(&Local::now().fixed_offset(), &pattern).is_none() {
            return Err(LoggerError::timestamp_format(pattern));
        }
        Ok(TimestampFormat::Custom(pattern))
    }

    /// Format a timestamp according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        let mut buf = Vec::with_capacity(32);
        self.write_to(&mut buf, datetime);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Append the formatted timestamp to `buf`.
    ///
    /// A custom pattern that cannot be rendered falls back to the default format.
    pub fn write_to(&self, buf: &mut Vec<u8>, datetime: &DateTime<FixedOffset>) {
        // Writes into a Vec cannot fail.
        let _ = match self {
            TimestampFormat::Rfc3339Millis => {
                buf.write_all(datetime.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes())
            }
            TimestampFormat::Rfc3339 => {
                buf.write_all(datetime.to_rfc3339_opts(SecondsFormat::Secs, false).as_bytes())
            }
            TimestampFormat::Rfc3339Nanos => {
                buf.write_all(datetime.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes())
            }
            TimestampFormat::Iso8601 => write!(
                buf,
                "{}",
                datetime.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%S%.3fZ")
            ),
            TimestampFormat::Unix => write!(buf, "{}", datetime.timestamp()),
            TimestampFormat::UnixMillis => write!(buf, "{}", datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => write!(buf, "{}", datetime.timestamp_micros()),
            TimestampFormat::Custom(pattern) => match render_custom(datetime, pattern) {
                Some(text) => buf.write_all(text.as_bytes()),
                None => return TimestampFormat::Rfc3339Millis.write_to(buf, datetime),
            },
        };
    }
}

/// Render `pattern` through `fmt::Write` so a formatter error surfaces as
/// `None` instead of a panic in `io::Write::write_fmt`.
fn render_custom(datetime: &DateTime<FixedOffset>, pattern: &str) -> Option<String> {
    use std::fmt::Write as _;

    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut text = String::new();
    write!(text, "{}", datetime.format(pattern)).ok()?;
    Some(text)
}

impl FromStr for TimestampFormat {
    type Err = LoggerError;

    /// Parse a preset name (`rfc3339_millis`, `rfc3339`, `rfc3339_nanos`,
    /// `iso8601`, `unix`, `unix_millis`, `unix_micros`) or a strftime pattern.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rfc3339_millis" | "default" => Ok(TimestampFormat::Rfc3339Millis),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "rfc3339_nanos" => Ok(TimestampFormat::Rfc3339Nanos),
            "iso8601" => Ok(TimestampFormat::Iso8601),
            "unix" => Ok(TimestampFormat::Unix),
            "unix_millis" => Ok(TimestampFormat::UnixMillis),
            "unix_micros" => Ok(TimestampFormat::UnixMicros),
            _ => TimestampFormat::custom(s),
        }
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

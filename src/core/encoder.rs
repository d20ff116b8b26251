//! logfmt line encoder
//!
//! Produces one newline-terminated line per record:
//!
//! ```text
//! timestamp=<ts> level=<level> message=<msg> [caller=<file>:<line>] <key>=<value> ...
//! ```
//!
//! With color enabled each key (never its value) is wrapped in the ANSI SGR
//! code of the record's level and a reset.

use super::escape;
use super::field::Field;
use super::log_entry::Record;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

const ANSI_RESET: &[u8] = b"\x1b[0m";

/// Order in which user fields are emitted after the fixed keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    /// Default fields first, then call fields, as supplied
    #[default]
    Insertion,
    /// Stable sort by key over default and call fields
    Sorted,
}

/// Encoder settings for a single line
#[derive(Debug, Clone, Copy)]
pub struct LineEncoder<'a> {
    pub timestamp_format: &'a TimestampFormat,
    pub color: bool,
    pub field_order: FieldOrder,
}

impl<'a> LineEncoder<'a> {
    pub fn new(timestamp_format: &'a TimestampFormat) -> Self {
        Self {
            timestamp_format,
            color: false,
            field_order: FieldOrder::Insertion,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_field_order(mut self, field_order: FieldOrder) -> Self {
        self.field_order = field_order;
        self
    }

    /// Append the encoded line, including the trailing newline, to `buf`.
    pub fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) {
        let level = record.level;

        self.write_key(buf, "timestamp", level);
        buf.push(b'=');
        let start = buf.len();
        self.timestamp_format.write_to(buf, &record.timestamp);
        if escape::needs_quoting(&buf[start..]) {
            let raw = buf.split_off(start);
            escape::write_quoted(buf, &raw);
        }

        buf.push(b' ');
        self.write_key(buf, "level", level);
        buf.push(b'=');
        buf.extend_from_slice(level.as_str().as_bytes());

        buf.push(b' ');
        self.write_key(buf, "message", level);
        buf.push(b'=');
        escape::write_escaped(buf, record.message.as_bytes());

        if let Some(ref caller) = record.caller {
            buf.push(b' ');
            self.write_key(buf, "caller", level);
            buf.push(b'=');
            escape::write_escaped(buf, caller.to_string().as_bytes());
        }

        match self.field_order {
            FieldOrder::Insertion => {
                for field in record.user_fields() {
                    self.write_field(buf, field, level);
                }
            }
            FieldOrder::Sorted => {
                let mut fields: Vec<&Field> = record.user_fields().collect();
                fields.sort_by(|a, b| a.key.cmp(&b.key));
                for field in fields {
                    self.write_field(buf, field, level);
                }
            }
        }

        buf.push(b'\n');
    }

    /// Encode into a fresh string
    pub fn encode_to_string(&self, record: &Record<'_>) -> String {
        let mut buf = Vec::with_capacity(128);
        self.encode(record, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_field(&self, buf: &mut Vec<u8>, field: &Field, level: LogLevel) {
        buf.push(b' ');
        self.write_key(buf, &field.key, level);
        buf.push(b'=');
        field.value.write_to(buf);
    }

    fn write_key(&self, buf: &mut Vec<u8>, key: &str, level: LogLevel) {
        if self.color {
            buf.extend_from_slice(b"\x1b[");
            buf.extend_from_slice(level.color().to_fg_str().as_bytes());
            buf.push(b'm');
            escape::write_escaped(buf, key.as_bytes());
            buf.extend_from_slice(ANSI_RESET);
        } else {
            escape::write_escaped(buf, key.as_bytes());
        }
    }
}

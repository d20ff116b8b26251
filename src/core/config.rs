//! Declarative logger configuration
//!
//! `LoggerConfig` mirrors the builder's options in a serde-friendly shape so
//! that hosts can load them from JSON (or any serde format) and hand them to
//! [`LoggerBuilder::from_config`](super::LoggerBuilder::from_config).
//!
//! ```
//! use logfmt_logger::{LoggerConfig, LogLevel};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "debug",
//!     "caller": true,
//!     "timestamp_format": "unix_millis",
//!     "default_fields": [{"key": "service", "value": "api"}]
//! }"#).unwrap();
//!
//! assert_eq!(config.level, LogLevel::Debug);
//! assert_eq!(config.default_fields.len(), 1);
//! ```

use super::encoder::FieldOrder;
use super::error::Result;
use super::field::Field;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Minimum level, by name or number (0 = debug .. 4 = fatal)
    #[serde(deserialize_with = "deserialize_level")]
    pub level: LogLevel,
    pub color: bool,
    pub caller: bool,
    pub caller_skip: usize,
    /// Preset name or strftime pattern
    pub timestamp_format: String,
    pub field_order: FieldOrder,
    pub default_fields: Vec<Field>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            color: false,
            caller: false,
            caller_skip: 0,
            timestamp_format: "rfc3339_millis".to_string(),
            field_order: FieldOrder::Insertion,
            default_fields: Vec::new(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse the configured timestamp format
    pub fn timestamp_format(&self) -> Result<TimestampFormat> {
        self.timestamp_format.parse()
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLevel {
        Number(u8),
        Name(String),
    }

    match RawLevel::deserialize(deserializer)? {
        RawLevel::Number(n) => LogLevel::try_from(n).map_err(serde::de::Error::custom),
        RawLevel::Name(name) => name.parse().map_err(serde::de::Error::custom),
    }
}

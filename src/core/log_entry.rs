//! The record built for a single log call

use super::caller::CallSite;
use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, FixedOffset};

/// One log call, borrowed for the duration of a single encode-and-write.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub level: LogLevel,
    pub message: &'a str,
    pub caller: Option<CallSite>,
    /// Fields carried by the logger, emitted first
    pub default_fields: &'a [Field],
    /// Fields passed with this call
    pub fields: &'a [Field],
}

impl<'a> Record<'a> {
    pub fn new(timestamp: DateTime<FixedOffset>, level: LogLevel, message: &'a str) -> Self {
        Self {
            timestamp,
            level,
            message,
            caller: None,
            default_fields: &[],
            fields: &[],
        }
    }

    pub fn with_caller(mut self, caller: CallSite) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_fields(mut self, default_fields: &'a [Field], fields: &'a [Field]) -> Self {
        self.default_fields = default_fields;
        self.fields = fields;
        self
    }

    /// User fields in insertion order: default fields, then call fields
    pub fn user_fields(&self) -> impl Iterator<Item = &'a Field> {
        self.default_fields.iter().chain(self.fields.iter())
    }
}

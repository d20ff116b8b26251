//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unknown level name or out-of-range level number
    #[error("Invalid log level: '{name}'")]
    InvalidLevel { name: String },

    /// The sink rejected a write or flush
    #[error("error logging: {source}")]
    SinkWrite {
        #[source]
        source: std::io::Error,
    },

    /// Custom strftime pattern with unsupported specifiers
    #[error("Invalid timestamp format: '{format}'")]
    InvalidTimestampFormat { format: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel { name: name.into() }
    }

    /// Wrap an IO error raised by the sink
    pub fn sink_write(source: std::io::Error) -> Self {
        LoggerError::SinkWrite { source }
    }

    /// Create an invalid timestamp format error
    pub fn timestamp_format(format: impl Into<String>) -> Self {
        LoggerError::InvalidTimestampFormat {
            format: format.into(),
        }
    }
}

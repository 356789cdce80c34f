//! Error types for the nginx-access library.
//!
//! None of these cross the [`LogParser::parse`](crate::LogParser::parse) boundary:
//! they travel between the internal stages and end up in a debug diagnostic.

use thiserror::Error;

/// Result type alias for nginx-access operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a raw line into an event.
#[derive(Error, Debug)]
pub enum Error {
    /// The line could not be split into fields (bad quoting).
    #[error("malformed line at byte {position}: {reason}")]
    MalformedLine { position: usize, reason: String },

    /// The input did not contain exactly one record.
    #[error("expected exactly one record, found {count}")]
    RecordCount { count: usize },

    /// The record has the wrong number of columns.
    #[error("wrong number of columns: expected {expected}, found {actual}")]
    ColumnCount { expected: usize, actual: usize },

    /// The user identifier column is not the placeholder.
    #[error("user identifier should always be '-', found '{value}'")]
    UserIdentifier { value: String },

    /// The time column does not have the `DD/Mon/YYYY:HH:MM:SS +ZZZZ` shape.
    #[error("time '{value}' does not match DD/Mon/YYYY:HH:MM:SS +ZZZZ")]
    TimestampLayout { value: String },

    /// The time column has the right shape but is not a valid time.
    #[error("failed to parse time '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A required field is absent after coercion.
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },

    /// IO error when reading log files.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Regex compilation error.
    #[error("regex error: {source}")]
    Regex {
        #[from]
        source: regex::Error,
    },
}

impl Error {
    /// Create a new malformed line error.
    pub fn malformed_line(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            position,
            reason: reason.into(),
        }
    }

    /// Create a new record count error.
    pub fn record_count(count: usize) -> Self {
        Self::RecordCount { count }
    }

    /// Create a new column count error.
    pub fn column_count(expected: usize, actual: usize) -> Self {
        Self::ColumnCount { expected, actual }
    }

    /// Create a new user identifier error.
    pub fn user_identifier(value: impl Into<String>) -> Self {
        Self::UserIdentifier {
            value: value.into(),
        }
    }

    /// Create a new timestamp error.
    pub fn timestamp(value: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::Timestamp {
            value: value.into(),
            source,
        }
    }

    /// Create a new timestamp layout error.
    pub fn timestamp_layout(value: impl Into<String>) -> Self {
        Self::TimestampLayout {
            value: value.into(),
        }
    }

    /// Create a new missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Name of the pipeline stage this error belongs to.
    ///
    /// Used as the `stage` field of rejection diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } | Self::RecordCount { .. } => "tokenize",
            Self::ColumnCount { .. } | Self::UserIdentifier { .. } => "structure",
            Self::TimestampLayout { .. } | Self::Timestamp { .. } => "coerce",
            Self::MissingField { .. } => "schema",
            Self::Io { .. } => "io",
            Self::Regex { .. } => "internal",
        }
    }
}

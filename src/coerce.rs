//! Conversion of raw tokens into typed, optional field values.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::str::FromStr;

/// The value nginx writes for an empty variable.
pub const PLACEHOLDER: &str = "-";

/// `strftime` layout of nginx's `$time_local`, e.g. `10/Oct/2000:13:55:36 -0700`.
pub const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Copy a token into an optional string.
///
/// The placeholder and the empty string are both absent.
///
/// # Example
///
/// ```rust
/// use nginx_access::coerce::optional_string;
///
/// assert_eq!(optional_string("curl/7.64.1").as_deref(), Some("curl/7.64.1"));
/// assert_eq!(optional_string("-"), None);
/// ```
pub fn optional_string(token: &str) -> Option<String> {
    if token.is_empty() || token == PLACEHOLDER {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parse a token as an integer of type `T`.
///
/// Anything `T` cannot represent (the placeholder, text, overflow) is absent;
/// this never fails.
pub fn optional_int<T: FromStr>(token: &str) -> Option<T> {
    if token == PLACEHOLDER {
        return None;
    }
    token.parse::<T>().ok()
}

/// Exact shape of a `$time_local` value: two-digit day, three-letter month,
/// four-digit year, two-digit time parts, one space, signed four-digit offset.
const TIME_LOCAL_SHAPE: &str = r"\A[0-9]{2}/[A-Za-z]{3}/[0-9]{4}:[0-9]{2}:[0-9]{2}:[0-9]{2} [+-][0-9]{4}\z";

/// Strict parser for `$time_local` tokens.
///
/// `chrono` alone accepts one-digit days, short years and `+00:00` offsets,
/// so the token's shape is matched first and only then handed to
/// [`TIME_LOCAL_FORMAT`] for month names and ranges.
#[derive(Debug, Clone)]
pub struct TimeLocal {
    shape: Regex,
}

impl TimeLocal {
    /// Compile the shape pattern.
    pub fn new() -> Result<Self> {
        Ok(Self {
            shape: Regex::new(TIME_LOCAL_SHAPE)?,
        })
    }

    /// Parse a `$time_local` token into a UTC timestamp.
    ///
    /// One enclosing pair of square brackets is stripped first, so both
    /// `[10/Oct/2000:13:55:36 -0700]` and `10/Oct/2000:13:55:36 -0700` are accepted.
    ///
    /// # Returns
    ///
    /// The instant in UTC, [`Error::TimestampLayout`] if the token has the
    /// wrong shape, or [`Error::Timestamp`] if `chrono` rejects it.
    pub fn parse(&self, token: &str) -> Result<DateTime<Utc>> {
        let value = token
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(token);

        if !self.shape.is_match(value) {
            return Err(Error::timestamp_layout(token));
        }

        DateTime::parse_from_str(value, TIME_LOCAL_FORMAT)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|e| Error::timestamp(token, e))
    }
}

//! Parser for nginx access logs in the `combined` format.
//!
//! ```text
//! log_format combined '$remote_addr - $remote_user [$time_local] '
//!                     '"$request" $status $body_bytes_sent '
//!                     '"$http_referer" "$http_user_agent"';
//! ```

use crate::coerce::{self, TimeLocal, PLACEHOLDER};
use crate::error::{Error, Result};
use crate::event::{AccessEvent, AccessRecord};
use crate::parser::LogParser;
use crate::tokenizer::Tokenizer;
use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Routing identifier of this log type.
pub const LOG_TYPE: &str = "Nginx.Access";

/// Description of this log type.
pub const DESCRIPTION: &str = "Access Logs for your Nginx server. We currently support 'combined' format. \
Reference: http://nginx.org/en/docs/http/ngx_http_log_module.html#log_format";

/// Number of columns in a `combined` line.
pub const COLUMN_COUNT: usize = 9;

/// Value required in the second column.
///
/// The `combined` format writes a literal `-` there (the identd user is never
/// logged by nginx), so anything else means the line is some other format.
pub const USER_IDENTIFIER: &str = PLACEHOLDER;

/// How the `$time_local` column is tokenized.
///
/// nginx writes `[10/Oct/2000:13:55:36 -0700]` without quotes, and the space
/// before the offset would split it in two under plain quote-aware splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeField {
    /// A `[...]` span is one column. Lines written by nginx parse.
    #[default]
    Bracketed,
    /// Only double quotes group text. An unquoted bracketed time becomes two
    /// columns and the line is rejected for its column count.
    Literal,
}

/// Parser for nginx `combined` access log lines.
///
/// # Example
///
/// ```rust
/// use nginx_access::{AccessParser, LogParser};
///
/// let parser = AccessParser::new()?;
/// let line = r#"203.0.113.5 - jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;
///
/// let event = parser.parse(line).expect("valid combined line");
/// assert_eq!(event.remote_user(), Some("jdoe"));
/// assert_eq!(event.http_referer(), None);
/// # Ok::<(), nginx_access::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AccessParser {
    tokenizer: Tokenizer,
    time_local: TimeLocal,
    time_field: TimeField,
}

impl AccessParser {
    /// Create a parser using [`TimeField::Bracketed`].
    pub fn new() -> Result<Self> {
        Self::with_time_field(TimeField::default())
    }

    /// Create a parser with an explicit `$time_local` tokenization.
    ///
    /// # Arguments
    ///
    /// * `time_field` - Whether a bracketed time is kept as one column
    ///
    /// # Returns
    ///
    /// A new parser, or an error if a pattern fails to compile.
    pub fn with_time_field(time_field: TimeField) -> Result<Self> {
        let tokenizer = Tokenizer::new(time_field == TimeField::Bracketed)?;
        let time_local = TimeLocal::new()?;

        Ok(Self {
            tokenizer,
            time_local,
            time_field,
        })
    }

    /// Get the configured `$time_local` tokenization.
    pub fn time_field(&self) -> TimeField {
        self.time_field
    }

    /// Run every stage on `line`, stopping at the first rejection.
    fn try_parse(&self, line: &str) -> Result<AccessEvent> {
        let mut records = self.tokenizer.tokenize(line)?;
        if records.len() != 1 {
            return Err(Error::record_count(records.len()));
        }
        let columns = records.remove(0);

        check_columns(&columns)?;
        let record = coerce_columns(&columns, &self.time_local)?;

        AccessEvent::try_from(record)
    }
}

/// Column count and user identifier checks.
fn check_columns(columns: &[Cow<'_, str>]) -> Result<()> {
    if columns.len() != COLUMN_COUNT {
        return Err(Error::column_count(COLUMN_COUNT, columns.len()));
    }
    if columns[1] != USER_IDENTIFIER {
        return Err(Error::user_identifier(columns[1].to_string()));
    }
    Ok(())
}

/// Build the draft record. Only an unparseable time fails; numeric columns
/// that do not parse are left absent.
fn coerce_columns(columns: &[Cow<'_, str>], time_local: &TimeLocal) -> Result<AccessRecord> {
    let time = time_local.parse(&columns[3])?;

    Ok(AccessRecord {
        remote_addr: coerce::optional_string(&columns[0]),
        remote_user: coerce::optional_string(&columns[2]),
        time: Some(time),
        request: coerce::optional_string(&columns[4]),
        status: coerce::optional_int(&columns[5]),
        body_bytes_sent: coerce::optional_int(&columns[6]),
        http_referer: coerce::optional_string(&columns[7]),
        http_user_agent: coerce::optional_string(&columns[8]),
    })
}

impl LogParser for AccessParser {
    type Event = AccessEvent;

    fn parse(&self, line: &str) -> Option<AccessEvent> {
        match self.try_parse(line) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::debug!(
                    log_type = LOG_TYPE,
                    stage = err.stage(),
                    error = %err,
                    "failed to parse nginx access log line"
                );
                None
            }
        }
    }

    fn log_type(&self) -> &'static str {
        LOG_TYPE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const LINE: &str = r#"203.0.113.5 - jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;

    fn parser() -> AccessParser {
        AccessParser::new().unwrap()
    }

    #[test]
    fn test_parse_combined_line() {
        let event = parser().parse(LINE).unwrap();

        assert_eq!(event.remote_addr(), Some("203.0.113.5"));
        assert_eq!(event.remote_user(), Some("jdoe"));
        assert_eq!(
            event.time(),
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(event.request(), Some("GET / HTTP/1.1"));
        assert_eq!(event.status(), Some(200));
        assert_eq!(event.body_bytes_sent(), Some(512));
        assert_eq!(event.http_referer(), None);
        assert_eq!(event.http_user_agent(), Some("curl/7.64.1"));
    }

    #[test]
    fn test_rejection_stages() {
        let parser = parser();
        let cases = [
            ("", "tokenize"),
            (r#"a - b [01/Jan/2021:00:00:00 +0000] "GET / 200 1 "-" "ua""#, "tokenize"),
            ("1 - 2 [01/Jan/2021:00:00:00 +0000] 4 5 6 7 8\n1 - 2 3 4 5 6 7 8", "tokenize"),
            ("1 - 2 [01/Jan/2021:00:00:00 +0000] 4 5 6 7", "structure"),
            ("1 x 2 [01/Jan/2021:00:00:00 +0000] 4 5 6 7 8", "structure"),
            ("1 - 2 yesterday 4 5 6 7 8", "coerce"),
            ("1 - 2 [01/Jan/21:00:00:00 +0000] 4 5 6 7 8", "coerce"),
        ];

        for (line, stage) in cases {
            let err = parser.try_parse(line).unwrap_err();
            assert_eq!(err.stage(), stage, "{:?}: {}", line, err);
        }
    }

    #[test]
    fn test_record_count_errors() {
        let parser = parser();

        let err = parser.try_parse("\n\n").unwrap_err();
        assert!(matches!(err, Error::RecordCount { count: 0 }));

        let two = format!("{}\n{}", LINE, LINE);
        let err = parser.try_parse(&two).unwrap_err();
        assert!(matches!(err, Error::RecordCount { count: 2 }));

        // A trailing newline is not a second record.
        assert!(parser.parse(&format!("{}\n", LINE)).is_some());
    }

    #[test]
    fn test_column_errors() {
        let parser = parser();

        let err = parser
            .try_parse(r#"203.0.113.5 - jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-""#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnCount {
                expected: 9,
                actual: 8
            }
        ));

        let err = parser
            .try_parse(r#"203.0.113.5 jdoe jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 200 512 "-" "ua""#)
            .unwrap_err();
        assert!(matches!(err, Error::UserIdentifier { ref value } if value == "jdoe"));
    }

    #[test]
    fn test_soft_numeric_columns() {
        let line = r#"203.0.113.5 - jdoe [01/Jan/2021:00:00:00 +0000] "GET / HTTP/1.1" 99999 - "-" "curl/7.64.1""#;
        let event = parser().parse(line).unwrap();

        assert_eq!(event.status(), None);
        assert_eq!(event.body_bytes_sent(), None);
        assert_eq!(event.remote_addr(), Some("203.0.113.5"));
        assert_eq!(event.request(), Some("GET / HTTP/1.1"));
    }

    #[test]
    fn test_placeholders_become_absent() {
        let line = r#"- - - [01/Jan/2021:00:00:00 +0000] "-" - - "-" "-""#;
        let event = parser().parse(line).unwrap();

        assert_eq!(event.remote_addr(), None);
        assert_eq!(event.remote_user(), None);
        assert_eq!(event.request(), None);
        assert_eq!(event.status(), None);
        assert_eq!(event.body_bytes_sent(), None);
        assert_eq!(event.http_referer(), None);
        assert_eq!(event.http_user_agent(), None);
    }

    #[test]
    fn test_literal_time_field() {
        let parser = AccessParser::with_time_field(TimeField::Literal).unwrap();
        assert_eq!(parser.time_field(), TimeField::Literal);

        let err = parser.try_parse(LINE).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnCount {
                expected: 9,
                actual: 10
            }
        ));

        let quoted = r#"203.0.113.5 - jdoe "01/Jan/2021:00:00:00 +0000" "GET / HTTP/1.1" 200 512 "-" "curl/7.64.1""#;
        let event = parser.parse(quoted).unwrap();
        assert_eq!(
            event.time(),
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_offset_is_normalized() {
        let line = r#"10.0.0.1 - - [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326 "http://www.example.com/start.html" "Mozilla/4.08""#;
        let event = parser().parse(line).unwrap();

        assert_eq!(
            event.time(),
            Utc.with_ymd_and_hms(2000, 10, 10, 20, 55, 36).unwrap()
        );
        assert_eq!(
            event.http_referer(),
            Some("http://www.example.com/start.html")
        );
    }

    #[test]
    fn test_identity() {
        let parser = parser();
        assert_eq!(parser.log_type(), "Nginx.Access");
        assert!(parser.description().contains("'combined' format"));
        assert_eq!(parser.time_field(), TimeField::Bracketed);
    }

    #[test]
    fn test_loose_time_is_rejected() {
        let parser = parser();
        let line = LINE.replace("01/Jan/2021", "01/Jan/21");

        let err = parser.try_parse(&line).unwrap_err();
        assert!(matches!(err, Error::TimestampLayout { .. }), "{}", err);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_time_field_config() {
        let field: TimeField = serde_json::from_str(r#""literal""#).unwrap();
        assert_eq!(field, TimeField::Literal);
        assert_eq!(
            serde_json::to_string(&TimeField::Bracketed).unwrap(),
            r#""bracketed""#
        );
        assert!(serde_json::from_str::<TimeField>(r#""Bracketed""#).is_err());

        let parser = AccessParser::with_time_field(field).unwrap();
        assert!(parser.parse(LINE).is_none());
    }

    #[test]
    fn test_rejections_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let parser = parser();

        tracing::subscriber::with_default(subscriber, || {
            assert!(parser.parse("1 - 2 yesterday 4 5 6 7 8").is_none());
            assert!(parser.parse(LINE).is_some());
        });
    }
}

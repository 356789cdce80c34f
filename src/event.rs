//! The typed nginx access event and the draft it is assembled from.

use crate::error::{Error, Result};
use crate::schema::{self, Required};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fields of an access event before the required-field check.
///
/// Every field is optional here; [`AccessEvent::try_from`] decides whether the
/// draft is complete enough to become an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessRecord {
    pub remote_addr: Option<String>,
    pub remote_user: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub request: Option<String>,
    pub status: Option<u16>,
    pub body_bytes_sent: Option<i64>,
    pub http_referer: Option<String>,
    pub http_user_agent: Option<String>,
}

/// Fields an [`AccessRecord`] must carry to be emitted.
pub const REQUIRED_FIELDS: &[Required<AccessRecord>] = &[Required {
    field: "time",
    present: |record| record.time.is_some(),
}];

/// One request from an nginx `combined` access log.
///
/// Instances only come out of a successful parse (or deserialization) and are
/// read-only afterwards. With the `serde` feature, absent fields are left out
/// of the serialized form entirely.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessEvent {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    remote_addr: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    remote_user: Option<String>,
    time: DateTime<Utc>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    request: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    status: Option<u16>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    body_bytes_sent: Option<i64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    http_referer: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    http_user_agent: Option<String>,
}

impl AccessEvent {
    /// Client address (`$remote_addr`).
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Authenticated user name (`$remote_user`).
    pub fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    /// Local time of the request (`$time_local`), normalized to UTC.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Full original request line (`$request`).
    pub fn request(&self) -> Option<&str> {
        self.request.as_deref()
    }

    /// Response status (`$status`).
    ///
    /// Held as a `u16` so every HTTP status fits. Negative, non-numeric and
    /// out-of-range tokens (e.g. `-5`, `99999`) leave it absent.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Bytes sent to the client, excluding headers (`$body_bytes_sent`).
    pub fn body_bytes_sent(&self) -> Option<i64> {
        self.body_bytes_sent
    }

    /// Referer header sent by the client (`$http_referer`).
    pub fn http_referer(&self) -> Option<&str> {
        self.http_referer.as_deref()
    }

    /// User-Agent header sent by the client (`$http_user_agent`).
    pub fn http_user_agent(&self) -> Option<&str> {
        self.http_user_agent.as_deref()
    }
}

impl TryFrom<AccessRecord> for AccessEvent {
    type Error = Error;

    /// Run the required-field check and seal the draft.
    fn try_from(record: AccessRecord) -> Result<Self> {
        schema::validate(&record, REQUIRED_FIELDS)?;

        let time = record.time.ok_or_else(|| Error::missing_field("time"))?;

        Ok(Self {
            remote_addr: record.remote_addr,
            remote_user: record.remote_user,
            time,
            request: record.request,
            status: record.status,
            body_bytes_sent: record.body_bytes_sent,
            http_referer: record.http_referer,
            http_user_agent: record.http_user_agent,
        })
    }
}

impl From<AccessEvent> for AccessRecord {
    fn from(event: AccessEvent) -> Self {
        Self {
            remote_addr: event.remote_addr,
            remote_user: event.remote_user,
            time: Some(event.time),
            request: event.request,
            status: event.status,
            body_bytes_sent: event.body_bytes_sent,
            http_referer: event.http_referer,
            http_user_agent: event.http_user_agent,
        }
    }
}

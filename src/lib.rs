//! # nginx-access - Strict nginx access log parsing
//!
//! Turns single lines of an nginx access log in the `combined` format into
//! typed [`AccessEvent`]s for security analytics.
//!
//! A line goes through four stages, any of which can reject it:
//! - **Tokenizing**: space-separated columns, double quotes group text
//! - **Structure**: exactly nine columns, second column always `-`
//! - **Coercion**: placeholders become absent values, numbers are parsed
//!   leniently, the time must parse
//! - **Schema**: required fields are checked before the event is emitted
//!
//! Rejections never reach the caller as errors: [`LogParser::parse`] returns
//! `None` and the reason is logged at debug level through `tracing`.
//!
//! ## Quick Start
//!
//! ```rust
//! use nginx_access::{AccessParser, LogParser};
//!
//! let parser = AccessParser::new()?;
//! let line = r#"127.0.0.1 - - [08/Nov/2013:13:39:18 +0000] "GET /api/foo HTTP/1.1" 200 612 "-" "curl/7.64.1""#;
//!
//! if let Some(event) = parser.parse(line) {
//!     println!("IP: {:?}", event.remote_addr());
//!     println!("Status: {:?}", event.status());
//! }
//! # Ok::<(), nginx_access::Error>(())
//! ```
//!
//! ## Features
//!
//! - **`serde`** (default): serialize events with camelCase field names,
//!   omitting absent fields

pub mod access;
pub mod coerce;
pub mod error;
pub mod event;
pub mod parser;
pub mod reader;
pub mod schema;
pub mod tokenizer;

// Re-export main types for convenience
pub use access::{AccessParser, TimeField, LOG_TYPE};
pub use error::{Error, Result};
pub use event::{AccessEvent, AccessRecord};
pub use parser::LogParser;
pub use reader::Reader;

use std::error::Error as StdError;
use std::panic::Location;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use thiserror::Error;

/// Value of the `@version` field on every record.
pub const SCHEMA_VERSION: u8 = 1;

/// Render a timestamp as RFC 3339 with millisecond precision and a numeric
/// offset (`2021-10-29T12:39:45.000+00:00`).
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// One output line.
///
/// Field order is fixed by declaration order: envelope first, then the
/// request fields when the line was an access log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "@version")]
    pub version: u8,

    #[serde(rename = "@timestamp")]
    pub timestamp: String,

    pub message: String,

    #[serde(flatten)]
    pub request: Option<RequestFields>,
}

impl Record {
    /// Base envelope for a trimmed line.
    pub fn envelope(now: &DateTime<FixedOffset>, message: &str) -> Self {
        Self {
            version: SCHEMA_VERSION,
            timestamp: format_timestamp(now),
            message: message.to_string(),
            request: None,
        }
    }

    /// Overlay a recognised request; replaces timestamp and message and adds
    /// every request field at once.
    pub fn with_request(self, request: RequestLog) -> Self {
        Self {
            timestamp: format_timestamp(&request.timestamp),
            message: request.message,
            request: Some(request.fields),
            ..self
        }
    }

    /// Overlay a diagnostic; only the message changes.
    pub fn with_diagnostic(self, diagnostic: String) -> Self {
        Self {
            message: diagnostic,
            ..self
        }
    }
}

/// Request fields added to a record, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFields {
    pub method: String,
    pub path: String,
    /// Kept as text, `"200"` not `200`.
    pub status: String,
    pub clientip: String,
    /// Empty when the log line has `""`.
    pub referrer: String,
    /// Captured agent followed by the HTTP version.
    pub user_agent: String,
}

/// A fully extracted access-log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog {
    /// Time the server logged, with the server's offset.
    pub timestamp: DateTime<FixedOffset>,
    /// `"<status> - <method> <path> <rest>"`
    pub message: String,
    pub fields: RequestFields,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid date `{value}`")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
        /// Where extraction gave up.
        location: &'static Location<'static>,
    },
}

impl ParseError {
    #[track_caller]
    pub fn invalid_timestamp(value: &str, source: chrono::ParseError) -> Self {
        ParseError::InvalidTimestamp {
            value: value.to_string(),
            source,
            location: Location::caller(),
        }
    }

    /// Short category name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::InvalidTimestamp { .. } => "InvalidTimestamp",
        }
    }

    pub fn location(&self) -> &'static Location<'static> {
        match self {
            ParseError::InvalidTimestamp { location, .. } => location,
        }
    }

    /// Underlying causes, one numbered frame per line, then the place the
    /// error was raised.
    pub fn trace(&self) -> String {
        let mut frames = Vec::new();
        let mut source = self.source();
        while let Some(err) = source {
            frames.push(format!("{}: {}", frames.len(), err));
            source = err.source();
        }
        frames.push(format!("at {}", self.location()));
        frames.join("\n")
    }

    /// Message that replaces a record's `message` when extraction fails.
    pub fn diagnostic(&self, line: &str) -> String {
        format!(
            "Error formatting line `{}`: {} - {} - {}",
            line,
            self.kind(),
            self,
            self.trace()
        )
    }
}

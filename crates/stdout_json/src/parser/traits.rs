use chrono::{DateTime, FixedOffset, Local};

pub use super::model::{ParseError, Record, RequestFields, RequestLog};

pub trait LogParser: Send + Sync {
    /// Recognise a trimmed line.
    ///
    /// `Ok(None)` when the line is not in this parser's format,
    /// `Err` when it is but the fields cannot be extracted.
    fn parse(&self, line: &str) -> Result<Option<RequestLog>, ParseError>;
}

/// Source of "now" for the base envelope.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local offset.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

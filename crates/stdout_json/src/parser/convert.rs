//! Line converter: one raw line in, one JSON record out.

use tracing::{debug, error};

use super::formats::HttpLogParser;
use super::metrics::{ConversionMetrics, MetricsSnapshot};
use super::model::{Record, SCHEMA_VERSION};
use super::traits::{Clock, LogParser, SystemClock};

/// Turns raw lines into Logstash JSON records.
///
/// Holds no per-line state: `convert` takes `&self` and may be called from
/// several tasks at once.
pub struct LineConverter {
    clock: Box<dyn Clock>,
    parser: Box<dyn LogParser>,
    metrics: ConversionMetrics,
}

impl LineConverter {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        Self {
            clock: Box::new(clock),
            parser: Box::new(HttpLogParser),
            metrics: ConversionMetrics::new(),
        }
    }

    /// Convert one line into a single-line JSON object (no trailing newline).
    ///
    /// Never fails: lines that look like access logs but cannot be extracted
    /// get a diagnostic `message` instead.
    pub fn convert(&self, line: &str) -> String {
        let record = self.record(line);
        match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize record: {}", e);
                serde_json::json!({
                    "@version": SCHEMA_VERSION,
                    "@timestamp": record.timestamp,
                    "message": record.message,
                })
                .to_string()
            }
        }
    }

    /// Build the record for one line without serializing it.
    pub fn record(&self, line: &str) -> Record {
        self.metrics.record_line();

        let clean_line = line.trim();
        let base = Record::envelope(&self.clock.now(), clean_line);

        match self.parser.parse(clean_line) {
            Ok(None) => base,
            Ok(Some(request)) => {
                self.metrics.record_request();
                base.with_request(request)
            }
            Err(e) => {
                self.metrics.record_failure();
                debug!("Access log extraction failed ({}): {}", e.kind(), e);
                base.with_diagnostic(e.diagnostic(clean_line))
            }
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for LineConverter {
    fn default() -> Self {
        Self::new()
    }
}

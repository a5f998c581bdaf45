/// Line parsing and record building
///
/// - `model.rs`: output record, request fields, parse errors
/// - `traits.rs`: parser and clock seams
/// - `formats/`: the access-log parser
/// - `convert.rs`: `LineConverter`, envelope + overlay + JSON encoding
/// - `metrics.rs`: per-converter counters

pub mod traits;
pub mod model;
pub mod formats;
pub mod metrics;
pub mod convert;

// Re-export commonly used types
pub use convert::LineConverter;
pub use model::{ParseError, Record, RequestFields, RequestLog};
pub use traits::{Clock, FixedClock, LogParser, SystemClock};

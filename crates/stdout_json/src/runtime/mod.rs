//! Runtime module: boot, drivers (command / stream), sink, shutdown.

pub mod boot;
pub mod command;
pub mod error;
pub mod outcome;
pub mod sink;
pub mod stop;
pub mod stream;

pub use error::RunError;
pub use outcome::Outcome;
pub use sink::JsonSink;

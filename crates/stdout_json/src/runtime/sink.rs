//! Sink: newline-delimited JSON writer.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::RunError;

/// Writes one record per line and flushes after each, so records reach the
/// log shipper as soon as the wrapped command prints them.
pub struct JsonSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn emit(&mut self, record: &str) -> Result<(), RunError> {
        self.writer.write_all(record.as_bytes()).await.map_err(RunError::Output)?;
        self.writer.write_all(b"\n").await.map_err(RunError::Output)?;
        self.writer.flush().await.map_err(RunError::Output)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

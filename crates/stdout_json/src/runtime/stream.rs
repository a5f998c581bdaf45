//! Stream: convert lines read from stdin (or any reader).

use std::future::Future;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tracing::info;

use crate::parser::LineConverter;
use super::error::RunError;
use super::outcome::Outcome;
use super::sink::JsonSink;

/// Read one line as bytes and decode it lossily; `None` at EOF.
/// The line terminator is kept; the converter trims it.
pub(crate) async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Convert every line of `reader` until EOF. Returns the number of lines.
pub async fn pipe_lines<R, W>(
    mut reader: R,
    converter: &LineConverter,
    sink: &mut JsonSink<W>,
) -> Result<u64, RunError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut count = 0;
    while let Some(line) = read_line_lossy(&mut reader, &mut buf).await.map_err(RunError::Input)? {
        sink.emit(&converter.convert(&line)).await?;
        count += 1;
    }
    Ok(count)
}

/// Stream mode: pipe `reader` until EOF or until `shutdown` resolves.
pub async fn run_stream<R, W, S>(
    reader: R,
    converter: &LineConverter,
    sink: &mut JsonSink<W>,
    shutdown: S,
) -> Result<Outcome, RunError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = &'static str>,
{
    tokio::select! {
        result = pipe_lines(reader, converter, sink) => {
            let count = result?;
            info!("Input closed after {} lines", count);
            Ok(Outcome::Finished)
        }
        signal = shutdown => {
            info!("Received {}, stopping", signal);
            Ok(Outcome::Interrupted(signal))
        }
    }
}

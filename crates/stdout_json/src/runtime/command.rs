//! Command: run a shell command and convert its combined stdout/stderr.

use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::conf::RunnerConfig;
use crate::parser::LineConverter;
use super::error::RunError;
use super::outcome::Outcome;
use super::sink::JsonSink;
use super::stream::read_line_lossy;

type PipeReader = Box<dyn AsyncRead + Send + Unpin>;

/// One pipe whose write end is handed to the child as both stdout and
/// stderr, so the kernel keeps the order the child wrote in.
#[cfg(unix)]
fn combined_pipe() -> io::Result<(PipeReader, Stdio, Stdio)> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = io::pipe()?;
    let err_writer = writer.try_clone()?;
    let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok((Box::new(receiver), Stdio::from(writer), Stdio::from(err_writer)))
}

#[cfg(not(unix))]
fn combined_pipe() -> io::Result<(PipeReader, Stdio, Stdio)> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "command mode needs unix pipes",
    ))
}

/// `<shell> -c <command>` writing stdout and stderr to the given handles.
fn shell_command(config: &RunnerConfig, command: &str, stdout: Stdio, stderr: Stdio) -> Command {
    let mut cmd = Command::new(&config.shell);
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .kill_on_drop(true);
    cmd
}

/// Exit code of a finished child. A child killed by a signal reports
/// `128 + signal`, like a shell does.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Read lines from the child's output and queue them for the writer.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        match read_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(text)) => {
                if tx.send(text).await.is_err() {
                    break; // Writer gone
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read child output: {}", e);
                break;
            }
        }
    }
    trace!("Output pipe closed");
}

/// Emit a lifecycle message through the converter, if enabled.
async fn announce<W>(
    config: &RunnerConfig,
    converter: &LineConverter,
    sink: &mut JsonSink<W>,
    message: &str,
) -> Result<(), RunError>
where
    W: AsyncWrite + Unpin,
{
    if config.startup_logs {
        sink.emit(&converter.convert(message)).await?;
    }
    Ok(())
}

/// Command mode.
///
/// Runs `command` through the configured shell, converts every line the
/// child writes to stdout or stderr in the order it wrote them, and waits for
/// it to exit. If `shutdown` resolves first the child is killed.
pub async fn run_command<W, S>(
    command: &str,
    config: &RunnerConfig,
    converter: &LineConverter,
    sink: &mut JsonSink<W>,
    shutdown: S,
) -> Result<Outcome, RunError>
where
    W: AsyncWrite + Unpin,
    S: Future<Output = &'static str>,
{
    announce(config, converter, sink, &format!("stdout_json version: {}", env!("CARGO_PKG_VERSION"))).await?;
    announce(config, converter, sink, &format!("Starting command: {}", command)).await?;

    let (output, stdout, stderr) = combined_pipe().map_err(RunError::Pipe)?;
    let mut cmd = shell_command(config, command, stdout, stderr);
    let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
        command: command.to_string(),
        source,
    })?;
    // Our copies of the write end; EOF arrives once the child's are closed too.
    drop(cmd);

    let pid = child
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!(pid = %pid, "Started `{}`", command);
    announce(config, converter, sink, &format!("Command started with pid: {}", pid)).await?;

    let (tx, mut rx) = mpsc::channel::<String>(config.channel_capacity);
    tokio::spawn(forward_lines(output, tx));

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(line) => {
                    trace!("{}", line.trim_end());
                    sink.emit(&converter.convert(&line)).await?;
                }
                None => break,
            },
            signal = &mut shutdown => {
                info!("Received {}, stopping `{}`", signal, command);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill child process: {}", e);
                }
                announce(config, converter, sink, &format!("Exiting because of Interrupt {}", signal)).await?;
                return Ok(Outcome::Interrupted(signal));
            }
        }
    }

    let status = child.wait().await.map_err(|source| RunError::Wait {
        command: command.to_string(),
        source,
    })?;
    let code = exit_code(&status);
    debug!("`{}` finished with {}", command, status);
    announce(config, converter, sink, &format!("Exiting with status {}", code)).await?;

    Ok(Outcome::Exited(code))
}

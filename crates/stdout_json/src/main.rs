use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;

use stdout_json::cli::Cli;
use stdout_json::parser::LineConverter;
use stdout_json::runtime::{boot, command, stop, stream, JsonSink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    boot::init_logging();
    let config = boot::boot(cli.config.as_deref())?;

    let converter = LineConverter::new();
    let mut sink = JsonSink::stdout();

    let outcome = match cli.command_line() {
        Some(command_line) => {
            command::run_command(&command_line, &config, &converter, &mut sink, stop::shutdown_signal()).await?
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            stream::run_stream(stdin, &converter, &mut sink, stop::shutdown_signal()).await?
        }
    };

    debug!(metrics = ?converter.metrics(), "Run finished: {:?}", outcome);
    std::process::exit(outcome.exit_code());
}

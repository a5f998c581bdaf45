use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create output pipe: {0}")]
    Pipe(#[source] std::io::Error),
    #[error("Failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Output closed: {0}")]
    Output(#[source] std::io::Error),
    #[error("Input error: {0}")]
    Input(#[source] std::io::Error),
}

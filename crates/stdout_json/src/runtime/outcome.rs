/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input stream reached EOF.
    Finished,
    /// Wrapped command exited with this code.
    Exited(i32),
    /// Stopped by a termination signal.
    Interrupted(&'static str),
}

impl Outcome {
    /// Exit code for this process. Interrupts are a clean stop.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Finished => 0,
            Outcome::Exited(code) => *code,
            Outcome::Interrupted(_) => 0,
        }
    }
}

use std::fmt;

use super::Lifecycle;

/// Fatal runtime failure.
///
/// `phase` is the lifecycle phase that could not be reached (`Running` when
/// the event loop itself failed). `source` carries the context chain.
#[derive(Debug)]
pub struct RuntimeError {
    pub phase: Lifecycle,
    pub source: anyhow::Error,
}

impl RuntimeError {
    pub fn new(phase: Lifecycle, source: anyhow::Error) -> Self {
        Self { phase, source }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime failed before reaching '{}': {:#}", self.phase, self.source)
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

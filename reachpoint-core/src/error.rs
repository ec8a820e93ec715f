use thiserror::Error;

/// Top-level failure of a running session. `Quit` unwinds every poll
/// loop; the binary maps it to a non-zero exit.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("quit requested")]
    Quit,
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A client task panicked or was cancelled before reaching acceptance.
    #[error("client task failed: {0}")]
    ClientTask(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown strategy {name:?}. Use: constant, backoff, jitter, decorrelated")]
pub struct ParseStrategyError {
    pub name: String,
}

pub type Result<T> = std::result::Result<T, Error>;

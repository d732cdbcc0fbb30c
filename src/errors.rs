use thiserror::Error;

/// Error type that captures common funnel infrastructure failures.
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

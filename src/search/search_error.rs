use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    #[error("Unexpected response shape: {0}")]
    Parse(String),
}

use thiserror::Error;

/// The feed could not be read. Callers degrade to local-only results.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(String),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("feed body could not be decoded: {0}")]
    Decode(String),

    #[error("invalid feed configuration: {0}")]
    Config(String),
}

pub type FeedResult<T> = Result<T, FeedError>;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WordCountError {
    #[error("failed to load word count module: {0}")]
    Load(String),

    #[error("word count module failed: {0}")]
    Execution(String),
}

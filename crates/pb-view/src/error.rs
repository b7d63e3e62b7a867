use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("page size must be a positive integer")]
    ZeroPageSize,
}

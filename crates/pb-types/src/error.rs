use thiserror::Error;

/// Errors produced when constructing domain values from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("at least one of title or body is required")]
    EmptyPatch,
}

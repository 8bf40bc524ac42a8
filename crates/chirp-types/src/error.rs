use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("principal must not be empty")]
    EmptyPrincipal,

    #[error("principal contains whitespace: {0:?}")]
    InvalidPrincipal(String),

    #[error("identifier must not be empty")]
    EmptyId,

    #[error("public key is not valid hex: {0}")]
    InvalidKey(String),
}

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("registration {0} is already certified")]
    AlreadyCertified(String),

    #[error("token does not match the one issued for registration {0}")]
    TokenMismatch(String),

    #[error("token for registration {0} has already been consumed")]
    AlreadyConsumed(String),

    #[error("could not gather token entropy: {0}")]
    Entropy(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

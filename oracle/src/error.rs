use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum OracleError {
    /// Network-level failure reaching the oracle. Retryable.
    #[error("match oracle unreachable: {0}")]
    Transport(String),

    /// The oracle answered but refused the request (`success = false`).
    /// Hard failure, distinct from a low match score.
    #[error("match oracle rejected the request: {0}")]
    Rejected(String),

    /// The oracle answered with a body this client cannot decode.
    #[error("malformed oracle response: {0}")]
    Decode(String),
}

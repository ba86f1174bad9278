//! Identity-match oracle — the external service that compares a freshly
//! captured still against the user's previously verified reference image.
//!
//! The match score is an opaque number produced by the oracle; this crate
//! only classifies responses, it never computes biometrics.

pub mod error;
pub mod http;
pub mod wire;

pub use error::OracleError;
pub use http::HttpMatchOracle;
pub use wire::{MatchOutcome, MatchRequest, MatchResponse};

use std::future::Future;

/// Seam for the face-match round trip.
///
/// At most one call per registration is logically in flight at a time;
/// the flow enforces that client-side rather than racing the server.
pub trait MatchOracle: Send + Sync {
    fn face_match(
        &self,
        request: &MatchRequest,
    ) -> impl Future<Output = Result<MatchOutcome, OracleError>> + Send;
}

//! Flow error taxonomy and retry semantics.

use crate::FlowStage;
use attest_sensors::SensorError;
use attest_store::StoreError;
use thiserror::Error;

/// Where a retry resumes. Every error maps to exactly one point, so the
/// user is never offered a dead end and never forced to redo proven work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPoint {
    /// Re-enter the capture front half (fresh still, fresh oracle call).
    Capture,
    /// Re-invoke only the pending write; identity is already proven.
    Confirm,
    /// Not retryable within this flow; the only offer is cancel.
    None,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FlowError {
    /// The eligibility envelope is not satisfied; certification never starts.
    #[error("not eligible: {0}")]
    NotEligible(String),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// Oracle soft failure. The message carries the rounded score.
    #[error("face match score {score:.0} is below the acceptance threshold")]
    ScoreTooLow { score: f64 },

    /// The underlying identity-document verification has expired and must
    /// be redone out-of-band before this flow can run at all.
    #[error("identity verification has expired and must be redone before certifying attendance")]
    NeedsReverification,

    /// Oracle hard failure (transport, auth, malformed response).
    #[error("verification service unavailable: {0}")]
    Oracle(String),

    /// Token issuance or registration write failed after a passed match.
    #[error("could not save certification: {0}")]
    Persistence(#[from] StoreError),

    /// A second capture was attempted while one oracle call is pending.
    #[error("a capture is already being processed")]
    CaptureInProgress,

    /// The confirm action fired again while the write is in flight.
    #[error("confirmation is already in progress")]
    ConfirmInFlight,

    /// Hard precondition of the self path, checked before any network call.
    #[error("the honor declaration must be affirmed before confirming")]
    DeclarationRequired,

    #[error("cannot {action} while the flow is in stage {stage:?}")]
    WrongStage {
        stage: FlowStage,
        action: &'static str,
    },

    #[error("this failure cannot be retried within the flow")]
    NotRetryable,

    #[error("could not render scan code: {0}")]
    ScanCode(String),

    #[error("internal flow error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Classify where a retry of this error resumes.
    pub fn retry_point(&self) -> RetryPoint {
        match self {
            // Permission errors are terminal per attempt but actionable:
            // retry re-requests the sensor after the user fixes settings.
            FlowError::Sensor(SensorError::PermissionDenied(_)) => RetryPoint::Capture,
            // No camera on the device; no retry helps.
            FlowError::Sensor(SensorError::NotFound(_)) => RetryPoint::None,
            FlowError::Sensor(_) => RetryPoint::Capture,
            FlowError::ScoreTooLow { .. } => RetryPoint::Capture,
            FlowError::Oracle(_) => RetryPoint::Capture,
            FlowError::NeedsReverification => RetryPoint::None,
            // Identity is already proven; only the write is re-attempted.
            FlowError::Persistence(_) => RetryPoint::Confirm,
            FlowError::NotEligible(_)
            | FlowError::CaptureInProgress
            | FlowError::ConfirmInFlight
            | FlowError::DeclarationRequired
            | FlowError::WrongStage { .. }
            | FlowError::NotRetryable
            | FlowError::ScanCode(_)
            | FlowError::Internal(_) => RetryPoint::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_sensors::SensorKind;

    #[test]
    fn score_message_contains_the_rounded_score() {
        let err = FlowError::ScoreTooLow { score: 62.4 };
        assert!(err.to_string().contains("62"), "got: {err}");
    }

    #[test]
    fn stale_identity_is_not_retryable() {
        assert_eq!(FlowError::NeedsReverification.retry_point(), RetryPoint::None);
    }

    #[test]
    fn persistence_retries_the_write_not_the_capture() {
        let err = FlowError::Persistence(StoreError::Backend("db down".into()));
        assert_eq!(err.retry_point(), RetryPoint::Confirm);
    }

    #[test]
    fn permission_denied_offers_a_sensor_re_request() {
        let err = FlowError::Sensor(SensorError::PermissionDenied(SensorKind::Camera));
        assert_eq!(err.retry_point(), RetryPoint::Capture);
    }

    #[test]
    fn missing_camera_offers_no_retry() {
        let err = FlowError::Sensor(SensorError::NotFound(SensorKind::Camera));
        assert_eq!(err.retry_point(), RetryPoint::None);
    }
}

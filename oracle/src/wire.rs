//! Wire format of the face-match call.

use crate::OracleError;
use attest_sensors::StillImage;
use attest_types::{EventId, RegistrationId, UserId};
use serde::{Deserialize, Serialize};

/// Request body of the face-match call.
///
/// The live image travels hex-encoded with its format tag alongside; the
/// oracle treats both as opaque evidence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRequest {
    pub action: String,
    pub user_id: UserId,
    pub event_id: EventId,
    pub registration_id: RegistrationId,
    pub live_image: String,
    pub image_format: String,
}

impl MatchRequest {
    pub const ACTION: &'static str = "face-match";

    pub fn new(
        user_id: UserId,
        event_id: EventId,
        registration_id: RegistrationId,
        image: &StillImage,
    ) -> Self {
        Self {
            action: Self::ACTION.to_string(),
            user_id,
            event_id,
            registration_id,
            live_image: hex::encode(&image.bytes),
            image_format: format!("{:?}", image.format).to_lowercase(),
        }
    }
}

/// Raw response body of the face-match call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub needs_reverification: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// A classified oracle response.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    /// The live capture matched the reference image.
    Passed {
        score: f64,
        /// Server-side token, if the oracle minted or replayed one.
        token: Option<String>,
        /// True when a token already existed for this registration — an
        /// idempotent replay with no new side effect.
        cached: bool,
    },
    /// The score fell below the oracle's threshold. Retryable with a
    /// fresh capture.
    ScoreTooLow { score: f64 },
    /// The user's underlying identity-document verification has expired;
    /// not retryable within this flow.
    NeedsReverification,
}

impl MatchResponse {
    /// Classify a raw response into an outcome or a hard failure.
    pub fn classify(self) -> Result<MatchOutcome, OracleError> {
        if !self.success {
            return Err(OracleError::Rejected(
                self.error.unwrap_or_else(|| "unspecified error".to_string()),
            ));
        }
        if self.needs_reverification {
            return Ok(MatchOutcome::NeedsReverification);
        }
        if self.passed {
            Ok(MatchOutcome::Passed {
                score: self.score,
                token: self.token,
                cached: self.cached,
            })
        } else {
            Ok(MatchOutcome::ScoreTooLow { score: self.score })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_sensors::ImageFormat;
    use attest_types::Timestamp;

    fn response(json: &str) -> MatchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_carries_the_fixed_action_and_hex_image() {
        let image = StillImage {
            bytes: vec![0xde, 0xad],
            format: ImageFormat::Jpeg,
            captured_at: Timestamp::new(1000),
        };
        let req = MatchRequest::new(
            UserId::new("u1"),
            EventId::new("e1"),
            RegistrationId::new("r1"),
            &image,
        );
        assert_eq!(req.action, "face-match");
        assert_eq!(req.live_image, "dead");
        assert_eq!(req.image_format, "jpeg");
    }

    #[test]
    fn passed_response_classifies_with_token_and_cached_flag() {
        let outcome = response(r#"{"success":true,"passed":true,"score":91.2,"token":"abc","cached":true}"#)
            .classify()
            .unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Passed {
                score: 91.2,
                token: Some("abc".to_string()),
                cached: true,
            }
        );
    }

    #[test]
    fn low_score_is_a_soft_outcome_not_an_error() {
        let outcome = response(r#"{"success":true,"passed":false,"score":62.4}"#)
            .classify()
            .unwrap();
        assert_eq!(outcome, MatchOutcome::ScoreTooLow { score: 62.4 });
    }

    #[test]
    fn reverification_wins_over_passed() {
        let outcome =
            response(r#"{"success":true,"passed":true,"score":95.0,"needs_reverification":true}"#)
                .classify()
                .unwrap();
        assert_eq!(outcome, MatchOutcome::NeedsReverification);
    }

    #[test]
    fn success_false_is_a_hard_failure() {
        let err = response(r#"{"success":false,"error":"auth expired"}"#)
            .classify()
            .unwrap_err();
        assert_eq!(err, OracleError::Rejected("auth expired".to_string()));
    }

    #[test]
    fn missing_optional_fields_default() {
        let resp = response(r#"{"success":true,"passed":true,"score":80.0}"#);
        assert!(!resp.cached);
        assert!(!resp.needs_reverification);
        assert!(resp.token.is_none());
    }
}

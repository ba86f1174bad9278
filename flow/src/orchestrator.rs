//! The certification flow state machine.
//!
//! One flow instance drives one registration through capture, match, and
//! finalization. The flow owns the camera session for the duration of
//! `Capturing` and guarantees its release on every exit path. The oracle
//! round trip runs as a detached task: cancelling the flow abandons only
//! the waiting, never the eventual side effect, so a passed match still
//! persists its token with no UI observing it.

use crate::error::{FlowError, RetryPoint};
use crate::evidence;
use crate::recap::RecapForm;
use crate::scancode::ScanCode;
use crate::state::{CertificationEvent, FlowStage};
use attest_eligibility::EligibilityResult;
use attest_oracle::{MatchOracle, MatchOutcome, MatchRequest, OracleError};
use attest_sensors::{CaptureSession, CaptureSource, SensorError, SensorKind};
use attest_store::{
    BlobStore, IssuedToken, RegistrationStore, SelfCertification, TokenStore, VerificationToken,
};
use attest_types::{
    CertificationMode, CertificationParams, EventEnvelope, GeoPoint, Registration, Timestamp,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// External collaborators of one flow instance.
///
/// The oracle and the token store are shared (`Arc`) because the detached
/// processing task needs them after the flow itself may be gone.
pub struct FlowDeps<C: CaptureSource, M: MatchOracle> {
    pub capture: C,
    pub oracle: Arc<M>,
    pub tokens: Arc<dyn TokenStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub blobs: Arc<dyn BlobStore>,
}

/// What the detached processing task hands back to the waiting flow.
enum ProcessingOutcome {
    OperatorToken { issued: IssuedToken, cached: bool },
    SelfMatch { score: f64 },
}

/// One registration's certification flow.
pub struct CertificationFlow<C: CaptureSource, M: MatchOracle + 'static> {
    stage: FlowStage,
    mode: CertificationMode,
    registration: Registration,
    params: CertificationParams,

    capture: C,
    oracle: Arc<M>,
    tokens: Arc<dyn TokenStore>,
    registrations: Arc<dyn RegistrationStore>,
    blobs: Arc<dyn BlobStore>,

    session: Option<C::Session>,
    pending: Option<JoinHandle<Result<ProcessingOutcome, FlowError>>>,
    capture_time: Option<Timestamp>,
    issued: Option<VerificationToken>,
    last_error: Option<FlowError>,
    recap: RecapForm,
    draft: Option<SelfCertification>,
}

impl<C: CaptureSource, M: MatchOracle + 'static> CertificationFlow<C, M> {
    /// Open a flow for a registration.
    ///
    /// The certification mode is resolved here, once, from the envelope.
    /// On the operator path, a registration that already holds a live
    /// token re-enters at `QrIssued` with the same token — no capture, no
    /// new mint. Otherwise entry is gated on the eligibility result the
    /// caller computed.
    pub fn start(
        deps: FlowDeps<C, M>,
        registration: Registration,
        envelope: &EventEnvelope,
        params: CertificationParams,
        eligibility: &EligibilityResult,
    ) -> Result<Self, FlowError> {
        let mode = envelope.mode;
        let mut flow = Self {
            stage: FlowStage::Instructions,
            mode,
            registration,
            params,
            capture: deps.capture,
            oracle: deps.oracle,
            tokens: deps.tokens,
            registrations: deps.registrations,
            blobs: deps.blobs,
            session: None,
            pending: None,
            capture_time: None,
            issued: None,
            last_error: None,
            recap: RecapForm::new(),
            draft: None,
        };

        if mode == CertificationMode::Operator {
            if let Some(live) = flow.tokens.get_live_token(&flow.registration.id)? {
                info!(registration = %flow.registration.id, "live token found, re-displaying");
                flow.issued = Some(live);
                flow.stage = FlowStage::QrIssued;
                return Ok(flow);
            }
        }

        if !eligibility.is_eligible() {
            let reason = eligibility
                .reason()
                .unwrap_or_else(|| "not eligible".to_string());
            return Err(FlowError::NotEligible(reason));
        }

        Ok(flow)
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn mode(&self) -> CertificationMode {
        self.mode
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    /// The issued token, once the flow has reached `QrIssued`.
    pub fn issued_token(&self) -> Option<&VerificationToken> {
        self.issued.as_ref()
    }

    /// When the accepted still was captured.
    pub fn capture_time(&self) -> Option<Timestamp> {
        self.capture_time
    }

    fn fail<T>(&mut self, err: FlowError) -> Result<T, FlowError> {
        self.last_error = Some(err.clone());
        self.stage = FlowStage::Failed;
        Err(err)
    }

    /// `Instructions → Capturing`: acquire the camera. No network call.
    ///
    /// Acquisition is bounded by the configured capture timeout; an
    /// unresponsive sensor degrades into a retryable error instead of
    /// hanging the flow.
    pub async fn begin_capture(&mut self) -> Result<(), FlowError> {
        match self.stage {
            FlowStage::Instructions => {}
            FlowStage::Processing => return Err(FlowError::CaptureInProgress),
            stage => {
                return Err(FlowError::WrongStage {
                    stage,
                    action: "begin capture",
                })
            }
        }

        let timeout = Duration::from_secs(self.params.capture_timeout_secs);
        match tokio::time::timeout(timeout, self.capture.acquire()).await {
            Ok(Ok(session)) => {
                debug!(registration = %self.registration.id, "camera acquired");
                self.session = Some(session);
                self.stage = FlowStage::Capturing;
                Ok(())
            }
            Ok(Err(err)) => self.fail(err.into()),
            Err(_) => self.fail(FlowError::Sensor(SensorError::Timeout {
                kind: SensorKind::Camera,
                after_secs: self.params.capture_timeout_secs,
            })),
        }
    }

    /// `Capturing → Processing`: take exactly one still and hand it to the
    /// oracle in a detached task.
    ///
    /// The camera session is dropped as soon as the still exists. Only one
    /// oracle call per flow may be pending; a second submission is
    /// rejected here, client-side, rather than racing the server.
    pub async fn submit_capture(&mut self) -> Result<(), FlowError> {
        if self.stage == FlowStage::Processing || self.pending.is_some() {
            return Err(FlowError::CaptureInProgress);
        }
        if self.stage != FlowStage::Capturing {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "submit capture",
            });
        }

        let mut session = self
            .session
            .take()
            .ok_or_else(|| FlowError::Internal("capturing without a session".to_string()))?;
        // The still is bounded like acquisition: a camera that never
        // resolves a frame degrades into a retryable timeout, not a hang.
        let timeout = Duration::from_secs(self.params.capture_timeout_secs);
        let still = match tokio::time::timeout(timeout, session.take_still()).await {
            Ok(Ok(still)) => still,
            Ok(Err(err)) => return self.fail(err.into()),
            Err(_) => {
                return self.fail(FlowError::Sensor(SensorError::Timeout {
                    kind: SensorKind::Camera,
                    after_secs: self.params.capture_timeout_secs,
                }))
            }
        };
        drop(session);

        self.capture_time = Some(still.captured_at);
        let request = MatchRequest::new(
            self.registration.user_id.clone(),
            self.registration.event_id.clone(),
            self.registration.id.clone(),
            &still,
        );

        let oracle = Arc::clone(&self.oracle);
        let tokens = Arc::clone(&self.tokens);
        let mode = self.mode;
        let registration_id = self.registration.id.clone();
        let captured_at = still.captured_at;

        // Detached on purpose: if the user closes the flow mid-call, the
        // match result must still be durably applied.
        let handle = tokio::spawn(async move {
            let outcome = oracle.face_match(&request).await.map_err(|e| match e {
                OracleError::Transport(m) | OracleError::Rejected(m) | OracleError::Decode(m) => {
                    FlowError::Oracle(m)
                }
            })?;

            match outcome {
                MatchOutcome::Passed { score, cached, .. } => match mode {
                    CertificationMode::Operator => {
                        let issued = tokens.issue_or_get_token(&registration_id, captured_at)?;
                        info!(
                            registration = %registration_id,
                            score,
                            newly_issued = issued.newly_issued,
                            "match passed, token ready"
                        );
                        Ok(ProcessingOutcome::OperatorToken { issued, cached })
                    }
                    CertificationMode::SelfAttested => {
                        info!(registration = %registration_id, "match passed");
                        Ok(ProcessingOutcome::SelfMatch { score })
                    }
                },
                MatchOutcome::ScoreTooLow { score } => Err(FlowError::ScoreTooLow { score }),
                MatchOutcome::NeedsReverification => Err(FlowError::NeedsReverification),
            }
        });

        self.pending = Some(handle);
        self.stage = FlowStage::Processing;
        Ok(())
    }

    /// Wait for the pending oracle call and advance the machine.
    ///
    /// `Processing → QrIssued` (operator) or `→ Recap` (self) on a pass;
    /// `→ Failed` otherwise. An idempotent replay (`cached`, or the token
    /// store returning an existing token) is reported as `reissued` so the
    /// caller skips any success presentational delay.
    pub async fn resolve(&mut self) -> Result<CertificationEvent, FlowError> {
        if self.stage != FlowStage::Processing {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "resolve",
            });
        }
        let handle = self
            .pending
            .take()
            .ok_or_else(|| FlowError::Internal("processing without a pending task".to_string()))?;

        match handle.await {
            Ok(Ok(ProcessingOutcome::OperatorToken { issued, cached })) => {
                let reissued = cached || !issued.newly_issued;
                self.issued = Some(issued.token.clone());
                self.stage = FlowStage::QrIssued;
                Ok(CertificationEvent::TokenIssued {
                    token: issued.token,
                    reissued,
                })
            }
            Ok(Ok(ProcessingOutcome::SelfMatch { score })) => {
                self.stage = FlowStage::Recap;
                Ok(CertificationEvent::MatchPassed { score })
            }
            Ok(Err(err)) => self.fail(err),
            Err(join_err) => self.fail(FlowError::Internal(join_err.to_string())),
        }
    }

    /// Render the scannable payload for the issued token.
    pub fn scan_code(&self) -> Result<ScanCode, FlowError> {
        let token = match (&self.stage, &self.issued) {
            (FlowStage::QrIssued, Some(token)) => token,
            _ => {
                return Err(FlowError::WrongStage {
                    stage: self.stage,
                    action: "render scan code",
                })
            }
        };
        ScanCode::render(
            &self.params.verify_origin,
            &token.registration_id,
            &token.token,
        )
    }

    /// The recap form (self path, `Recap` stage only).
    pub fn recap_form(&mut self) -> Result<&mut RecapForm, FlowError> {
        if self.stage != FlowStage::Recap {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "edit recap",
            });
        }
        Ok(&mut self.recap)
    }

    /// `Recap → Confirming → Done`: upload evidence best-effort, then
    /// perform the one registration write.
    ///
    /// A confirm without the honor declaration affirmed is a no-op error —
    /// no upload, no write, no state change. The reported position and
    /// address travel with the write as the self path's evidentiary trail.
    pub fn confirm(
        &mut self,
        now: Timestamp,
        reported_position: Option<GeoPoint>,
        reported_address: Option<String>,
    ) -> Result<CertificationEvent, FlowError> {
        match self.stage {
            FlowStage::Recap => {}
            FlowStage::Confirming => return Err(FlowError::ConfirmInFlight),
            stage => {
                return Err(FlowError::WrongStage {
                    stage,
                    action: "confirm",
                })
            }
        }
        if !self.recap.can_confirm() {
            return Err(FlowError::DeclarationRequired);
        }

        self.stage = FlowStage::Confirming;
        evidence::upload_pending(self.blobs.as_ref(), &mut self.recap);

        self.draft = Some(SelfCertification {
            attended_at: now,
            certification_start_at: self.capture_time.unwrap_or(now),
            reported_position,
            reported_address,
        });
        self.write_certification()
    }

    fn write_certification(&mut self) -> Result<CertificationEvent, FlowError> {
        let draft = self
            .draft
            .clone()
            .ok_or_else(|| FlowError::Internal("confirming without a draft".to_string()))?;
        match self
            .registrations
            .record_self_certification(&self.registration.id, &draft)
        {
            Ok(updated) => {
                info!(
                    registration = %updated.id,
                    secs_since_capture = draft.certification_start_at.elapsed_since(draft.attended_at),
                    "self certification recorded"
                );
                self.registration = updated.clone();
                self.stage = FlowStage::Done;
                Ok(CertificationEvent::SelfCertified {
                    registration: updated,
                })
            }
            Err(err) => self.fail(FlowError::Persistence(err)),
        }
    }

    /// Retry a capture-stage failure: back to `Instructions` for a fresh
    /// capture. No stale token is touched.
    pub fn retry(&mut self) -> Result<(), FlowError> {
        if self.stage != FlowStage::Failed {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "retry",
            });
        }
        let err = self
            .last_error
            .clone()
            .ok_or_else(|| FlowError::Internal("failed without an error".to_string()))?;
        if err.retry_point() != RetryPoint::Capture {
            return Err(FlowError::NotRetryable);
        }
        self.last_error = None;
        self.stage = FlowStage::Instructions;
        Ok(())
    }

    /// Retry a persistence failure: re-invoke only the write. Identity is
    /// already proven, so no re-capture happens here.
    pub fn retry_confirm(&mut self, now: Timestamp) -> Result<CertificationEvent, FlowError> {
        if self.stage != FlowStage::Failed {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "retry confirmation",
            });
        }
        let err = self
            .last_error
            .clone()
            .ok_or_else(|| FlowError::Internal("failed without an error".to_string()))?;
        if err.retry_point() != RetryPoint::Confirm {
            return Err(FlowError::NotRetryable);
        }
        self.last_error = None;

        match self.mode {
            CertificationMode::Operator => {
                // Token issuance is idempotent; re-invoking it is the write
                // retry on this path.
                let issued = match self.tokens.issue_or_get_token(&self.registration.id, now) {
                    Ok(issued) => issued,
                    Err(e) => return self.fail(FlowError::Persistence(e)),
                };
                let reissued = !issued.newly_issued;
                self.issued = Some(issued.token.clone());
                self.stage = FlowStage::QrIssued;
                Ok(CertificationEvent::TokenIssued {
                    token: issued.token,
                    reissued,
                })
            }
            CertificationMode::SelfAttested => {
                self.stage = FlowStage::Confirming;
                self.write_certification()
            }
        }
    }

    /// User cancellation, from any state.
    ///
    /// Releases the camera unconditionally. A pending oracle call is
    /// detached, not aborted: its eventual pass still persists the token.
    pub fn cancel(mut self) {
        self.session = None;
        if let Some(handle) = self.pending.take() {
            debug!(registration = %self.registration.id, "flow closed with oracle call in flight");
            drop(handle);
        }
        self.stage = FlowStage::Closed;
    }
}

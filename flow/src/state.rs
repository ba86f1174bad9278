//! Flow state machine vocabulary.

use attest_store::VerificationToken;
use attest_types::Registration;

/// The states of a certification flow.
///
/// Shared spine: `Instructions → Capturing → Processing`. A passed match
/// forks on the event's certification mode: `QrIssued` (operator path,
/// terminal for this core) or `Recap → Confirming → Done` (self path).
/// `Failed` holds the error and its retry point; `Closed` is user
/// cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStage {
    /// Showing instructions; no sensor or network activity yet.
    Instructions,
    /// Camera acquired; waiting for the user to take the still.
    Capturing,
    /// Exactly one oracle call in flight for this flow.
    Processing,
    /// Operator path: token issued and ready to display.
    QrIssued,
    /// Self path: match passed; collecting note, evidence, declaration.
    Recap,
    /// Self path: the one registration write is in flight.
    Confirming,
    /// Self path terminal: attendance recorded.
    Done,
    /// Holding an error; see the flow's `last_error`.
    Failed,
    /// User cancelled. Sensors released; any in-flight oracle call keeps
    /// running detached so its side effect is not lost.
    Closed,
}

/// Confirmed outcomes the flow reports to its caller.
///
/// Only ever driven by confirmed responses — token issuance and attendance
/// recording are one-shot, non-retractable effects, so nothing here is
/// emitted optimistically.
#[derive(Clone, Debug)]
pub enum CertificationEvent {
    /// Operator path: a token is ready to display.
    TokenIssued {
        token: VerificationToken,
        /// True when this was an idempotent replay (token already existed);
        /// presentation should skip any success delay.
        reissued: bool,
    },
    /// Self path: the match passed and the recap step is open.
    MatchPassed { score: f64 },
    /// Self path: attendance recorded.
    SelfCertified { registration: Registration },
}

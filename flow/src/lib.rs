//! Presence certification flows.
//!
//! Two paths certify that a person was at an event:
//! 1. **Operator-witnessed**: identity re-verification plus a token the
//!    organizer scans. This core proves identity and issues the token; the
//!    organizer scan (out of scope) is the sole writer of attendance.
//! 2. **Self-attested**: identity re-verification plus an honor
//!    declaration, finalized by a single atomic registration write.
//!
//! Which path applies is a static per-event flag resolved once when the
//! flow starts. The shared front half (capture, match) is one state
//! machine; the paths diverge only after the oracle passes.

pub mod error;
pub mod evidence;
pub mod gate;
pub mod orchestrator;
pub mod recap;
pub mod scancode;
pub mod state;

pub use error::{FlowError, RetryPoint};
pub use gate::{check_eligibility, current_position_fix};
pub use orchestrator::{CertificationFlow, FlowDeps};
pub use recap::RecapForm;
pub use scancode::{verify_url, ScanCode, ScanModule};
pub use state::{CertificationEvent, FlowStage};

//! Event certification envelope.

use crate::{EventId, GeoPoint, Timestamp};
use serde::{Deserialize, Serialize};

/// How attendance at an event is finalized.
///
/// Resolved once when a certification flow starts; never re-evaluated
/// mid-flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationMode {
    /// An organizer scans the participant's issued token.
    Operator,
    /// The participant confirms alone under an honor declaration.
    SelfAttested,
}

/// The eligibility envelope of one event: when and where certification
/// may be started, and which path finalizes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    /// Start of the certification window (inclusive).
    pub starts_at: Timestamp,
    /// End of the certification window (inclusive).
    pub ends_at: Timestamp,
    /// Event coordinate. Absent coordinate means certification is never
    /// offered for this event; there is no fallback.
    pub coordinate: Option<GeoPoint>,
    pub mode: CertificationMode,
}

impl EventEnvelope {
    /// Whether certification can be offered for this event at all.
    ///
    /// Purely structural: the time window and the caller's position are
    /// judged separately by the eligibility evaluator.
    pub fn offerable(&self) -> bool {
        self.coordinate.is_some()
    }
}

//! The eligibility evaluator proper.

use crate::geo::great_circle_distance_m;
use attest_types::{EventEnvelope, GeoPoint, Timestamp};
use serde::{Deserialize, Serialize};

/// The caller's position as last reported by the position sensor.
///
/// "Unknown" states are kept distinct: `Acquiring` retries automatically,
/// `Denied` and `Failed` are terminal per attempt and user-actionable.
#[derive(Clone, Debug, PartialEq)]
pub enum PositionFix {
    Acquired(GeoPoint),
    /// The sensor has not resolved yet; eligibility should be re-evaluated
    /// when it does.
    Acquiring,
    /// Location permission was denied.
    Denied,
    /// The sensor reported a hard error.
    Failed(String),
}

/// Where "now" sits relative to the certification window (inclusive ends).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeStatus {
    NotStarted,
    Open,
    Ended,
}

/// Why the radius check could not be decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PositionUnavailable {
    /// The position sensor is still resolving.
    Acquiring,
    /// Location permission was denied.
    Denied,
    /// The position sensor failed.
    Failed(String),
    /// The event envelope carries no coordinate; certification is never
    /// offered for such events.
    NoCoordinate,
}

/// Outcome of the geofence check. Unknown is never conflated with "too far".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RadiusStatus {
    Within {
        distance_m: f64,
    },
    TooFar {
        distance_m: f64,
        radius_m: f64,
    },
    Unknown(PositionUnavailable),
}

/// Whether the registration should still be shown to the user.
///
/// The window rules are asymmetric: a registrant who certified before the
/// event ended remains visible indefinitely; one who never certified and
/// whose event is over is hidden entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Transient eligibility snapshot, recomputed on every position update.
/// Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct EligibilityResult {
    pub time: TimeStatus,
    pub radius: RadiusStatus,
    pub visibility: Visibility,
    /// Whether certification is offered for this event at all (an envelope
    /// without a coordinate is never offered).
    pub offerable: bool,
}

impl EligibilityResult {
    /// Eligible exactly when the window is open and the caller is inside
    /// the geofence.
    pub fn is_eligible(&self) -> bool {
        self.offerable
            && self.time == TimeStatus::Open
            && matches!(self.radius, RadiusStatus::Within { .. })
    }

    /// Human-readable reason when ineligible, `None` when eligible.
    pub fn reason(&self) -> Option<String> {
        if self.is_eligible() {
            return None;
        }
        if !self.offerable {
            return Some("certification is not offered for this event".to_string());
        }
        match self.time {
            TimeStatus::NotStarted => {
                return Some("certification has not opened yet".to_string());
            }
            TimeStatus::Ended => {
                return Some("the certification window has closed".to_string());
            }
            TimeStatus::Open => {}
        }
        match &self.radius {
            RadiusStatus::TooFar {
                distance_m,
                radius_m,
            } => Some(format!(
                "you are {:.0} m from the event (limit {:.0} m)",
                distance_m, radius_m
            )),
            RadiusStatus::Unknown(PositionUnavailable::Acquiring) => {
                Some("waiting for your position".to_string())
            }
            RadiusStatus::Unknown(PositionUnavailable::Denied) => Some(
                "location permission is denied; allow location access in your browser settings"
                    .to_string(),
            ),
            RadiusStatus::Unknown(PositionUnavailable::Failed(e)) => {
                Some(format!("could not determine your position: {e}"))
            }
            RadiusStatus::Unknown(PositionUnavailable::NoCoordinate) => {
                Some("certification is not offered for this event".to_string())
            }
            RadiusStatus::Within { .. } => None,
        }
    }
}

/// Evaluate the certification envelope.
///
/// Deterministic and total: identical inputs yield identical output, and
/// every input-availability state maps to a defined result rather than a
/// crash or an implicit "eligible".
pub fn evaluate(
    envelope: &EventEnvelope,
    now: Timestamp,
    position: &PositionFix,
    already_certified: bool,
    radius_m: f64,
) -> EligibilityResult {
    let time = if now < envelope.starts_at {
        TimeStatus::NotStarted
    } else if now > envelope.ends_at {
        TimeStatus::Ended
    } else {
        TimeStatus::Open
    };

    let radius = match (envelope.coordinate, position) {
        (None, _) => RadiusStatus::Unknown(PositionUnavailable::NoCoordinate),
        (Some(_), PositionFix::Acquiring) => RadiusStatus::Unknown(PositionUnavailable::Acquiring),
        (Some(_), PositionFix::Denied) => RadiusStatus::Unknown(PositionUnavailable::Denied),
        (Some(_), PositionFix::Failed(e)) => {
            RadiusStatus::Unknown(PositionUnavailable::Failed(e.clone()))
        }
        (Some(event_point), PositionFix::Acquired(here)) => {
            let distance_m = great_circle_distance_m(event_point, *here);
            if distance_m <= radius_m {
                RadiusStatus::Within { distance_m }
            } else {
                RadiusStatus::TooFar {
                    distance_m,
                    radius_m,
                }
            }
        }
    };

    let visibility = if time == TimeStatus::Ended && !already_certified {
        Visibility::Hidden
    } else {
        Visibility::Visible
    };

    EligibilityResult {
        time,
        radius,
        visibility,
        offerable: envelope.offerable(),
    }
}

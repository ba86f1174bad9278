//! Eligibility evaluation — the gate in front of every certification flow.
//!
//! Pure functions only: given an event envelope, "now", and the caller's
//! position fix, compute whether certification may begin. No clock reads,
//! no hidden state, no panics; every input-availability combination maps to
//! an explicit enum value.

pub mod evaluate;
pub mod geo;

pub use evaluate::{
    evaluate, EligibilityResult, PositionFix, PositionUnavailable, RadiusStatus, TimeStatus,
    Visibility,
};
pub use geo::great_circle_distance_m;

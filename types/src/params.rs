//! Deployment-wide certification parameters.
//!
//! These are fixed per deployment, not per event: the geofence radius is a
//! product decision, not something organizers tune.

use serde::{Deserialize, Serialize};

/// Parameters governing every certification flow in a deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CertificationParams {
    /// Geofence radius in meters around the event coordinate.
    pub geofence_radius_m: f64,

    /// How long a capture attempt may sit without a resolved frame before
    /// it falls back to an explicit retryable error.
    pub capture_timeout_secs: u64,

    /// Same bound for position acquisition.
    pub position_timeout_secs: u64,

    /// Origin prepended to verify links embedded in scan codes,
    /// e.g. `https://attest.example.org`.
    pub verify_origin: String,
}

impl CertificationParams {
    pub fn defaults() -> Self {
        Self {
            geofence_radius_m: 100.0,
            capture_timeout_secs: 20,
            position_timeout_secs: 15,
            verify_origin: "https://attest.example.org".to_string(),
        }
    }
}

impl Default for CertificationParams {
    fn default() -> Self {
        Self::defaults()
    }
}

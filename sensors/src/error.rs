//! Sensor error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which sensor produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    Camera,
    Location,
}

impl SensorKind {
    fn name(&self) -> &'static str {
        match self {
            SensorKind::Camera => "camera",
            SensorKind::Location => "location",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SensorError {
    /// The user denied access. Terminal per attempt; actionable via
    /// browser/OS settings, so the message must carry the remedy.
    #[error("{} permission denied; allow {} access in your browser or system settings", .0.name(), .0.name())]
    PermissionDenied(SensorKind),

    /// No such device exists on this machine. No retry helps.
    #[error("no {} found on this device", .0.name())]
    NotFound(SensorKind),

    /// The device exists but failed to deliver.
    #[error("{} error: {reason}", kind.name())]
    Failed { kind: SensorKind, reason: String },

    /// The sensor never resolved within the configured bound.
    #[error("{} did not respond within {after_secs}s", kind.name())]
    Timeout { kind: SensorKind, after_secs: u64 },
}

impl SensorError {
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorError::PermissionDenied(k) | SensorError::NotFound(k) => *k,
            SensorError::Failed { kind, .. } | SensorError::Timeout { kind, .. } => *kind,
        }
    }

    /// Whether retrying the same acquisition can succeed without the user
    /// changing something outside the flow.
    pub fn is_retryable(&self) -> bool {
        match self {
            SensorError::PermissionDenied(_) | SensorError::NotFound(_) => false,
            SensorError::Failed { .. } | SensorError::Timeout { .. } => true,
        }
    }
}

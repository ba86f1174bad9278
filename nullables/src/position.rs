//! Nullable position sensor.

use attest_sensors::{PositionSource, SensorError, SensorKind};
use attest_types::GeoPoint;

#[derive(Clone)]
enum Behavior {
    Fixed(GeoPoint),
    Denied,
    Failing(String),
    /// Never resolves; exercises caller-side timeouts.
    Silent,
}

/// A test position sensor with one scripted behavior.
#[derive(Clone)]
pub struct NullPositionSource {
    behavior: Behavior,
}

impl NullPositionSource {
    /// Always resolves to the given coordinate.
    pub fn fixed(point: GeoPoint) -> Self {
        Self {
            behavior: Behavior::Fixed(point),
        }
    }

    /// Always fails with a location permission denial.
    pub fn denied() -> Self {
        Self {
            behavior: Behavior::Denied,
        }
    }

    /// Always fails with a hard sensor error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Failing(reason.into()),
        }
    }

    /// Never resolves.
    pub fn silent() -> Self {
        Self {
            behavior: Behavior::Silent,
        }
    }
}

impl PositionSource for NullPositionSource {
    async fn current_position(&self) -> Result<GeoPoint, SensorError> {
        match &self.behavior {
            Behavior::Fixed(point) => Ok(*point),
            Behavior::Denied => Err(SensorError::PermissionDenied(SensorKind::Location)),
            Behavior::Failing(reason) => Err(SensorError::Failed {
                kind: SensorKind::Location,
                reason: reason.clone(),
            }),
            Behavior::Silent => std::future::pending().await,
        }
    }
}

//! Position sensor seam.

use crate::SensorError;
use attest_types::GeoPoint;
use std::future::Future;

/// The position capability: resolves the caller's current coordinate.
///
/// May never resolve on its own; callers bound the wait with their
/// configured timeout. Permission denial and hard sensor failure are
/// distinct terminal states, and both are user-actionable.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, SensorError>> + Send;
}

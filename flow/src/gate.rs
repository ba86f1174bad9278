//! The eligibility gate in front of the flow: position acquisition plus
//! the pure evaluator.

use attest_eligibility::{evaluate, EligibilityResult, PositionFix};
use attest_sensors::{PositionSource, SensorError};
use attest_types::{CertificationParams, EventEnvelope, Registration, Timestamp};
use std::time::Duration;

/// Resolve the caller's current position into a [`PositionFix`], bounding
/// the wait so an unresponsive sensor degrades into an explicit state
/// instead of hanging the gate. A coordinate outside the WGS-84 range is
/// a sensor glitch, not a position.
pub async fn current_position_fix<P: PositionSource>(
    source: &P,
    timeout_secs: u64,
) -> PositionFix {
    let bounded = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        source.current_position(),
    );
    match bounded.await {
        Ok(Ok(point)) if point.is_valid() => PositionFix::Acquired(point),
        Ok(Ok(point)) => PositionFix::Failed(format!("sensor reported invalid coordinate {point}")),
        Ok(Err(SensorError::PermissionDenied(_))) => PositionFix::Denied,
        Ok(Err(err)) => PositionFix::Failed(err.to_string()),
        Err(_) => PositionFix::Failed(format!(
            "position sensor did not respond within {timeout_secs}s"
        )),
    }
}

/// One-shot gate check: acquire a position fix and evaluate the envelope.
///
/// Callers re-run this on every position update; the result is transient
/// and never persisted.
pub async fn check_eligibility<P: PositionSource>(
    envelope: &EventEnvelope,
    registration: &Registration,
    source: &P,
    params: &CertificationParams,
    now: Timestamp,
) -> EligibilityResult {
    let fix = current_position_fix(source, params.position_timeout_secs).await;
    evaluate(
        envelope,
        now,
        &fix,
        registration.is_certified(),
        params.geofence_radius_m,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_nullables::{NullClock, NullPositionSource};
    use attest_types::{CertificationMode, EventId, GeoPoint, RegistrationId, UserId};

    fn envelope() -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new("e1"),
            starts_at: Timestamp::new(36_000),
            ends_at: Timestamp::new(43_200),
            coordinate: Some(GeoPoint::new(40.0, -74.0)),
            mode: CertificationMode::Operator,
        }
    }

    fn registration() -> Registration {
        Registration::new(
            RegistrationId::new("r1"),
            UserId::new("u1"),
            EventId::new("e1"),
        )
    }

    fn params() -> CertificationParams {
        CertificationParams {
            geofence_radius_m: 100.0,
            capture_timeout_secs: 2,
            position_timeout_secs: 2,
            verify_origin: "https://attest.example.org".to_string(),
        }
    }

    #[tokio::test]
    async fn gate_opens_once_the_clock_enters_the_window() {
        let clock = NullClock::new(32_400);
        let source = NullPositionSource::fixed(GeoPoint::new(40.0, -74.0));

        let early =
            check_eligibility(&envelope(), &registration(), &source, &params(), clock.now()).await;
        assert!(!early.is_eligible());

        // Two hours later the window is open; same position, same gate.
        clock.advance(7_200);
        let open =
            check_eligibility(&envelope(), &registration(), &source, &params(), clock.now()).await;
        assert!(open.is_eligible());
    }

    #[tokio::test]
    async fn denied_location_maps_to_the_denied_fix() {
        let source = NullPositionSource::denied();
        let fix = current_position_fix(&source, 2).await;
        assert_eq!(fix, PositionFix::Denied);
    }

    #[tokio::test]
    async fn unresponsive_sensor_degrades_into_a_failed_fix() {
        let source = NullPositionSource::silent();
        let fix = current_position_fix(&source, 0).await;
        match fix {
            PositionFix::Failed(reason) => assert!(reason.contains("did not respond")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn out_of_range_coordinate_is_a_failure_not_a_position() {
        let source = NullPositionSource::fixed(GeoPoint::new(200.0, 0.0));
        let fix = current_position_fix(&source, 2).await;
        match fix {
            PositionFix::Failed(reason) => assert!(reason.contains("invalid coordinate")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hard_sensor_failure_carries_the_reason() {
        let source = NullPositionSource::failing("no satellite lock");
        let fix = current_position_fix(&source, 2).await;
        match fix {
            PositionFix::Failed(reason) => assert!(reason.contains("no satellite lock")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}

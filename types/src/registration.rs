//! Registration record — one user's registration to one event.

use crate::{EventId, GeoPoint, RegistrationId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Administrative status of a registration.
///
/// `attended_at` on the record, not this enum, is the authoritative
/// "certified" marker; the status is what the surrounding CRUD system
/// displays and filters on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Approved,
    Waitlisted,
    /// Certified on the self-attested path. Mutually exclusive with
    /// operator validation: `validated_by` must stay `None`.
    SelfCertified,
    /// Certified on the operator-witnessed path.
    Attended,
    Cancelled,
}

/// One user's registration to one event.
///
/// Created at registration time outside this core; mutated exactly once by
/// the attendance recorder on successful certification; never deleted here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub status: RegistrationStatus,
    /// When attendance was certified. `Some` is the single authoritative
    /// "certified" marker, independent of `status`.
    pub attended_at: Option<Timestamp>,
    /// When the identity capture that led to certification happened
    /// (self path only; distinct from the confirmation time).
    pub certification_start_at: Option<Timestamp>,
    /// Organizer who witnessed attendance (operator path only).
    pub validated_by: Option<UserId>,
    /// Client-reported position at confirmation time (self path evidence).
    pub reported_position: Option<GeoPoint>,
    /// Best-effort reverse-geocoded address supplied by the caller.
    pub reported_address: Option<String>,
}

impl Registration {
    /// A fresh, uncertified registration.
    pub fn new(id: RegistrationId, user_id: UserId, event_id: EventId) -> Self {
        Self {
            id,
            user_id,
            event_id,
            status: RegistrationStatus::Registered,
            attended_at: None,
            certification_start_at: None,
            validated_by: None,
            reported_position: None,
            reported_address: None,
        }
    }

    /// Whether attendance has been certified, on either path.
    pub fn is_certified(&self) -> bool {
        self.attended_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Registration {
        Registration::new(
            RegistrationId::new("r1"),
            UserId::new("u1"),
            EventId::new("e1"),
        )
    }

    #[test]
    fn fresh_registration_is_not_certified() {
        let reg = fresh();
        assert!(!reg.is_certified());
        assert_eq!(reg.status, RegistrationStatus::Registered);
    }

    #[test]
    fn certified_marker_is_attended_at_not_status() {
        let mut reg = fresh();
        reg.status = RegistrationStatus::Attended;
        assert!(!reg.is_certified(), "status alone does not certify");

        reg.attended_at = Some(Timestamp::new(5000));
        assert!(reg.is_certified());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RegistrationStatus::SelfCertified).unwrap();
        assert_eq!(json, "\"self_certified\"");
    }
}

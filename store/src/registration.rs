//! Registration persistence seam.

use crate::StoreError;
use attest_types::{GeoPoint, Registration, RegistrationId, Timestamp};
use serde::{Deserialize, Serialize};

/// Everything the self-attested path writes on confirmation.
///
/// Two distinct timestamps by design: `certification_start_at` is when the
/// identity capture happened, `attended_at` is the confirmation time. With
/// no independent witness, the time/location evidence is part of the honor
/// declaration's evidentiary trail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfCertification {
    pub attended_at: Timestamp,
    pub certification_start_at: Timestamp,
    pub reported_position: Option<GeoPoint>,
    pub reported_address: Option<String>,
}

/// Read/write access to registration records.
pub trait RegistrationStore: Send + Sync {
    fn get(&self, id: &RegistrationId) -> Result<Registration, StoreError>;

    /// The single write of the self-attested path.
    ///
    /// Atomic: `status = SelfCertified`, `attended_at`, and
    /// `certification_start_at` are applied together or not at all.
    /// A registration that is already certified (on either path) is
    /// rejected with [`StoreError::AlreadyCertified`], so concurrent
    /// duplicate confirmations resolve to exactly one observed write.
    fn record_self_certification(
        &self,
        id: &RegistrationId,
        certification: &SelfCertification,
    ) -> Result<Registration, StoreError>;
}

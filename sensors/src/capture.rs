//! Camera capture seam.
//!
//! The camera is exclusively owned by the active flow instance for the
//! duration of a session. Release is a scoped-resource guarantee, not an
//! optimization: implementations free the underlying device in `Drop`, so
//! every exit path of the flow (success, error, cancellation) releases it.

use crate::SensorError;
use attest_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Encoding of a captured still image. Opaque to the core beyond the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// One encoded still image of the caller's face.
#[derive(Clone, Debug, PartialEq)]
pub struct StillImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub captured_at: Timestamp,
}

/// A live camera session.
///
/// Implementations must release the device in `Drop` unconditionally.
pub trait CaptureSession: Send {
    /// Produce exactly one encoded still image from the live stream.
    fn take_still(&mut self) -> impl Future<Output = Result<StillImage, SensorError>> + Send;
}

/// The camera capability: yields a live session on demand.
pub trait CaptureSource: Send + Sync {
    type Session: CaptureSession;

    /// Acquire the camera. Fails with `PermissionDenied` or `NotFound`
    /// rather than hanging; slow acquisition is bounded by the flow's
    /// configured timeout at the call site.
    fn acquire(&self) -> impl Future<Output = Result<Self::Session, SensorError>> + Send;
}

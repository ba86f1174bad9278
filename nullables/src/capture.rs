//! Nullable camera — scripted sessions, release accounting.

use attest_sensors::{CaptureSession, CaptureSource, ImageFormat, SensorError, StillImage};
use attest_types::Timestamp;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A test camera that yields a fixed still image.
///
/// Clones share state, so a test can keep one handle for scripting and
/// assertions while the flow owns another. `release_count` counts dropped
/// sessions, which is how tests prove the device is freed on every exit
/// path.
#[derive(Clone)]
pub struct NullCaptureSource {
    still: StillImage,
    acquire_errors: Arc<Mutex<VecDeque<SensorError>>>,
    silent_acquire: Arc<AtomicBool>,
    silent_still: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl NullCaptureSource {
    pub fn new() -> Self {
        Self::with_captured_at(Timestamp::new(0))
    }

    /// A camera whose stills carry the given capture time.
    pub fn with_captured_at(captured_at: Timestamp) -> Self {
        Self {
            still: StillImage {
                bytes: vec![0xff, 0xd8, 0xff],
                format: ImageFormat::Jpeg,
                captured_at,
            },
            acquire_errors: Arc::new(Mutex::new(VecDeque::new())),
            silent_acquire: Arc::new(AtomicBool::new(false)),
            silent_still: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicUsize::new(0)),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script the next `acquire` call to fail with the given error.
    /// Subsequent calls succeed again.
    pub fn fail_next_acquire(&self, error: SensorError) {
        self.acquire_errors.lock().unwrap().push_back(error);
    }

    /// Make every `acquire` hang forever; exercises caller-side timeouts.
    pub fn never_resolve_acquire(&self) {
        self.silent_acquire.store(true, Ordering::SeqCst);
    }

    /// Make every `take_still` hang forever; the session itself is handed
    /// out normally.
    pub fn never_resolve_still(&self) {
        self.silent_still.store(true, Ordering::SeqCst);
    }

    /// How many times `acquire` has been called, successful or not.
    pub fn acquire_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// How many sessions have been dropped so far.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl Default for NullCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for NullCaptureSource {
    type Session = NullCaptureSession;

    async fn acquire(&self) -> Result<NullCaptureSession, SensorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.silent_acquire.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if let Some(error) = self.acquire_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(NullCaptureSession {
            still: self.still.clone(),
            silent: self.silent_still.load(Ordering::SeqCst),
            releases: Arc::clone(&self.releases),
        })
    }
}

/// A live session handed out by [`NullCaptureSource`]. Counts itself as
/// released on drop.
pub struct NullCaptureSession {
    still: StillImage,
    silent: bool,
    releases: Arc<AtomicUsize>,
}

impl CaptureSession for NullCaptureSession {
    async fn take_still(&mut self) -> Result<StillImage, SensorError> {
        if self.silent {
            std::future::pending::<()>().await;
        }
        Ok(self.still.clone())
    }
}

impl Drop for NullCaptureSession {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_sensors::SensorKind;

    #[tokio::test]
    async fn scripted_failure_applies_once() {
        let camera = NullCaptureSource::new();
        camera.fail_next_acquire(SensorError::PermissionDenied(SensorKind::Camera));

        assert!(camera.acquire().await.is_err());
        assert!(camera.acquire().await.is_ok());
        assert_eq!(camera.acquire_attempts(), 2);
    }

    #[tokio::test]
    async fn dropping_a_session_counts_as_a_release() {
        let camera = NullCaptureSource::new();
        let session = camera.acquire().await.unwrap();
        assert_eq!(camera.release_count(), 0);
        drop(session);
        assert_eq!(camera.release_count(), 1);
    }

    #[tokio::test]
    async fn silent_still_never_resolves() {
        let camera = NullCaptureSource::new();
        camera.never_resolve_still();
        let mut session = camera.acquire().await.unwrap();

        let bounded = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            session.take_still(),
        )
        .await;
        assert!(bounded.is_err(), "scripted silence must outlast the bound");
    }

    #[tokio::test]
    async fn clones_share_scripting_and_accounting() {
        let camera = NullCaptureSource::new();
        let clone = camera.clone();
        camera.fail_next_acquire(SensorError::NotFound(SensorKind::Camera));
        assert!(clone.acquire().await.is_err());
        assert_eq!(camera.acquire_attempts(), 1);
    }
}

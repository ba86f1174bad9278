//! Nullable collaborators for deterministic testing.
//!
//! Every external dependency of the certification flow (clock, camera,
//! position sensor, match oracle, stores) sits behind a trait. This crate
//! provides test-friendly implementations that:
//! - Return deterministic, scriptable values
//! - Can be controlled and inspected programmatically
//! - Never touch a real sensor, the filesystem, or the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod capture;
pub mod clock;
pub mod oracle;
pub mod position;
pub mod store;

pub use capture::{NullCaptureSession, NullCaptureSource};
pub use clock::NullClock;
pub use oracle::NullMatchOracle;
pub use position::NullPositionSource;
pub use store::{NullBlobStore, UnreliableRegistrationStore};

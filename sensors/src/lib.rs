//! Sensor collaborator traits.
//!
//! The camera and the position sensor are external capabilities: this crate
//! defines the seams the certification flow drives them through, plus the
//! error taxonomy every implementation must map into. Real device bindings
//! live outside the core; deterministic doubles live in `attest-nullables`.

pub mod capture;
pub mod error;
pub mod position;

pub use capture::{CaptureSession, CaptureSource, ImageFormat, StillImage};
pub use error::{SensorError, SensorKind};
pub use position::PositionSource;

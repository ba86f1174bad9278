//! Fundamental types for the Attest presence-certification core.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: identifiers, timestamps, geographic coordinates, the event
//! certification envelope, the registration record, and deployment
//! configuration.

pub mod attachment;
pub mod config;
pub mod event;
pub mod geo;
pub mod id;
pub mod logging;
pub mod params;
pub mod registration;
pub mod time;

pub use attachment::{Attachment, AttachmentKind};
pub use config::{CertificationConfig, ConfigError};
pub use event::{CertificationMode, EventEnvelope};
pub use geo::GeoPoint;
pub use id::{EventId, RegistrationId, UserId};
pub use logging::{init_tracing, init_tracing_with};
pub use params::CertificationParams;
pub use registration::{Registration, RegistrationStatus};
pub use time::Timestamp;

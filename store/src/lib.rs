//! Persistence seams for certification state.
//!
//! Two operations are the only writers of certification state anywhere in
//! the core: [`TokenStore::issue_or_get_token`] and
//! [`RegistrationStore::record_self_certification`]. Every backend
//! implements these traits; the rest of the workspace depends only on the
//! traits. The in-memory backend is the reference implementation and is
//! what the flow tests run against.

pub mod blob;
pub mod error;
pub mod memory;
pub mod registration;
pub mod token;

pub use blob::BlobStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use registration::{RegistrationStore, SelfCertification};
pub use token::{IssuedToken, TokenSecret, TokenStore, VerificationToken};

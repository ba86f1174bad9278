//! Opaque string identifiers for users, events, and registrations.
//!
//! Identifiers are minted by the surrounding CRUD system; this core only
//! carries them around and embeds them in verify links, so they stay
//! opaque newtypes over strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Identifier of a registered participant.
    UserId
}

string_id! {
    /// Identifier of an event carrying a certification envelope.
    EventId
}

string_id! {
    /// Identifier of one user's registration to one event.
    ///
    /// All certification state (token, attendance) is keyed by this id.
    RegistrationId
}

//! Strongly typed, validated string identifiers.
//!
//! All IDs are `Clone + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Construction is fallible: blank
//! strings are always rejected, and unit/incident ids are further restricted
//! to ASCII alphanumerics plus `-`, `_`, `.` and `:`.

use std::fmt;

use crate::{CoreError, CoreResult};

/// `true` for characters allowed in restricted ids.
#[inline]
fn is_restricted_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':')
}

fn validate(kind: &'static str, value: &str, restricted: bool) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::BlankId { kind });
    }
    if restricted {
        if let Some(ch) = value.chars().find(|&c| !is_restricted_id_char(c)) {
            return Err(CoreError::InvalidIdChar {
                kind,
                value: value.to_owned(),
                ch,
            });
        }
    }
    Ok(())
}

/// Generate a validated identifier wrapper around a `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident { restricted: $restricted:expr }) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        $vis struct $name(String);

        impl $name {
            /// Validate and wrap `value`.
            pub fn new(value: impl Into<String>) -> CoreResult<Self> {
                let value = value.into();
                validate(stringify!($name), &value, $restricted)?;
                Ok(Self(value))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(value: String) -> CoreResult<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            fn try_from(value: &str) -> CoreResult<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

string_id! {
    /// Identifier of a road-network node.  Any non-blank string.
    pub struct NodeId { restricted: false }
}

string_id! {
    /// Identifier of a response unit.
    pub struct UnitId { restricted: true }
}

string_id! {
    /// Identifier of a reported incident.
    pub struct IncidentId { restricted: true }
}

string_id! {
    /// Identifier of a dispatch centre.  Any non-blank string.
    pub struct DispatchCentreId { restricted: false }
}

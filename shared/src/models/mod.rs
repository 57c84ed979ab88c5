//! Data models
//!
//! Entities mirrored by the console and the payloads sent to create or
//! update them. Identifiers and timestamps are always server-assigned, so
//! payloads never carry them.

use thiserror::Error;

/// A value outside a closed enumeration (status, type, role).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} `{value}`, expected one of: {}", .allowed.join(", "))]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub allowed: Vec<&'static str>,
}

/// Declares a closed wire enumeration with `ALL`, `as_str`, `FromStr` and
/// `Display`, serialized as the given wire strings.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($field:literal) {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| $crate::models::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                        allowed: Self::ALL.iter().map(|v| v.as_str()).collect(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod camera;
pub mod equipment;
pub mod report;
pub mod site_object;
pub mod user;
pub mod zone;

// Re-exports
pub use camera::*;
pub use equipment::*;
pub use report::*;
pub use site_object::*;
pub use user::*;
pub use zone::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_lists_allowed_values() {
        let err = "BROKEN".parse::<CameraStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(
            err.to_string(),
            "invalid status `BROKEN`, expected one of: RECORDING, OFFLINE, MAINTENANCE"
        );
    }

    #[test]
    fn test_wire_names_are_case_sensitive() {
        assert!("recording".parse::<CameraStatus>().is_err());
        assert_eq!("active".parse::<ZoneStatus>().unwrap(), ZoneStatus::Active);
    }
}

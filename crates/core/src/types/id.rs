//! Newtype IDs for type-safe entity references.
//!
//! Every entity kind gets its own ID type so a shot's `grinder_id` can never
//! be compared against a machine's ID by accident. IDs wrap the creation time
//! in milliseconds since the Unix epoch.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`, `from_timestamp()`
/// - `From<i64>`, `Into<i64>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use espresso_dialer_core::define_id;
/// define_id!(KettleId);
/// define_id!(ScaleId);
///
/// let kettle = KettleId::new(1);
/// let scale = ScaleId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: KettleId = scale;
/// assert_eq!(kettle.as_i64(), scale.as_i64());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Create an ID from a creation time.
            ///
            /// Two entities of the same kind created within the same
            /// millisecond receive the same ID.
            #[must_use]
            pub fn from_timestamp(at: ::chrono::DateTime<::chrono::Utc>) -> Self {
                Self(at.timestamp_millis())
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(GrinderId);
define_id!(MachineId);
define_id!(BeanId);
define_id!(ShotId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_id_from_timestamp_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(GrinderId::from_timestamp(at).as_i64(), 1_700_000_000_123);
    }

    #[test]
    fn test_same_millisecond_collides() {
        let at = Utc.timestamp_millis_opt(42).unwrap();
        assert_eq!(ShotId::from_timestamp(at), ShotId::from_timestamp(at));
    }

    #[test]
    fn test_id_parse_and_display() {
        let id: BeanId = " 1712 ".parse().unwrap();
        assert_eq!(id, BeanId::new(1712));
        assert_eq!(id.to_string(), "1712");
        assert!("abc".parse::<BeanId>().is_err());
    }
}

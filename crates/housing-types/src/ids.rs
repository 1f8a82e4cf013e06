//! Type-safe identifier wrappers around `u64`.
//!
//! Every agent in the simulation has a strongly-typed ID to prevent
//! accidental mixing of house and household identifiers at compile time.
//! IDs are handed out sequentially by the market tables and never reused,
//! so a run is reproducible for a given seed.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw sequence number.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner sequence number.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// Return the identifier that follows this one.
            ///
            /// Saturates at `u64::MAX`; a run never allocates that many agents.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a house (a dwelling on the grid).
    HouseId
}

define_id! {
    /// Unique identifier for a household (a home-buying unit).
    HouseholdId
}

define_id! {
    /// Unique identifier for a completed house sale in the ledger.
    SaleId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_sequential() {
        let id = HouseId::new(7);
        assert_eq!(id.next(), HouseId::new(8));
        assert_eq!(HouseholdId::new(u64::MAX).next().into_inner(), u64::MAX);
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = HouseholdId::new(42);
        let json = serde_json::to_string(&original).ok();
        assert_eq!(json.as_deref(), Some("42"));
        let restored: Result<HouseholdId, _> = serde_json::from_str("42");
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn display_matches_raw() {
        assert_eq!(SaleId::new(3).to_string(), "3");
    }
}

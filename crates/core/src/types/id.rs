//! Newtype IDs for type-safe entity references.
//!
//! Entity ids are assigned by the storefront contract (or chosen by the
//! caller, for products) and are always `uint256` on-chain. The gateway keeps
//! them as `u64`, which covers every id the contract hands out in practice.
//!
//! The contract answers lookups for unknown ids with a zeroed record, so id
//! `0` is never a real entity; see [`StoreId::is_sentinel`] and friends.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`, `Default`
/// - Conversion methods: `new()`, `as_u64()`, `is_sentinel()`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use storechain_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShipmentId);
///
/// let warehouse = WarehouseId::new(1);
/// let shipment = ShipmentId::new(1);
/// assert!(!warehouse.is_sentinel());
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shipment;
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
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Whether this is the zero id the contract returns for missing entities.
            #[must_use]
            pub const fn is_sentinel(&self) -> bool {
                self.0 == 0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(StoreId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(OrderItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrips_through_u64() {
        let id = ProductId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(u64::from(id), 42);
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn test_zero_id_is_sentinel() {
        assert!(OrderId::new(0).is_sentinel());
        assert!(!OrderId::new(7).is_sentinel());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&StoreId::new(9)).unwrap();
        assert_eq!(json, "9");

        let parsed: CategoryId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, CategoryId::new(12));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CustomerId::new(3).to_string(), "3");
    }
}

//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `Display` as the bare number
///
/// # Example
///
/// ```rust
/// # use hu_returns_core::define_id;
/// define_id!(PalletId);
/// define_id!(BinId);
///
/// let pallet_id = PalletId::new(1);
/// let bin_id = BinId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: PalletId = bin_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Handling units and their contents
define_id!(HandlingUnitId);
define_id!(ProductId);
define_id!(UomId);

// Trading partners and warehouses
define_id!(PartnerId);
define_id!(PartnerLocationId);
define_id!(WarehouseId);

// Shipment documents
define_id!(ShipmentId);
define_id!(ShipmentLineId);
define_id!(OrderLineId);
define_id!(MaterialTrackingId);

// Packing instructions
define_id!(PackingInstructionId);
define_id!(PackingItemProductId);

// Generic table/row references used by assignment history
define_id!(TableId);
define_id!(RecordId);

impl RecordId {
    /// Reinterpret this row reference as a shipment line ID.
    ///
    /// Only meaningful when the owning table is the shipment-line table.
    #[must_use]
    pub const fn as_shipment_line(&self) -> ShipmentLineId {
        ShipmentLineId::new(self.0)
    }
}

impl From<ShipmentLineId> for RecordId {
    fn from(id: ShipmentLineId) -> Self {
        Self(id.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversion() {
        let hu = HandlingUnitId::new(42);
        assert_eq!(hu.to_string(), "42");
        assert_eq!(i32::from(hu), 42);
        assert_eq!(HandlingUnitId::from(42), hu);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&PartnerId::new(7)).expect("serialize");
        assert_eq!(json, "7");
        let back: PartnerId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, PartnerId::new(7));
    }

    #[test]
    fn test_record_id_shipment_line_reinterpretation() {
        let line = ShipmentLineId::new(1001);
        let record = RecordId::from(line);
        assert_eq!(record.as_shipment_line(), line);
    }
}

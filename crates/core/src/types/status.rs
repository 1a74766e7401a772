//! Status enums for handling units and shipment documents.

use serde::{Deserialize, Serialize};

/// Handling unit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HuStatus {
    /// Being packed, not yet usable.
    Planning,
    /// In stock and available.
    #[default]
    Active,
    /// Picked for an outgoing shipment.
    Picked,
    /// Issued to production.
    Issued,
    /// Left the warehouse with a shipment.
    Shipped,
    /// Destroyed, packing material collected.
    Destroyed,
}

impl std::fmt::Display for HuStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "planning"),
            Self::Active => write!(f, "active"),
            Self::Picked => write!(f, "picked"),
            Self::Issued => write!(f, "issued"),
            Self::Shipped => write!(f, "shipped"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// Role a handling unit plays in its containment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuUnitType {
    /// Loading unit, e.g. a pallet.
    LoadUnit,
    /// Transport unit, e.g. a crate on a pallet.
    TransportUnit,
    /// Virtual unit holding the customer units directly.
    Virtual,
}

/// Inventory movement type of a shipment document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods shipped to a customer (`C-`).
    CustomerShipment,
    /// Goods returned by a customer (`C+`).
    CustomerReturns,
    /// Goods received from a vendor (`V+`).
    VendorReceipts,
    /// Goods returned to a vendor (`V-`).
    VendorReturns,
}

impl MovementType {
    /// Whether documents of this type are sales-side shipments rather than receipts.
    #[must_use]
    pub const fn is_sales_transaction(self) -> bool {
        matches!(self, Self::CustomerShipment | Self::CustomerReturns)
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomerShipment => write!(f, "C-"),
            Self::CustomerReturns => write!(f, "C+"),
            Self::VendorReceipts => write!(f, "V+"),
            Self::VendorReturns => write!(f, "V-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_codes() {
        assert_eq!(MovementType::CustomerShipment.to_string(), "C-");
        assert_eq!(MovementType::CustomerReturns.to_string(), "C+");
        assert_eq!(MovementType::VendorReceipts.to_string(), "V+");
        assert_eq!(MovementType::VendorReturns.to_string(), "V-");
    }

    #[test]
    fn test_vendor_movements_are_not_sales() {
        assert!(!MovementType::VendorReturns.is_sales_transaction());
        assert!(!MovementType::VendorReceipts.is_sales_transaction());
        assert!(MovementType::CustomerShipment.is_sales_transaction());
    }

    #[test]
    fn test_hu_status_defaults_to_active() {
        assert_eq!(HuStatus::default(), HuStatus::Active);
        assert_eq!(HuStatus::Shipped.to_string(), "shipped");
    }

    #[test]
    fn test_hu_status_serde() {
        let json = serde_json::to_string(&HuStatus::Shipped).expect("serialize");
        assert_eq!(json, "\"shipped\"");
    }
}

//! Effective packing values of customer shipment lines.
//!
//! A line carries both manually overridden and system-calculated packing
//! values. Resolution writes the winning set into `qty_entered`,
//! `qty_entered_tu` and `packing_item_product`, which is what the rest of the
//! system reads.

use rust_decimal::Decimal;

use hu_returns_core::PackingItemProductId;

use crate::error::ReturnsError;
use crate::models::{ShipmentHeader, ShipmentLine};

/// The resolved packing values of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveValues {
    /// Customer-unit quantity.
    pub qty_cu: Decimal,
    /// Transport-unit quantity.
    pub qty_tu: Decimal,
    /// Packing-item-product.
    pub packing_item_product: Option<PackingItemProductId>,
}

impl EffectiveValues {
    /// Resolve the values of `line`. `None` for packaging-material lines.
    #[must_use]
    pub const fn of(line: &ShipmentLine) -> Option<Self> {
        if line.is_packaging_material {
            return None;
        }

        if line.is_manual_packing_material {
            Some(Self {
                qty_cu: line.qty_entered,
                qty_tu: line.qty_tu_override,
                packing_item_product: line.packing_item_product_override,
            })
        } else {
            Some(Self {
                qty_cu: line.qty_cu_calculated,
                qty_tu: line.qty_tu_calculated,
                packing_item_product: line.packing_item_product_calculated,
            })
        }
    }

    fn apply(self, line: &mut ShipmentLine) {
        line.qty_entered = self.qty_cu;
        line.qty_entered_tu = self.qty_tu;
        line.packing_item_product = self.packing_item_product;
    }
}

/// Materialize the effective packing values of a customer shipment line.
///
/// Packaging-material lines are left untouched.
///
/// # Errors
///
/// Returns [`ReturnsError::PreconditionViolated`] without touching the line
/// if `header` is a receipt, or is not the saved document owning `line`.
pub fn update_effective_values(
    header: &ShipmentHeader,
    line: &mut ShipmentLine,
) -> Result<(), ReturnsError> {
    if header.id != Some(line.document) {
        return Err(ReturnsError::PreconditionViolated(format!(
            "line of shipment {} resolved against header {:?}",
            line.document, header.id
        )));
    }
    if !header.is_sales_transaction() {
        return Err(ReturnsError::PreconditionViolated(format!(
            "shipment {} has movement type {}, not a customer shipment",
            line.document, header.movement_type
        )));
    }

    if let Some(values) = EffectiveValues::of(line) {
        values.apply(line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use hu_returns_core::{MovementType, PartnerId, ProductId, ShipmentId, UomId, WarehouseId};

    use super::*;

    fn header(movement_type: MovementType) -> ShipmentHeader {
        ShipmentHeader {
            id: Some(ShipmentId::new(1)),
            partner: PartnerId::new(1),
            partner_location: None,
            warehouse: WarehouseId::new(1),
            movement_date: NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date"),
            movement_type,
        }
    }

    fn line() -> ShipmentLine {
        let mut line = ShipmentLine::new(ShipmentId::new(1), ProductId::new(1), UomId::new(1));
        line.qty_entered = Decimal::from(10);
        line.qty_cu_calculated = Decimal::from(7);
        line.qty_tu_calculated = Decimal::from(2);
        line.qty_tu_override = Decimal::from(3);
        line.packing_item_product_calculated = Some(PackingItemProductId::new(50));
        line.packing_item_product_override = Some(PackingItemProductId::new(51));
        line
    }

    #[test]
    fn test_manual_override_keeps_entered_quantity() {
        let mut line = line();
        line.is_manual_packing_material = true;

        update_effective_values(&header(MovementType::CustomerShipment), &mut line)
            .expect("resolves");

        assert_eq!(line.qty_entered, Decimal::from(10));
        assert_eq!(line.qty_entered_tu, Decimal::from(3));
        assert_eq!(line.packing_item_product, Some(PackingItemProductId::new(51)));
    }

    #[test]
    fn test_calculated_values_win_without_override() {
        let mut line = line();

        update_effective_values(&header(MovementType::CustomerShipment), &mut line)
            .expect("resolves");

        assert_eq!(line.qty_entered, Decimal::from(7));
        assert_eq!(line.qty_entered_tu, Decimal::from(2));
        assert_eq!(line.packing_item_product, Some(PackingItemProductId::new(50)));
    }

    #[test]
    fn test_packaging_material_line_is_untouched() {
        for manual in [false, true] {
            let mut line = line();
            line.is_packaging_material = true;
            line.is_manual_packing_material = manual;
            let before = line.clone();

            update_effective_values(&header(MovementType::CustomerShipment), &mut line)
                .expect("resolves");

            assert_eq!(line, before);
        }
    }

    #[test]
    fn test_receipt_line_is_rejected() {
        let mut line = line();
        let before = line.clone();

        assert_matches!(
            update_effective_values(&header(MovementType::VendorReceipts), &mut line),
            Err(ReturnsError::PreconditionViolated(message)) if message.contains("V+")
        );
        assert_eq!(line, before);
    }

    #[test]
    fn test_line_of_other_document_is_rejected() {
        let mut line = line();
        line.document = ShipmentId::new(2);

        assert_matches!(
            update_effective_values(&header(MovementType::CustomerShipment), &mut line),
            Err(ReturnsError::PreconditionViolated(_))
        );
    }
}

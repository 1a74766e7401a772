//! Shipment document models: headers, lines and HU assignments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hu_returns_core::{
    HandlingUnitId, MaterialTrackingId, MovementType, OrderLineId, PackingItemProductId,
    PartnerId, PartnerLocationId, ProductId, ShipmentId, ShipmentLineId, UomId, WarehouseId,
};

/// Header of a shipment or receipt document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentHeader {
    /// Document ID, `None` until first saved.
    pub id: Option<ShipmentId>,
    /// Trading partner the goods move to or from.
    pub partner: PartnerId,
    /// Partner location goods are shipped to.
    pub partner_location: Option<PartnerLocationId>,
    /// Warehouse the goods leave or enter.
    pub warehouse: WarehouseId,
    /// Date of the physical movement.
    pub movement_date: NaiveDate,
    /// Inventory movement type.
    pub movement_type: MovementType,
}

impl ShipmentHeader {
    /// Create an unsaved vendor-return header.
    #[must_use]
    pub const fn vendor_return(
        partner: PartnerId,
        ship_to: PartnerLocationId,
        warehouse: WarehouseId,
        movement_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            partner,
            partner_location: Some(ship_to),
            warehouse,
            movement_date,
            movement_type: MovementType::VendorReturns,
        }
    }

    /// Whether this is a sales-side shipment rather than a receipt.
    #[must_use]
    pub const fn is_sales_transaction(&self) -> bool {
        self.movement_type.is_sales_transaction()
    }
}

/// A line of a shipment document.
///
/// Carries both the manually overridden and the system-calculated packing
/// values; [`crate::services::effective`] collapses them into the
/// authoritative `qty_entered` / `qty_entered_tu` / `packing_item_product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLine {
    /// Line ID, `None` until first saved.
    pub id: Option<ShipmentLineId>,
    /// Owning document.
    pub document: ShipmentId,
    /// Product moved.
    pub product: ProductId,
    /// UOM of the quantities below.
    pub uom: UomId,
    /// Quantity moved, in the product's stocking UOM.
    pub movement_qty: Decimal,
    /// Effective customer-unit quantity.
    pub qty_entered: Decimal,
    /// Effective transport-unit quantity.
    pub qty_entered_tu: Decimal,
    /// Customer-unit quantity computed by the system.
    pub qty_cu_calculated: Decimal,
    /// Transport-unit quantity computed by the system.
    pub qty_tu_calculated: Decimal,
    /// Transport-unit quantity set manually.
    pub qty_tu_override: Decimal,
    /// Effective packing-item-product.
    pub packing_item_product: Option<PackingItemProductId>,
    /// Packing-item-product computed by the system.
    pub packing_item_product_calculated: Option<PackingItemProductId>,
    /// Packing-item-product set manually.
    pub packing_item_product_override: Option<PackingItemProductId>,
    /// Order line this line fulfils.
    pub order_line: Option<OrderLineId>,
    /// Material tracking the goods belong to.
    pub material_tracking: Option<MaterialTrackingId>,
    /// Line carries packing material rather than product.
    pub is_packaging_material: bool,
    /// Packing values were overridden manually.
    pub is_manual_packing_material: bool,
}

impl ShipmentLine {
    /// Create an unsaved line with all quantities at zero.
    #[must_use]
    pub const fn new(document: ShipmentId, product: ProductId, uom: UomId) -> Self {
        Self {
            id: None,
            document,
            product,
            uom,
            movement_qty: Decimal::ZERO,
            qty_entered: Decimal::ZERO,
            qty_entered_tu: Decimal::ZERO,
            qty_cu_calculated: Decimal::ZERO,
            qty_tu_calculated: Decimal::ZERO,
            qty_tu_override: Decimal::ZERO,
            packing_item_product: None,
            packing_item_product_calculated: None,
            packing_item_product_override: None,
            order_line: None,
            material_tracking: None,
            is_packaging_material: false,
            is_manual_packing_material: false,
        }
    }
}

/// Links a shipment line to the unit hierarchy one contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingUnitAssignment {
    /// Line the unit was shipped on.
    pub line: ShipmentLineId,
    /// Root of the contributing unit's tree.
    pub top_level: HandlingUnitId,
    /// Loading unit, if the tree has one.
    pub load_unit: Option<HandlingUnitId>,
    /// Transport unit, if the tree has one.
    pub transport_unit: Option<HandlingUnitId>,
}

/// A fully assembled document as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDocument {
    /// Saved header.
    pub header: ShipmentHeader,
    /// One line per product, in first-contribution order.
    pub lines: Vec<ShipmentLine>,
    /// One entry per non-empty contribution.
    pub trading_unit_assignments: Vec<TradingUnitAssignment>,
    /// Units linked to the document as a whole.
    pub assigned_handling_units: Vec<HandlingUnitId>,
}

impl ShipmentDocument {
    /// The line for `product`, if any.
    #[must_use]
    pub fn line_for(&self, product: ProductId) -> Option<&ShipmentLine> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Trading-unit assignments recorded against `line`.
    pub fn assignments_for(
        &self,
        line: ShipmentLineId,
    ) -> impl Iterator<Item = &TradingUnitAssignment> {
        self.trading_unit_assignments
            .iter()
            .filter(move |assignment| assignment.line == line)
    }
}

/// Minimal view of a sales/purchase order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Order line ID.
    pub id: OrderLineId,
    /// Packing-item-product the line was ordered with.
    pub packing_item_product: Option<PackingItemProductId>,
}

/// Input for turning a line into a packing-material line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingMaterialCandidate {
    /// Packing material product.
    pub product: ProductId,
    /// UOM of `qty`.
    pub uom: UomId,
    /// Quantity in `uom`.
    pub qty: Decimal,
    /// Quantity in the product's stocking UOM.
    pub qty_in_stocking_uom: Decimal,
    /// Material tracking to carry over.
    pub material_tracking: Option<MaterialTrackingId>,
}

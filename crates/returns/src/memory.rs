//! In-memory implementation of every collaborator contract.
//!
//! Backs tests and embedding callers that keep their warehouse state in
//! process. Single-threaded: state lives behind a `RefCell`.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::trace;

use hu_returns_core::{
    HandlingUnitId, HuStatus, MovementType, OrderLineId, PackingInstructionId,
    PackingItemProductId, PartnerId, PartnerLocationId, ProductId, Quantity, RecordId, ShipmentId,
    ShipmentLineId, TableId, UomId, WarehouseId,
};

use crate::collaborators::{
    AssignmentHistory, HandlingUnitStore, HuHierarchy, PackingCatalog, PartnerDirectory,
    ShipmentRepository, UomConversion,
};
use crate::error::ReturnsError;
use crate::hierarchy::HuTree;
use crate::models::{
    AssignmentRecord, HandlingUnit, OrderLine, ShipmentHeader, ShipmentLine,
    TradingUnitAssignment,
};

#[derive(Debug, Default)]
struct State {
    handling_units: HashMap<HandlingUnitId, HandlingUnit>,
    tree: HuTree,
    history: Vec<AssignmentRecord>,
    headers: IndexMap<ShipmentId, ShipmentHeader>,
    lines: IndexMap<ShipmentLineId, ShipmentLine>,
    trading_unit_assignments: Vec<TradingUnitAssignment>,
    document_hus: HashMap<ShipmentId, Vec<HandlingUnitId>>,
    ship_to: HashMap<PartnerId, PartnerLocationId>,
    stocking_uoms: HashMap<ProductId, UomId>,
    conversions: HashMap<(ProductId, UomId, UomId), Decimal>,
    order_lines: HashMap<OrderLineId, OrderLine>,
    packing_instructions: HashMap<PackingItemProductId, PackingInstructionId>,
    last_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// Warehouse state held in process.
#[derive(Debug, Default)]
pub struct InMemoryWarehouse {
    state: RefCell<State>,
}

impl InMemoryWarehouse {
    /// Create an empty warehouse.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Register or replace a handling unit.
    pub fn add_handling_unit(&self, hu: HandlingUnit) {
        let mut state = self.state.borrow_mut();
        state.tree.insert(&hu);
        state.handling_units.insert(hu.id, hu);
    }

    /// Record that row `record` of `table` referenced `hu`.
    pub fn record_assignment(&self, table: TableId, record: RecordId, hu: HandlingUnitId) {
        self.state
            .borrow_mut()
            .history
            .push(AssignmentRecord { table, record, hu });
    }

    /// Save a header, assigning its ID if new.
    pub fn insert_header(&self, header: &mut ShipmentHeader) {
        let mut state = self.state.borrow_mut();
        let id = match header.id {
            Some(id) => id,
            None => ShipmentId::new(state.next_id()),
        };
        header.id = Some(id);
        state.headers.insert(id, header.clone());
    }

    /// Save a line, assigning its ID if new. The document is not checked.
    pub fn insert_line(&self, line: &mut ShipmentLine) {
        let mut state = self.state.borrow_mut();
        let id = match line.id {
            Some(id) => id,
            None => ShipmentLineId::new(state.next_id()),
        };
        line.id = Some(id);
        state.lines.insert(id, line.clone());
    }

    /// Seed a vendor receipt from `partner` with one line per unit, and record
    /// each unit against its line in `table`.
    ///
    /// Each line carries the unit's first product in its stocking UOM.
    ///
    /// # Errors
    ///
    /// Nothing is seeded if a unit is unknown, holds no product, or its
    /// product has no stocking UOM.
    pub fn record_receipt(
        &self,
        table: TableId,
        partner: PartnerId,
        warehouse: WarehouseId,
        movement_date: NaiveDate,
        hus: &[HandlingUnitId],
    ) -> Result<ShipmentId, ReturnsError> {
        let mut received = Vec::with_capacity(hus.len());
        for hu in hus {
            let product = self.first_product_of(*hu)?;
            received.push((*hu, product, self.stocking_uom(product)?));
        }

        let mut header = ShipmentHeader {
            id: None,
            partner,
            partner_location: None,
            warehouse,
            movement_date,
            movement_type: MovementType::VendorReceipts,
        };
        self.save_header(&mut header)?;
        let shipment = header.id.ok_or_else(|| {
            ReturnsError::Persistence("receipt header saved without an ID".to_string())
        })?;

        for (hu, product, uom) in received {
            let mut line = ShipmentLine::new(shipment, product, uom);
            self.save_line(&mut line)?;
            let line_id = line.id.ok_or_else(|| {
                ReturnsError::Persistence("receipt line saved without an ID".to_string())
            })?;
            self.record_assignment(table, line_id.into(), hu);
        }
        Ok(shipment)
    }

    fn first_product_of(&self, hu: HandlingUnitId) -> Result<ProductId, ReturnsError> {
        let state = self.state.borrow();
        let unit = state.handling_units.get(&hu).ok_or(ReturnsError::NotFound {
            entity: "handling unit",
            id: hu.as_i32(),
        })?;
        unit.storages
            .first()
            .map(|storage| storage.product)
            .ok_or_else(|| {
                ReturnsError::PreconditionViolated(format!(
                    "handling unit {hu} holds no product to receive"
                ))
            })
    }

    /// Configure the default ship-to location of `partner`.
    pub fn set_ship_to_location(&self, partner: PartnerId, location: PartnerLocationId) {
        self.state.borrow_mut().ship_to.insert(partner, location);
    }

    /// Configure the stocking UOM of `product`.
    pub fn set_stocking_uom(&self, product: ProductId, uom: UomId) {
        self.state.borrow_mut().stocking_uoms.insert(product, uom);
    }

    /// One `from` of `product` equals `multiplier` of `to`.
    pub fn add_conversion(&self, product: ProductId, from: UomId, to: UomId, multiplier: Decimal) {
        self.state
            .borrow_mut()
            .conversions
            .insert((product, from, to), multiplier);
    }

    /// Register an order line.
    pub fn add_order_line(&self, order_line: OrderLine) {
        self.state
            .borrow_mut()
            .order_lines
            .insert(order_line.id, order_line);
    }

    /// Register the packing instruction owning a packing-item-product.
    pub fn add_packing_instruction(
        &self,
        item_product: PackingItemProductId,
        instruction: PackingInstructionId,
    ) {
        self.state
            .borrow_mut()
            .packing_instructions
            .insert(item_product, instruction);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Current status of a unit.
    #[must_use]
    pub fn hu_status(&self, hu: HandlingUnitId) -> Option<HuStatus> {
        self.state
            .borrow()
            .handling_units
            .get(&hu)
            .map(|hu| hu.status)
    }

    /// Saved headers, in creation order.
    #[must_use]
    pub fn headers(&self) -> Vec<ShipmentHeader> {
        self.state.borrow().headers.values().cloned().collect()
    }

    /// Saved headers of the given movement type.
    #[must_use]
    pub fn headers_of_type(&self, movement_type: MovementType) -> Vec<ShipmentHeader> {
        self.state
            .borrow()
            .headers
            .values()
            .filter(|header| header.movement_type == movement_type)
            .cloned()
            .collect()
    }

    /// Saved lines of a document, in creation order.
    #[must_use]
    pub fn lines_of(&self, shipment: ShipmentId) -> Vec<ShipmentLine> {
        self.state
            .borrow()
            .lines
            .values()
            .filter(|line| line.document == shipment)
            .cloned()
            .collect()
    }

    /// Every trading-unit assignment saved so far.
    #[must_use]
    pub fn trading_unit_assignments(&self) -> Vec<TradingUnitAssignment> {
        self.state.borrow().trading_unit_assignments.clone()
    }
}

impl AssignmentHistory for InMemoryWarehouse {
    fn assignments_for(
        &self,
        table: TableId,
        hu: HandlingUnitId,
    ) -> Result<Vec<AssignmentRecord>, ReturnsError> {
        Ok(self
            .state
            .borrow()
            .history
            .iter()
            .filter(|record| record.table == table && record.hu == hu)
            .copied()
            .collect())
    }
}

impl PartnerDirectory for InMemoryWarehouse {
    fn ship_to_location(&self, partner: PartnerId) -> Result<PartnerLocationId, ReturnsError> {
        self.state
            .borrow()
            .ship_to
            .get(&partner)
            .copied()
            .ok_or(ReturnsError::NoShipToLocation(partner))
    }
}

impl UomConversion for InMemoryWarehouse {
    fn stocking_uom(&self, product: ProductId) -> Result<UomId, ReturnsError> {
        self.state
            .borrow()
            .stocking_uoms
            .get(&product)
            .copied()
            .ok_or(ReturnsError::NotFound {
                entity: "stocking UOM of product",
                id: product.as_i32(),
            })
    }

    fn convert(
        &self,
        product: ProductId,
        qty: Quantity,
        to: UomId,
    ) -> Result<Quantity, ReturnsError> {
        if qty.uom() == to {
            return Ok(qty);
        }
        let state = self.state.borrow();
        if let Some(multiplier) = state.conversions.get(&(product, qty.uom(), to)) {
            return Ok(Quantity::new(qty.qty() * *multiplier, to));
        }
        match state.conversions.get(&(product, to, qty.uom())) {
            Some(divisor) if !divisor.is_zero() => Ok(Quantity::new(qty.qty() / *divisor, to)),
            _ => Err(ReturnsError::IncompatibleUom {
                product,
                from: qty.uom(),
                to,
            }),
        }
    }
}

impl HuHierarchy for InMemoryWarehouse {
    fn top_level_of(&self, hu: HandlingUnitId) -> Result<HandlingUnitId, ReturnsError> {
        self.state.borrow().tree.top_level_of(hu)
    }

    fn load_unit_of(&self, hu: HandlingUnitId) -> Result<Option<HandlingUnitId>, ReturnsError> {
        self.state.borrow().tree.load_unit_of(hu)
    }

    fn transport_unit_of(
        &self,
        hu: HandlingUnitId,
    ) -> Result<Option<HandlingUnitId>, ReturnsError> {
        self.state.borrow().tree.transport_unit_of(hu)
    }
}

impl ShipmentRepository for InMemoryWarehouse {
    fn find_line(&self, id: ShipmentLineId) -> Result<Option<ShipmentLine>, ReturnsError> {
        Ok(self.state.borrow().lines.get(&id).cloned())
    }

    fn find_header(&self, id: ShipmentId) -> Result<Option<ShipmentHeader>, ReturnsError> {
        Ok(self.state.borrow().headers.get(&id).cloned())
    }

    fn save_header(&self, header: &mut ShipmentHeader) -> Result<(), ReturnsError> {
        self.insert_header(header);
        Ok(())
    }

    fn save_line(&self, line: &mut ShipmentLine) -> Result<(), ReturnsError> {
        if !self.state.borrow().headers.contains_key(&line.document) {
            return Err(ReturnsError::NotFound {
                entity: "shipment",
                id: line.document.as_i32(),
            });
        }
        self.insert_line(line);
        Ok(())
    }

    fn save_trading_unit_assignment(
        &self,
        assignment: &TradingUnitAssignment,
    ) -> Result<(), ReturnsError> {
        let mut state = self.state.borrow_mut();
        if !state.lines.contains_key(&assignment.line) {
            return Err(ReturnsError::NotFound {
                entity: "shipment line",
                id: assignment.line.as_i32(),
            });
        }
        state.trading_unit_assignments.push(*assignment);
        Ok(())
    }

    fn set_assigned_handling_units(
        &self,
        shipment: ShipmentId,
        hus: &[HandlingUnitId],
    ) -> Result<(), ReturnsError> {
        let mut state = self.state.borrow_mut();
        if !state.headers.contains_key(&shipment) {
            return Err(ReturnsError::NotFound {
                entity: "shipment",
                id: shipment.as_i32(),
            });
        }
        state.document_hus.insert(shipment, hus.to_vec());
        Ok(())
    }

    fn assigned_handling_units(
        &self,
        shipment: ShipmentId,
    ) -> Result<Vec<HandlingUnitId>, ReturnsError> {
        Ok(self
            .state
            .borrow()
            .document_hus
            .get(&shipment)
            .cloned()
            .unwrap_or_default())
    }
}

impl HandlingUnitStore for InMemoryWarehouse {
    fn set_status(&self, hu: HandlingUnitId, status: HuStatus) -> Result<(), ReturnsError> {
        let mut state = self.state.borrow_mut();
        let unit = state
            .handling_units
            .get_mut(&hu)
            .ok_or(ReturnsError::NotFound {
                entity: "handling unit",
                id: hu.as_i32(),
            })?;
        trace!(hu_id = %hu, from = %unit.status, to = %status, "HU status changed");
        unit.status = status;
        Ok(())
    }
}

impl PackingCatalog for InMemoryWarehouse {
    fn order_line(&self, id: OrderLineId) -> Result<Option<OrderLine>, ReturnsError> {
        Ok(self.state.borrow().order_lines.get(&id).copied())
    }

    fn packing_instruction_of(
        &self,
        item_product: PackingItemProductId,
    ) -> Result<Option<PackingInstructionId>, ReturnsError> {
        Ok(self
            .state
            .borrow()
            .packing_instructions
            .get(&item_product)
            .copied())
    }
}

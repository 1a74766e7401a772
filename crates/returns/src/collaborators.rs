//! Contracts of the external systems the engine consumes.
//!
//! Every operation is synchronous and is expected to take part in the
//! caller's ambient transaction. Implementations take `&self` and manage
//! their own interior state, so one store can back several roles at once.

use hu_returns_core::{
    HandlingUnitId, HuStatus, OrderLineId, PackingInstructionId, PackingItemProductId, PartnerId,
    PartnerLocationId, ProductId, Quantity, ShipmentId, ShipmentLineId, TableId, UomId,
};

use crate::error::ReturnsError;
use crate::models::{
    AssignmentRecord, OrderLine, ShipmentHeader, ShipmentLine, TradingUnitAssignment,
};

/// Historical HU assignments, by owning table.
pub trait AssignmentHistory {
    /// Assignments of `hu` to rows of `table`, oldest first. Empty if none.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    fn assignments_for(
        &self,
        table: TableId,
        hu: HandlingUnitId,
    ) -> Result<Vec<AssignmentRecord>, ReturnsError>;
}

/// Partner master data.
pub trait PartnerDirectory {
    /// Default ship-to location of `partner`.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::NoShipToLocation`] if none is configured.
    fn ship_to_location(&self, partner: PartnerId) -> Result<PartnerLocationId, ReturnsError>;
}

/// Unit-of-measure conversion.
pub trait UomConversion {
    /// Canonical stocking UOM of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::NotFound`] for unknown products.
    fn stocking_uom(&self, product: ProductId) -> Result<UomId, ReturnsError>;

    /// Convert `qty` of `product` into `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::IncompatibleUom`] if no conversion exists.
    fn convert(
        &self,
        product: ProductId,
        qty: Quantity,
        to: UomId,
    ) -> Result<Quantity, ReturnsError>;
}

/// Tree-walks over the HU parent-link graph.
pub trait HuHierarchy {
    /// Root ancestor of `hu` (itself if top-level).
    ///
    /// # Errors
    ///
    /// Fails for unknown units or cyclic parent links.
    fn top_level_of(&self, hu: HandlingUnitId) -> Result<HandlingUnitId, ReturnsError>;

    /// Ancestor acting as loading unit, if any.
    ///
    /// # Errors
    ///
    /// Fails for unknown units or cyclic parent links.
    fn load_unit_of(&self, hu: HandlingUnitId) -> Result<Option<HandlingUnitId>, ReturnsError>;

    /// Ancestor (or self) acting as transport unit, if any.
    ///
    /// # Errors
    ///
    /// Fails for unknown units or cyclic parent links.
    fn transport_unit_of(&self, hu: HandlingUnitId)
    -> Result<Option<HandlingUnitId>, ReturnsError>;
}

/// Persistence of shipment documents and their links to handling units.
pub trait ShipmentRepository {
    /// Load a line by ID.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn find_line(&self, id: ShipmentLineId) -> Result<Option<ShipmentLine>, ReturnsError>;

    /// Load a document header by ID.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn find_header(&self, id: ShipmentId) -> Result<Option<ShipmentHeader>, ReturnsError>;

    /// Upsert a header, assigning its ID on first save.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save_header(&self, header: &mut ShipmentHeader) -> Result<(), ReturnsError>;

    /// Upsert a line, assigning its ID on first save.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save_line(&self, line: &mut ShipmentLine) -> Result<(), ReturnsError>;

    /// Record that one HU contribution was shipped on a line.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save_trading_unit_assignment(
        &self,
        assignment: &TradingUnitAssignment,
    ) -> Result<(), ReturnsError>;

    /// Replace the set of units linked to a document as a whole.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn set_assigned_handling_units(
        &self,
        shipment: ShipmentId,
        hus: &[HandlingUnitId],
    ) -> Result<(), ReturnsError>;

    /// Units linked to a document as a whole.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn assigned_handling_units(
        &self,
        shipment: ShipmentId,
    ) -> Result<Vec<HandlingUnitId>, ReturnsError>;
}

/// Handling-unit persistence.
pub trait HandlingUnitStore {
    /// Persist a status change.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::NotFound`] for unknown units.
    fn set_status(&self, hu: HandlingUnitId, status: HuStatus) -> Result<(), ReturnsError>;
}

/// Packing-instruction master data.
pub trait PackingCatalog {
    /// Load an order line by ID.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    fn order_line(&self, id: OrderLineId) -> Result<Option<OrderLine>, ReturnsError>;

    /// Packing instruction a packing-item-product belongs to.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    fn packing_instruction_of(
        &self,
        item_product: PackingItemProductId,
    ) -> Result<Option<PackingInstructionId>, ReturnsError>;
}

/// The set of collaborators one assembly run works against.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Assignment history lookup.
    pub history: &'a dyn AssignmentHistory,
    /// Partner/location lookup.
    pub partners: &'a dyn PartnerDirectory,
    /// UOM conversion.
    pub uom: &'a dyn UomConversion,
    /// HU hierarchy resolver.
    pub hierarchy: &'a dyn HuHierarchy,
    /// Document/line persistence.
    pub shipments: &'a dyn ShipmentRepository,
    /// HU status persistence.
    pub handling_units: &'a dyn HandlingUnitStore,
}

impl<'a> Collaborators<'a> {
    /// Use one store for every role.
    #[must_use]
    pub fn from_store<S>(store: &'a S) -> Self
    where
        S: AssignmentHistory
            + PartnerDirectory
            + UomConversion
            + HuHierarchy
            + ShipmentRepository
            + HandlingUnitStore,
    {
        Self {
            history: store,
            partners: store,
            uom: store,
            hierarchy: store,
            shipments: store,
            handling_units: store,
        }
    }
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

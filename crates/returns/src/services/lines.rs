//! Per-product line aggregation for vendor-return documents.
//!
//! One builder serves exactly one document header. Every non-empty product
//! storage is folded into the single line kept for its product, linked to the
//! contributing unit's hierarchy, and the unit is marked shipped.

use indexmap::IndexMap;
use tracing::{debug, trace};

use hu_returns_core::{HuStatus, ProductId, Quantity};

use crate::collaborators::{
    Collaborators, HandlingUnitStore, HuHierarchy, ShipmentRepository, UomConversion,
};
use crate::error::ReturnsError;
use crate::models::{
    HandlingUnit, ProductStorage, ShipmentHeader, ShipmentLine, TradingUnitAssignment,
};

/// Builds the product lines of one return document.
pub struct ReturnLinesBuilder<'a> {
    header: &'a ShipmentHeader,
    uom: &'a dyn UomConversion,
    hierarchy: &'a dyn HuHierarchy,
    shipments: &'a dyn ShipmentRepository,
    handling_units: &'a dyn HandlingUnitStore,
    lines: IndexMap<ProductId, ShipmentLine>,
    assignments: Vec<TradingUnitAssignment>,
}

impl<'a> ReturnLinesBuilder<'a> {
    /// Create a builder for `header`.
    #[must_use]
    pub fn new(header: &'a ShipmentHeader, collaborators: &Collaborators<'a>) -> Self {
        Self {
            header,
            uom: collaborators.uom,
            hierarchy: collaborators.hierarchy,
            shipments: collaborators.shipments,
            handling_units: collaborators.handling_units,
            lines: IndexMap::new(),
            assignments: Vec::new(),
        }
    }

    /// Add every product storage of `hu`.
    ///
    /// # Errors
    ///
    /// See [`Self::add_product_storage`].
    pub fn add_handling_unit(&mut self, hu: &HandlingUnit) -> Result<(), ReturnsError> {
        for storage in &hu.storages {
            self.add_product_storage(storage)?;
        }
        Ok(())
    }

    /// Fold one product storage into the document.
    ///
    /// Empty storages are ignored. While the header has no ID nothing is
    /// aggregated. Otherwise the converted quantity is added to the product's
    /// line, the line is saved, the unit hierarchy is assigned to it and the
    /// unit is marked [`HuStatus::Shipped`].
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::Quantity`] if the converted quantity is not in
    /// the product's stocking UOM, and propagates conversion, hierarchy and
    /// persistence failures unchanged.
    pub fn add_product_storage(&mut self, storage: &ProductStorage) -> Result<(), ReturnsError> {
        if storage.is_empty() {
            trace!(hu_id = %storage.hu, product_id = %storage.product, "Skipping empty storage");
            return Ok(());
        }

        let Some(shipment_id) = self.header.id else {
            debug!(hu_id = %storage.hu, "Return header not saved yet, nothing to aggregate");
            return Ok(());
        };

        let stocking_uom = self.uom.stocking_uom(storage.product)?;
        let qty = self.uom.convert(storage.product, storage.qty, stocking_uom)?;

        let total = self
            .lines
            .get(&storage.product)
            .map_or_else(
                || Quantity::zero(stocking_uom),
                |line| Quantity::new(line.movement_qty, line.uom),
            )
            .checked_add(qty)?;

        let line = self.lines.entry(storage.product).or_insert_with(|| {
            debug!(product_id = %storage.product, "Creating return line");
            ShipmentLine::new(shipment_id, storage.product, stocking_uom)
        });

        line.movement_qty = total.qty();
        line.qty_entered += qty.qty();

        self.shipments.save_line(line)?;
        let line_id = line.id.ok_or_else(|| {
            ReturnsError::Persistence(format!(
                "line for product {} saved without an ID",
                storage.product
            ))
        })?;

        let assignment = TradingUnitAssignment {
            line: line_id,
            top_level: self.hierarchy.top_level_of(storage.hu)?,
            load_unit: self.hierarchy.load_unit_of(storage.hu)?,
            transport_unit: self.hierarchy.transport_unit_of(storage.hu)?,
        };
        self.shipments.save_trading_unit_assignment(&assignment)?;
        self.assignments.push(assignment);

        self.handling_units.set_status(storage.hu, HuStatus::Shipped)?;

        debug!(
            hu_id = %storage.hu,
            line_id = %line_id,
            qty = %qty.qty(),
            "Added product storage to return line"
        );
        Ok(())
    }

    /// Whether no product has been contributed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line aggregated for `product`, if any.
    #[must_use]
    pub fn line_for(&self, product: ProductId) -> Option<&ShipmentLine> {
        self.lines.get(&product)
    }

    /// Lines in first-contribution order.
    pub fn lines(&self) -> impl Iterator<Item = &ShipmentLine> {
        self.lines.values()
    }

    /// Consume the builder, yielding its lines and trading-unit assignments.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ShipmentLine>, Vec<TradingUnitAssignment>) {
        (self.lines.into_values().collect(), self.assignments)
    }
}

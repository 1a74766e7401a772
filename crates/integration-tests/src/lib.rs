//! Integration tests for HU return document assembly.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hu-returns-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `return_assembly` - Partner grouping through finished vendor returns
//! - `effective_quantities` - Effective packing values on customer shipments
//!
//! This library holds the [`Scenario`] fixture shared by the test files.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use hu_returns::memory::InMemoryWarehouse;
use hu_returns::models::HandlingUnit;
use hu_returns::{Collaborators, ReturnsConfig, ReturnsError, ReturnsService};
use hu_returns_core::{
    HandlingUnitId, HuUnitType, PartnerId, PartnerLocationId, ProductId, Quantity, ShipmentId,
    UomId, WarehouseId,
};

/// Stocking UOM used by every product in a scenario.
pub const EACH: UomId = UomId::new(100);

/// Warehouse goods are returned from.
pub const RETURN_WAREHOUSE: WarehouseId = WarehouseId::new(1);

/// Warehouse historical receipts were booked into.
pub const RECEIPT_WAREHOUSE: WarehouseId = WarehouseId::new(2);

/// An in-memory warehouse with partners, products and receipt history.
pub struct Scenario {
    /// Backing store for every collaborator.
    pub store: InMemoryWarehouse,
    /// Engine configuration.
    pub config: ReturnsConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Create an empty scenario with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: InMemoryWarehouse::new(),
            config: ReturnsConfig::default(),
        }
    }

    /// Register a partner with a ship-to location derived from its ID.
    pub fn partner(&self, raw: i32) -> PartnerId {
        let partner = PartnerId::new(raw);
        self.store
            .set_ship_to_location(partner, PartnerLocationId::new(raw * 10));
        partner
    }

    /// Register a product stocked in [`EACH`].
    pub fn product(&self, raw: i32) -> ProductId {
        let product = ProductId::new(raw);
        self.store.set_stocking_uom(product, EACH);
        product
    }

    /// Register a top-level transport unit holding `qty` of `product`.
    pub fn crate_of(&self, raw: i32, product: ProductId, qty: i64) -> HandlingUnit {
        let hu = HandlingUnit::new(HandlingUnitId::new(raw), HuUnitType::TransportUnit)
            .with_storage(product, Quantity::new(Decimal::from(qty), EACH));
        self.store.add_handling_unit(hu.clone());
        hu
    }

    /// Register an arbitrary unit.
    pub fn unit(&self, hu: HandlingUnit) -> HandlingUnit {
        self.store.add_handling_unit(hu.clone());
        hu
    }

    /// Book a historical receipt of `hus` from `partner`.
    ///
    /// # Errors
    ///
    /// Fails if a unit is unregistered or holds no product.
    pub fn received_from(
        &self,
        partner: PartnerId,
        hus: &[&HandlingUnit],
    ) -> Result<ShipmentId, ReturnsError> {
        let ids: Vec<HandlingUnitId> = hus.iter().map(|hu| hu.id).collect();
        self.store.record_receipt(
            self.config.shipment_line_table,
            partner,
            RECEIPT_WAREHOUSE,
            receipt_date(),
            &ids,
        )
    }

    /// A service wired to this scenario's store.
    #[must_use]
    pub fn service(&self) -> ReturnsService<'_> {
        ReturnsService::new(Collaborators::from_store(&self.store), &self.config)
    }
}

/// Date historical receipts were booked on.
#[must_use]
pub fn receipt_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
}

/// Date returns are shipped on.
#[must_use]
pub fn return_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 20).unwrap_or_default()
}

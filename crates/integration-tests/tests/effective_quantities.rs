//! Integration tests for effective packing values and packing-material helpers
//! on persisted shipment documents.

use assert_matches::assert_matches;
use rust_decimal::Decimal;

use hu_returns::ReturnsError;
use hu_returns::collaborators::ShipmentRepository;
use hu_returns::models::{ShipmentHeader, ShipmentLine};
use hu_returns::services::{destroy_hus, update_effective_values};
use hu_returns_core::{
    HuStatus, MovementType, PackingItemProductId, PartnerId, ProductId, ShipmentLineId,
};
use hu_returns_integration_tests::{EACH, RETURN_WAREHOUSE, Scenario, return_date};

fn customer_shipment(scenario: &Scenario) -> ShipmentHeader {
    let mut header = ShipmentHeader {
        id: None,
        partner: PartnerId::new(5),
        partner_location: None,
        warehouse: RETURN_WAREHOUSE,
        movement_date: return_date(),
        movement_type: MovementType::CustomerShipment,
    };
    scenario.store.insert_header(&mut header);
    header
}

fn packed_line(header: &ShipmentHeader, product: ProductId) -> ShipmentLine {
    let mut line = ShipmentLine::new(header.id.expect("saved"), product, EACH);
    line.qty_entered = Decimal::from(24);
    line.qty_cu_calculated = Decimal::from(20);
    line.qty_tu_calculated = Decimal::from(2);
    line.qty_tu_override = Decimal::from(3);
    line.packing_item_product_calculated = Some(PackingItemProductId::new(7));
    line.packing_item_product_override = Some(PackingItemProductId::new(8));
    line
}

fn reload(scenario: &Scenario, id: Option<ShipmentLineId>) -> ShipmentLine {
    scenario
        .store
        .find_line(id.expect("saved"))
        .expect("lookup")
        .expect("line exists")
}

// =============================================================================
// Effective Values
// =============================================================================

#[test]
fn test_manual_override_survives_save() {
    let scenario = Scenario::new();
    let header = customer_shipment(&scenario);
    let mut line = packed_line(&header, scenario.product(1));
    line.is_manual_packing_material = true;

    update_effective_values(&header, &mut line).expect("resolves");
    scenario.store.save_line(&mut line).expect("saved");

    let stored = reload(&scenario, line.id);
    assert_eq!(stored.qty_entered, Decimal::from(24));
    assert_eq!(stored.qty_entered_tu, Decimal::from(3));
    assert_eq!(stored.packing_item_product, Some(PackingItemProductId::new(8)));
}

#[test]
fn test_calculated_values_survive_save() {
    let scenario = Scenario::new();
    let header = customer_shipment(&scenario);
    let mut line = packed_line(&header, scenario.product(1));

    update_effective_values(&header, &mut line).expect("resolves");
    scenario.store.save_line(&mut line).expect("saved");

    let stored = reload(&scenario, line.id);
    assert_eq!(stored.qty_entered, Decimal::from(20));
    assert_eq!(stored.qty_entered_tu, Decimal::from(2));
    assert_eq!(stored.packing_item_product, Some(PackingItemProductId::new(7)));
}

#[test]
fn test_packaging_line_bypasses_resolution() {
    let scenario = Scenario::new();
    let header = customer_shipment(&scenario);
    let mut line = packed_line(&header, scenario.product(1));
    line.is_packaging_material = true;
    let before = line.clone();

    update_effective_values(&header, &mut line).expect("resolves");

    assert_eq!(line, before);
}

#[test]
fn test_vendor_return_line_is_rejected() {
    let scenario = Scenario::new();
    let partner = scenario.partner(10);
    let product = scenario.product(1);
    let hu = scenario.crate_of(1, product, 3);
    scenario.received_from(partner, &[&hu]).expect("receipt seeded");

    let document = scenario
        .service()
        .assemble_return_documents(&[hu], RETURN_WAREHOUSE, return_date())
        .expect("assembles")
        .expect("a document");
    let mut line = document.lines[0].clone();

    assert_matches!(
        update_effective_values(&document.header, &mut line),
        Err(ReturnsError::PreconditionViolated(_))
    );
    assert_eq!(line, document.lines[0]);
}

// =============================================================================
// Destroying Returned Units
// =============================================================================

#[test]
fn test_destroy_units_of_assembled_return() {
    let scenario = Scenario::new();
    let partner = scenario.partner(10);
    let product = scenario.product(1);
    let h1 = scenario.crate_of(1, product, 3);
    let h2 = scenario.crate_of(2, product, 4);
    scenario.received_from(partner, &[&h1, &h2]).expect("receipt seeded");

    let document = scenario
        .service()
        .assemble_return_documents(&[h1.clone(), h2.clone()], RETURN_WAREHOUSE, return_date())
        .expect("assembles")
        .expect("a document");

    let destroyed =
        destroy_hus(&scenario.store, &scenario.store, &document.header).expect("destroys");

    assert_eq!(destroyed, 2);
    assert_eq!(scenario.store.hu_status(h1.id), Some(HuStatus::Destroyed));
    assert_eq!(scenario.store.hu_status(h2.id), Some(HuStatus::Destroyed));
}

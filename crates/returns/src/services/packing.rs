//! Packing-material helpers around shipment documents.

use tracing::{debug, info, instrument, warn};

use hu_returns_core::{HuStatus, PackingInstructionId};

use crate::collaborators::{HandlingUnitStore, PackingCatalog, ShipmentRepository};
use crate::error::ReturnsError;
use crate::models::{PackingMaterialCandidate, ShipmentHeader, ShipmentLine};

/// Turn `line` into a packing-material line described by `candidate` and save it.
///
/// The order line is cleared so no invoicing is derived from packing material.
///
/// # Errors
///
/// Propagates persistence failures.
pub fn update_packing_material_line(
    shipments: &dyn ShipmentRepository,
    line: &mut ShipmentLine,
    candidate: &PackingMaterialCandidate,
) -> Result<(), ReturnsError> {
    line.material_tracking = candidate.material_tracking;
    line.product = candidate.product;
    line.uom = candidate.uom;
    line.qty_entered = candidate.qty;
    line.movement_qty = candidate.qty_in_stocking_uom;
    line.is_packaging_material = true;
    line.order_line = None;

    shipments.save_line(line)
}

/// Packing instruction of the transport units shipped on `line`.
///
/// Uses the line's packing-item-product, falling back to the one of its order
/// line. `None` (with a warning) when neither is available.
///
/// # Errors
///
/// Propagates lookup failures.
pub fn tu_packing_instruction(
    catalog: &dyn PackingCatalog,
    line: &ShipmentLine,
) -> Result<Option<PackingInstructionId>, ReturnsError> {
    let item_product = match line.packing_item_product {
        Some(item_product) => Some(item_product),
        None => {
            let order_line = match line.order_line {
                Some(id) => catalog.order_line(id)?,
                None => None,
            };
            let Some(order_line) = order_line else {
                warn!(line_id = ?line.id, "Cannot get order line from shipment line");
                return Ok(None);
            };
            order_line.packing_item_product
        }
    };

    let Some(item_product) = item_product else {
        warn!(line_id = ?line.id, "Cannot get packing item product from shipment line");
        return Ok(None);
    };

    catalog.packing_instruction_of(item_product)
}

/// Mark every unit assigned to the document as destroyed.
///
/// Returns the number of units destroyed.
///
/// # Errors
///
/// Returns [`ReturnsError::PreconditionViolated`] for an unsaved header and
/// propagates persistence failures.
#[instrument(skip(shipments, handling_units, header), fields(shipment_id = ?header.id))]
pub fn destroy_hus(
    shipments: &dyn ShipmentRepository,
    handling_units: &dyn HandlingUnitStore,
    header: &ShipmentHeader,
) -> Result<usize, ReturnsError> {
    let shipment_id = header.id.ok_or_else(|| {
        ReturnsError::PreconditionViolated(
            "cannot destroy units of an unsaved shipment".to_string(),
        )
    })?;

    let hus = shipments.assigned_handling_units(shipment_id)?;
    if hus.is_empty() {
        debug!("No units assigned, nothing to destroy");
        return Ok(0);
    }

    for hu in &hus {
        handling_units.set_status(*hu, HuStatus::Destroyed)?;
    }

    info!(hu_count = hus.len(), "Destroyed assigned units");
    Ok(hus.len())
}

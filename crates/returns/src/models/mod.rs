//! Plain value records for handling units and shipment documents.

pub mod handling_unit;
pub mod shipment;

pub use handling_unit::{AssignmentRecord, HandlingUnit, ProductStorage};
pub use shipment::{
    OrderLine, PackingMaterialCandidate, ShipmentDocument, ShipmentHeader, ShipmentLine,
    TradingUnitAssignment,
};

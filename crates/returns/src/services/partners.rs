//! Partner resolution from HU assignment history.
//!
//! A unit is traced back to the partner of every shipment line that ever
//! referenced it. Units with several such lines land in several buckets;
//! units with none are dropped with a warning.

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use hu_returns_core::{HandlingUnitId, PartnerId, TableId};

use crate::collaborators::{AssignmentHistory, ShipmentRepository};
use crate::error::ReturnsError;
use crate::models::{AssignmentRecord, HandlingUnit};

/// Handling units grouped by originating partner.
///
/// Partners iterate in first-discovery order; units within a bucket keep the
/// order their assignments were found in, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerBuckets {
    buckets: IndexMap<PartnerId, Vec<HandlingUnit>>,
}

impl PartnerBuckets {
    /// Append `hu` to the bucket of `partner`.
    pub fn push(&mut self, partner: PartnerId, hu: HandlingUnit) {
        self.buckets.entry(partner).or_default().push(hu);
    }

    /// Number of distinct partners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no unit resolved to any partner.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Units resolved to `partner`.
    #[must_use]
    pub fn get(&self, partner: PartnerId) -> Option<&[HandlingUnit]> {
        self.buckets.get(&partner).map(Vec::as_slice)
    }

    /// Partners in discovery order.
    pub fn partners(&self) -> impl Iterator<Item = PartnerId> + '_ {
        self.buckets.keys().copied()
    }

    /// Buckets in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (PartnerId, &[HandlingUnit])> {
        self.buckets
            .iter()
            .map(|(partner, hus)| (*partner, hus.as_slice()))
    }
}

/// Resolves the originating partner(s) of handling units.
pub struct PartnerResolver<'a> {
    history: &'a dyn AssignmentHistory,
    shipments: &'a dyn ShipmentRepository,
    shipment_line_table: TableId,
}

impl<'a> PartnerResolver<'a> {
    /// Create a resolver reading assignments owned by `shipment_line_table`.
    #[must_use]
    pub fn new(
        history: &'a dyn AssignmentHistory,
        shipments: &'a dyn ShipmentRepository,
        shipment_line_table: TableId,
    ) -> Self {
        Self {
            history,
            shipments,
            shipment_line_table,
        }
    }

    /// Partners of every shipment line that referenced `hu`, one entry per
    /// assignment, in history order.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures. Dangling assignments are skipped.
    pub fn partners_of(&self, hu: HandlingUnitId) -> Result<Vec<PartnerId>, ReturnsError> {
        let assignments = self.history.assignments_for(self.shipment_line_table, hu)?;

        let mut partners = Vec::with_capacity(assignments.len());
        for assignment in &assignments {
            if let Some(partner) = self.partner_of_assignment(assignment)? {
                partners.push(partner);
            }
        }
        Ok(partners)
    }

    fn partner_of_assignment(
        &self,
        assignment: &AssignmentRecord,
    ) -> Result<Option<PartnerId>, ReturnsError> {
        let line_id = assignment.record.as_shipment_line();
        let Some(line) = self.shipments.find_line(line_id)? else {
            warn!(hu_id = %assignment.hu, line_id = %line_id, "Assigned shipment line not found");
            return Ok(None);
        };
        let Some(header) = self.shipments.find_header(line.document)? else {
            warn!(
                hu_id = %assignment.hu,
                shipment_id = %line.document,
                "Shipment of assigned line not found"
            );
            return Ok(None);
        };
        Ok(Some(header.partner))
    }

    /// Group units by originating partner.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    #[instrument(skip(self, hus), fields(hu_count = hus.len()))]
    pub fn group(&self, hus: &[HandlingUnit]) -> Result<PartnerBuckets, ReturnsError> {
        let mut buckets = PartnerBuckets::default();

        for hu in hus {
            let partners = self.partners_of(hu.id)?;
            if partners.is_empty() {
                warn!(hu_id = %hu.id, "No partner found in assignment history, skipping unit");
                continue;
            }
            for partner in partners {
                debug!(hu_id = %hu.id, partner_id = %partner, "Resolved partner");
                buckets.push(partner, hu.clone());
            }
        }

        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use rust_decimal::Decimal;

    use hu_returns_core::{HuUnitType, MovementType, ProductId, Quantity, UomId, WarehouseId};

    use super::*;
    use crate::memory::InMemoryWarehouse;
    use crate::models::{ShipmentHeader, ShipmentLine};

    const LINE_TABLE: TableId = TableId::new(320);

    fn receipt(store: &InMemoryWarehouse, partner: i32, hus: &[HandlingUnitId]) {
        store.record_receipt(
            LINE_TABLE,
            PartnerId::new(partner),
            WarehouseId::new(1),
            NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            hus,
        )
        .expect("receipt seeded");
    }

    fn unit(store: &InMemoryWarehouse, raw: i32) -> HandlingUnit {
        store.set_stocking_uom(ProductId::new(1), UomId::new(1));
        let hu = HandlingUnit::new(HandlingUnitId::new(raw), HuUnitType::TransportUnit)
            .with_storage(ProductId::new(1), Quantity::new(Decimal::ONE, UomId::new(1)));
        store.add_handling_unit(hu.clone());
        hu
    }

    #[test]
    fn test_unit_with_two_partners_lands_in_both_buckets() {
        let store = InMemoryWarehouse::new();
        let h1 = unit(&store, 1);
        let h2 = unit(&store, 2);
        receipt(&store, 10, &[h1.id]);
        receipt(&store, 20, &[h1.id, h2.id]);

        let resolver = PartnerResolver::new(&store, &store, LINE_TABLE);
        let buckets = resolver.group(&[h1.clone(), h2.clone()]).expect("groups");

        assert_eq!(buckets.len(), 2);
        assert_eq!(
            buckets.partners().collect::<Vec<_>>(),
            vec![PartnerId::new(10), PartnerId::new(20)]
        );
        assert_eq!(buckets.get(PartnerId::new(10)), Some(&[h1.clone()][..]));
        assert_eq!(buckets.get(PartnerId::new(20)), Some(&[h1, h2][..]));
    }

    #[test]
    fn test_unit_without_history_is_dropped() {
        let store = InMemoryWarehouse::new();
        let orphan = unit(&store, 1);

        let resolver = PartnerResolver::new(&store, &store, LINE_TABLE);
        let buckets = resolver.group(&[orphan]).expect("groups");

        assert!(buckets.is_empty());
    }

    #[test]
    fn test_repeat_assignments_to_same_partner_are_kept() {
        let store = InMemoryWarehouse::new();
        let h1 = unit(&store, 1);
        receipt(&store, 10, &[h1.id]);
        receipt(&store, 10, &[h1.id]);

        let resolver = PartnerResolver::new(&store, &store, LINE_TABLE);
        let buckets = resolver.group(&[h1]).expect("groups");

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get(PartnerId::new(10)).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_assignments_of_other_tables_are_ignored() {
        let store = InMemoryWarehouse::new();
        let h1 = unit(&store, 1);
        store.record_receipt(
            TableId::new(999),
            PartnerId::new(10),
            WarehouseId::new(1),
            NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            &[h1.id],
        )
        .expect("receipt seeded");

        let resolver = PartnerResolver::new(&store, &store, LINE_TABLE);
        assert!(resolver.partners_of(h1.id).expect("resolves").is_empty());
    }

    #[test]
    fn test_dangling_assignment_is_skipped() {
        let store = InMemoryWarehouse::new();
        let h1 = unit(&store, 1);
        let mut header = ShipmentHeader {
            id: None,
            partner: PartnerId::new(10),
            partner_location: None,
            warehouse: WarehouseId::new(1),
            movement_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            movement_type: MovementType::VendorReceipts,
        };
        store.insert_header(&mut header);
        let shipment = header.id.expect("saved");
        let mut line = ShipmentLine::new(shipment, ProductId::new(1), UomId::new(1));
        store.insert_line(&mut line);
        let line_id = line.id.expect("saved");
        store.record_assignment(LINE_TABLE, line_id.into(), h1.id);
        store.record_assignment(LINE_TABLE, hu_returns_core::RecordId::new(4242), h1.id);

        let resolver = PartnerResolver::new(&store, &store, LINE_TABLE);
        assert_eq!(
            resolver.partners_of(h1.id).expect("resolves"),
            vec![PartnerId::new(10)]
        );
    }
}

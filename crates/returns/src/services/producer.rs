//! Vendor-return document assembly.
//!
//! [`ReturnsService`] groups the requested units by originating partner and
//! runs one [`ReturnDocumentProducer`] per partner. Every document is saved
//! on its own; callers needing all-or-nothing must wrap the run in one
//! transaction.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use hu_returns_core::{HandlingUnitId, PartnerId, TableId, WarehouseId};

use crate::collaborators::Collaborators;
use crate::config::ReturnsConfig;
use crate::error::ReturnsError;
use crate::models::{HandlingUnit, ShipmentDocument, ShipmentHeader};
use crate::services::lines::ReturnLinesBuilder;
use crate::services::partners::{PartnerBuckets, PartnerResolver};

/// Creates the vendor-return document for one partner.
pub struct ReturnDocumentProducer<'a> {
    collaborators: Collaborators<'a>,
    partner: PartnerId,
    warehouse: WarehouseId,
    movement_date: NaiveDate,
}

impl<'a> ReturnDocumentProducer<'a> {
    /// Create a producer for `partner`.
    #[must_use]
    pub const fn new(
        collaborators: Collaborators<'a>,
        partner: PartnerId,
        warehouse: WarehouseId,
        movement_date: NaiveDate,
    ) -> Self {
        Self {
            collaborators,
            partner,
            warehouse,
            movement_date,
        }
    }

    /// Build and save the document for `hus`.
    ///
    /// Each distinct unit is fed to the line builder once, however often it
    /// appears in `hus`.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::NoShipToLocation`] if the partner has no
    /// ship-to location, and propagates every other collaborator failure.
    #[instrument(skip(self, hus), fields(partner_id = %self.partner, hu_count = hus.len()))]
    pub fn create(&self, hus: &[HandlingUnit]) -> Result<ShipmentDocument, ReturnsError> {
        let ship_to = self.collaborators.partners.ship_to_location(self.partner)?;

        let mut header = ShipmentHeader::vendor_return(
            self.partner,
            ship_to,
            self.warehouse,
            self.movement_date,
        );
        self.collaborators.shipments.save_header(&mut header)?;

        let mut builder = ReturnLinesBuilder::new(&header, &self.collaborators);
        let mut fed: HashSet<HandlingUnitId> = HashSet::with_capacity(hus.len());
        for hu in hus {
            if !fed.insert(hu.id) {
                debug!(hu_id = %hu.id, "Unit already added to this return, skipping repeat");
                continue;
            }
            builder.add_handling_unit(hu)?;
        }
        if builder.is_empty() {
            info!("No product storage contributed, return has no lines");
        }
        let (lines, trading_unit_assignments) = builder.into_parts();

        self.collaborators.shipments.save_header(&mut header)?;

        info!(
            shipment_id = ?header.id,
            line_count = lines.len(),
            "Created vendor return"
        );

        Ok(ShipmentDocument {
            header,
            lines,
            trading_unit_assignments,
            assigned_handling_units: Vec::new(),
        })
    }
}

/// Documents created by one assembly run, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnAssembly {
    documents: Vec<ShipmentDocument>,
}

impl ReturnAssembly {
    /// All documents, in creation order.
    #[must_use]
    pub fn documents(&self) -> &[ShipmentDocument] {
        &self.documents
    }

    /// The last document created. It carries the link to the full unit set.
    #[must_use]
    pub fn last_created(&self) -> Option<&ShipmentDocument> {
        self.documents.last()
    }

    /// The document created for `partner`, if any.
    #[must_use]
    pub fn for_partner(&self, partner: PartnerId) -> Option<&ShipmentDocument> {
        self.documents
            .iter()
            .find(|document| document.header.partner == partner)
    }

    /// Number of documents created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Consume the assembly, yielding its documents.
    #[must_use]
    pub fn into_documents(self) -> Vec<ShipmentDocument> {
        self.documents
    }
}

/// Entry point for turning a set of handling units into vendor returns.
pub struct ReturnsService<'a> {
    collaborators: Collaborators<'a>,
    shipment_line_table: TableId,
}

impl<'a> ReturnsService<'a> {
    /// Create a service working against `collaborators`.
    #[must_use]
    pub const fn new(collaborators: Collaborators<'a>, config: &ReturnsConfig) -> Self {
        Self {
            collaborators,
            shipment_line_table: config.shipment_line_table,
        }
    }

    /// Group `hus` by the partner(s) they were received from.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    pub fn group_by_partner(&self, hus: &[HandlingUnit]) -> Result<PartnerBuckets, ReturnsError> {
        PartnerResolver::new(
            self.collaborators.history,
            self.collaborators.shipments,
            self.shipment_line_table,
        )
        .group(hus)
    }

    /// Create one vendor return per originating partner.
    ///
    /// Units without a resolvable partner are left out. The full `hus` set is
    /// linked to the last document created.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::PreconditionViolated`] if `hus` is empty, and
    /// propagates the first collaborator failure. Documents saved before the
    /// failure are not rolled back here.
    #[instrument(skip(self, hus), fields(run_id = %Uuid::new_v4(), hu_count = hus.len()))]
    pub fn assemble(
        &self,
        hus: &[HandlingUnit],
        warehouse: WarehouseId,
        movement_date: NaiveDate,
    ) -> Result<ReturnAssembly, ReturnsError> {
        if hus.is_empty() {
            return Err(ReturnsError::PreconditionViolated(
                "no handling units given for return".to_string(),
            ));
        }

        let buckets = self.group_by_partner(hus)?;

        let mut documents = Vec::with_capacity(buckets.len());
        for (partner, partner_hus) in buckets.iter() {
            let producer =
                ReturnDocumentProducer::new(self.collaborators, partner, warehouse, movement_date);
            documents.push(producer.create(partner_hus)?);
        }

        if let Some(last) = documents.last_mut() {
            let all_hus: Vec<HandlingUnitId> = hus.iter().map(|hu| hu.id).collect();
            let shipment_id = last.header.id.ok_or_else(|| {
                ReturnsError::Persistence("return header saved without an ID".to_string())
            })?;
            self.collaborators
                .shipments
                .set_assigned_handling_units(shipment_id, &all_hus)?;
            last.assigned_handling_units = all_hus;
        }

        info!(document_count = documents.len(), "Assembled vendor returns");
        Ok(ReturnAssembly { documents })
    }

    /// Create the vendor returns and hand back only the last one created.
    ///
    /// `None` if no unit could be traced to a partner.
    ///
    /// # Errors
    ///
    /// Same as [`Self::assemble`].
    pub fn assemble_return_documents(
        &self,
        hus: &[HandlingUnit],
        warehouse: WarehouseId,
        movement_date: NaiveDate,
    ) -> Result<Option<ShipmentDocument>, ReturnsError> {
        let assembly = self.assemble(hus, warehouse, movement_date)?;
        Ok(assembly.into_documents().pop())
    }
}

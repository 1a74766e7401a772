//! Handling unit models: the physical containers being returned.

use hu_returns_core::{
    HandlingUnitId, HuStatus, HuUnitType, ProductId, Quantity, RecordId, TableId,
};
use serde::{Deserialize, Serialize};

/// A handling unit - a node in a tree of nested physical containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingUnit {
    /// Unique HU ID.
    pub id: HandlingUnitId,
    /// Lifecycle status.
    pub status: HuStatus,
    /// Role of this unit in its containment tree.
    pub unit_type: HuUnitType,
    /// Containing unit, `None` for top-level units.
    pub parent: Option<HandlingUnitId>,
    /// Products currently held directly by this unit.
    pub storages: Vec<ProductStorage>,
}

impl HandlingUnit {
    /// Create an active, top-level unit with no contents.
    #[must_use]
    pub const fn new(id: HandlingUnitId, unit_type: HuUnitType) -> Self {
        Self {
            id,
            status: HuStatus::Active,
            unit_type,
            parent: None,
            storages: Vec::new(),
        }
    }

    /// Nest this unit inside `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: HandlingUnitId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add a product storage entry held by this unit.
    #[must_use]
    pub fn with_storage(mut self, product: ProductId, qty: Quantity) -> Self {
        self.storages.push(ProductStorage {
            hu: self.id,
            product,
            qty,
        });
        self
    }

    /// Whether this unit has no parent.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Snapshot of how much of one product a handling unit holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStorage {
    /// Unit holding the product.
    pub hu: HandlingUnitId,
    /// Product held.
    pub product: ProductId,
    /// Quantity held, in whatever UOM the unit tracks it.
    pub qty: Quantity,
}

impl ProductStorage {
    /// Whether nothing of the product is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.qty.is_zero()
    }
}

/// Historical fact: a row of some table referenced this handling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Owning table.
    pub table: TableId,
    /// Owning row within that table.
    pub record: RecordId,
    /// Referenced unit.
    pub hu: HandlingUnitId,
}

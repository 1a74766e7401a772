//! HU containment tree resolution.
//!
//! Load and transport units are roles found by walking parent links:
//! - the loading unit is the root, if the root is a [`HuUnitType::LoadUnit`]
//! - the transport unit is the unit itself or its nearest ancestor typed
//!   [`HuUnitType::TransportUnit`]

use std::collections::HashMap;

use hu_returns_core::{HandlingUnitId, HuUnitType};

use crate::collaborators::HuHierarchy;
use crate::error::ReturnsError;
use crate::models::HandlingUnit;

#[derive(Debug, Clone, Copy)]
struct HuNode {
    parent: Option<HandlingUnitId>,
    unit_type: HuUnitType,
}

/// Parent-link snapshot of a set of handling units.
#[derive(Debug, Clone, Default)]
pub struct HuTree {
    nodes: HashMap<HandlingUnitId, HuNode>,
}

impl HuTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a set of units.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a HandlingUnit>) -> Self {
        let mut tree = Self::new();
        for hu in units {
            tree.insert(hu);
        }
        tree
    }

    /// Add or replace a unit.
    pub fn insert(&mut self, hu: &HandlingUnit) {
        self.nodes.insert(
            hu.id,
            HuNode {
                parent: hu.parent,
                unit_type: hu.unit_type,
            },
        );
    }

    /// Number of known units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, hu: HandlingUnitId) -> Result<HuNode, ReturnsError> {
        self.nodes.get(&hu).copied().ok_or(ReturnsError::NotFound {
            entity: "handling unit",
            id: hu.as_i32(),
        })
    }

    /// `hu` followed by its ancestors, root last.
    fn ancestry(
        &self,
        hu: HandlingUnitId,
    ) -> Result<Vec<(HandlingUnitId, HuUnitType)>, ReturnsError> {
        let mut path = Vec::new();
        let mut current = Some(hu);
        while let Some(id) = current {
            if path.len() > self.nodes.len() {
                return Err(ReturnsError::HierarchyCycle(hu));
            }
            let node = self.node(id)?;
            path.push((id, node.unit_type));
            current = node.parent;
        }
        Ok(path)
    }
}

impl HuHierarchy for HuTree {
    fn top_level_of(&self, hu: HandlingUnitId) -> Result<HandlingUnitId, ReturnsError> {
        let path = self.ancestry(hu)?;
        Ok(path.last().map_or(hu, |(id, _)| *id))
    }

    fn load_unit_of(&self, hu: HandlingUnitId) -> Result<Option<HandlingUnitId>, ReturnsError> {
        let path = self.ancestry(hu)?;
        Ok(path
            .last()
            .filter(|(_, unit_type)| *unit_type == HuUnitType::LoadUnit)
            .map(|(id, _)| *id))
    }

    fn transport_unit_of(
        &self,
        hu: HandlingUnitId,
    ) -> Result<Option<HandlingUnitId>, ReturnsError> {
        let path = self.ancestry(hu)?;
        Ok(path
            .iter()
            .find(|(_, unit_type)| *unit_type == HuUnitType::TransportUnit)
            .map(|(id, _)| *id))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn id(raw: i32) -> HandlingUnitId {
        HandlingUnitId::new(raw)
    }

    /// Pallet 1 -> crate 2 -> virtual 3; loose crate 4; loose virtual 5.
    fn tree() -> HuTree {
        HuTree::from_units(&[
            HandlingUnit::new(id(1), HuUnitType::LoadUnit),
            HandlingUnit::new(id(2), HuUnitType::TransportUnit).with_parent(id(1)),
            HandlingUnit::new(id(3), HuUnitType::Virtual).with_parent(id(2)),
            HandlingUnit::new(id(4), HuUnitType::TransportUnit),
            HandlingUnit::new(id(5), HuUnitType::Virtual),
        ])
    }

    #[test]
    fn test_nested_virtual_unit() {
        let tree = tree();
        assert_eq!(tree.top_level_of(id(3)).expect("resolves"), id(1));
        assert_eq!(tree.load_unit_of(id(3)).expect("resolves"), Some(id(1)));
        assert_eq!(tree.transport_unit_of(id(3)).expect("resolves"), Some(id(2)));
    }

    #[test]
    fn test_transport_unit_is_its_own_transport_unit() {
        let tree = tree();
        assert_eq!(tree.transport_unit_of(id(2)).expect("resolves"), Some(id(2)));
        assert_eq!(tree.top_level_of(id(4)).expect("resolves"), id(4));
        assert_eq!(tree.load_unit_of(id(4)).expect("resolves"), None);
    }

    #[test]
    fn test_loose_virtual_unit_has_no_roles() {
        let tree = tree();
        assert_eq!(tree.top_level_of(id(5)).expect("resolves"), id(5));
        assert_eq!(tree.load_unit_of(id(5)).expect("resolves"), None);
        assert_eq!(tree.transport_unit_of(id(5)).expect("resolves"), None);
    }

    #[test]
    fn test_unknown_unit() {
        assert_matches!(
            tree().top_level_of(id(99)),
            Err(ReturnsError::NotFound { id: 99, .. })
        );
    }

    #[test]
    fn test_cycle_detected() {
        let tree = HuTree::from_units(&[
            HandlingUnit::new(id(1), HuUnitType::TransportUnit).with_parent(id(2)),
            HandlingUnit::new(id(2), HuUnitType::LoadUnit).with_parent(id(1)),
        ]);
        assert_matches!(tree.top_level_of(id(1)), Err(ReturnsError::HierarchyCycle(_)));
    }
}

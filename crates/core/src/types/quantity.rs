//! Type-safe quantity representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::UomId;

/// Errors that can occur when combining [`Quantity`] values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The operands are expressed in different units of measure.
    #[error("cannot combine quantities in UOM {left} and UOM {right}")]
    UomMismatch {
        /// UOM of the left operand.
        left: UomId,
        /// UOM of the right operand.
        right: UomId,
    },
}

/// A quantity expressed in a unit of measure.
///
/// ## Examples
///
/// ```
/// use hu_returns_core::{Quantity, UomId};
/// use rust_decimal::Decimal;
///
/// let each = UomId::new(100);
/// let five = Quantity::new(Decimal::from(5), each);
/// let three = Quantity::new(Decimal::from(3), each);
///
/// assert_eq!(five.checked_add(three).unwrap().qty(), Decimal::from(8));
/// assert!(Quantity::zero(each).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    qty: Decimal,
    uom: UomId,
}

impl Quantity {
    /// Create a new quantity.
    #[must_use]
    pub const fn new(qty: Decimal, uom: UomId) -> Self {
        Self { qty, uom }
    }

    /// A zero quantity in the given UOM.
    #[must_use]
    pub const fn zero(uom: UomId) -> Self {
        Self {
            qty: Decimal::ZERO,
            uom,
        }
    }

    /// The numeric amount.
    #[must_use]
    pub const fn qty(&self) -> Decimal {
        self.qty
    }

    /// The unit of measure.
    #[must_use]
    pub const fn uom(&self) -> UomId {
        self.uom
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.qty.is_zero()
    }

    /// Add two quantities in the same UOM.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::UomMismatch`] if the UOMs differ.
    pub fn checked_add(self, other: Self) -> Result<Self, QuantityError> {
        if self.uom != other.uom {
            return Err(QuantityError::UomMismatch {
                left: self.uom,
                right: other.uom,
            });
        }
        Ok(Self {
            qty: self.qty + other.qty,
            uom: self.uom,
        })
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (uom {})", self.qty, self.uom)
    }
}

//! Error types for return-document assembly.

use hu_returns_core::{HandlingUnitId, PartnerId, ProductId, QuantityError, UomId};
use thiserror::Error;

/// Errors raised by the assembly engine and its collaborators.
#[derive(Debug, Error)]
pub enum ReturnsError {
    /// A caller broke an operation's contract. Never retried.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// The partner has no default ship-to location configured.
    #[error("partner {0} has no ship-to location")]
    NoShipToLocation(PartnerId),

    /// No conversion exists between the two units for this product.
    #[error("cannot convert product {product} from UOM {from} to UOM {to}")]
    IncompatibleUom {
        /// Product being converted.
        product: ProductId,
        /// Source UOM.
        from: UomId,
        /// Target UOM.
        to: UomId,
    },

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity.
        entity: &'static str,
        /// Raw identifier.
        id: i32,
    },

    /// The parent links of a handling unit loop back on themselves.
    #[error("handling unit {0} is part of a parent-link cycle")]
    HierarchyCycle(HandlingUnitId),

    /// The persistence collaborator failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Quantity arithmetic failed.
    #[error("quantity error: {0}")]
    Quantity(#[from] QuantityError),
}

//! Core types for handling-unit returns.
//!
//! This module provides type-safe wrappers for common warehouse concepts.

pub mod id;
pub mod quantity;
pub mod status;

pub use id::*;
pub use quantity::{Quantity, QuantityError};
pub use status::*;

//! HU Returns Core - Shared types library.
//!
//! This crate provides the value types used by the return-document engine:
//! - `hu-returns` - Partner resolution, document and line assembly
//! - `integration-tests` - End-to-end assembly scenarios
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no lookups.
//! This keeps it lightweight and allows it to be used by any collaborator
//! implementation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, quantities and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

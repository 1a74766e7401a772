//! HU Returns - Vendor-return assembly from handling units.
//!
//! Given a set of handling units, this crate traces each unit back to the
//! partner(s) it was received from, creates one vendor-return document per
//! partner and folds the units' contents into one line per product, linking
//! every line to the unit hierarchy it ships and marking the units shipped.
//!
//! # Architecture
//!
//! The engine owns no storage. Every lookup and write goes through the
//! collaborator traits in [`collaborators`], injected per run via
//! [`Collaborators`]. [`memory::InMemoryWarehouse`] implements all of them.
//!
//! # Modules
//!
//! - [`models`] - Handling unit and shipment document records
//! - [`collaborators`] - Contracts of the external systems
//! - [`hierarchy`] - HU containment tree resolution
//! - [`services`] - Partner grouping, document and line assembly, effective values
//! - [`memory`] - In-memory collaborator implementation
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing subscriber setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collaborators;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod memory;
pub mod models;
pub mod services;
pub mod telemetry;

pub use collaborators::Collaborators;
pub use config::{ConfigError, LogFormat, ReturnsConfig};
pub use error::ReturnsError;
pub use hierarchy::HuTree;
pub use services::{ReturnAssembly, ReturnDocumentProducer, ReturnLinesBuilder, ReturnsService};

//! Return-document assembly services.
//!
//! - [`partners`] - Partner resolution and grouping from assignment history
//! - [`producer`] - Per-partner document creation and the multi-partner run
//! - [`lines`] - Per-product line aggregation
//! - [`effective`] - Effective packing values of shipment lines
//! - [`packing`] - Packing-material line updates, PI lookup, HU destruction

pub mod effective;
pub mod lines;
pub mod packing;
pub mod partners;
pub mod producer;

pub use effective::{EffectiveValues, update_effective_values};
pub use lines::ReturnLinesBuilder;
pub use packing::{destroy_hus, tu_packing_instruction, update_packing_material_line};
pub use partners::{PartnerBuckets, PartnerResolver};
pub use producer::{ReturnAssembly, ReturnDocumentProducer, ReturnsService};

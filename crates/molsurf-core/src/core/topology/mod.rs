//! # Topology Module
//!
//! Group naming knowledge shared by the structure model.
//!
//! - [`registry`] - Instance-scoped interning of group (residue) names

pub mod registry;

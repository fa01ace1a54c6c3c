//! # Core Module
//!
//! The foundation of molsurf: the structure model, the spatial index over atom
//! positions and geodesic sphere sampling.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, groups, chains, bonds and the system
//! - **Group Naming** ([`topology`]) - Instance-scoped group-name registry
//! - **Spatial Indexing** ([`spatial`]) - Per-model partition trees and sphere-range cursors
//! - **Sphere Sampling** ([`geodesic`]) - Icosahedral subdivision and visibility bitmaps
//! - **Utilities** ([`utils`]) - Element radii and small geometric helpers
//!
//! Nothing in this layer is configurable or stateful beyond the data it holds;
//! the passes that infer bonds and surfaces live in [`crate::engine`].

pub mod geodesic;
pub mod models;
pub mod spatial;
pub mod topology;
pub mod utils;

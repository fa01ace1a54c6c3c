//! # Workflows Module
//!
//! High-level entry points that run the engine passes over a structure in
//! the right order.
//!
//! - **Annotation Workflow** ([`annotate`]) - Bonding, hydrogen bonds,
//!   secondary structure and the molecular surface in one call

pub mod annotate;

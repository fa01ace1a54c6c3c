//! # Engine Module
//!
//! The passes that turn a bare set of positioned atoms into an annotated
//! structure: covalent bonds, backbone hydrogen bonds, secondary structure
//! and the solvent-excluded surface.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Per-pass settings, TOML input and a validating builder
//! - **Error Handling** ([`error`]) - Engine error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based phase and task events
//! - **Covalent Bonding** ([`bonding`]) - Distance-based bond inference over the spatial index
//! - **Hydrogen Bonds** ([`hbonds`]) - Electrostatic N-H···O=C detection between amino monomers
//! - **Secondary Structure** ([`secondary`]) - Helix, sheet and turn assignment from backbone torsions
//! - **Molecular Surface** ([`surface`]) - Convex bitmaps, saddle tori and concave cavities
//!
//! Every pass is single-threaded. Engines that keep scratch buffers take
//! `&mut self`, so a pass always runs to completion before the next starts on
//! the same instance.

pub mod bonding;
pub mod config;
pub mod error;
pub mod hbonds;
pub mod progress;
pub mod secondary;
pub mod surface;

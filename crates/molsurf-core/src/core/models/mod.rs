//! # Core Models Module
//!
//! Data structures describing a molecular structure as the spatial, bonding and
//! surface engines see it.
//!
//! ## Overview
//!
//! A [`system::MolecularSystem`] owns every atom by stable index, the groups
//! (residues) and chains that organize them, and the bond list. Groups are
//! classified into a [`monomer::MonomerKind`] once all atoms are in place, and
//! consecutive monomers of one kind form a [`monomer::Polymer`].
//!
//! ## Key Components
//!
//! - [`atom`] - Atom position, element and radii
//! - [`group`] - Residue-like groups and their atom-name lookup
//! - [`chain`] - Chains of groups within one model
//! - [`monomer`] - Monomer kinds and polymers
//! - [`system`] - The complete structure, bonds and the lazily built spatial index
//! - [`topology`] - Bond orders and bonds
//! - [`ids`] - Identifier types for groups and chains
//!
//! ## Usage
//!
//! ```ignore
//! use molsurf::core::models::{atom::Atom, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain(0, 'A');
//! let group_id = system.add_group(chain_id, 1, "ALA")?;
//! system.add_atom_to_group(group_id, Atom::new("CA", "C", Point3::origin()))?;
//! system.finalize();
//! ```

pub mod atom;
pub mod chain;
pub mod group;
pub mod ids;
pub mod monomer;
pub mod system;
pub mod topology;

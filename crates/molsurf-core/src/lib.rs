//! # molsurf
//!
//! The geometry core of a molecular viewer: proximity search over atom
//! positions, bond inference from geometry alone and Connolly-style
//! solvent-excluded surfaces.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** The structure model (`MolecularSystem`), the
//!   per-model spatial index with its reusable sphere cursor, geodesic sphere
//!   sampling and static element data.
//!
//! - **[`engine`]: The Logic Core.** Configurable passes over a system:
//!   `AutoBonder`, `HydrogenBondDetector`, helix assignment and the
//!   `SurfaceEngine`.
//!
//! - **[`workflows`]: The Public API.** Runs the passes in order over one
//!   structure and reports progress along the way.
//!
//! Reading structure files, projecting to the screen and rendering are left to
//! the caller; this crate consumes atoms and produces bonds, bitmaps, tori and
//! cavities.

pub mod core;
pub mod engine;
pub mod workflows;

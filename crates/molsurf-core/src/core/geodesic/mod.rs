//! # Geodesic Sampling Module
//!
//! Near-uniform sample directions on the unit sphere and the per-atom bitmaps
//! that record which of those directions survive occlusion.
//!
//! ## Overview
//!
//! A [`sphere::GeodesicSphere`] starts from the twelve vertices of an icosahedron
//! and repeatedly splits each triangular face into four, inserting one
//! normalized midpoint per edge. Levels are nested: the vertices of level `n`
//! are the first vertices of level `n + 1`, which lets a single
//! [`bitmap::VisibilityBitmap`] serve every resolution up to the one it was
//! computed at.
//!
//! | Level | Vertices |
//! |-------|----------|
//! | 0     | 12       |
//! | 1     | 42       |
//! | 2     | 162      |
//! | 3     | 642      |
//! | 4     | 2562     |

pub mod bitmap;
pub mod sphere;

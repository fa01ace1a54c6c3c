//! # Spatial Index Module
//!
//! Sub-linear sphere-range queries over atom positions.
//!
//! ## Overview
//!
//! Positions are partitioned per model: a [`forest::SpatialForest`] owns one
//! [`bspt::Bspt`] (binary space partition tree) for each model index that has
//! atoms. Queries run through a [`cursor::SphereCursor`], a lazy iterator that
//! can be re-initialized for the next query without reallocating.
//!
//! ## Query Contract
//!
//! - A range query yields every point `P` of the model with
//!   `|P - center|² < radius²`, in unspecified order.
//! - A hemisphere query additionally requires `P` to sort after the query
//!   origin by `(x, y, z, index)`, so scanning every atom with a hemisphere
//!   query visits each unordered pair exactly once.
//!
//! The index is read-mostly. The owning structure drops it on any atom
//! mutation and rebuilds it on the next query.

pub mod bspt;
pub mod cursor;
pub mod forest;
pub mod point;

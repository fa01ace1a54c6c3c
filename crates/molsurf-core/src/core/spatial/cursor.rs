use super::bspt::{Bspt, Element};
use super::forest::SpatialForest;
use super::point::IndexedPoint;
use nalgebra::Point3;
use std::cmp::Ordering;

/// A reusable sphere-range traversal over one model of a [`SpatialForest`].
///
/// The cursor walks the partition lazily with an explicit stack, so a query
/// that stops early never visits the rest of the tree. Re-initializing a cursor
/// keeps its stack allocation, which makes it cheap to run one query per atom.
///
/// A point `P` is yielded when `|P - center|² < radius²` (strict). In
/// hemisphere mode only points ordered after the query origin by
/// [`IndexedPoint::global_cmp`] are yielded.
#[derive(Debug, Clone)]
pub struct SphereCursor<'a> {
    forest: &'a SpatialForest,
    tree: Option<&'a Bspt>,
    stack: Vec<usize>,
    leaf: Option<usize>,
    leaf_position: usize,
    center: Point3<f64>,
    radius: f64,
    radius2: f64,
    hemisphere_origin: Option<IndexedPoint>,
    found_distance2: f64,
}

impl<'a> SphereCursor<'a> {
    /// Creates a cursor that yields nothing until initialized.
    pub fn new(forest: &'a SpatialForest) -> Self {
        Self {
            forest,
            tree: None,
            stack: Vec::new(),
            leaf: None,
            leaf_position: 0,
            center: Point3::origin(),
            radius: 0.0,
            radius2: 0.0,
            hemisphere_origin: None,
            found_distance2: 0.0,
        }
    }

    /// Binds the cursor to a full-sphere query in `model_index`.
    pub fn initialize(&mut self, model_index: usize, center: &Point3<f64>, radius: f64) {
        self.hemisphere_origin = None;
        self.reset(model_index, center, radius);
    }

    /// Binds the cursor to a hemisphere query around `origin` in `model_index`.
    pub fn initialize_hemisphere(&mut self, model_index: usize, origin: &IndexedPoint, radius: f64) {
        self.hemisphere_origin = Some(*origin);
        self.reset(model_index, &origin.position, radius);
    }

    /// Squared distance from the query center to the most recently yielded point.
    pub fn found_distance2(&self) -> f64 {
        self.found_distance2
    }

    fn reset(&mut self, model_index: usize, center: &Point3<f64>, radius: f64) {
        self.stack.clear();
        self.leaf = None;
        self.leaf_position = 0;
        self.center = *center;
        self.radius = radius;
        self.radius2 = radius * radius;
        self.found_distance2 = 0.0;

        // NaN and negative radii match nothing.
        self.tree = if radius >= 0.0 {
            self.forest.tree(model_index)
        } else {
            None
        };
        if self.tree.is_some() {
            self.stack.push(Bspt::ROOT);
        }
    }

    fn accepts(&mut self, point: &IndexedPoint) -> bool {
        if let Some(origin) = &self.hemisphere_origin {
            if point.global_cmp(origin) != Ordering::Greater {
                return false;
            }
        }
        let d2 = point.distance_squared(&self.center);
        if d2 < self.radius2 {
            self.found_distance2 = d2;
            true
        } else {
            false
        }
    }

    /// Whether the `le` side of a split can hold a point the query accepts.
    ///
    /// In hemisphere mode an x split whose pivot lies strictly below the
    /// origin only holds points ordered before it.
    fn visits_lower(&self, axis: usize, pivot: f64) -> bool {
        if self.center[axis] - self.radius > pivot {
            return false;
        }
        match &self.hemisphere_origin {
            Some(origin) if axis == 0 => pivot >= origin.position.x,
            _ => true,
        }
    }
}

impl<'a> Iterator for SphereCursor<'a> {
    type Item = &'a IndexedPoint;

    fn next(&mut self) -> Option<&'a IndexedPoint> {
        let tree = self.tree?;
        loop {
            if let Some(leaf) = self.leaf {
                if let Element::Leaf { points } = tree.element(leaf) {
                    while let Some(point) = points.get(self.leaf_position) {
                        self.leaf_position += 1;
                        if self.accepts(point) {
                            return Some(point);
                        }
                    }
                }
                self.leaf = None;
            }

            let next = self.stack.pop()?;
            match tree.element(next) {
                Element::Leaf { .. } => {
                    self.leaf = Some(next);
                    self.leaf_position = 0;
                }
                Element::Node {
                    axis,
                    pivot,
                    le,
                    ge,
                    ..
                } => {
                    if self.center[*axis] + self.radius >= *pivot {
                        self.stack.push(*ge);
                    }
                    if self.visits_lower(*axis, *pivot) {
                        self.stack.push(*le);
                    }
                }
            }
        }
    }
}

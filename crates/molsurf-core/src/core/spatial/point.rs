use nalgebra::Point3;
use std::cmp::Ordering;

/// An atom position tagged with its stable atom index and owning model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub position: Point3<f64>,
    pub index: usize,
    pub model_index: usize,
}

impl IndexedPoint {
    pub fn new(position: Point3<f64>, index: usize, model_index: usize) -> Self {
        Self {
            position,
            index,
            model_index,
        }
    }

    /// Returns the coordinate along `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    ///
    /// Panics if `axis` is not 0, 1 or 2.
    #[inline]
    pub fn coordinate(&self, axis: usize) -> f64 {
        match axis {
            0 => self.position.x,
            1 => self.position.y,
            2 => self.position.z,
            _ => panic!("spatial partition axis must be 0, 1 or 2, got {axis}"),
        }
    }

    /// Total order over points by `(x, y, z, index)`.
    ///
    /// Hemisphere queries only return points that compare greater than the
    /// query origin, so each unordered pair is reported from exactly one end.
    pub fn global_cmp(&self, other: &Self) -> Ordering {
        self.position
            .x
            .total_cmp(&other.position.x)
            .then_with(|| self.position.y.total_cmp(&other.position.y))
            .then_with(|| self.position.z.total_cmp(&other.position.z))
            .then_with(|| self.index.cmp(&other.index))
    }

    #[inline]
    pub fn distance_squared(&self, center: &Point3<f64>) -> f64 {
        (self.position - center).norm_squared()
    }
}

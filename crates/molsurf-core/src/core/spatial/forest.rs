use super::bspt::Bspt;
use super::cursor::SphereCursor;
use super::point::IndexedPoint;
use nalgebra::Point3;

/// One [`Bspt`] per model, allocated the first time a model receives a point.
#[derive(Debug, Clone, Default)]
pub struct SpatialForest {
    trees: Vec<Option<Bspt>>,
}

impl SpatialForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `point` into the tree of `model_index`, creating it if needed.
    pub fn add_point(&mut self, model_index: usize, point: IndexedPoint) {
        if self.trees.len() <= model_index {
            self.trees.resize_with(model_index + 1, || None);
        }
        self.trees[model_index]
            .get_or_insert_with(Bspt::new)
            .add_point(point);
    }

    pub fn tree(&self, model_index: usize) -> Option<&Bspt> {
        self.trees.get(model_index).and_then(Option::as_ref)
    }

    /// Number of model slots, including models that never received a point.
    pub fn model_count(&self) -> usize {
        self.trees.len()
    }

    /// Total number of indexed points across all models.
    pub fn len(&self) -> usize {
        self.trees.iter().flatten().map(Bspt::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an unbound cursor for repeated queries against this forest.
    pub fn cursor(&self) -> SphereCursor<'_> {
        SphereCursor::new(self)
    }

    /// Iterates over every point of `model_index` strictly within `radius` of `center`.
    pub fn query_range(
        &self,
        model_index: usize,
        center: &Point3<f64>,
        radius: f64,
    ) -> SphereCursor<'_> {
        let mut cursor = self.cursor();
        cursor.initialize(model_index, center, radius);
        cursor
    }

    /// Like [`query_range`](Self::query_range) around `origin`, restricted to
    /// points ordered after it.
    pub fn query_hemisphere(
        &self,
        model_index: usize,
        origin: &IndexedPoint,
        radius: f64,
    ) -> SphereCursor<'_> {
        let mut cursor = self.cursor();
        cursor.initialize_hemisphere(model_index, origin, radius);
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trees_are_allocated_lazily_per_model() {
        let mut forest = SpatialForest::new();
        forest.add_point(2, IndexedPoint::new(Point3::origin(), 0, 2));

        assert_eq!(forest.model_count(), 3);
        assert!(forest.tree(0).is_none());
        assert!(forest.tree(1).is_none());
        assert_eq!(forest.tree(2).map(Bspt::len), Some(1));
        assert!(forest.tree(9).is_none());
    }

    #[test]
    fn queries_do_not_cross_models() {
        let mut forest = SpatialForest::new();
        forest.add_point(0, IndexedPoint::new(Point3::origin(), 0, 0));
        forest.add_point(1, IndexedPoint::new(Point3::origin(), 1, 1));

        let in_model_1: Vec<usize> = forest
            .query_range(1, &Point3::origin(), 1.0)
            .map(|p| p.index)
            .collect();
        assert_eq!(in_model_1, vec![1]);
        assert_eq!(forest.len(), 2);
    }
}

use super::point::IndexedPoint;

pub(crate) const LEAF_COUNT_MAX: usize = 8;
pub(crate) const MAX_TREE_DEPTH: usize = 100;

#[derive(Debug, Clone)]
pub(crate) enum Element {
    Leaf {
        points: Vec<IndexedPoint>,
    },
    /// Points with `coordinate(axis) <= pivot` live under `le`, points with
    /// `coordinate(axis) >= pivot` under `ge`.
    Node {
        axis: usize,
        pivot: f64,
        le: usize,
        ge: usize,
        count: usize,
    },
}

/// A binary space partition tree over the points of one model.
///
/// Leaves hold up to [`LEAF_COUNT_MAX`] points; a full leaf is split at its
/// median along the axis `depth % 3`, so successive levels cycle x, y, z.
/// Elements live in a flat arena and refer to each other by index.
#[derive(Debug, Clone)]
pub struct Bspt {
    elements: Vec<Element>,
    len: usize,
    depth: usize,
}

impl Default for Bspt {
    fn default() -> Self {
        Self::new()
    }
}

impl Bspt {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::Leaf {
                points: Vec::with_capacity(LEAF_COUNT_MAX),
            }],
            len: 0,
            depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth of the deepest leaf; the root leaf is depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) const ROOT: usize = 0;

    pub(crate) fn element(&self, index: usize) -> &Element {
        &self.elements[index]
    }

    pub fn add_point(&mut self, point: IndexedPoint) {
        self.len += 1;
        let mut current = Self::ROOT;
        let mut level = 0;

        loop {
            let split = match &mut self.elements[current] {
                Element::Node {
                    axis,
                    pivot,
                    le,
                    ge,
                    count,
                } => {
                    *count += 1;
                    Some((*axis, *pivot, *le, *ge))
                }
                Element::Leaf { .. } => None,
            };

            match split {
                Some((axis, pivot, le, ge)) => {
                    let value = point.coordinate(axis);
                    let goes_le =
                        value < pivot || (value == pivot && self.count(le) <= self.count(ge));
                    current = if goes_le { le } else { ge };
                    level += 1;
                }
                None => {
                    if self.count(current) < LEAF_COUNT_MAX || level >= MAX_TREE_DEPTH {
                        if let Element::Leaf { points } = &mut self.elements[current] {
                            points.push(point);
                        }
                        self.depth = self.depth.max(level);
                        return;
                    }
                    self.split_leaf(current, level % 3);
                }
            }
        }
    }

    fn count(&self, index: usize) -> usize {
        match &self.elements[index] {
            Element::Leaf { points } => points.len(),
            Element::Node { count, .. } => *count,
        }
    }

    fn split_leaf(&mut self, index: usize, axis: usize) {
        let mut points = match &mut self.elements[index] {
            Element::Leaf { points } => std::mem::take(points),
            Element::Node { .. } => return,
        };
        points.sort_unstable_by(|a, b| a.coordinate(axis).total_cmp(&b.coordinate(axis)));

        let keep = LEAF_COUNT_MAX / 2;
        let pivot = points[keep - 1].coordinate(axis);
        let mut upper = Vec::with_capacity(LEAF_COUNT_MAX);
        upper.extend(points.drain(keep..));
        let count = points.len() + upper.len();

        let le = self.elements.len();
        self.elements.push(Element::Leaf { points });
        let ge = self.elements.len();
        self.elements.push(Element::Leaf { points: upper });

        self.elements[index] = Element::Node {
            axis,
            pivot,
            le,
            ge,
            count,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    fn point(x: f64, y: f64, z: f64, index: usize) -> IndexedPoint {
        IndexedPoint::new(Point3::new(x, y, z), index, 0)
    }

    fn grid_tree(n: usize) -> Bspt {
        let mut tree = Bspt::new();
        let mut index = 0;
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    tree.add_point(point(i as f64, j as f64, k as f64, index));
                    index += 1;
                }
            }
        }
        tree
    }

    fn check_partition(tree: &Bspt, element: usize, bounds: &mut Vec<(usize, f64, bool)>) -> usize {
        match tree.element(element) {
            Element::Leaf { points } => {
                for p in points {
                    for &(axis, pivot, is_le) in bounds.iter() {
                        if is_le {
                            assert!(p.coordinate(axis) <= pivot);
                        } else {
                            assert!(p.coordinate(axis) >= pivot);
                        }
                    }
                }
                points.len()
            }
            Element::Node {
                axis,
                pivot,
                le,
                ge,
                count,
            } => {
                bounds.push((*axis, *pivot, true));
                let left = check_partition(tree, *le, bounds);
                bounds.pop();
                bounds.push((*axis, *pivot, false));
                let right = check_partition(tree, *ge, bounds);
                bounds.pop();
                assert_eq!(left + right, *count);
                *count
            }
        }
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = Bspt::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn small_insertions_stay_in_root_leaf() {
        let mut tree = Bspt::new();
        for i in 0..LEAF_COUNT_MAX {
            tree.add_point(point(i as f64, 0.0, 0.0, i));
        }
        assert_eq!(tree.len(), LEAF_COUNT_MAX);
        assert_eq!(tree.depth(), 0);
        assert!(matches!(tree.element(Bspt::ROOT), Element::Leaf { .. }));
    }

    #[test]
    fn overflowing_leaf_splits_on_x_first() {
        let mut tree = Bspt::new();
        for i in 0..=LEAF_COUNT_MAX {
            tree.add_point(point(i as f64, 0.0, 0.0, i));
        }
        match tree.element(Bspt::ROOT) {
            Element::Node { axis, pivot, .. } => {
                assert_eq!(*axis, 0);
                assert_eq!(*pivot, 3.0);
            }
            Element::Leaf { .. } => panic!("root should have split"),
        }
    }

    #[test]
    fn every_point_respects_the_pivots_above_it() {
        let tree = grid_tree(9);
        let total = check_partition(&tree, Bspt::ROOT, &mut Vec::new());
        assert_eq!(total, 729);
        assert_eq!(tree.len(), 729);
    }

    #[test]
    fn shuffled_insertion_keeps_depth_logarithmic() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut points: Vec<IndexedPoint> = (0..1000)
            .map(|i| point((i % 10) as f64, ((i / 10) % 10) as f64, (i / 100) as f64, i))
            .collect();
        points.shuffle(&mut rng);

        let mut tree = Bspt::new();
        points.into_iter().for_each(|p| tree.add_point(p));
        assert!(tree.depth() < 40, "depth {}", tree.depth());
    }

    #[test]
    fn coincident_points_are_all_stored() {
        let mut tree = Bspt::new();
        for i in 0..500 {
            tree.add_point(point(1.0, 1.0, 1.0, i));
        }
        assert_eq!(tree.len(), 500);
        assert_eq!(check_partition(&tree, Bspt::ROOT, &mut Vec::new()), 500);
    }
}

use super::bitmap::VisibilityBitmap;
use nalgebra::Vector3;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Deepest subdivision level a sphere can be built with (2562 vertices).
pub const MAX_LEVEL: usize = 4;

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 5],
    [0, 5, 1],
    [1, 6, 2],
    [2, 7, 3],
    [3, 8, 4],
    [4, 9, 5],
    [5, 10, 1],
    [6, 1, 10],
    [7, 2, 6],
    [8, 3, 7],
    [9, 4, 8],
    [10, 5, 9],
    [11, 6, 10],
    [11, 7, 6],
    [11, 8, 7],
    [11, 9, 8],
    [11, 10, 9],
];

// (screen diameter in pixels below which the level is used, level)
const SCREEN_DIAMETER_TIERS: [(f64, usize); 3] = [(20.0, 0), (40.0, 1), (80.0, 2)];
const DENSEST_SCREEN_TIER: usize = 3;

/// Near-uniform unit directions from recursive subdivision of an icosahedron.
///
/// Every level's vertex list is a prefix of the next level's, so a
/// [`VisibilityBitmap`] computed at a fine level can be read at any coarser one
/// by looking at its leading bits.
#[derive(Debug, Clone)]
pub struct GeodesicSphere {
    vertices: Vec<Vector3<f64>>,
    vertex_counts: Vec<usize>,
    faces: Vec<Vec<[usize; 3]>>,
    neighbors: Vec<Vec<Vec<usize>>>,
}

impl GeodesicSphere {
    /// Builds all levels from `0` through `max_level` (clamped to [`MAX_LEVEL`]).
    pub fn new(max_level: usize) -> Self {
        let max_level = max_level.min(MAX_LEVEL);

        let mut vertices = icosahedron_vertices();
        let mut vertex_counts = vec![vertices.len()];
        let mut faces = vec![ICOSAHEDRON_FACES.to_vec()];

        for level in 1..=max_level {
            let next = quadruple(&mut vertices, &faces[level - 1]);
            vertex_counts.push(vertices.len());
            faces.push(next);
        }

        let neighbors = faces
            .iter()
            .zip(&vertex_counts)
            .map(|(level_faces, &count)| neighbor_lists(level_faces, count))
            .collect();

        Self {
            vertices,
            vertex_counts,
            faces,
            neighbors,
        }
    }

    pub fn max_level(&self) -> usize {
        self.vertex_counts.len() - 1
    }

    /// Number of sample directions at `level` (clamped to the built maximum).
    pub fn vertex_count(&self, level: usize) -> usize {
        self.vertex_counts[self.clamp(level)]
    }

    /// Unit sample directions at `level`.
    pub fn vertices(&self, level: usize) -> &[Vector3<f64>] {
        &self.vertices[..self.vertex_count(level)]
    }

    pub fn faces(&self, level: usize) -> &[[usize; 3]] {
        &self.faces[self.clamp(level)]
    }

    pub fn edge_count(&self, level: usize) -> usize {
        self.faces(level).len() * 3 / 2
    }

    /// Indices of the vertices sharing an edge with `vertex` at `level`, in
    /// ascending order. The twelve icosahedron corners have five neighbors,
    /// every other vertex six.
    pub fn neighbors(&self, level: usize, vertex: usize) -> &[usize] {
        &self.neighbors[self.clamp(level)][vertex]
    }

    /// Picks the sampling level for a sphere drawn `diameter` pixels wide.
    pub fn level_for_screen_diameter(&self, diameter: f64) -> usize {
        let tier = SCREEN_DIAMETER_TIERS
            .iter()
            .find(|(limit, _)| diameter < *limit)
            .map_or(DENSEST_SCREEN_TIER, |&(_, level)| level);
        self.clamp(tier)
    }

    /// Yields `(vertex index, direction)` for every set bit of `bitmap` that
    /// belongs to `level` or a coarser one.
    pub fn visible_directions<'a>(
        &'a self,
        bitmap: &'a VisibilityBitmap,
        level: usize,
    ) -> impl Iterator<Item = (usize, &'a Vector3<f64>)> + 'a {
        let limit = self.vertex_count(level);
        bitmap
            .iter_ones()
            .take_while(move |&index| index < limit)
            .map(move |index| (index, &self.vertices[index]))
    }

    fn clamp(&self, level: usize) -> usize {
        level.min(self.max_level())
    }
}

fn icosahedron_vertices() -> Vec<Vector3<f64>> {
    let half_root5 = 5.0_f64.sqrt() / 2.0;
    let step = 2.0 * PI / 5.0;

    let mut vertices = Vec::with_capacity(12);
    vertices.push(Vector3::new(0.0, 0.0, half_root5));
    for i in 0..5 {
        let angle = i as f64 * step;
        vertices.push(Vector3::new(angle.cos(), angle.sin(), 0.5));
    }
    for i in 0..5 {
        let angle = i as f64 * step + PI / 5.0;
        vertices.push(Vector3::new(angle.cos(), angle.sin(), -0.5));
    }
    vertices.push(Vector3::new(0.0, 0.0, -half_root5));

    for vertex in &mut vertices {
        vertex.normalize_mut();
    }
    vertices
}

/// Splits every face into four, appending one normalized midpoint per shared edge.
fn quadruple(vertices: &mut Vec<Vector3<f64>>, faces: &[[usize; 3]]) -> Vec<[usize; 3]> {
    let mut midpoints: HashMap<(usize, usize), usize> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut next = Vec::with_capacity(faces.len() * 4);

    for &[a, b, c] in faces {
        let ab = midpoint(vertices, &mut midpoints, a, b);
        let bc = midpoint(vertices, &mut midpoints, b, c);
        let ca = midpoint(vertices, &mut midpoints, c, a);
        next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ca, ab, bc]]);
    }
    next
}

fn midpoint(
    vertices: &mut Vec<Vector3<f64>>,
    midpoints: &mut HashMap<(usize, usize), usize>,
    a: usize,
    b: usize,
) -> usize {
    let key = if a < b { (a, b) } else { (b, a) };
    *midpoints.entry(key).or_insert_with(|| {
        let mid = (vertices[a] + vertices[b]).normalize();
        vertices.push(mid);
        vertices.len() - 1
    })
}

fn neighbor_lists(faces: &[[usize; 3]], vertex_count: usize) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::with_capacity(6); vertex_count];
    let mut link = |from: usize, to: usize| {
        if !neighbors[from].contains(&to) {
            neighbors[from].push(to);
        }
    };
    for &[a, b, c] in faces {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            link(p, q);
            link(q, p);
        }
    }
    neighbors.iter_mut().for_each(|list| list.sort_unstable());
    neighbors
}

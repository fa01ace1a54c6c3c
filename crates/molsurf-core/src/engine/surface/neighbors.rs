use crate::core::models::system::MolecularSystem;
use crate::core::spatial::cursor::SphereCursor;
use nalgebra::Point3;

/// An atom close enough to another to shape its surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Neighbor {
    pub index: usize,
    pub center: Point3<f64>,
    /// Van der Waals radius plus probe radius.
    pub inflated_radius: f64,
    /// A probe center closer than `inflated_radius` collides; compared squared.
    pub inflated_radius2: f64,
}

/// Fills `out` with the atoms whose probe-inflated spheres overlap that of
/// `atom_index`, in cursor order.
pub(crate) fn gather_neighbors(
    cursor: &mut SphereCursor<'_>,
    system: &MolecularSystem,
    atom_index: usize,
    probe_radius: f64,
    max_vdw_radius: f64,
    out: &mut Vec<Neighbor>,
) {
    out.clear();
    let Some(atom) = system.atom(atom_index) else {
        return;
    };
    let search_radius = atom.vdw_radius + 2.0 * probe_radius + max_vdw_radius;
    cursor.initialize(atom.model_index, &atom.position, search_radius);

    while let Some(found) = cursor.next() {
        if found.index == atom_index {
            continue;
        }
        let Some(other) = system.atom(found.index) else {
            continue;
        };
        let reach = atom.vdw_radius + other.vdw_radius + 2.0 * probe_radius;
        if cursor.found_distance2() < reach * reach {
            let inflated = other.vdw_radius + probe_radius;
            out.push(Neighbor {
                index: found.index,
                center: other.position,
                inflated_radius: inflated,
                inflated_radius2: inflated * inflated,
            });
        }
    }
}

/// Round-robin occlusion test that starts from the neighbor that last
/// occluded, since nearby sample points tend to hit the same one.
#[derive(Debug, Default)]
pub(crate) struct OcclusionTest {
    last: usize,
}

impl OcclusionTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a probe centered at `point` collides with any neighbor not
    /// rejected by `skip`.
    pub fn is_occluded(
        &mut self,
        point: &Point3<f64>,
        neighbors: &[Neighbor],
        skip: impl Fn(usize) -> bool,
    ) -> bool {
        if neighbors.is_empty() {
            return false;
        }
        if self.last >= neighbors.len() {
            self.last = 0;
        }
        let start = self.last;
        loop {
            let neighbor = &neighbors[self.last];
            if !skip(neighbor.index)
                && (point - neighbor.center).norm_squared() < neighbor.inflated_radius2
            {
                return true;
            }
            self.last = (self.last + 1) % neighbors.len();
            if self.last == start {
                return false;
            }
        }
    }
}

use super::keys::TripleKey;
use super::neighbors::{Neighbor, OcclusionTest};
use super::torus::Torus;
use crate::core::utils::geometry::intersect_three_planes;
use nalgebra::{Point3, Unit, Vector3};

const DEGENERACY_EPSILON: f64 = 1e-10;

/// One of the two probe placements touching all three atoms of a cavity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CavityProbe {
    pub position: Point3<f64>,
    /// Where the probe touches atoms i, j and k, in key order.
    pub contacts: [Point3<f64>; 3],
    /// Whether the probe clears every other atom.
    pub visible: bool,
}

/// The concave patch left by a probe resting on three atoms at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cavity {
    pub key: TripleKey,
    /// Midpoint of the two probes, in the plane of the three atom centers.
    pub base: Point3<f64>,
    /// Unit normal of the atom plane; the probes sit at `base ± height·normal`.
    pub normal: Unit<Vector3<f64>>,
    pub height: f64,
    pub probes: [CavityProbe; 2],
}

impl Cavity {
    /// Places the probes for the triple `key` from the tori of its leading
    /// pairs `(i, j)` and `(i, k)`. Probe visibility starts out false.
    ///
    /// # Return
    ///
    /// `None` for collinear atoms, a singular plane system, or a probe that
    /// cannot reach atom `i` from the base point.
    pub fn between(
        key: TripleKey,
        centers: &[Point3<f64>; 3],
        radius_i: f64,
        torus_ij: &Torus,
        torus_ik: &Torus,
        probe_radius: f64,
    ) -> Option<Self> {
        let normal = Unit::try_new(
            torus_ij.axis.cross(torus_ik.axis.as_ref()),
            DEGENERACY_EPSILON,
        )?;
        let base = intersect_three_planes(
            &torus_ij.axis,
            &torus_ij.center,
            &torus_ik.axis,
            &torus_ik.center,
            &normal,
            &centers[0],
        )?;

        let reach = radius_i + probe_radius;
        let height2 = reach * reach - (base - centers[0]).norm_squared();
        if height2 < 0.0 {
            return None;
        }
        let height = height2.sqrt();

        let probe = |position: Point3<f64>| -> Option<CavityProbe> {
            let mut contacts = [Point3::origin(); 3];
            for (contact, center) in contacts.iter_mut().zip(centers) {
                let toward = Unit::try_new(center - position, DEGENERACY_EPSILON)?;
                *contact = position + toward.into_inner() * probe_radius;
            }
            Some(CavityProbe {
                position,
                contacts,
                visible: false,
            })
        };
        let offset = normal.into_inner() * height;

        Some(Self {
            key,
            base,
            normal,
            height,
            probes: [probe(base + offset)?, probe(base - offset)?],
        })
    }

    pub fn is_visible(&self) -> bool {
        self.probes.iter().any(|probe| probe.visible)
    }

    /// Sets each probe's visibility against `neighbors`, ignoring the three
    /// atoms of the cavity itself.
    pub(crate) fn compute_visibility(&mut self, neighbors: &[Neighbor]) {
        let key = self.key;
        let mut occlusion = OcclusionTest::new();
        for probe in &mut self.probes {
            probe.visible =
                !occlusion.is_occluded(&probe.position, neighbors, |index| key.contains(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::surface::keys::PairKey;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn cavity_for(centers: [Point3<f64>; 3], radius: f64, probe: f64) -> Option<Cavity> {
        let key = TripleKey::new(0, 1, 2);
        let (ij, ik) = key.leading_pairs();
        let torus_ij = Torus::between(ij, &centers[0], radius, &centers[1], radius, probe)?;
        let torus_ik = Torus::between(ik, &centers[0], radius, &centers[2], radius, probe)?;
        Cavity::between(key, &centers, radius, &torus_ij, &torus_ik, probe)
    }

    fn right_angle_triple() -> [Point3<f64>; 3] {
        [
            Point3::origin(),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(0.0, 1.5, 0.0),
        ]
    }

    #[test]
    fn right_angle_triple_has_symmetric_probes() {
        let cavity = cavity_for(right_angle_triple(), 1.0, 1.4).unwrap();

        assert!(f64_approx_equal((cavity.base - Point3::new(0.75, 0.75, 0.0)).norm(), 0.0));
        assert!(f64_approx_equal(cavity.height * cavity.height, 5.76 - 1.125));
        assert!(f64_approx_equal(cavity.normal.z.abs(), 1.0));
        let [above, below] = cavity.probes;
        assert!(f64_approx_equal(above.position.z, -below.position.z));
        assert!(f64_approx_equal(above.position.z.abs(), cavity.height));
    }

    #[test]
    fn probes_touch_every_atom_at_its_surface() {
        let centers = right_angle_triple();
        let cavity = cavity_for(centers, 1.0, 1.4).unwrap();
        for probe in &cavity.probes {
            for (contact, center) in probe.contacts.iter().zip(&centers) {
                assert!(f64_approx_equal((probe.position - center).norm(), 2.4));
                assert!(f64_approx_equal((contact - center).norm(), 1.0));
                assert!(f64_approx_equal((contact - probe.position).norm(), 1.4));
            }
        }
    }

    #[test]
    fn collinear_atoms_have_no_cavity() {
        let centers = [
            Point3::origin(),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(-1.5, 0.0, 0.0),
        ];
        assert!(cavity_for(centers, 1.0, 1.4).is_none());
    }

    #[test]
    fn spread_out_triple_leaves_no_room_for_a_probe() {
        let centers = [
            Point3::origin(),
            Point3::new(4.6, 0.0, 0.0),
            Point3::new(2.3, 3.98, 0.0),
        ];
        assert!(cavity_for(centers, 1.0, 1.4).is_none());
    }

    #[test]
    fn visibility_ignores_own_atoms_and_respects_others() {
        let mut cavity = cavity_for(right_angle_triple(), 1.0, 1.4).unwrap();
        let own = Neighbor {
            index: 1,
            center: Point3::new(1.5, 0.0, 0.0),
            inflated_radius: 10.0,
            inflated_radius2: 100.0,
        };
        cavity.compute_visibility(&[own]);
        assert!(cavity.probes.iter().all(|p| p.visible));

        let lid = Neighbor {
            index: 7,
            center: cavity.probes[0].position,
            inflated_radius: 1.0,
            inflated_radius2: 1.0,
        };
        cavity.compute_visibility(&[own, lid]);
        assert!(!cavity.probes[0].visible);
        assert!(cavity.probes[1].visible);
        assert!(cavity.is_visible());
    }

    #[test]
    fn leading_pair_keys_match_tori() {
        let key = TripleKey::new(4, 2, 9);
        assert_eq!(key.leading_pairs().0, PairKey::new(2, 4));
    }
}

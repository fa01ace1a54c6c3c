use super::keys::PairKey;
use super::neighbors::{Neighbor, OcclusionTest};
use crate::core::utils::geometry::perpendicular_unit;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::f64::consts::TAU;

pub const PROBE_MAP_SLOTS: usize = 64;

/// Which of the 64 probe positions around a torus are collision-free.
///
/// Bit `a` stands for the probe rotated by `a·2π/64` about the torus axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProbeMap(u64);

impl ProbeMap {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn full() -> Self {
        Self(u64::MAX)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn get(&self, slot: usize) -> bool {
        slot < PROBE_MAP_SLOTS && self.0 & (1 << slot) != 0
    }

    pub fn set(&mut self, slot: usize) {
        assert!(slot < PROBE_MAP_SLOTS, "probe slot {slot} out of range");
        self.0 |= 1 << slot;
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..PROBE_MAP_SLOTS).filter(|&slot| self.get(slot))
    }
}

/// Rotation angle of probe slot `slot`, in radians.
pub fn slot_angle(slot: usize) -> f64 {
    slot as f64 * TAU / PROBE_MAP_SLOTS as f64
}

/// The saddle patch traced by a probe rolling around the gap between two atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub key: PairKey,
    pub center: Point3<f64>,
    /// Distance from `center` to the probe centers.
    pub radius: f64,
    /// Points from atom `key.j()` to atom `key.i()`.
    pub axis: Unit<Vector3<f64>>,
    /// Perpendicular to `axis`, of length `radius`; slot 0 sits at `center + radial`.
    pub radial: Vector3<f64>,
    pub probe_map: ProbeMap,
}

impl Torus {
    /// Closed-form torus geometry for atoms `key.i()` (at `center_i`) and
    /// `key.j()` (at `center_j`), with an empty probe map.
    ///
    /// # Return
    ///
    /// `None` when the atoms coincide, when the inflated spheres do not
    /// overlap, or when one inflated sphere swallows the other.
    pub fn between(
        key: PairKey,
        center_i: &Point3<f64>,
        radius_i: f64,
        center_j: &Point3<f64>,
        radius_j: f64,
        probe_radius: f64,
    ) -> Option<Self> {
        let separation = center_i - center_j;
        let d2 = separation.norm_squared();
        let t1 = radius_i + radius_j + 2.0 * probe_radius;
        let t2 = t1 * t1 - d2;
        let diff = radius_i - radius_j;
        let t3 = d2 - diff * diff;
        if t2 <= 0.0 || t3 <= 0.0 || d2 == 0.0 {
            return None;
        }
        let radius = 0.5 * t2.sqrt() * t3.sqrt() / d2.sqrt();

        let rip = radius_i + probe_radius;
        let rjp = radius_j + probe_radius;
        let shift = (center_j - center_i) * ((rip * rip - rjp * rjp) / d2);
        let center = Point3::from((center_i.coords + center_j.coords + shift) * 0.5);

        let axis = Unit::try_new(separation, f64::EPSILON)?;
        let radial = perpendicular_unit(&axis)?.into_inner() * radius;

        Some(Self {
            key,
            center,
            radius,
            axis,
            radial,
            probe_map: ProbeMap::empty(),
        })
    }

    /// Probe center at rotation slot `slot`.
    pub fn probe_position(&self, slot: usize) -> Point3<f64> {
        let rotation = Rotation3::from_axis_angle(&self.axis, slot_angle(slot));
        self.center + rotation * self.radial
    }

    /// Centers of the collision-free probes.
    pub fn valid_probe_positions(&self) -> impl Iterator<Item = (usize, Point3<f64>)> + '_ {
        self.probe_map
            .slots()
            .map(|slot| (slot, self.probe_position(slot)))
    }

    /// Marks every slot whose probe clears all `neighbors` other than the
    /// torus's own two atoms.
    pub(crate) fn compute_probe_map(&mut self, neighbors: &[Neighbor]) {
        let key = self.key;
        let mut occlusion = OcclusionTest::new();
        let mut map = ProbeMap::empty();
        for slot in 0..PROBE_MAP_SLOTS {
            let position = self.probe_position(slot);
            if !occlusion.is_occluded(&position, neighbors, |index| key.contains(index)) {
                map.set(slot);
            }
        }
        self.probe_map = map;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn torus(ci: Point3<f64>, ri: f64, cj: Point3<f64>, rj: f64, probe: f64) -> Option<Torus> {
        Torus::between(PairKey::new(0, 1), &ci, ri, &cj, rj, probe)
    }

    mod probe_map {
        use super::*;

        #[test]
        fn set_get_and_count_slots() {
            let mut map = ProbeMap::empty();
            assert!(map.is_empty());
            map.set(0);
            map.set(63);
            assert!(map.get(0) && map.get(63) && !map.get(1));
            assert!(!map.get(64));
            assert_eq!(map.count(), 2);
            assert_eq!(map.slots().collect::<Vec<_>>(), vec![0, 63]);
            assert_eq!(ProbeMap::full().count(), PROBE_MAP_SLOTS);
        }

        #[test]
        #[should_panic]
        fn setting_slot_past_the_end_panics() {
            ProbeMap::empty().set(PROBE_MAP_SLOTS);
        }
    }

    mod geometry {
        use super::*;

        #[test]
        fn equal_atoms_give_midpoint_centered_torus() {
            let t = torus(Point3::origin(), 1.0, Point3::new(1.5, 0.0, 0.0), 1.0, 1.4).unwrap();
            let expected_radius = 0.5 * (23.04f64 - 2.25).sqrt() * 1.5 / 1.5;

            assert!(f64_approx_equal(t.radius, expected_radius));
            assert!(f64_approx_equal((t.center - Point3::new(0.75, 0.0, 0.0)).norm(), 0.0));
            assert!(f64_approx_equal(t.axis.x, -1.0));
            assert!(f64_approx_equal(t.radial.norm(), t.radius));
            assert!(f64_approx_equal(t.radial.dot(t.axis.as_ref()), 0.0));
        }

        #[test]
        fn every_probe_touches_both_inflated_spheres() {
            let ci = Point3::new(0.3, -0.2, 1.0);
            let cj = Point3::new(1.9, 0.8, 0.4);
            let t = torus(ci, 1.7, cj, 1.2, 1.4).unwrap();
            for slot in 0..PROBE_MAP_SLOTS {
                let p = t.probe_position(slot);
                assert!(f64_approx_equal((p - ci).norm(), 1.7 + 1.4));
                assert!(f64_approx_equal((p - cj).norm(), 1.2 + 1.4));
            }
        }

        #[test]
        fn swapping_the_atoms_keeps_center_and_radius() {
            let a = Point3::new(0.0, 0.0, 0.0);
            let b = Point3::new(1.2, 2.0, -0.5);
            let forward = torus(a, 1.5, b, 1.1, 1.2).unwrap();
            let backward = torus(b, 1.1, a, 1.5, 1.2).unwrap();

            assert!(f64_approx_equal(forward.radius, backward.radius));
            assert!(f64_approx_equal((forward.center - backward.center).norm(), 0.0));
            assert!(f64_approx_equal(forward.axis.dot(backward.axis.as_ref()), -1.0));
        }

        #[test]
        fn distant_atoms_have_no_torus() {
            assert!(torus(Point3::origin(), 1.0, Point3::new(6.0, 0.0, 0.0), 1.0, 1.0).is_none());
        }

        #[test]
        fn coincident_atoms_have_no_torus() {
            assert!(torus(Point3::origin(), 1.0, Point3::origin(), 1.0, 1.0).is_none());
        }

        #[test]
        fn engulfed_atom_has_no_torus() {
            assert!(torus(Point3::origin(), 3.0, Point3::new(0.5, 0.0, 0.0), 1.0, 1.0).is_none());
        }
    }

    mod probe_positions {
        use super::*;

        #[test]
        fn unobstructed_torus_has_full_map() {
            let mut t = torus(Point3::origin(), 1.0, Point3::new(2.0, 0.0, 0.0), 1.0, 1.0).unwrap();
            t.compute_probe_map(&[]);
            assert_eq!(t.probe_map, ProbeMap::full());
            assert_eq!(t.valid_probe_positions().count(), PROBE_MAP_SLOTS);
        }

        #[test]
        fn own_atoms_never_block_the_probe() {
            let mut t = torus(Point3::origin(), 1.0, Point3::new(2.0, 0.0, 0.0), 1.0, 1.0).unwrap();
            let own = Neighbor {
                index: 1,
                center: Point3::new(2.0, 0.0, 0.0),
                inflated_radius: 10.0,
                inflated_radius2: 100.0,
            };
            t.compute_probe_map(&[own]);
            assert_eq!(t.probe_map, ProbeMap::full());
        }

        #[test]
        fn third_atom_blocks_nearby_slots_only() {
            let mut t = torus(Point3::origin(), 1.0, Point3::new(2.0, 0.0, 0.0), 1.0, 1.0).unwrap();
            let blocked_point = t.probe_position(0);
            let third = Neighbor {
                index: 2,
                center: blocked_point,
                inflated_radius: 1.0,
                inflated_radius2: 1.0,
            };
            t.compute_probe_map(&[third]);

            assert!(!t.probe_map.get(0));
            assert!(t.probe_map.get(32));
            assert!(!t.probe_map.is_empty());
            for (_, p) in t.valid_probe_positions() {
                assert!((p - blocked_point).norm_squared() >= 1.0);
            }
        }
    }
}

//! # Surface Module
//!
//! Computes a Connolly-style solvent-excluded surface by rolling a probe
//! sphere over the atoms of each model.
//!
//! ## Patches
//!
//! - **Convex** - one [`VisibilityBitmap`] per atom, a bit per geodesic direction
//!   on the probe-inflated sphere that no neighbor occludes
//! - **Saddle** ([`torus`]) - one [`Torus`] per overlapping atom pair whose
//!   probe can roll through at least one of 64 positions
//! - **Concave** ([`cavity`]) - one [`Cavity`] per mutually overlapping atom
//!   triple where a probe can rest on all three atoms
//!
//! A zero probe radius yields the plain van der Waals surface: bitmaps only.

pub mod cavity;
pub mod keys;
pub(crate) mod neighbors;
pub mod torus;

use self::cavity::Cavity;
use self::keys::{PairKey, TripleKey};
use self::neighbors::{Neighbor, OcclusionTest, gather_neighbors};
use self::torus::Torus;
use super::config::SurfaceConfig;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::geodesic::bitmap::VisibilityBitmap;
use crate::core::geodesic::sphere::GeodesicSphere;
use crate::core::models::system::MolecularSystem;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Everything one surface pass produced.
#[derive(Debug, Clone, Default)]
pub struct SurfaceResult {
    pub geodesic_level: usize,
    pub probe_radius: f64,
    /// Indexed by atom index; `None` for deleted atoms and atoms outside the
    /// computed selection.
    pub bitmaps: Vec<Option<VisibilityBitmap>>,
    /// Sorted by key.
    pub tori: Vec<Torus>,
    /// Sorted by key.
    pub cavities: Vec<Cavity>,
}

impl SurfaceResult {
    pub fn bitmap(&self, atom_index: usize) -> Option<&VisibilityBitmap> {
        self.bitmaps.get(atom_index)?.as_ref()
    }

    /// # Panics
    ///
    /// Panics unless `i < j`.
    pub fn torus(&self, i: usize, j: usize) -> Option<&Torus> {
        assert!(i < j, "torus lookup needs i < j, got ({i}, {j})");
        let key = PairKey::new(i, j);
        self.tori
            .binary_search_by_key(&key, |torus| torus.key)
            .ok()
            .map(|position| &self.tori[position])
    }

    pub fn cavity(&self, key: TripleKey) -> Option<&Cavity> {
        self.cavities
            .binary_search_by_key(&key, |cavity| cavity.key)
            .ok()
            .map(|position| &self.cavities[position])
    }
}

/// Runs surface passes over a [`MolecularSystem`].
///
/// The engine owns its geodesic sphere, neighbor scratch buffer and torus memo,
/// so one instance runs one pass at a time.
#[derive(Debug)]
pub struct SurfaceEngine {
    config: SurfaceConfig,
    geodesic: GeodesicSphere,
    neighbors: Vec<Neighbor>,
    torus_memo: HashMap<PairKey, Option<Torus>>,
}

impl SurfaceEngine {
    pub fn new(config: SurfaceConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            geodesic: GeodesicSphere::new(config.geodesic_level),
            config,
            neighbors: Vec::new(),
            torus_memo: HashMap::new(),
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The sphere whose directions index every bitmap this engine produces.
    pub fn geodesic(&self) -> &GeodesicSphere {
        &self.geodesic
    }

    /// Surfaces every atom of the system.
    #[instrument(skip_all, name = "surface_computation")]
    pub fn compute(
        &mut self,
        system: &MolecularSystem,
        reporter: &ProgressReporter,
    ) -> SurfaceResult {
        let atoms: Vec<usize> = system.atoms_iter().map(|(index, _)| index).collect();
        self.run(system, &atoms, reporter)
    }

    /// Surfaces only `atoms`. Every atom of a model still occludes.
    ///
    /// Tori and cavities are reported when at least one of their atoms is
    /// selected.
    #[instrument(skip_all, name = "surface_computation", fields(selected = atoms.len()))]
    pub fn compute_selected(
        &mut self,
        system: &MolecularSystem,
        atoms: &[usize],
        reporter: &ProgressReporter,
    ) -> Result<SurfaceResult, EngineError> {
        if let Some(&missing) = atoms.iter().find(|&&index| system.atom(index).is_none()) {
            return Err(EngineError::AtomNotFound(missing));
        }
        Ok(self.run(system, atoms, reporter))
    }

    fn run(
        &mut self,
        system: &MolecularSystem,
        atoms: &[usize],
        reporter: &ProgressReporter,
    ) -> SurfaceResult {
        self.torus_memo.clear();
        let probe_radius = self.config.probe_radius;
        let level = self.config.geodesic_level;
        let max_vdw_radius = system.max_vdw_radius();

        let mut selected = vec![false; system.atom_slot_count()];
        for &index in atoms {
            selected[index] = true;
        }

        let mut result = SurfaceResult {
            geodesic_level: level,
            probe_radius,
            bitmaps: vec![None; system.atom_slot_count()],
            ..SurfaceResult::default()
        };
        let mut cursor = system.spatial_index().cursor();

        reporter.report(Progress::TaskStart {
            total_steps: atoms.len() as u64,
        });
        for &atom_index in atoms {
            reporter.report(Progress::TaskIncrement);
            if result.bitmaps[atom_index].is_some() {
                continue;
            }
            let Some(atom) = system.atom(atom_index) else {
                continue;
            };
            gather_neighbors(
                &mut cursor,
                system,
                atom_index,
                probe_radius,
                max_vdw_radius,
                &mut self.neighbors,
            );

            result.bitmaps[atom_index] = Some(convex_bitmap(
                &atom.position,
                atom.vdw_radius + probe_radius,
                self.geodesic.vertices(level),
                &self.neighbors,
            ));

            if probe_radius > 0.0 {
                self.collect_tori(system, atom_index, &selected, &mut result.tori);
                self.collect_cavities(system, atom_index, &selected, &mut result.cavities);
            }
        }
        reporter.report(Progress::TaskFinish);

        result.tori.sort_unstable_by_key(|torus| torus.key);
        result.cavities.sort_unstable_by_key(|cavity| cavity.key);

        info!(
            atoms = atoms.len(),
            tori = result.tori.len(),
            cavities = result.cavities.len(),
            "Surface computation complete."
        );
        debug!(memoized_pairs = self.torus_memo.len(), "Torus memo size.");
        result
    }

    /// Pair tori owned by `atom_index` with non-empty probe maps.
    fn collect_tori(
        &mut self,
        system: &MolecularSystem,
        atom_index: usize,
        selected: &[bool],
        out: &mut Vec<Torus>,
    ) {
        for position in 0..self.neighbors.len() {
            let other = self.neighbors[position].index;
            if !owns_patch(atom_index, &[other], selected) {
                continue;
            }
            let Some(mut torus) = self.torus(system, PairKey::new(atom_index, other)) else {
                continue;
            };
            torus.compute_probe_map(&self.neighbors);
            if !torus.probe_map.is_empty() {
                out.push(torus);
            }
        }
    }

    /// Cavities owned by `atom_index` with at least one visible probe.
    fn collect_cavities(
        &mut self,
        system: &MolecularSystem,
        atom_index: usize,
        selected: &[bool],
        out: &mut Vec<Cavity>,
    ) {
        let probe_radius = self.config.probe_radius;
        for first in 0..self.neighbors.len() {
            for second in first + 1..self.neighbors.len() {
                let (a, b) = (self.neighbors[first], self.neighbors[second]);
                if !owns_patch(atom_index, &[a.index, b.index], selected) {
                    continue;
                }
                let reach = a.inflated_radius + b.inflated_radius;
                if (a.center - b.center).norm_squared() >= reach * reach {
                    continue;
                }

                let key = TripleKey::new(atom_index, a.index, b.index);
                let (ij, ik) = key.leading_pairs();
                let (Some(torus_ij), Some(torus_ik)) = (self.torus(system, ij), self.torus(system, ik))
                else {
                    continue;
                };
                let [i, j, k] = key.indices().map(|index| system.atom(index));
                let (Some(i), Some(j), Some(k)) = (i, j, k) else {
                    continue;
                };
                let centers = [i.position, j.position, k.position];
                let cavity = Cavity::between(
                    key,
                    &centers,
                    i.vdw_radius,
                    &torus_ij,
                    &torus_ik,
                    probe_radius,
                );
                if let Some(mut cavity) = cavity {
                    cavity.compute_visibility(&self.neighbors);
                    if cavity.is_visible() {
                        out.push(cavity);
                    }
                }
            }
        }
    }

    /// Torus geometry for `key`, memoized for the current pass. Degenerate
    /// pairs are remembered as `None`.
    fn torus(&mut self, system: &MolecularSystem, key: PairKey) -> Option<Torus> {
        let probe_radius = self.config.probe_radius;
        *self.torus_memo.entry(key).or_insert_with(|| {
            let a = system.atom(key.i())?;
            let b = system.atom(key.j())?;
            Torus::between(
                key,
                &a.position,
                a.vdw_radius,
                &b.position,
                b.vdw_radius,
                probe_radius,
            )
        })
    }
}

/// A patch touching `atom_index` and `others` is computed once, from its
/// lowest-indexed selected atom.
fn owns_patch(atom_index: usize, others: &[usize], selected: &[bool]) -> bool {
    others
        .iter()
        .all(|&other| other > atom_index || !selected.get(other).copied().unwrap_or(false))
}

fn convex_bitmap(
    center: &Point3<f64>,
    inflated_radius: f64,
    directions: &[Vector3<f64>],
    neighbors: &[Neighbor],
) -> VisibilityBitmap {
    let mut bitmap = VisibilityBitmap::all_set(directions.len());
    let mut occlusion = OcclusionTest::new();
    for (index, direction) in directions.iter().enumerate() {
        let point = center + direction * inflated_radius;
        if occlusion.is_occluded(&point, neighbors, |_| false) {
            bitmap.clear(index);
        }
    }
    bitmap
}

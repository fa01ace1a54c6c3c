use super::config::HydrogenBondConfig;
use super::error::EngineError;
use crate::core::models::ids::GroupId;
use crate::core::models::monomer::{MonomerKind, PolymerKind};
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::{BondOrder, HydrogenBondKind};
use crate::core::utils::geometry::calculate_amide_hydrogen;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Electrostatic constant of the backbone hydrogen-bond energy: -332 * 0.42 * 0.2 (kcal·Å/mol).
pub const ELECTROSTATIC_CONSTANT: f64 = -27.888;

const MAX_ACCEPTORS_PER_DONOR: usize = 2;

/// A backbone N-H···O=C hydrogen bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrogenBond {
    pub donor: GroupId,
    pub acceptor: GroupId,
    /// Donor backbone nitrogen.
    pub nitrogen: usize,
    /// Acceptor carbonyl oxygen.
    pub oxygen: usize,
    /// Energy in kcal/mol; always negative.
    pub energy: f64,
    pub kind: HydrogenBondKind,
}

#[derive(Debug, Clone, Copy)]
struct BackboneResidue {
    group: GroupId,
    polymer: usize,
    position: usize,
    model_index: usize,
    nitrogen: usize,
    n: Point3<f64>,
    alpha: Point3<f64>,
    c: Point3<f64>,
    oxygen: usize,
    o: Point3<f64>,
    hydrogen: Option<Point3<f64>>,
}

/// Electrostatic energy of an N-H···O=C interaction.
///
/// # Return
///
/// `None` if any of the four scored atom pairs is closer than the clash
/// distance. Otherwise the energy, clamped below at `energy_floor` and
/// reported as `0.0` when above `energy_cutoff`.
pub fn hbond_energy(
    n: &Point3<f64>,
    h: &Point3<f64>,
    c: &Point3<f64>,
    o: &Point3<f64>,
    config: &HydrogenBondConfig,
) -> Option<f64> {
    let d2_oh = (o - h).norm_squared();
    let d2_ch = (c - h).norm_squared();
    let d2_cn = (c - n).norm_squared();
    let d2_on = (o - n).norm_squared();

    let clash2 = config.clash_distance * config.clash_distance;
    if [d2_oh, d2_ch, d2_cn, d2_on]
        .iter()
        .any(|&d2| d2 <= 0.0 || d2 < clash2)
    {
        return None;
    }

    let energy = ELECTROSTATIC_CONSTANT
        * (1.0 / d2_oh.sqrt() - 1.0 / d2_ch.sqrt() + 1.0 / d2_cn.sqrt() - 1.0 / d2_on.sqrt());
    let energy = energy.max(config.energy_floor);
    Some(if energy > config.energy_cutoff {
        0.0
    } else {
        energy
    })
}

/// Keeps the `MAX_ACCEPTORS_PER_DONOR` lowest energies, best first.
fn rank_candidate(
    best: &mut [Option<(f64, usize)>; MAX_ACCEPTORS_PER_DONOR],
    energy: f64,
    acceptor: usize,
) {
    let candidate = Some((energy, acceptor));
    match (best[0], best[1]) {
        (Some((first, _)), second) if energy >= first => {
            if second.is_none_or(|(second, _)| energy < second) {
                best[1] = candidate;
            }
        }
        _ => {
            best[1] = best[0];
            best[0] = candidate;
        }
    }
}

/// Infers backbone hydrogen bonds between amino monomers.
#[derive(Debug, Clone)]
pub struct HydrogenBondDetector {
    config: HydrogenBondConfig,
}

impl HydrogenBondDetector {
    pub fn new(config: HydrogenBondConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HydrogenBondConfig {
        &self.config
    }

    /// Finds up to two acceptors per donor, ranked by energy.
    ///
    /// Donors are the backbone nitrogens of amino monomers, except the first
    /// monomer of each polymer and prolines. Acceptors are carbonyl oxygens of
    /// amino monomers in the same model whose alpha carbon lies within
    /// `max_alpha_distance` of the donor's, excluding the donor and its direct
    /// sequence neighbors. Requires a finalized system.
    #[instrument(skip_all, name = "hydrogen_bond_detection")]
    pub fn detect(&self, system: &MolecularSystem) -> Vec<HydrogenBond> {
        let residues = collect_backbone(system, self.config.nh_bond_length);

        let mut by_model: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, residue) in residues.iter().enumerate() {
            by_model.entry(residue.model_index).or_default().push(index);
        }

        let max_alpha2 = self.config.max_alpha_distance * self.config.max_alpha_distance;
        let mut hbonds = Vec::new();

        for members in by_model.values() {
            let alpha_positions: Vec<[f64; 3]> = members
                .iter()
                .map(|&i| residues[i].alpha.coords.into())
                .collect();
            let kdtree: KdTree<f64, 3> = (&alpha_positions).into();

            for &donor_index in members {
                let donor = &residues[donor_index];
                let Some(hydrogen) = donor.hydrogen else {
                    continue;
                };

                let mut best = [None; MAX_ACCEPTORS_PER_DONOR];
                let query: [f64; 3] = donor.alpha.coords.into();
                for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(&query, max_alpha2) {
                    let acceptor_index = members[neighbour.item as usize];
                    let acceptor = &residues[acceptor_index];
                    if acceptor_index == donor_index
                        || neighbour.distance > max_alpha2
                        || (acceptor.polymer == donor.polymer
                            && acceptor.position.abs_diff(donor.position) <= 1)
                    {
                        continue;
                    }
                    let energy = hbond_energy(&donor.n, &hydrogen, &acceptor.c, &acceptor.o, &self.config);
                    if let Some(energy) = energy.filter(|&e| e < 0.0) {
                        rank_candidate(&mut best, energy, acceptor_index);
                    }
                }

                for (energy, acceptor_index) in best.into_iter().flatten() {
                    let acceptor = &residues[acceptor_index];
                    let kind = if acceptor.polymer == donor.polymer {
                        HydrogenBondKind::from_offset(
                            donor.position as isize - acceptor.position as isize,
                        )
                    } else {
                        HydrogenBondKind::Regular
                    };
                    hbonds.push(HydrogenBond {
                        donor: donor.group,
                        acceptor: acceptor.group,
                        nitrogen: donor.nitrogen,
                        oxygen: acceptor.oxygen,
                        energy,
                        kind,
                    });
                }
            }
        }

        info!(
            residues = residues.len(),
            hbonds = hbonds.len(),
            "Backbone hydrogen bond detection complete."
        );
        hbonds
    }

    /// Detects hydrogen bonds and records each as a `Hydrogen` bond from the
    /// donor nitrogen to the acceptor oxygen.
    pub fn apply(&self, system: &mut MolecularSystem) -> Vec<HydrogenBond> {
        let hbonds = self.detect(system);
        let before = system.bonds().len();
        for hbond in &hbonds {
            system.add_bond(hbond.nitrogen, hbond.oxygen, BondOrder::Hydrogen(hbond.kind));
        }
        debug!(
            created = system.bonds().len() - before,
            "Recorded hydrogen bonds."
        );
        hbonds
    }
}

fn collect_backbone(system: &MolecularSystem, nh_bond_length: f64) -> Vec<BackboneResidue> {
    let mut residues = Vec::new();

    for (polymer_index, polymer) in system
        .polymers()
        .iter()
        .filter(|p| p.kind == PolymerKind::Amino)
        .enumerate()
    {
        let start = residues.len();
        let mut previous: Option<BackboneResidue> = None;

        for (position, &group_id) in polymer.groups.iter().enumerate() {
            let Some(mut residue) = backbone_residue(system, group_id, polymer_index, position)
            else {
                previous = None;
                continue;
            };

            let is_proline = system
                .group(group_id)
                .is_some_and(|g| system.registry().is_proline(g.name_id));
            if !is_proline {
                residue.hydrogen = previous
                    .filter(|prev| prev.position + 1 == position)
                    .and_then(|prev| {
                        calculate_amide_hydrogen(&residue.n, &prev.c, &prev.o, nh_bond_length)
                    });
            }
            previous = Some(residue);
            residues.push(residue);
        }
        debug!(
            polymer = polymer_index,
            residues = residues.len() - start,
            "Collected backbone residues."
        );
    }
    residues
}

fn backbone_residue(
    system: &MolecularSystem,
    group_id: GroupId,
    polymer: usize,
    position: usize,
) -> Option<BackboneResidue> {
    let MonomerKind::Amino {
        nitrogen,
        alpha_carbon,
        carbonyl_carbon,
        carbonyl_oxygen,
    } = *system.group(group_id)?.kind()
    else {
        return None;
    };
    let n = system.atom(nitrogen)?;
    Some(BackboneResidue {
        group: group_id,
        polymer,
        position,
        model_index: n.model_index,
        nitrogen,
        n: n.position,
        alpha: system.atom(alpha_carbon)?.position,
        c: system.atom(carbonyl_carbon)?.position,
        oxygen: carbonyl_oxygen,
        o: system.atom(carbonyl_oxygen)?.position,
        hydrogen: None,
    })
}

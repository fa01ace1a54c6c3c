use crate::core::models::ids::{ChainId, GroupId};
use crate::core::models::monomer::{MonomerKind, PolymerKind};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::calculate_dihedral;
use nalgebra::Point3;
use tracing::{debug, instrument};

/// Backbone conformation class of a residue, from its phi/psi angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Helix,
    Sheet,
    Turn,
}

impl StructureKind {
    /// Classifies a `(phi, psi)` pair in degrees; the windows are disjoint.
    pub fn classify(phi: f64, psi: f64) -> Option<Self> {
        let within = |value: f64, low: f64, high: f64| (low..=high).contains(&value);

        if within(phi, -160.0, 0.0) && within(psi, -100.0, 45.0) {
            Some(Self::Helix)
        } else if (within(phi, -180.0, -10.0) && within(psi, 70.0, 180.0))
            || (within(phi, -180.0, -45.0) && within(psi, -180.0, -130.0))
            || (within(phi, 140.0, 180.0) && within(psi, 90.0, 180.0))
        {
            Some(Self::Sheet)
        } else if within(phi, 30.0, 90.0) && within(psi, -15.0, 95.0) {
            Some(Self::Turn)
        } else {
            None
        }
    }

    /// Fewest consecutive residues of this kind that form a segment.
    pub fn min_run(&self) -> usize {
        match self {
            Self::Helix => 4,
            Self::Sheet | Self::Turn => 3,
        }
    }
}

/// A contiguous stretch of one amino polymer sharing a conformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryStructure {
    pub kind: StructureKind,
    pub chain_id: ChainId,
    pub groups: Vec<GroupId>,
}

#[derive(Debug, Clone, Copy)]
struct Backbone {
    n: Point3<f64>,
    alpha: Point3<f64>,
    c: Point3<f64>,
}

/// Assigns helices, sheets and turns to every amino polymer from backbone
/// torsions.
///
/// Residue `i` is tagged from the psi angle of `i` and the phi angle of
/// `i + 1`, so the last residue of a polymer is never tagged. Runs of at
/// least [`StructureKind::min_run`] equally tagged residues become
/// segments, reported in polymer and sequence order.
#[instrument(skip_all, name = "secondary_structure")]
pub fn assign_structures(system: &MolecularSystem) -> Vec<SecondaryStructure> {
    let mut structures = Vec::new();

    for polymer in system.polymers() {
        if polymer.kind != PolymerKind::Amino {
            continue;
        }
        let backbone: Vec<Option<Backbone>> = polymer
            .groups
            .iter()
            .map(|&id| backbone(system, id))
            .collect();
        let tags = tag_residues(&backbone);

        let mut start = 0;
        while start < tags.len() {
            let Some(kind) = tags[start] else {
                start += 1;
                continue;
            };
            let end = tags[start..]
                .iter()
                .position(|&tag| tag != Some(kind))
                .map_or(tags.len(), |run| start + run);
            if end - start >= kind.min_run() {
                structures.push(SecondaryStructure {
                    kind,
                    chain_id: polymer.chain_id,
                    groups: polymer.groups[start..end].to_vec(),
                });
            }
            start = end;
        }
    }

    debug!(segments = structures.len(), "Assigned secondary structure.");
    structures
}

fn tag_residues(backbone: &[Option<Backbone>]) -> Vec<Option<StructureKind>> {
    let mut tags = vec![None; backbone.len()];
    for (i, pair) in backbone.windows(2).enumerate() {
        let (Some(leading), Some(trailing)) = (pair[0], pair[1]) else {
            continue;
        };
        let phi = calculate_dihedral(&leading.c, &trailing.n, &trailing.alpha, &trailing.c);
        let psi = calculate_dihedral(&leading.n, &leading.alpha, &leading.c, &trailing.n);
        if let (Some(phi), Some(psi)) = (phi, psi) {
            tags[i] = StructureKind::classify(phi, psi);
        }
    }
    tags
}

fn backbone(system: &MolecularSystem, group_id: GroupId) -> Option<Backbone> {
    let MonomerKind::Amino {
        nitrogen,
        alpha_carbon,
        carbonyl_carbon,
        ..
    } = *system.group(group_id)?.kind()
    else {
        return None;
    };
    Some(Backbone {
        n: system.atom(nitrogen)?.position,
        alpha: system.atom(alpha_carbon)?.position,
        c: system.atom(carbonyl_carbon)?.position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    const ALPHA_HELIX: (f64, f64) = (-57.0, -47.0);
    const BETA_STRAND: (f64, f64) = (-120.0, 130.0);
    const LEFT_TURN: (f64, f64) = (60.0, 30.0);

    /// Places `d` so that `|cd| = length`, angle `bcd = angle` and torsion
    /// `abcd = torsion` (degrees).
    fn place(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        length: f64,
        angle: f64,
        torsion: f64,
    ) -> Point3<f64> {
        let bc = (c - b).normalize();
        let n = (b - a).cross(&bc).normalize();
        let m = n.cross(&bc);
        let (angle, torsion) = (angle.to_radians(), torsion.to_radians());
        let along = -angle.cos();
        let (across, up) = (angle.sin() * torsion.cos(), angle.sin() * torsion.sin());
        c + (bc * along + m * across + n * up) * length
    }

    /// Builds one chain of ideal trans-peptide residues. `torsions[i]` holds
    /// the phi of residue `i + 1` and the psi of residue `i`.
    fn create_chain(torsions: &[(f64, f64)]) -> (MolecularSystem, Vec<GroupId>) {
        let backbone_angle = 111.2f64.to_radians();
        let mut n = Point3::new(1.458, 0.0, 0.0);
        let mut alpha = Point3::origin();
        let mut c = Point3::new(1.525 * backbone_angle.cos(), 1.525 * backbone_angle.sin(), 0.0);

        let mut system = MolecularSystem::new();
        let chain = system.add_chain(0, 'A');
        let mut groups = Vec::new();
        for i in 0..=torsions.len() {
            let (phi_next, psi) = torsions.get(i).copied().unwrap_or((-60.0, 120.0));
            let next_n = place(&n, &alpha, &c, 1.329, 116.2, psi);
            let o = place(&n, &alpha, &c, 1.231, 120.5, psi + 180.0);

            let group = system.add_group(chain, i as isize + 1, "ALA").unwrap();
            for (name, element, position) in
                [("N", "N", n), ("CA", "C", alpha), ("C", "C", c), ("O", "O", o)]
            {
                system
                    .add_atom_to_group(group, Atom::new(name, element, position))
                    .unwrap();
            }
            groups.push(group);

            let next_alpha = place(&alpha, &c, &next_n, 1.458, 121.7, 180.0);
            let next_c = place(&c, &next_n, &next_alpha, 1.525, 111.2, phi_next);
            (n, alpha, c) = (next_n, next_alpha, next_c);
        }
        system.finalize();
        (system, groups)
    }

    mod classification {
        use super::*;

        #[test]
        fn angle_windows_are_inclusive() {
            assert_eq!(StructureKind::classify(-160.0, -100.0), Some(StructureKind::Helix));
            assert_eq!(StructureKind::classify(0.0, 45.0), Some(StructureKind::Helix));
            assert_eq!(StructureKind::classify(-180.0, -130.0), Some(StructureKind::Sheet));
            assert_eq!(StructureKind::classify(150.0, 100.0), Some(StructureKind::Sheet));
            assert_eq!(StructureKind::classify(30.0, 95.0), Some(StructureKind::Turn));
            assert_eq!(StructureKind::classify(100.0, 0.0), None);
        }

        #[test]
        fn gaps_between_windows_are_unassigned() {
            assert_eq!(StructureKind::classify(-160.5, 0.0), None);
            assert_eq!(StructureKind::classify(10.0, 0.0), None);
            assert_eq!(StructureKind::classify(-60.0, 50.0), None);
        }
    }

    mod assignment {
        use super::*;

        #[test]
        fn built_chain_reproduces_its_torsions() {
            let (system, groups) = create_chain(&[ALPHA_HELIX; 3]);
            let residues: Vec<_> = groups
                .iter()
                .map(|&id| backbone(&system, id).unwrap())
                .collect();
            let (first, second) = (residues[0], residues[1]);
            let phi = calculate_dihedral(&first.c, &second.n, &second.alpha, &second.c);
            let psi = calculate_dihedral(&first.n, &first.alpha, &first.c, &second.n);
            assert!((phi.unwrap() - ALPHA_HELIX.0).abs() < 1e-6);
            assert!((psi.unwrap() - ALPHA_HELIX.1).abs() < 1e-6);
        }

        #[test]
        fn ideal_alpha_helix_is_one_helix_segment() {
            let (system, groups) = create_chain(&[ALPHA_HELIX; 7]);
            let structures = assign_structures(&system);

            assert_eq!(structures.len(), 1);
            assert_eq!(structures[0].kind, StructureKind::Helix);
            assert_eq!(structures[0].groups, groups[..7].to_vec());
        }

        #[test]
        fn extended_strand_is_a_sheet() {
            let (system, groups) = create_chain(&[BETA_STRAND; 5]);
            let structures = assign_structures(&system);

            assert_eq!(structures.len(), 1);
            assert_eq!(structures[0].kind, StructureKind::Sheet);
            assert_eq!(structures[0].groups, groups[..5].to_vec());
        }

        #[test]
        fn left_handed_stretch_is_a_turn() {
            let (system, groups) = create_chain(&[LEFT_TURN; 4]);
            let structures = assign_structures(&system);

            assert_eq!(structures.len(), 1);
            assert_eq!(structures[0].kind, StructureKind::Turn);
            assert_eq!(structures[0].groups, groups[..4].to_vec());
        }

        #[test]
        fn helix_needs_four_residues() {
            let (system, _) =
                create_chain(&[ALPHA_HELIX, ALPHA_HELIX, ALPHA_HELIX, BETA_STRAND, LEFT_TURN]);
            assert!(assign_structures(&system).is_empty());
        }

        #[test]
        fn mixed_chain_yields_segments_in_sequence_order() {
            let mut torsions = vec![ALPHA_HELIX; 5];
            torsions.extend([BETA_STRAND; 3]);
            let (system, groups) = create_chain(&torsions);
            let structures = assign_structures(&system);

            assert_eq!(structures.len(), 2);
            assert_eq!(structures[0].kind, StructureKind::Helix);
            assert_eq!(structures[0].groups, groups[..5].to_vec());
            assert_eq!(structures[1].kind, StructureKind::Sheet);
            assert_eq!(structures[1].groups, groups[5..8].to_vec());
        }

        #[test]
        fn non_amino_groups_are_never_tagged() {
            let mut system = MolecularSystem::new();
            let chain = system.add_chain(0, 'A');
            for i in 0..6 {
                let group = system.add_group(chain, i + 1, "HOH").unwrap();
                system
                    .add_atom_to_group(group, Atom::new("OW", "O", Point3::new(i as f64 * 3.0, 0.0, 0.0)))
                    .unwrap();
            }
            system.finalize();
            assert!(assign_structures(&system).is_empty());
        }
    }
}

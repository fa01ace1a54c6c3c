use super::group::Group;
use super::ids::{ChainId, GroupId};
use phf::{Map, phf_map};

const ROLE_N: u8 = 1 << 0;
const ROLE_CA: u8 = 1 << 1;
const ROLE_C: u8 = 1 << 2;
const ROLE_O: u8 = 1 << 3;
const ROLE_P: u8 = 1 << 4;
const ROLE_O3_PRIME: u8 = 1 << 5;
const ROLE_C4_PRIME: u8 = 1 << 6;

const AMINO_ROLES: u8 = ROLE_N | ROLE_CA | ROLE_C | ROLE_O;
const NUCLEIC_ROLES: u8 = ROLE_P | ROLE_C4_PRIME;

static ATOM_ROLES: Map<&'static str, u8> = phf_map! {
    "N" => ROLE_N,
    "CA" => ROLE_CA,
    "C" => ROLE_C,
    "O" => ROLE_O,
    "P" => ROLE_P,
    "O3'" => ROLE_O3_PRIME, "O3*" => ROLE_O3_PRIME,
    "C4'" => ROLE_C4_PRIME, "C4*" => ROLE_C4_PRIME,
};

/// What a group is, once its atoms are known.
///
/// Chosen from the set of special backbone atoms present in the group; the
/// variants carry the atom indices later passes need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonomerKind {
    Amino {
        nitrogen: usize,
        alpha_carbon: usize,
        carbonyl_carbon: usize,
        carbonyl_oxygen: usize,
    },
    Nucleic {
        phosphorus: usize,
        o3_prime: Option<usize>,
    },
    /// Alpha-carbon-only trace.
    Alpha {
        alpha_carbon: usize,
    },
    #[default]
    Generic,
}

impl MonomerKind {
    pub fn classify(group: &Group) -> Self {
        let mask = group
            .atom_names()
            .filter_map(|(name, _)| ATOM_ROLES.get(name))
            .fold(0u8, |mask, &bit| mask | bit);
        let find = |names: &[&str]| names.iter().find_map(|n| group.atom_index_by_name(n));

        if mask & AMINO_ROLES == AMINO_ROLES {
            if let (Some(nitrogen), Some(alpha_carbon), Some(carbonyl_carbon), Some(carbonyl_oxygen)) =
                (find(&["N"]), find(&["CA"]), find(&["C"]), find(&["O"]))
            {
                return Self::Amino {
                    nitrogen,
                    alpha_carbon,
                    carbonyl_carbon,
                    carbonyl_oxygen,
                };
            }
        }
        if mask & NUCLEIC_ROLES == NUCLEIC_ROLES {
            if let Some(phosphorus) = find(&["P"]) {
                return Self::Nucleic {
                    phosphorus,
                    o3_prime: find(&["O3'", "O3*"]),
                };
            }
        }
        if mask & ROLE_CA != 0 {
            if let Some(alpha_carbon) = find(&["CA"]) {
                return Self::Alpha { alpha_carbon };
            }
        }
        Self::Generic
    }

    /// The atom that represents this monomer along its polymer trace.
    pub fn lead_atom(&self) -> Option<usize> {
        match self {
            Self::Amino { alpha_carbon, .. } | Self::Alpha { alpha_carbon } => Some(*alpha_carbon),
            Self::Nucleic { phosphorus, .. } => Some(*phosphorus),
            Self::Generic => None,
        }
    }

    pub fn polymer_kind(&self) -> Option<PolymerKind> {
        match self {
            Self::Amino { .. } => Some(PolymerKind::Amino),
            Self::Nucleic { .. } => Some(PolymerKind::Nucleic),
            Self::Alpha { .. } => Some(PolymerKind::Alpha),
            Self::Generic => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolymerKind {
    Amino,
    Nucleic,
    Alpha,
}

/// A run of consecutive same-kind monomers within one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polymer {
    pub chain_id: ChainId,
    pub kind: PolymerKind,
    pub groups: Vec<GroupId>,
}

impl Polymer {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::registry::GroupRegistry;
    use slotmap::KeyData;

    fn group_with_atoms(names: &[&str]) -> Group {
        let mut registry = GroupRegistry::with_standard_groups();
        let mut group = Group::new(1, registry.intern("UNK"), ChainId::from(KeyData::from_ffi(1)));
        for (index, name) in names.iter().enumerate() {
            group.add_atom(name, index + 100);
        }
        group
    }

    #[test]
    fn full_backbone_is_classified_as_amino() {
        let group = group_with_atoms(&["N", "CA", "C", "O", "CB"]);
        assert_eq!(
            MonomerKind::classify(&group),
            MonomerKind::Amino {
                nitrogen: 100,
                alpha_carbon: 101,
                carbonyl_carbon: 102,
                carbonyl_oxygen: 103,
            }
        );
    }

    #[test]
    fn phosphate_and_sugar_atoms_are_classified_as_nucleic() {
        let group = group_with_atoms(&["P", "OP1", "C4*", "O3*"]);
        assert_eq!(
            MonomerKind::classify(&group),
            MonomerKind::Nucleic {
                phosphorus: 100,
                o3_prime: Some(103),
            }
        );
    }

    #[test]
    fn lone_alpha_carbon_is_classified_as_alpha_trace() {
        let group = group_with_atoms(&["CA"]);
        assert_eq!(
            MonomerKind::classify(&group),
            MonomerKind::Alpha { alpha_carbon: 100 }
        );
    }

    #[test]
    fn partial_backbone_falls_back_to_alpha() {
        let group = group_with_atoms(&["N", "CA", "C"]);
        assert!(matches!(MonomerKind::classify(&group), MonomerKind::Alpha { .. }));
    }

    #[test]
    fn unrelated_atoms_are_generic() {
        let group = group_with_atoms(&["FE", "NA", "NB"]);
        assert_eq!(MonomerKind::classify(&group), MonomerKind::Generic);
        assert_eq!(MonomerKind::Generic.lead_atom(), None);
    }

    #[test]
    fn lead_atom_and_polymer_kind_follow_variant() {
        let amino = MonomerKind::Amino {
            nitrogen: 0,
            alpha_carbon: 1,
            carbonyl_carbon: 2,
            carbonyl_oxygen: 3,
        };
        assert_eq!(amino.lead_atom(), Some(1));
        assert_eq!(amino.polymer_kind(), Some(PolymerKind::Amino));

        let nucleic = MonomerKind::Nucleic {
            phosphorus: 9,
            o3_prime: None,
        };
        assert_eq!(nucleic.lead_atom(), Some(9));
        assert_eq!(nucleic.polymer_kind(), Some(PolymerKind::Nucleic));
    }
}

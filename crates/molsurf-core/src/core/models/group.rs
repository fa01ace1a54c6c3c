use super::ids::ChainId;
use super::monomer::MonomerKind;
use crate::core::topology::registry::GroupNameId;
use std::collections::HashMap;

/// A residue-like group of atoms within a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub sequence_number: isize,
    /// Interned name in the system's registry.
    pub name_id: GroupNameId,
    pub chain_id: ChainId,
    pub(crate) atoms: Vec<usize>,
    atom_name_map: HashMap<String, usize>,
    /// Assigned when the system is finalized.
    pub(crate) kind: MonomerKind,
}

impl Group {
    pub(crate) fn new(sequence_number: isize, name_id: GroupNameId, chain_id: ChainId) -> Self {
        Self {
            sequence_number,
            name_id,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
            kind: MonomerKind::Generic,
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_index: usize) {
        self.atoms.push(atom_index);
        self.atom_name_map
            .insert(atom_name.trim().to_string(), atom_index);
    }

    pub(crate) fn remove_atom(&mut self, atom_name: &str, atom_index: usize) {
        self.atoms.retain(|&index| index != atom_index);
        if self.atom_name_map.get(atom_name.trim()) == Some(&atom_index) {
            self.atom_name_map.remove(atom_name.trim());
        }
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    pub fn atom_index_by_name(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name).copied()
    }

    pub fn atom_names(&self) -> impl Iterator<Item = (&str, usize)> {
        self.atom_name_map
            .iter()
            .map(|(name, &index)| (name.as_str(), index))
    }

    pub fn kind(&self) -> &MonomerKind {
        &self.kind
    }
}

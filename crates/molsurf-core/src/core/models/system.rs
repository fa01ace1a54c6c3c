use super::atom::Atom;
use super::chain::Chain;
use super::group::Group;
use super::ids::{ChainId, GroupId};
use super::monomer::{MonomerKind, Polymer};
use super::topology::{Bond, BondOrder};
use crate::core::spatial::forest::SpatialForest;
use crate::core::spatial::point::IndexedPoint;
use crate::core::topology::registry::GroupRegistry;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::cell::OnceCell;
use std::collections::HashMap;

/// A complete molecular structure: atoms, groups, chains, models and bonds.
///
/// Atoms are stored by stable index. Deleting an atom leaves an empty slot
/// behind, so indices held by bonds, groups and callers stay valid.
///
/// The spatial index over atom positions is built on first use and dropped by
/// every operation that adds, removes or moves an atom.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Atom slots; `None` marks a deleted atom.
    atoms: Vec<Option<Atom>>,
    /// Primary storage for groups using a slot map for efficient ID management.
    groups: SlotMap<GroupId, Group>,
    /// Primary storage for chains using a slot map for efficient ID management.
    chains: SlotMap<ChainId, Chain>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Lookup map for finding groups by chain ID and sequence number.
    group_id_map: HashMap<(ChainId, isize), GroupId>,
    /// Lookup map for finding chains by model index and identifier.
    chain_id_map: HashMap<(usize, char), ChainId>,
    /// Bonded partners of each atom slot.
    bond_adjacency: Vec<Vec<usize>>,
    /// Group-name interning owned by this system.
    registry: GroupRegistry,
    /// Lazily built per-model spatial index.
    spatial_index: OnceCell<SpatialForest>,
}

impl MolecularSystem {
    /// Creates an empty system with the standard group-name registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: GroupRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Retrieves an atom by its stable index.
    ///
    /// # Return
    ///
    /// Returns `None` if the index was never assigned or the atom was deleted.
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index).and_then(Option::as_ref)
    }

    /// Returns an iterator over all live atoms.
    ///
    /// # Return
    ///
    /// An iterator yielding `(index, &Atom)` pairs in index order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (usize, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|atom| (index, atom)))
    }

    /// Number of live atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.iter().flatten().count()
    }

    /// Number of atom slots ever assigned, including deleted ones.
    pub fn atom_slot_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of models, i.e. one past the highest model index of a live atom.
    pub fn model_count(&self) -> usize {
        self.atoms_iter()
            .map(|(_, atom)| atom.model_index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn max_bonding_radius(&self) -> f64 {
        self.atoms_iter()
            .map(|(_, atom)| atom.bonding_radius)
            .fold(0.0, f64::max)
    }

    pub fn max_vdw_radius(&self) -> f64 {
        self.atoms_iter()
            .map(|(_, atom)| atom.vdw_radius)
            .fold(0.0, f64::max)
    }

    /// Adds an atom that does not belong to any group.
    ///
    /// # Return
    ///
    /// The stable index assigned to the atom.
    pub fn add_atom(&mut self, mut atom: Atom) -> usize {
        atom.group_id = None;
        self.push_atom(atom)
    }

    /// Moves an atom, invalidating the spatial index.
    ///
    /// # Return
    ///
    /// Returns `None` if the atom does not exist.
    pub fn set_atom_position(&mut self, index: usize, position: Point3<f64>) -> Option<()> {
        let atom = self.atoms.get_mut(index)?.as_mut()?;
        atom.position = position;
        self.invalidate_spatial_index();
        Some(())
    }

    /// Deletes an atom together with its bonds and group membership.
    ///
    /// # Return
    ///
    /// The removed atom, or `None` if it did not exist.
    pub fn delete_atom(&mut self, index: usize) -> Option<Atom> {
        let atom = self.atoms.get_mut(index)?.take()?;

        if let Some(group) = atom.group_id.and_then(|id| self.groups.get_mut(id)) {
            group.remove_atom(&atom.name, index);
        }
        for partner in std::mem::take(&mut self.bond_adjacency[index]) {
            self.bond_adjacency[partner].retain(|&other| other != index);
        }
        self.bonds.retain(|bond| !bond.contains(index));

        self.invalidate_spatial_index();
        Some(atom)
    }

    /// Adds a chain, or returns the existing one with the same model and identifier.
    pub fn add_chain(&mut self, model_index: usize, id: char) -> ChainId {
        if let Some(&chain_id) = self.chain_id_map.get(&(model_index, id)) {
            return chain_id;
        }
        let chain_id = self.chains.insert(Chain::new(id, model_index));
        self.chain_id_map.insert((model_index, id), chain_id);
        chain_id
    }

    /// Adds a group to a chain.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The parent chain.
    /// * `sequence_number` - Sequence number, unique within the chain.
    /// * `name` - Group name, interned in this system's registry.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist or the sequence number is taken.
    pub fn add_group(
        &mut self,
        chain_id: ChainId,
        sequence_number: isize,
        name: &str,
    ) -> Option<GroupId> {
        if !self.chains.contains_key(chain_id)
            || self.group_id_map.contains_key(&(chain_id, sequence_number))
        {
            return None;
        }
        let name_id = self.registry.intern(name);
        let group_id = self
            .groups
            .insert(Group::new(sequence_number, name_id, chain_id));
        self.group_id_map.insert((chain_id, sequence_number), group_id);
        self.chains[chain_id].groups.push(group_id);
        Some(group_id)
    }

    /// Adds an atom to a group; the atom inherits the chain's model index.
    ///
    /// # Return
    ///
    /// The stable index of the new atom, or `None` if the group does not exist.
    pub fn add_atom_to_group(&mut self, group_id: GroupId, mut atom: Atom) -> Option<usize> {
        let chain_id = self.groups.get(group_id)?.chain_id;
        atom.model_index = self.chains.get(chain_id)?.model_index;
        atom.group_id = Some(group_id);
        let name = atom.name.clone();
        let index = self.push_atom(atom);
        self.groups[group_id].add_atom(&name, index);
        Some(index)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn groups_iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter()
    }

    pub fn group_name(&self, id: GroupId) -> Option<&str> {
        self.registry.name(self.groups.get(id)?.name_id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn find_chain(&self, model_index: usize, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&(model_index, id)).copied()
    }

    pub fn find_group(&self, chain_id: ChainId, sequence_number: isize) -> Option<GroupId> {
        self.group_id_map.get(&(chain_id, sequence_number)).copied()
    }

    /// Assigns every group its [`MonomerKind`] from the atoms it now holds.
    pub fn finalize(&mut self) {
        for group in self.groups.values_mut() {
            group.kind = MonomerKind::classify(group);
        }
    }

    /// Splits every chain into runs of consecutive monomers of the same
    /// polymer kind. Generic groups break a run.
    pub fn polymers(&self) -> Vec<Polymer> {
        let mut polymers = Vec::new();
        for (chain_id, chain) in self.chains.iter() {
            let mut current: Option<Polymer> = None;
            for &group_id in &chain.groups {
                let kind = self.groups[group_id].kind.polymer_kind();
                if let (Some(polymer), Some(kind)) = (current.as_mut(), kind) {
                    if polymer.kind == kind {
                        polymer.groups.push(group_id);
                        continue;
                    }
                }
                polymers.extend(current.take());
                current = kind.map(|kind| Polymer {
                    chain_id,
                    kind,
                    groups: vec![group_id],
                });
            }
            polymers.extend(current);
        }
        polymers
    }

    /// Returns a slice of all bonds in the system.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Bonds two atoms. At most one bond exists per atom pair; bonding an
    /// already bonded pair is a no-op.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom does not exist or both indices are equal.
    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Option<()> {
        if a == b {
            return None;
        }
        self.atom(a)?;
        self.atom(b)?;
        if self.is_bonded(a, b) {
            return Some(());
        }
        self.bonds.push(Bond::new(a, b, order));
        self.bond_adjacency[a].push(b);
        self.bond_adjacency[b].push(a);
        Some(())
    }

    pub fn is_bonded(&self, a: usize, b: usize) -> bool {
        match (self.bond_adjacency.get(a), self.bond_adjacency.get(b)) {
            (Some(from_a), Some(from_b)) if from_a.len() <= from_b.len() => from_a.contains(&b),
            (Some(_), Some(from_b)) => from_b.contains(&a),
            _ => false,
        }
    }

    pub fn bonded_neighbors(&self, index: usize) -> Option<&[usize]> {
        self.atom(index)?;
        self.bond_adjacency.get(index).map(Vec::as_slice)
    }

    /// Removes every bond matching `predicate`.
    ///
    /// # Return
    ///
    /// The number of bonds removed.
    pub fn remove_bonds_where(&mut self, mut predicate: impl FnMut(&Bond) -> bool) -> usize {
        let before = self.bonds.len();
        self.bonds.retain(|bond| !predicate(bond));
        let removed = before - self.bonds.len();
        if removed > 0 {
            self.rebuild_bond_adjacency();
        }
        removed
    }

    pub fn delete_covalent_bonds(&mut self) -> usize {
        self.remove_bonds_where(|bond| bond.order.is_covalent())
    }

    pub fn delete_hydrogen_bonds(&mut self) -> usize {
        self.remove_bonds_where(|bond| bond.order.is_hydrogen())
    }

    /// Returns the spatial index over all live atoms, building it if needed.
    pub fn spatial_index(&self) -> &SpatialForest {
        self.spatial_index.get_or_init(|| {
            let mut forest = SpatialForest::new();
            for (index, atom) in self.atoms_iter() {
                forest.add_point(
                    atom.model_index,
                    IndexedPoint::new(atom.position, index, atom.model_index),
                );
            }
            forest
        })
    }

    pub fn has_spatial_index(&self) -> bool {
        self.spatial_index.get().is_some()
    }

    fn invalidate_spatial_index(&mut self) {
        self.spatial_index.take();
    }

    fn push_atom(&mut self, atom: Atom) -> usize {
        let index = self.atoms.len();
        self.atoms.push(Some(atom));
        self.bond_adjacency.push(Vec::new());
        self.invalidate_spatial_index();
        index
    }

    fn rebuild_bond_adjacency(&mut self) {
        self.bond_adjacency.iter_mut().for_each(Vec::clear);
        for bond in &self.bonds {
            self.bond_adjacency[bond.atom1].push(bond.atom2);
            self.bond_adjacency[bond.atom2].push(bond.atom1);
        }
    }
}

use super::config::BondingConfig;
use super::error::EngineError;
use crate::core::models::monomer::PolymerKind;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::core::spatial::point::IndexedPoint;
use tracing::{debug, info, instrument};

// The cursor's radius test is strict; padding lets pairs at exactly the
// bonding limit reach the inclusive check below.
const SEARCH_RADIUS_PADDING: f64 = 1e-6;
const MAX_ALPHA_TRACE_DISTANCE: f64 = 4.2;

/// Decides the covalent bond order implied by the separation of two atoms.
///
/// # Return
///
/// `Some(BondOrder::Single)` when
/// `min_bond_distance² <= distance2 <= (radius_a + radius_b + tolerance)²`,
/// otherwise `None`.
pub fn covalent_bond_order(
    radius_a: f64,
    radius_b: f64,
    distance2: f64,
    config: &BondingConfig,
) -> Option<BondOrder> {
    if distance2 < config.min_bond_distance * config.min_bond_distance {
        return None;
    }
    let limit = radius_a + radius_b + config.tolerance;
    (distance2 <= limit * limit).then_some(BondOrder::Single)
}

/// Infers covalent bonds from interatomic geometry.
#[derive(Debug, Clone)]
pub struct AutoBonder {
    config: BondingConfig,
}

impl AutoBonder {
    pub fn new(config: BondingConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BondingConfig {
        &self.config
    }

    /// Finds every atom pair within bonding range, each pair reported once.
    ///
    /// Each atom queries a hemisphere of radius
    /// `bonding_radius + max_bonding_radius + tolerance` in its own model.
    pub fn find_bonds(&self, system: &MolecularSystem) -> Vec<(usize, usize)> {
        let max_bonding_radius = system.max_bonding_radius();
        let mut cursor = system.spatial_index().cursor();
        let mut pairs = Vec::new();

        for (index, atom) in system.atoms_iter() {
            let origin = IndexedPoint::new(atom.position, index, atom.model_index);
            let search_radius = atom.bonding_radius
                + max_bonding_radius
                + self.config.tolerance
                + SEARCH_RADIUS_PADDING;
            cursor.initialize_hemisphere(atom.model_index, &origin, search_radius);

            while let Some(found) = cursor.next() {
                let Some(other) = system.atom(found.index) else {
                    continue;
                };
                let order = covalent_bond_order(
                    atom.bonding_radius,
                    other.bonding_radius,
                    cursor.found_distance2(),
                    &self.config,
                );
                if order.is_some() {
                    pairs.push((index, found.index));
                }
            }
        }
        pairs
    }

    /// Adds a single bond for every pair within bonding range.
    ///
    /// Pairs that are already bonded are left untouched, so running this twice
    /// creates nothing the second time.
    ///
    /// # Return
    ///
    /// The number of bonds created.
    #[instrument(skip_all, name = "auto_bond")]
    pub fn auto_bond(&self, system: &mut MolecularSystem) -> usize {
        if self.config.delete_existing {
            let removed = system.delete_covalent_bonds();
            debug!(removed, "Removed existing covalent bonds.");
        }

        let pairs = self.find_bonds(system);
        let before = system.bonds().len();
        for (a, b) in pairs {
            system.add_bond(a, b, BondOrder::Single);
        }
        let created = system.bonds().len() - before;

        info!(
            atoms = system.atom_count(),
            created, "Covalent bond inference complete."
        );
        created
    }

    /// Deletes all covalent bonds, then infers them again. Hydrogen and
    /// backbone bonds are kept.
    pub fn rebond(&self, system: &mut MolecularSystem) -> usize {
        let removed = system.delete_covalent_bonds();
        debug!(removed, "Cleared covalent bonds for rebonding.");
        self.auto_bond(system)
    }

    /// Links consecutive alpha carbons of CA-only polymers with
    /// [`BondOrder::Backbone`] bonds when they are close enough to be
    /// sequence neighbors. Requires a finalized system.
    #[instrument(skip_all, name = "connect_alpha_traces")]
    pub fn connect_alpha_traces(&self, system: &mut MolecularSystem) -> usize {
        let mut links = Vec::new();
        for polymer in system.polymers() {
            if polymer.kind != PolymerKind::Alpha {
                continue;
            }
            let leads: Vec<usize> = polymer
                .groups
                .iter()
                .filter_map(|&id| system.group(id)?.kind().lead_atom())
                .collect();
            for pair in leads.windows(2) {
                if let (Some(a), Some(b)) = (system.atom(pair[0]), system.atom(pair[1])) {
                    let d2 = (a.position - b.position).norm_squared();
                    if d2 <= MAX_ALPHA_TRACE_DISTANCE * MAX_ALPHA_TRACE_DISTANCE {
                        links.push((pair[0], pair[1]));
                    }
                }
            }
        }

        let before = system.bonds().len();
        for (a, b) in links {
            system.add_bond(a, b, BondOrder::Backbone);
        }
        let created = system.bonds().len() - before;
        debug!(created, "Connected alpha-carbon traces.");
        created
    }
}

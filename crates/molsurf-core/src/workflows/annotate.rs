use crate::core::models::system::MolecularSystem;
use crate::engine::bonding::AutoBonder;
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::hbonds::{HydrogenBond, HydrogenBondDetector};
use crate::engine::progress::ProgressReporter;
use crate::engine::secondary::{SecondaryStructure, assign_structures};
use crate::engine::surface::{SurfaceEngine, SurfaceResult};
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct AnnotationResult {
    pub bonds_created: usize,
    pub alpha_links_created: usize,
    pub hbonds: Vec<HydrogenBond>,
    pub structures: Vec<SecondaryStructure>,
    /// `None` when the surface pass is disabled.
    pub surface: Option<SurfaceResult>,
}

/// Annotates `system` in place: classifies monomers, infers covalent bonds,
/// replaces backbone hydrogen bonds, assigns secondary structure, then
/// computes the molecular surface.
///
/// The configuration is validated before anything is touched.
#[instrument(skip_all, name = "annotation_workflow")]
pub fn run(
    system: &mut MolecularSystem,
    config: &EngineConfig,
    reporter: &ProgressReporter,
) -> Result<AnnotationResult, EngineError> {
    config.validate()?;
    let bonder = AutoBonder::new(config.bonding.clone())?;
    let detector = HydrogenBondDetector::new(config.hydrogen_bonds.clone())?;
    let mut surface_engine = SurfaceEngine::new(config.surface.clone())?;

    // === Phase 1: Monomer classification ===
    reporter.phase("Preparation", || system.finalize());
    info!(atoms = system.atom_count(), "Starting annotation.");

    let mut result = AnnotationResult::default();

    // === Phase 2: Covalent bonds ===
    reporter.phase("Bonding", || {
        result.bonds_created = bonder.auto_bond(system);
        if config.bonding.connect_alpha_traces {
            result.alpha_links_created = bonder.connect_alpha_traces(system);
        }
    });

    // === Phase 3: Backbone hydrogen bonds ===
    if config.hydrogen_bonds.enabled {
        reporter.phase("Hydrogen Bonds", || {
            system.delete_hydrogen_bonds();
            result.hbonds = detector.apply(system);
        });
        reporter.message(format!("{} hydrogen bonds", result.hbonds.len()));
    }

    // === Phase 4: Secondary structure ===
    result.structures = reporter.phase("Secondary Structure", || assign_structures(system));

    // === Phase 5: Molecular surface ===
    if config.surface.enabled {
        let surface = reporter.phase("Surface", || surface_engine.compute(system, reporter));
        result.surface = Some(surface);
    }

    info!(
        bonds = system.bonds().len(),
        hbonds = result.hbonds.len(),
        structures = result.structures.len(),
        "Annotation complete."
    );
    Ok(result)
}

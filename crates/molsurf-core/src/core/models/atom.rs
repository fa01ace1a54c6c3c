use super::ids::GroupId;
use crate::core::utils::elements;
use nalgebra::Point3;

/// An atom as seen by the spatial and surface engines.
///
/// Atoms are addressed by their stable index in the owning
/// [`MolecularSystem`](super::system::MolecularSystem); deleting an atom never
/// renumbers the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "O3'").
    pub name: String,
    /// Element symbol (e.g., "C", "Fe").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Radius used to decide covalent bonding distance.
    pub bonding_radius: f64,
    /// Radius used for space filling and surface geometry.
    pub vdw_radius: f64,
    /// Index of the model (alternate structure) the atom belongs to.
    pub model_index: usize,
    /// Parent group, if the atom was added through a group.
    pub group_id: Option<GroupId>,
}

impl Atom {
    /// Creates an atom in model 0 with radii taken from the element table.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
            bonding_radius: elements::bonding_radius(element),
            vdw_radius: elements::vdw_radius(element),
            model_index: 0,
            group_id: None,
        }
    }

    pub fn with_radii(mut self, bonding_radius: f64, vdw_radius: f64) -> Self {
        self.bonding_radius = bonding_radius;
        self.vdw_radius = vdw_radius;
        self
    }

    pub fn in_model(mut self, model_index: usize) -> Self {
        self.model_index = model_index;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_takes_radii_from_element() {
        let atom = Atom::new("CA", "C", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.bonding_radius, 0.68);
        assert_eq!(atom.vdw_radius, 1.70);
        assert_eq!(atom.model_index, 0);
        assert!(atom.group_id.is_none());
    }

    #[test]
    fn builder_methods_override_defaults() {
        let atom = Atom::new("X1", "Xx", Point3::origin())
            .with_radii(0.5, 1.0)
            .in_model(3);
        assert_eq!(atom.bonding_radius, 0.5);
        assert_eq!(atom.vdw_radius, 1.0);
        assert_eq!(atom.model_index, 3);
    }
}

/// Sequence offset between the donor and acceptor residue of a backbone
/// hydrogen bond (`donor - acceptor`), as used for secondary structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HydrogenBondKind {
    #[default]
    Regular,
    Plus2,
    Plus3,
    Plus4,
    Plus5,
    Minus3,
    Minus4,
}

impl HydrogenBondKind {
    pub fn from_offset(offset: isize) -> Self {
        match offset {
            2 => Self::Plus2,
            3 => Self::Plus3,
            4 => Self::Plus4,
            5 => Self::Plus5,
            -3 => Self::Minus3,
            -4 => Self::Minus4,
            _ => Self::Regular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
    /// Virtual bond between consecutive lead atoms of a polymer.
    Backbone,
    Hydrogen(HydrogenBondKind),
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

impl BondOrder {
    pub fn is_covalent(&self) -> bool {
        matches!(
            self,
            Self::Single | Self::Double | Self::Triple | Self::Aromatic
        )
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Self::Hydrogen(_))
    }
}

/// An unordered atom pair plus bond order. `atom1 < atom2` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(a: usize, b: usize, order: BondOrder) -> Self {
        let (atom1, atom2) = if a <= b { (a, b) } else { (b, a) };
        Self {
            atom1,
            atom2,
            order,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the partner of `atom`, or `None` if `atom` is not in this bond.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn covalent_and_hydrogen_orders_are_distinguished() {
        assert!(BondOrder::Double.is_covalent());
        assert!(!BondOrder::Backbone.is_covalent());
        assert!(!BondOrder::Hydrogen(HydrogenBondKind::Regular).is_covalent());
        assert!(BondOrder::Hydrogen(HydrogenBondKind::Minus3).is_hydrogen());
    }

    #[test]
    fn hydrogen_bond_kind_maps_sequence_offsets() {
        assert_eq!(HydrogenBondKind::from_offset(4), HydrogenBondKind::Plus4);
        assert_eq!(HydrogenBondKind::from_offset(-3), HydrogenBondKind::Minus3);
        assert_eq!(HydrogenBondKind::from_offset(-2), HydrogenBondKind::Regular);
        assert_eq!(HydrogenBondKind::from_offset(17), HydrogenBondKind::Regular);
    }

    #[test]
    fn bond_new_canonicalizes_atom_order() {
        let bond = Bond::new(9, 2, BondOrder::Single);
        assert_eq!((bond.atom1, bond.atom2), (2, 9));
        assert_eq!(bond, Bond::new(2, 9, BondOrder::Single));
    }

    #[test]
    fn bond_other_returns_partner_or_none() {
        let bond = Bond::new(3, 5, BondOrder::Single);
        assert!(bond.contains(3));
        assert_eq!(bond.other(3), Some(5));
        assert_eq!(bond.other(5), Some(3));
        assert_eq!(bond.other(4), None);
    }
}

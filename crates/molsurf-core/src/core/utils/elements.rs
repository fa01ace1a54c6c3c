use phf::{Map, phf_map};

pub const DEFAULT_BONDING_RADIUS: f64 = 0.68;
pub const DEFAULT_VDW_RADIUS: f64 = 2.0;

// Symbol => (bonding radius, van der Waals radius), in Angstroms.
static ELEMENT_RADII: Map<&'static str, (f64, f64)> = phf_map! {
    "H" => (0.23, 1.20), "D" => (0.23, 1.20), "HE" => (0.93, 1.40),
    "LI" => (0.68, 1.82), "BE" => (0.35, 1.53), "B" => (0.83, 1.92),
    "C" => (0.68, 1.70), "N" => (0.68, 1.55), "O" => (0.68, 1.52), "F" => (0.64, 1.47),
    "NA" => (0.97, 2.27), "MG" => (1.10, 1.73), "AL" => (1.35, 1.84), "SI" => (1.20, 2.10),
    "P" => (1.05, 1.80), "S" => (1.02, 1.80), "CL" => (0.99, 1.75),
    "K" => (1.33, 2.75), "CA" => (0.99, 2.31), "MN" => (1.35, 2.05), "FE" => (1.34, 2.04),
    "CO" => (1.33, 2.00), "NI" => (1.50, 1.63), "CU" => (1.52, 1.40), "ZN" => (1.45, 1.39),
    "SE" => (1.22, 1.90), "BR" => (1.21, 1.85), "I" => (1.40, 1.98),
};

fn lookup(symbol: &str) -> Option<(f64, f64)> {
    ELEMENT_RADII
        .get(symbol.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Reference covalent bonding radius of an element symbol (case-insensitive).
pub fn bonding_radius(symbol: &str) -> f64 {
    lookup(symbol).map_or(DEFAULT_BONDING_RADIUS, |(bonding, _)| bonding)
}

/// Van der Waals radius of an element symbol (case-insensitive).
pub fn vdw_radius(symbol: &str) -> f64 {
    lookup(symbol).map_or(DEFAULT_VDW_RADIUS, |(_, vdw)| vdw)
}

pub fn is_known_element(symbol: &str) -> bool {
    lookup(symbol).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_elements_have_expected_radii() {
        assert_eq!(bonding_radius("C"), 0.68);
        assert_eq!(vdw_radius("C"), 1.70);
        assert_eq!(vdw_radius("O"), 1.52);
        assert_eq!(bonding_radius("S"), 1.02);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(vdw_radius(" cl "), 1.75);
        assert_eq!(bonding_radius("Fe"), 1.34);
        assert!(is_known_element("zn"));
    }

    #[test]
    fn unknown_elements_fall_back_to_defaults() {
        assert!(!is_known_element("Xx"));
        assert_eq!(bonding_radius("Xx"), DEFAULT_BONDING_RADIUS);
        assert_eq!(vdw_radius(""), DEFAULT_VDW_RADIUS);
    }
}

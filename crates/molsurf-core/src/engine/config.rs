use crate::core::geodesic::sphere::MAX_LEVEL;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

fn ensure(condition: bool, parameter: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: reason.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct BondingConfig {
    /// Added to the sum of bonding radii when deciding whether two atoms bond.
    pub tolerance: f64,
    /// Pairs closer than this are treated as coincident and never bonded.
    pub min_bond_distance: f64,
    /// Remove existing covalent bonds before inferring new ones.
    pub delete_existing: bool,
    /// Link consecutive alpha carbons of CA-only traces with backbone bonds.
    pub connect_alpha_traces: bool,
}

impl Default for BondingConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.45,
            min_bond_distance: 0.4,
            delete_existing: false,
            connect_alpha_traces: true,
        }
    }
}

impl BondingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.tolerance >= 0.0, "tolerance", "must be non-negative")?;
        ensure(
            self.min_bond_distance >= 0.0,
            "min_bond_distance",
            "must be non-negative",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct HydrogenBondConfig {
    pub enabled: bool,
    /// Alpha-carbon separation beyond which a residue pair is never scored (Angstroms).
    pub max_alpha_distance: f64,
    /// Candidates with any scored atom pair closer than this are discarded (Angstroms).
    pub clash_distance: f64,
    /// Energies above this count as non-bonding (kcal/mol).
    pub energy_cutoff: f64,
    /// Energies are clamped to be no lower than this (kcal/mol).
    pub energy_floor: f64,
    /// Distance of the estimated amide hydrogen from its nitrogen (Angstroms).
    pub nh_bond_length: f64,
}

impl Default for HydrogenBondConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_alpha_distance: 9.0,
            clash_distance: std::f64::consts::FRAC_1_SQRT_2,
            energy_cutoff: -0.5,
            energy_floor: -9.9,
            nh_bond_length: 1.0,
        }
    }
}

impl HydrogenBondConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.max_alpha_distance > 0.0,
            "max_alpha_distance",
            "must be positive",
        )?;
        ensure(self.clash_distance >= 0.0, "clash_distance", "must be non-negative")?;
        ensure(self.energy_cutoff <= 0.0, "energy_cutoff", "must not be positive")?;
        ensure(
            self.energy_floor <= self.energy_cutoff,
            "energy_floor",
            "must not exceed energy_cutoff",
        )?;
        ensure(self.nh_bond_length > 0.0, "nh_bond_length", "must be positive")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct SurfaceConfig {
    pub enabled: bool,
    /// Solvent probe radius in Angstroms; zero yields the plain van der Waals surface.
    pub probe_radius: f64,
    /// Geodesic subdivision level used for convex bitmaps.
    pub geodesic_level: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_radius: 1.2,
            geodesic_level: 2,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.probe_radius.is_finite() && self.probe_radius >= 0.0,
            "probe_radius",
            "must be a finite, non-negative number",
        )?;
        ensure(
            self.geodesic_level <= MAX_LEVEL,
            "geodesic_level",
            &format!("must be at most {MAX_LEVEL}"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct EngineConfig {
    pub bonding: BondingConfig,
    pub hydrogen_bonds: HydrogenBondConfig,
    pub surface: SurfaceConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document. Missing tables and keys keep
    /// their defaults; unknown keys are rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bonding.validate()?;
        self.hydrogen_bonds.validate()?;
        self.surface.validate()
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    bond_tolerance: Option<f64>,
    min_bond_distance: Option<f64>,
    delete_existing_bonds: Option<bool>,
    connect_alpha_traces: Option<bool>,
    hydrogen_bonds_enabled: Option<bool>,
    max_alpha_distance: Option<f64>,
    surface_enabled: Option<bool>,
    probe_radius: Option<f64>,
    geodesic_level: Option<usize>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = Some(tolerance);
        self
    }
    pub fn min_bond_distance(mut self, distance: f64) -> Self {
        self.min_bond_distance = Some(distance);
        self
    }
    pub fn delete_existing_bonds(mut self, delete: bool) -> Self {
        self.delete_existing_bonds = Some(delete);
        self
    }
    pub fn connect_alpha_traces(mut self, connect: bool) -> Self {
        self.connect_alpha_traces = Some(connect);
        self
    }
    pub fn hydrogen_bonds(mut self, enabled: bool) -> Self {
        self.hydrogen_bonds_enabled = Some(enabled);
        self
    }
    pub fn max_alpha_distance(mut self, distance: f64) -> Self {
        self.max_alpha_distance = Some(distance);
        self
    }
    pub fn surface(mut self, enabled: bool) -> Self {
        self.surface_enabled = Some(enabled);
        self
    }
    pub fn probe_radius(mut self, radius: f64) -> Self {
        self.probe_radius = Some(radius);
        self
    }
    pub fn geodesic_level(mut self, level: usize) -> Self {
        self.geodesic_level = Some(level);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let bonding_defaults = BondingConfig::default();
        let hbond_defaults = HydrogenBondConfig::default();
        let surface_defaults = SurfaceConfig::default();

        let config = EngineConfig {
            bonding: BondingConfig {
                tolerance: self.bond_tolerance.unwrap_or(bonding_defaults.tolerance),
                min_bond_distance: self
                    .min_bond_distance
                    .unwrap_or(bonding_defaults.min_bond_distance),
                delete_existing: self
                    .delete_existing_bonds
                    .unwrap_or(bonding_defaults.delete_existing),
                connect_alpha_traces: self
                    .connect_alpha_traces
                    .unwrap_or(bonding_defaults.connect_alpha_traces),
            },
            hydrogen_bonds: HydrogenBondConfig {
                enabled: self.hydrogen_bonds_enabled.unwrap_or(hbond_defaults.enabled),
                max_alpha_distance: self
                    .max_alpha_distance
                    .unwrap_or(hbond_defaults.max_alpha_distance),
                ..hbond_defaults
            },
            surface: SurfaceConfig {
                enabled: self.surface_enabled.unwrap_or(surface_defaults.enabled),
                probe_radius: self.probe_radius.unwrap_or(surface_defaults.probe_radius),
                geodesic_level: self.geodesic_level.unwrap_or(surface_defaults.geodesic_level),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

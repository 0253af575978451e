use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::types::feet_to_meters;

/// Converts an R-value in ft²·°F·h/BTU to RSI (m²·K/W).
const R_TO_RSI: f64 = 5.67826;

/// Insulation tier of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MaterialTier {
    Low,
    Medium,
    High,
}

impl MaterialTier {
    /// Uniform draw among the three tiers.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(1..=3) {
            1 => MaterialTier::Low,
            2 => MaterialTier::Medium,
            _ => MaterialTier::High,
        }
    }

    /// Per-unit-thickness R-value range before RSI scaling.
    fn r_range(&self) -> (f64, f64) {
        match self {
            MaterialTier::Low => (1.0, 2.9),
            MaterialTier::Medium => (2.9, 3.8),
            MaterialTier::High => (3.7, 4.3),
        }
    }

    fn emissivity(&self) -> f64 {
        match self {
            MaterialTier::Low => 0.90,
            MaterialTier::Medium => 0.80,
            MaterialTier::High => 0.70,
        }
    }
}

/// Single-layer wall envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallMaterial {
    tier: MaterialTier,
    /// RSI value, m²·K/W
    r_value: f64,
    mass_kg: f64,
    thickness_m: f64,
    emissivity: f64,
}

impl WallMaterial {
    pub const MASS_KG: f64 = 1200.0;

    /// Draw thickness and R-value for the given tier.
    pub fn generate<R: Rng + ?Sized>(tier: MaterialTier, rng: &mut R) -> Self {
        let thickness_units = rng.gen_range(3..=6) as f64;
        let (lo, hi) = tier.r_range();
        let r_value = thickness_units * rng.gen_range(lo..hi) * R_TO_RSI;

        Self {
            tier,
            r_value,
            mass_kg: Self::MASS_KG,
            thickness_m: feet_to_meters(thickness_units),
            emissivity: tier.emissivity(),
        }
    }

    /// Fixed-property wall, mostly for deterministic scenarios.
    pub fn with_r_value(tier: MaterialTier, r_value: f64, thickness_m: f64) -> Self {
        Self {
            tier,
            r_value,
            mass_kg: Self::MASS_KG,
            thickness_m,
            emissivity: tier.emissivity(),
        }
    }

    pub fn tier(&self) -> MaterialTier {
        self.tier
    }

    pub fn r_value(&self) -> f64 {
        self.r_value
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn thickness_m(&self) -> f64 {
        self.thickness_m
    }

    pub fn emissivity(&self) -> f64 {
        self.emissivity
    }
}

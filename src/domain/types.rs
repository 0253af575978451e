use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, SimError};

// ============================================================================
// Unit conversions
// ============================================================================

pub fn fahrenheit_to_celsius(temp_f: f64) -> f64 {
    (temp_f - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(temp_c: f64) -> f64 {
    temp_c * 9.0 / 5.0 + 32.0
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / 3.2808
}

// ============================================================================
// Season / Weather
// ============================================================================

/// Season of the simulated world. Selects the base daily temperature range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Season {
    Fall,
    Winter,
    Spring,
    Summer,
}

impl Season {
    /// Average daily (low, high) outdoor temperature in °F for the
    /// continental US, 2017.
    pub fn base_range_f(&self) -> (f64, f64) {
        match self {
            // September -> November
            Season::Fall => (43.5, 67.8),
            // December -> February
            Season::Winter => (25.9, 43.8),
            // March -> May
            Season::Spring => (41.3, 65.6),
            // June -> August
            Season::Summer => (60.0, 85.3),
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| SimError::UnknownSeason(s.to_string()))
    }
}

/// Weather condition; shifts both daily bounds by a fixed offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weather {
    Cloudy,
    Sunny,
    Rainy,
    Snowy,
}

impl Weather {
    /// Offset in °F applied to both the low and the high bound.
    pub fn offset_f(&self) -> f64 {
        match self {
            Weather::Cloudy => -3.0,
            Weather::Sunny => 3.0,
            Weather::Rainy => -5.0,
            Weather::Snowy => -7.0,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| SimError::UnknownWeather(s.to_string()))
    }
}

// ============================================================================
// Generation bounds
// ============================================================================

/// Optional clamp applied to a generated size (feet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SizeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Clamp `value` into the range. The lower bound is applied first.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut clamped = value;
        if let Some(min) = self.min {
            if clamped < min {
                clamped = min;
            }
        }
        if let Some(max) = self.max {
            if clamped > max {
                clamped = max;
            }
        }
        clamped
    }

    /// Each set side must be finite and strictly positive, and `min <= max`.
    fn validate(&self, name: &'static str) -> Result<()> {
        let invalid = || SimError::InvalidBounds {
            name,
            min: self.min.unwrap_or(f64::NEG_INFINITY),
            max: self.max.unwrap_or(f64::INFINITY),
        };
        if [self.min, self.max]
            .into_iter()
            .flatten()
            .any(|v| !v.is_finite() || v <= 0.0)
        {
            return Err(invalid());
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid());
            }
        }
        Ok(())
    }
}

/// Bounds applied to randomly generated house footprints (feet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBounds {
    pub length_ft: SizeRange,
    pub width_ft: SizeRange,
}

impl GeometryBounds {
    pub fn new(length_ft: SizeRange, width_ft: SizeRange) -> Self {
        Self {
            length_ft,
            width_ft,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.length_ft.validate("length")?;
        self.width_ft.validate("width")
    }
}

/// Display thresholds (°F) used to color-code interior temperatures.
/// They play no part in the physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBounds {
    pub lower_f: f64,
    pub upper_f: f64,
}

impl Default for GradientBounds {
    fn default() -> Self {
        Self {
            lower_f: 32.0,
            upper_f: 78.0,
        }
    }
}

impl GradientBounds {
    pub fn new(lower_f: f64, upper_f: f64) -> Self {
        Self { lower_f, upper_f }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower_f.is_finite() || !self.upper_f.is_finite() || self.lower_f > self.upper_f {
            return Err(SimError::InvalidBounds {
                name: "gradient",
                min: self.lower_f,
                max: self.upper_f,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Interior dimensions of a building in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
}

impl Dimensions {
    pub fn new(length_m: f64, width_m: f64, height_m: f64) -> Self {
        Self {
            length_m,
            width_m,
            height_m,
        }
    }

    pub fn from_feet(length_ft: f64, width_ft: f64, height_ft: f64) -> Self {
        Self::new(
            feet_to_meters(length_ft),
            feet_to_meters(width_ft),
            feet_to_meters(height_ft),
        )
    }

    pub fn volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.height_m
    }

    /// Area of the four exterior walls (roof and floor excluded).
    pub fn wall_area_m2(&self) -> f64 {
        2.0 * (self.length_m * self.height_m + self.width_m * self.height_m)
    }
}

/// Interior air of a building. Owned by the building; children receive it by
/// reference for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirState {
    pub temp_c: f64,
    pub pressure_pa: f64,
}

impl AirState {
    pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

    pub fn new(temp_c: f64) -> Self {
        Self {
            temp_c,
            pressure_pa: Self::STANDARD_PRESSURE_PA,
        }
    }
}

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::{GeometryBounds, GradientBounds, Season, SizeRange, Weather};
use crate::error::SimError;
use crate::simulation::WorldConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "NEIGHBORHOOD_SIM__";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub gradient: GradientBounds,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SimulationConfig {
    pub season: String,
    pub weather: String,
    #[validate(range(min = 1))]
    pub neighborhoods: usize,
    #[validate(range(min = 1))]
    pub homes_per_neighborhood: usize,
    pub steps: u64,
    pub seed: u64,
}

/// Optional footprint clamp in feet. A missing side leaves that side open.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeometryConfig {
    pub min_length_ft: Option<f64>,
    pub max_length_ft: Option<f64>,
    pub min_width_ft: Option<f64>,
    pub max_width_ft: Option<f64>,
}

impl GeometryConfig {
    pub fn bounds(&self) -> GeometryBounds {
        GeometryBounds::new(
            SizeRange {
                min: self.min_length_ft,
                max: self.max_length_ft,
            },
            SizeRange {
                min: self.min_width_ft,
                max: self.max_width_ft,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub snapshot_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("simulation_config.json"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(DEFAULT_CONFIG_PATH))
    }

    /// TOML file at `path` overlaid with `NEIGHBORHOOD_SIM__*` environment variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Self = figment.extract()?;
        cfg.validate().map_err(SimError::from)?;
        Ok(cfg)
    }

    /// Engine configuration. Season and weather names are checked here.
    pub fn world_config(&self) -> crate::error::Result<WorldConfig> {
        let world = WorldConfig::new(
            Season::parse(&self.simulation.season)?,
            Weather::parse(&self.simulation.weather)?,
            self.simulation.neighborhoods,
            self.simulation.homes_per_neighborhood,
        )
        .with_geometry(self.geometry.bounds())
        .with_gradient(self.gradient);
        world.validate()?;
        Ok(world)
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            season: self.simulation.season.to_lowercase(),
            weather: self.simulation.weather.to_lowercase(),
            num_steps: self.simulation.steps,
        }
    }
}

/// Key-value record of a finished run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigSnapshot {
    pub season: String,
    pub weather: String,
    pub num_steps: u64,
}

impl ConfigSnapshot {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("creating config snapshot at {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

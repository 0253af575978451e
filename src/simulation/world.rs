//! # World Orchestrator
//!
//! Owns the climate model, the global clock, the ambient temperature and all
//! neighborhoods, and advances them one second per [`World::step`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, trace, warn};

use super::building::{Building, StepContext};
use super::climate::ClimateModel;
use super::history::TempHistory;
use super::info::{BatteryInfo, BuildingInfo, DeviceInfo, SolarInfo, ThermostatInfo, WorldInfo};
use super::neighborhood::Neighborhood;
use super::observer::{NoopObserver, SimObserver};
use super::SNAPSHOT_INTERVAL;
use crate::domain::{GeometryBounds, GradientBounds, Season, ThermostatMode, Weather};
use crate::error::{Result, SimError};

/// Everything needed to build a world in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub season: Season,
    pub weather: Weather,
    /// Number of neighborhoods
    pub neighborhoods: usize,
    /// Homes generated in each neighborhood
    pub homes_per_neighborhood: usize,
    /// Footprint clamp for generated homes (feet)
    #[serde(default)]
    pub geometry: GeometryBounds,
    /// Display color thresholds (°F)
    #[serde(default)]
    pub gradient: GradientBounds,
}

impl WorldConfig {
    pub fn new(season: Season, weather: Weather, neighborhoods: usize, homes_per_neighborhood: usize) -> Self {
        Self {
            season,
            weather,
            neighborhoods,
            homes_per_neighborhood,
            geometry: GeometryBounds::default(),
            gradient: GradientBounds::default(),
        }
    }

    /// Same as [`WorldConfig::new`] with season and weather given by name.
    pub fn from_names(
        season: &str,
        weather: &str,
        neighborhoods: usize,
        homes_per_neighborhood: usize,
    ) -> Result<Self> {
        Ok(Self::new(
            Season::parse(season)?,
            Weather::parse(weather)?,
            neighborhoods,
            homes_per_neighborhood,
        ))
    }

    pub fn with_geometry(mut self, geometry: GeometryBounds) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_gradient(mut self, gradient: GradientBounds) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.gradient.validate()
    }
}

pub struct World {
    climate: ClimateModel,
    clock: u64,
    ambient_c: f64,
    temp_history: TempHistory,
    neighborhoods: Vec<Neighborhood>,
    /// Clock of the last snapshot.
    data_log_time: u64,
    observer: Box<dyn SimObserver>,
    generated: bool,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("climate", &self.climate)
            .field("clock", &self.clock)
            .field("ambient_c", &self.ambient_c)
            .field("neighborhoods", &self.neighborhoods.len())
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}

impl World {
    /// A configured but empty world. Call [`World::generate`] before stepping.
    pub fn new(season: Season, weather: Weather) -> Self {
        let climate = ClimateModel::configure(season, weather);
        Self {
            ambient_c: climate.midpoint(),
            climate,
            clock: 0,
            temp_history: TempHistory::default(),
            neighborhoods: Vec::new(),
            data_log_time: 0,
            observer: Box::new(NoopObserver),
            generated: false,
        }
    }

    /// Validate `config`, then configure and generate in one go. Nothing is
    /// built if validation fails.
    pub fn configure_and_generate<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let mut world = Self::new(config.season, config.weather);
        world.generate(
            config.neighborhoods,
            config.homes_per_neighborhood,
            &config.geometry,
            config.gradient,
            rng,
        )?;
        Ok(world)
    }

    pub fn with_observer(mut self, observer: Box<dyn SimObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn SimObserver>) {
        self.observer = observer;
    }

    /// Re-derive the temperature bounds. Only allowed before generation.
    pub fn configure(&mut self, season: Season, weather: Weather) -> Result<()> {
        if self.generated {
            return Err(SimError::AlreadyGenerated);
        }
        self.climate = ClimateModel::configure(season, weather);
        self.ambient_c = self.climate.midpoint();
        Ok(())
    }

    /// Build every neighborhood and building and seed all histories at step 0.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        num_neighborhoods: usize,
        homes_per_neighborhood: usize,
        geometry: &GeometryBounds,
        gradient: GradientBounds,
        rng: &mut R,
    ) -> Result<()> {
        if self.generated {
            return Err(SimError::AlreadyGenerated);
        }
        geometry.validate()?;
        gradient.validate()?;

        self.ambient_c = self.climate.midpoint();
        self.ambient_c = self.climate.temp_at(self.clock);

        let (clock, ambient_c) = (self.clock, self.ambient_c);
        let neighborhoods = (0..num_neighborhoods)
            .map(|id| {
                Neighborhood::generate(
                    id,
                    homes_per_neighborhood,
                    geometry,
                    gradient,
                    clock,
                    ambient_c,
                    &mut *rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        self.temp_history = TempHistory::seeded(self.ambient_c);
        self.neighborhoods = neighborhoods;
        self.data_log_time = self.clock;
        self.generated = true;

        info!(
            season = %self.climate.season(),
            weather = %self.climate.weather(),
            lo_temp_c = self.climate.lo_temp(),
            hi_temp_c = self.climate.hi_temp(),
            neighborhoods = num_neighborhoods,
            homes_per_neighborhood,
            "world generated"
        );
        Ok(())
    }

    /// Advance one second.
    pub fn step(&mut self) {
        if !self.generated {
            warn!("step ignored: world has not been generated");
            return;
        }

        self.clock += 1;
        self.ambient_c = self.climate.temp_at(self.clock);

        let log_snapshot = self.clock - self.data_log_time >= SNAPSHOT_INTERVAL;
        if log_snapshot {
            self.data_log_time = self.clock;
        }

        let ctx = StepContext {
            clock: self.clock,
            ambient_c: self.ambient_c,
            observer: self.observer.as_ref(),
        };
        for neighborhood in self.neighborhoods.iter_mut() {
            neighborhood.step(&ctx, log_snapshot);
        }

        self.temp_history.push(self.ambient_c);
        trace!(clock = self.clock, ambient_c = self.ambient_c, "world stepped");
    }

    /// Step `steps` times.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn world_clock(&self) -> u64 {
        self.clock
    }

    pub fn climate(&self) -> &ClimateModel {
        &self.climate
    }

    pub fn season(&self) -> Season {
        self.climate.season()
    }

    pub fn weather(&self) -> Weather {
        self.climate.weather()
    }

    /// Ambient temperature formula evaluated at the current clock.
    pub fn temp_change(&self) -> f64 {
        self.climate.temp_at(self.clock)
    }

    /// Ambient temperature at `step`, or the current one.
    pub fn ambient_temp(&self, step: Option<u64>) -> Result<f64> {
        self.temp_history.at(step)
    }

    pub fn temp_history(&self) -> &TempHistory {
        &self.temp_history
    }

    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    pub fn neighborhood(&self, n_id: usize) -> Result<&Neighborhood> {
        self.neighborhoods
            .get(n_id)
            .ok_or(SimError::UnknownNeighborhood(n_id))
    }

    pub fn building(&self, n_id: usize, h_id: usize) -> Result<&Building> {
        self.neighborhood(n_id)?.building(h_id)
    }

    fn building_mut(&mut self, n_id: usize, h_id: usize) -> Result<&mut Building> {
        self.neighborhoods
            .get_mut(n_id)
            .ok_or(SimError::UnknownNeighborhood(n_id))?
            .building_mut(h_id)
    }

    pub fn building_interior_temp(&self, n_id: usize, h_id: usize, step: Option<u64>) -> Result<f64> {
        self.building(n_id, h_id)?.interior_temp(step)
    }

    pub fn building_color(&self, n_id: usize, h_id: usize, step: Option<u64>) -> Result<String> {
        self.building(n_id, h_id)?.color_gradient(step)
    }

    pub fn building_info(&self, n_id: usize, h_id: usize, step: Option<u64>) -> Result<BuildingInfo> {
        self.building(n_id, h_id)?.info(step)
    }

    pub fn device_info(&self, n_id: usize, h_id: usize, device: &str) -> Result<DeviceInfo> {
        self.building(n_id, h_id)?.device_info(device)
    }

    pub fn thermostat_info(&self, n_id: usize, h_id: usize) -> Result<ThermostatInfo> {
        Ok(self.building(n_id, h_id)?.thermostat_info())
    }

    pub fn battery_info(&self, n_id: usize, h_id: usize) -> Result<BatteryInfo> {
        Ok(self.building(n_id, h_id)?.battery_info())
    }

    pub fn solar_info(&self, n_id: usize, h_id: usize) -> Result<SolarInfo> {
        Ok(self.building(n_id, h_id)?.solar_info())
    }

    pub fn world_info(&self) -> WorldInfo {
        WorldInfo {
            clock: self.clock,
            ambient_temp_c: self.ambient_c,
        }
    }

    pub fn set_target_temp(&mut self, n_id: usize, h_id: usize, target_c: f64) -> Result<()> {
        self.building_mut(n_id, h_id)?.set_target_temp(target_c);
        Ok(())
    }

    /// Set the thermostat mode by code: 0 off, 1 cooling, 2 heating.
    pub fn set_mode(&mut self, n_id: usize, h_id: usize, mode: i64) -> Result<()> {
        let mode = ThermostatMode::try_from(mode)?;
        let clock = self.clock;
        self.building_mut(n_id, h_id)?.set_mode(mode, clock);
        Ok(())
    }

    pub fn device_set_power(&mut self, n_id: usize, h_id: usize, device: &str, on: bool) -> Result<()> {
        let clock = self.clock;
        self.building_mut(n_id, h_id)?.device_set_power(device, on, clock)
    }

    /// Start or stop a building's fan cycle. Returns whether the fan runs afterwards.
    pub fn thermostat_fan(&mut self, n_id: usize, h_id: usize, on: bool) -> Result<bool> {
        let clock = self.clock;
        let building = self
            .neighborhoods
            .get_mut(n_id)
            .ok_or(SimError::UnknownNeighborhood(n_id))?
            .building_mut(h_id)?;
        Ok(building.set_fan(on, clock, self.observer.as_ref()))
    }
}

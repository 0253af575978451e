//! # Thermostat
//!
//! Three-state controller owning one cooling and one heating unit.
//!
//! ## States
//!
//! - **Off (0)**: no unit can run
//! - **Cooling (1)**: the air conditioner is the active unit
//! - **Heating (2)**: the furnace is the active unit
//!
//! A fan cycle starts with [`Thermostat::fan_on`], which estimates how long the
//! active unit must run to reach the target and records `end_time`. The owning
//! building moves the interior temperature by a constant per-step delta until
//! the clock passes `end_time`, then switches the fan off.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use super::hvac::{FuelSource, HvacUnit};
use super::types::{AirState, Dimensions};
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThermostatMode {
    Off,
    Cooling,
    Heating,
}

impl ThermostatMode {
    pub fn code(&self) -> u8 {
        match self {
            ThermostatMode::Off => 0,
            ThermostatMode::Cooling => 1,
            ThermostatMode::Heating => 2,
        }
    }
}

impl TryFrom<i64> for ThermostatMode {
    type Error = SimError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(ThermostatMode::Off),
            1 => Ok(ThermostatMode::Cooling),
            2 => Ok(ThermostatMode::Heating),
            other => Err(SimError::InvalidMode(other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thermostat {
    mode: ThermostatMode,
    target_temp_c: f64,
    start_time: Option<u64>,
    start_temp_c: Option<f64>,
    end_time: Option<u64>,
    cooling: HvacUnit,
    heating: HvacUnit,
    dims: Dimensions,
}

impl Thermostat {
    pub fn new(dims: Dimensions) -> Self {
        Self::with_units(dims, HvacUnit::air_conditioner(), HvacUnit::furnace(FuelSource::Gas))
    }

    pub fn with_units(dims: Dimensions, cooling: HvacUnit, heating: HvacUnit) -> Self {
        Self {
            mode: ThermostatMode::Off,
            target_temp_c: 0.0,
            start_time: None,
            start_temp_c: None,
            end_time: None,
            cooling,
            heating,
            dims,
        }
    }

    pub fn mode(&self) -> ThermostatMode {
        self.mode
    }

    pub fn target_temp(&self) -> f64 {
        self.target_temp_c
    }

    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn start_temp(&self) -> Option<f64> {
        self.start_temp_c
    }

    pub fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    pub fn cooling_unit(&self) -> &HvacUnit {
        &self.cooling
    }

    pub fn heating_unit(&self) -> &HvacUnit {
        &self.heating
    }

    fn active_unit(&self) -> Option<&HvacUnit> {
        match self.mode {
            ThermostatMode::Off => None,
            ThermostatMode::Cooling => Some(&self.cooling),
            ThermostatMode::Heating => Some(&self.heating),
        }
    }

    fn active_unit_mut(&mut self) -> Option<&mut HvacUnit> {
        match self.mode {
            ThermostatMode::Off => None,
            ThermostatMode::Cooling => Some(&mut self.cooling),
            ThermostatMode::Heating => Some(&mut self.heating),
        }
    }

    pub fn set_target_temp(&mut self, target_c: f64) {
        debug!(target_c, "setting thermostat target");
        self.target_temp_c = target_c;
    }

    /// Switch mode. The fan is always forced off first.
    pub fn set_mode(&mut self, mode: ThermostatMode, clock: u64) {
        debug!(%mode, clock, "setting HVAC mode");
        self.fan_off(clock);
        self.mode = mode;
    }

    /// Start a fan cycle. Returns false (and changes nothing) in mode Off.
    pub fn fan_on(&mut self, clock: u64, air: &AirState) -> bool {
        let Some(unit) = self.active_unit_mut() else {
            warn!(clock, "fan_on ignored: thermostat is not set to any mode");
            return false;
        };
        unit.turn_on();

        self.start_time = Some(clock);
        self.start_temp_c = Some(air.temp_c);
        let end_time = clock + self.calc_run_time(air.temp_c);
        self.end_time = Some(end_time);

        debug!(
            start_temp_c = air.temp_c,
            target_c = self.target_temp_c,
            end_time,
            "fan turned on"
        );
        true
    }

    /// Stop the fan and mark the cycle as ending now.
    pub fn fan_off(&mut self, clock: u64) {
        match self.active_unit_mut() {
            Some(unit) => unit.turn_off(),
            None => debug!(clock, "fan_off with thermostat in mode off"),
        }
        self.end_time = Some(clock);
        debug!(clock, "fan turned off");
    }

    /// Seconds the active unit must run to bring `interior_c` to the target.
    pub fn calc_run_time(&self, interior_c: f64) -> u64 {
        match self.active_unit() {
            Some(unit) => {
                let q = unit.compute_q(self.target_temp_c, interior_c, &self.dims);
                unit.calc_on_time(q)
            }
            None => 0,
        }
    }

    /// Per-step temperature change of the current cycle. Zero for a cycle of
    /// zero length or when no cycle has started.
    pub fn calc_temp_delta(&self) -> f64 {
        match (self.start_temp_c, self.start_time, self.end_time) {
            (Some(start_temp), Some(start), Some(end)) if end > start => {
                (start_temp - self.target_temp_c).abs() / (end - start) as f64
            }
            _ => 0.0,
        }
    }

    /// Move the interior temperature by `delta` in the direction of the mode.
    pub fn step(&self, delta: f64, air: &mut AirState) {
        if !self.running() {
            return;
        }
        match self.mode {
            ThermostatMode::Cooling => air.temp_c -= delta,
            ThermostatMode::Heating => air.temp_c += delta,
            ThermostatMode::Off => {}
        }
    }

    pub fn running(&self) -> bool {
        self.active_unit().is_some_and(HvacUnit::is_on)
    }

    /// Per-step draw of the unit selected by the current mode.
    pub fn power(&self) -> f64 {
        self.active_unit().map(HvacUnit::power).unwrap_or(0.0)
    }
}

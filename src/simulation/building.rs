//! # Building Simulation
//!
//! One building advances one second per [`Building::step`]:
//!
//! 1. the solar array charges the battery,
//! 2. the interior air either drifts towards ambient (fan off) or is moved
//!    towards the thermostat target (fan on),
//! 3. devices and HVAC draw their energy from the battery, with any shortfall
//!    reported as grid draw,
//! 4. the interior temperature is appended to the history.
//!
//! The building owns its interior air (temperature and pressure). The
//! thermostat and HVAC units only see it for the duration of a call.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::color::color_gradient;
use super::history::TempHistory;
use super::info::{BatteryInfo, BuildingInfo, DeviceInfo, SolarInfo, ThermostatInfo};
use super::observer::{HouseRef, SimObserver};
use crate::domain::{
    fahrenheit_to_celsius, AirState, Battery, Device, Dimensions, GeometryBounds, GradientBounds,
    MaterialTier, SolarPanel, Thermostat, ThermostatMode, WallMaterial,
};
use crate::error::{Result, SimError};

/// Specific gas constant of dry air, J/(kg·K)
pub const AIR_SPECIFIC_R: f64 = 287.058;
/// Specific heat of dry air at constant volume, as used by the exchange model
pub const AIR_HEAT_CAPACITY: f64 = 0.718;

/// Nominal footprint side of a middle-income US home, ft.
const NOMINAL_SIDE_FT: i32 = 40;
const SIDE_JITTER_FT: i32 = 10;
/// One story, ft.
const STORY_HEIGHT_FT: f64 = 8.0;
const DEFAULT_TARGET_F: f64 = 72.0;

/// Read-only view of world state passed down during a step.
pub struct StepContext<'a> {
    pub clock: u64,
    pub ambient_c: f64,
    pub observer: &'a dyn SimObserver,
}

/// Attributes specific to residential buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentialProfile {
    pub residents: u32,
    pub has_basement: bool,
    pub has_pool: bool,
    /// Window area is estimated at 15% of floor area, in 3 ft x 5 ft windows.
    pub windows: u32,
}

impl ResidentialProfile {
    fn estimate_windows(length_ft: f64, width_ft: f64) -> u32 {
        (length_ft * width_ft * 0.15 / 15.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildingKind {
    Residential(ResidentialProfile),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    neighborhood_id: usize,
    house_id: usize,
    kind: BuildingKind,
    num_floors: u32,
    dims: Dimensions,
    walls: WallMaterial,
    thermostat: Thermostat,
    battery: Battery,
    solar: SolarPanel,
    devices: BTreeMap<String, Device>,
    gradient: GradientBounds,
    air: AirState,
    temp_history: TempHistory,
}

impl Building {
    /// Randomly generate a residential building.
    ///
    /// Length and width are drawn around 40 ft and clamped into `geometry`;
    /// the wall tier is drawn uniformly. `clock` and `ambient_c` are the
    /// world state at generation time.
    pub fn generate<R: Rng + ?Sized>(
        neighborhood_id: usize,
        house_id: usize,
        geometry: &GeometryBounds,
        gradient: GradientBounds,
        clock: u64,
        ambient_c: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let has_basement = rng.gen_bool(0.5);
        let num_floors = rng.gen_range(1..=3);
        let length_ft = geometry
            .length_ft
            .clamp((NOMINAL_SIDE_FT + rng.gen_range(-SIDE_JITTER_FT..=SIDE_JITTER_FT)) as f64);
        let width_ft = geometry
            .width_ft
            .clamp((NOMINAL_SIDE_FT + rng.gen_range(-SIDE_JITTER_FT..=SIDE_JITTER_FT)) as f64);

        let tier = MaterialTier::random(rng);
        let walls = WallMaterial::generate(tier, rng);

        let profile = ResidentialProfile {
            residents: 2,
            has_basement,
            has_pool: true,
            windows: ResidentialProfile::estimate_windows(length_ft, width_ft),
        };

        Self::residential(
            neighborhood_id,
            house_id,
            profile,
            num_floors,
            Dimensions::from_feet(length_ft, width_ft, STORY_HEIGHT_FT),
            walls,
            gradient,
            clock,
            ambient_c,
        )
    }

    /// Assemble a residential building from fixed parts.
    ///
    /// Adds the pool pump (when the profile has a pool) and a level 1 EV
    /// charger, both switched on at `clock`. The thermostat targets 72 °F in
    /// cooling mode and the interior starts at `ambient_c`.
    #[allow(clippy::too_many_arguments)]
    pub fn residential(
        neighborhood_id: usize,
        house_id: usize,
        profile: ResidentialProfile,
        num_floors: u32,
        dims: Dimensions,
        walls: WallMaterial,
        gradient: GradientBounds,
        clock: u64,
        ambient_c: f64,
    ) -> Result<Self> {
        let mut devices = BTreeMap::new();
        if profile.has_pool {
            let pump = Device::pool_pump(2.0, 8);
            devices.insert(pump.name().to_string(), pump);
        }
        let evcs = Device::ev_charger(1, 200.0)?;
        devices.insert(evcs.name().to_string(), evcs);

        for device in devices.values_mut() {
            device.turn_on(clock);
        }

        let air = AirState::new(ambient_c);

        let mut thermostat = Thermostat::new(dims);
        thermostat.set_target_temp(fahrenheit_to_celsius(DEFAULT_TARGET_F));
        thermostat.set_mode(ThermostatMode::Cooling, clock);

        debug!(
            neighborhood = neighborhood_id,
            house = house_id,
            length_m = dims.length_m,
            width_m = dims.width_m,
            wall = %walls.tier(),
            "generated residential building"
        );

        Ok(Self {
            neighborhood_id,
            house_id,
            kind: BuildingKind::Residential(profile),
            num_floors,
            dims,
            walls,
            thermostat,
            battery: Battery::default(),
            solar: SolarPanel::default(),
            devices,
            gradient,
            air,
            temp_history: TempHistory::seeded(ambient_c),
        })
    }

    fn house_ref(&self) -> HouseRef {
        HouseRef {
            neighborhood_id: self.neighborhood_id,
            house_id: self.house_id,
        }
    }

    pub fn neighborhood_id(&self) -> usize {
        self.neighborhood_id
    }

    pub fn house_id(&self) -> usize {
        self.house_id
    }

    pub fn kind(&self) -> &BuildingKind {
        &self.kind
    }

    pub fn num_floors(&self) -> u32 {
        self.num_floors
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn walls(&self) -> &WallMaterial {
        &self.walls
    }

    pub fn thermostat(&self) -> &Thermostat {
        &self.thermostat
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn solar(&self) -> &SolarPanel {
        &self.solar
    }

    pub fn devices(&self) -> impl Iterator<Item = (&str, &Device)> {
        self.devices.iter().map(|(name, device)| (name.as_str(), device))
    }

    pub fn air(&self) -> &AirState {
        &self.air
    }

    pub fn temp_history(&self) -> &TempHistory {
        &self.temp_history
    }

    /// Interior temperature at `step`, or the current one.
    pub fn interior_temp(&self, step: Option<u64>) -> Result<f64> {
        self.temp_history.at(step)
    }

    /// Display color of the interior temperature at `step`, or the current one.
    pub fn color_gradient(&self, step: Option<u64>) -> Result<String> {
        Ok(color_gradient(self.interior_temp(step)?, &self.gradient))
    }

    /// Advance one second. Returns the energy that had to come from the grid.
    pub fn step(&mut self, ctx: &StepContext<'_>) -> f64 {
        self.battery.charge(self.solar.produce());

        if !self.thermostat.running() {
            self.approach_ambient(ctx);
        } else if self
            .thermostat
            .end_time()
            .is_some_and(|end_time| ctx.clock > end_time)
        {
            self.thermostat.fan_off(ctx.clock);
            ctx.observer.on_fan_off(self.house_ref(), ctx.clock);
            self.approach_ambient(ctx);
        } else {
            let delta = self.thermostat.calc_temp_delta();
            self.thermostat.step(delta, &mut self.air);
        }

        let grid_draw = self.consume_energy(ctx.clock);
        self.temp_history.push(self.air.temp_c);
        grid_draw
    }

    fn approach_ambient(&mut self, ctx: &StepContext<'_>) {
        ctx.observer
            .on_approach_ambient(self.house_ref(), ctx.clock, self.air.temp_c, ctx.ambient_c);
        self.exchange_heat(ctx.ambient_c);
    }

    /// Passive heat exchange through the walls with the HVAC off. Applies and
    /// returns the interior temperature change.
    pub fn exchange_heat(&mut self, ambient_c: f64) -> f64 {
        let air_density = self.air.pressure_pa / (AIR_SPECIFIC_R * (self.air.temp_c + 273.0));

        // single uniform wall layer, roof excluded
        let conducted =
            self.dims.wall_area_m2() * (ambient_c - self.air.temp_c) / self.walls.r_value();

        let delta = conducted / (air_density * self.dims.volume_m3() * AIR_HEAT_CAPACITY);
        // passive exchange never carries the interior past ambient
        let gap = (ambient_c - self.air.temp_c).abs();
        let delta = if delta.is_nan() { 0.0 } else { delta.clamp(-gap, gap) };
        self.air.temp_c += delta;
        delta
    }

    /// Draw this step's HVAC and device energy from the battery.
    ///
    /// Devices past their run budget are switched off first. Returns the part
    /// of the demand the battery could not cover.
    pub fn consume_energy(&mut self, clock: u64) -> f64 {
        let hvac = if self.thermostat.running() {
            self.thermostat.power()
        } else {
            0.0
        };

        let mut devices = 0.0;
        for (name, device) in self.devices.iter_mut() {
            if device.expire(clock) {
                debug!(house = self.house_id, device = %name, clock, "device run budget exhausted");
            }
            devices += device.consumption();
        }

        let total = hvac + devices;
        let available = self.battery.current_capacity();

        if total > available {
            self.battery.discharge(available);
            total - available
        } else {
            self.battery.discharge(total);
            0.0
        }
    }

    pub fn set_target_temp(&mut self, target_c: f64) {
        self.thermostat.set_target_temp(target_c);
    }

    pub fn set_mode(&mut self, mode: ThermostatMode, clock: u64) {
        self.thermostat.set_mode(mode, clock);
    }

    /// Start or stop the HVAC fan. Returns whether the fan is running afterwards.
    pub fn set_fan(&mut self, on: bool, clock: u64, observer: &dyn SimObserver) -> bool {
        if on {
            if self.thermostat.fan_on(clock, &self.air) {
                let end_time = self.thermostat.end_time().unwrap_or(clock);
                observer.on_fan_on(self.house_ref(), clock, end_time);
            }
        } else {
            self.thermostat.fan_off(clock);
            observer.on_fan_off(self.house_ref(), clock);
        }
        self.thermostat.running()
    }

    fn device_mut(&mut self, name: &str) -> Result<&mut Device> {
        let (neighborhood, house) = (self.neighborhood_id, self.house_id);
        self.devices.get_mut(name).ok_or_else(|| SimError::UnknownDevice {
            neighborhood,
            house,
            device: name.to_string(),
        })
    }

    pub fn device(&self, name: &str) -> Result<&Device> {
        self.devices.get(name).ok_or_else(|| SimError::UnknownDevice {
            neighborhood: self.neighborhood_id,
            house: self.house_id,
            device: name.to_string(),
        })
    }

    pub fn device_set_power(&mut self, name: &str, on: bool, clock: u64) -> Result<()> {
        let device = self.device_mut(name)?;
        if on {
            device.turn_on(clock);
        } else {
            device.turn_off(clock);
        }
        Ok(())
    }

    pub fn info(&self, step: Option<u64>) -> Result<BuildingInfo> {
        Ok(BuildingInfo {
            neighborhood_id: self.neighborhood_id,
            house_id: self.house_id,
            num_floors: self.num_floors,
            length_m: self.dims.length_m,
            width_m: self.dims.width_m,
            height_m: self.dims.height_m,
            target_temp_c: self.thermostat.target_temp(),
            interior_temp_c: self.interior_temp(step)?,
            wall_type: self.walls.tier(),
            wall_thickness_m: self.walls.thickness_m(),
            wall_mass_kg: self.walls.mass_kg(),
            wall_r_value: self.walls.r_value(),
            wall_emissivity: self.walls.emissivity(),
        })
    }

    pub fn device_info(&self, name: &str) -> Result<DeviceInfo> {
        let device = self.device(name)?;
        Ok(DeviceInfo {
            name: name.to_string(),
            consumption_w: device.consumption(),
            state: device.state(),
            on_time: device.on_time(),
            off_time: device.off_time(),
        })
    }

    pub fn thermostat_info(&self) -> ThermostatInfo {
        ThermostatInfo {
            mode: self.thermostat.mode(),
            target_temp_c: self.thermostat.target_temp(),
            start_temp_c: self.thermostat.start_temp(),
            start_time: self.thermostat.start_time(),
            end_time: self.thermostat.end_time(),
            running: self.thermostat.running(),
        }
    }

    pub fn battery_info(&self) -> BatteryInfo {
        BatteryInfo {
            max_capacity_j: self.battery.max_capacity(),
            current_capacity_j: self.battery.current_capacity(),
            amp_hours: self.battery.amp_hours(),
            voltage_v: self.battery.voltage_v(),
        }
    }

    pub fn solar_info(&self) -> SolarInfo {
        SolarInfo {
            num_cells: self.solar.cells(),
            watts_per_cell: self.solar.watts_per_cell(),
            efficiency: self.solar.efficiency(),
        }
    }
}

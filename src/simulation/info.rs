//! Read-only records handed to callers of the world accessors.

use serde::{Deserialize, Serialize};

use crate::domain::{MaterialTier, PowerState, ThermostatMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub clock: u64,
    pub ambient_temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub neighborhood_id: usize,
    pub house_id: usize,
    pub num_floors: u32,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub target_temp_c: f64,
    pub interior_temp_c: f64,
    pub wall_type: MaterialTier,
    pub wall_thickness_m: f64,
    pub wall_mass_kg: f64,
    pub wall_r_value: f64,
    pub wall_emissivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub consumption_w: f64,
    pub state: PowerState,
    pub on_time: Option<u64>,
    pub off_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermostatInfo {
    pub mode: ThermostatMode,
    pub target_temp_c: f64,
    pub start_temp_c: Option<f64>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub max_capacity_j: f64,
    pub current_capacity_j: f64,
    pub amp_hours: f64,
    pub voltage_v: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarInfo {
    pub num_cells: u32,
    pub watts_per_cell: f64,
    pub efficiency: f64,
}

use serde::{Deserialize, Serialize};

use super::types::Dimensions;

/// Universal gas constant, J/(mol·K)
const R_GAS: f64 = 8.314;
/// Pressure assumed when estimating the moles of interior air.
const STP_PRESSURE_PA: f64 = 101_325.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelSource {
    Gas,
    Electric,
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HvacKind {
    AirConditioner,
    Furnace { fuel: FuelSource },
}

/// On/off heat source or sink with a fixed power rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HvacUnit {
    kind: HvacKind,
    power_w: f64,
    is_on: bool,
}

impl HvacUnit {
    pub const DEFAULT_POWER_W: f64 = 2920.0;

    pub fn new(kind: HvacKind, power_w: f64) -> Self {
        Self {
            kind,
            power_w,
            is_on: false,
        }
    }

    pub fn air_conditioner() -> Self {
        Self::new(HvacKind::AirConditioner, Self::DEFAULT_POWER_W)
    }

    pub fn furnace(fuel: FuelSource) -> Self {
        Self::new(HvacKind::Furnace { fuel }, Self::DEFAULT_POWER_W)
    }

    pub fn kind(&self) -> HvacKind {
        self.kind
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn turn_on(&mut self) {
        self.is_on = true;
    }

    pub fn turn_off(&mut self) {
        self.is_on = false;
    }

    /// Rated power, W.
    pub fn rated_power_w(&self) -> f64 {
        self.power_w
    }

    /// Energy drawn during one step, expressed against the hourly rating.
    pub fn power(&self) -> f64 {
        self.power_w / 3600.0
    }

    /// Heat (J) needed to move the interior air from `interior_c` to
    /// `target_c`, treating the air as a monatomic ideal gas at constant volume.
    /// Zero while the unit is off.
    pub fn compute_q(&self, target_c: f64, interior_c: f64, dims: &Dimensions) -> f64 {
        if !self.is_on {
            return 0.0;
        }

        let moles = (dims.volume_m3() * STP_PRESSURE_PA) / (R_GAS * (interior_c + 273.0));
        let heat_capacity = 5.0 * R_GAS / 2.0;
        heat_capacity * moles * (interior_c - target_c).abs()
    }

    /// Seconds the unit must run to deliver `q` joules.
    pub fn calc_on_time(&self, q: f64) -> u64 {
        (q / self.power_w).round().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(12.0, 12.0, 2.4)
    }

    #[test]
    fn test_compute_q_zero_when_off() {
        let ac = HvacUnit::air_conditioner();
        assert_eq!(ac.compute_q(20.0, 30.0, &dims()), 0.0);
    }

    #[test]
    fn test_compute_q_ideal_gas() {
        let mut ac = HvacUnit::air_conditioner();
        ac.turn_on();

        let d = dims();
        let moles = d.volume_m3() * 101_325.0 / (8.314 * 303.0);
        let expected = 2.5 * 8.314 * moles * 10.0;
        let q = ac.compute_q(20.0, 30.0, &d);
        assert!((q - expected).abs() < 1e-6);

        // symmetric in the direction of change
        let q_heat = ac.compute_q(40.0, 30.0, &d);
        assert!((q_heat - expected).abs() < 1e-6);
    }

    #[test]
    fn test_on_time_and_power() {
        let furnace = HvacUnit::furnace(FuelSource::Gas);
        assert_eq!(furnace.calc_on_time(2920.0 * 10.4), 10);
        assert_eq!(furnace.calc_on_time(0.0), 0);
        assert_eq!(furnace.rated_power_w(), 2920.0);
        assert!((furnace.power() - furnace.rated_power_w() / 3600.0).abs() < 1e-12);
        assert_eq!(furnace.kind(), HvacKind::Furnace { fuel: FuelSource::Gas });
    }
}

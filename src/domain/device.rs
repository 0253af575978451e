use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

const WATTS_PER_HORSEPOWER: f64 = 745.7;

/// EV charging tier. Level 1 runs on 120 V, level 2 on 240 V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingLevel {
    Level1,
    Level2,
}

impl ChargingLevel {
    pub fn voltage_v(&self) -> f64 {
        match self {
            ChargingLevel::Level1 => 120.0,
            ChargingLevel::Level2 => 240.0,
        }
    }
}

impl TryFrom<u8> for ChargingLevel {
    type Error = SimError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            1 => Ok(ChargingLevel::Level1),
            2 => Ok(ChargingLevel::Level2),
            other => Err(SimError::InvalidChargingLevel(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeviceKind {
    PoolPump { horsepower: f64 },
    EvCharger { level: ChargingLevel, amps: f64 },
}

impl DeviceKind {
    /// Draw while running, W.
    pub fn rated_watts(&self) -> f64 {
        match self {
            DeviceKind::PoolPump { horsepower } => horsepower * WATTS_PER_HORSEPOWER,
            DeviceKind::EvCharger { level, amps } => level.voltage_v() * amps,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeviceKind::PoolPump { .. } => "pool_pump",
            DeviceKind::EvCharger { .. } => "evcs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

/// Household appliance with a fixed draw and an optional run budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    kind: DeviceKind,
    rated_watts: f64,
    state: PowerState,
    on_time: Option<u64>,
    off_time: Option<u64>,
    /// Seconds after `on_time` at which the device is forced off.
    /// `None` means it runs until switched off.
    run_budget_s: Option<u64>,
}

impl Device {
    fn new(kind: DeviceKind, run_budget_s: Option<u64>) -> Self {
        Self {
            rated_watts: kind.rated_watts(),
            kind,
            state: PowerState::Off,
            on_time: None,
            off_time: None,
            run_budget_s,
        }
    }

    /// Pool pump with a daily run budget in hours.
    pub fn pool_pump(horsepower: f64, run_hours: u64) -> Self {
        Self::new(DeviceKind::PoolPump { horsepower }, Some(run_hours * 3600))
    }

    /// EV charging station. Only levels 1 and 2 are supported.
    pub fn ev_charger(level: u8, amps: f64) -> Result<Self> {
        let level = ChargingLevel::try_from(level)?;
        Ok(Self::new(DeviceKind::EvCharger { level, amps }, None))
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Current draw: the rated wattage while on, zero while off.
    pub fn consumption(&self) -> f64 {
        match self.state {
            PowerState::On => self.rated_watts,
            PowerState::Off => 0.0,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == PowerState::On
    }

    pub fn on_time(&self) -> Option<u64> {
        self.on_time
    }

    pub fn off_time(&self) -> Option<u64> {
        self.off_time
    }

    pub fn run_budget_s(&self) -> Option<u64> {
        self.run_budget_s
    }

    pub fn turn_on(&mut self, clock: u64) {
        self.on_time = Some(clock);
        self.state = PowerState::On;
    }

    pub fn turn_off(&mut self, clock: u64) {
        self.off_time = Some(clock);
        self.state = PowerState::Off;
    }

    /// True once a running device has exceeded its run budget.
    pub fn run_budget_exceeded(&self, clock: u64) -> bool {
        match (self.state, self.on_time, self.run_budget_s) {
            (PowerState::On, Some(on_time), Some(budget)) => clock > on_time + budget,
            _ => false,
        }
    }

    /// Switch the device off if its budget has run out. Returns whether it was
    /// switched off.
    pub fn expire(&mut self, clock: u64) -> bool {
        if self.run_budget_exceeded(clock) {
            self.turn_off(clock);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumption_follows_state() {
        let mut pump = Device::pool_pump(2.0, 8);
        assert_eq!(pump.consumption(), 0.0);

        pump.turn_on(0);
        assert!((pump.consumption() - 1491.4).abs() < 1e-9);

        pump.turn_off(10);
        assert_eq!(pump.consumption(), 0.0);
        assert_eq!(pump.off_time(), Some(10));
    }

    #[test]
    fn test_ev_charger_levels() {
        let level1 = Device::ev_charger(1, 200.0).unwrap();
        let level2 = Device::ev_charger(2, 40.0).unwrap();
        assert_eq!(level1.kind().rated_watts(), 24_000.0);
        assert_eq!(level2.kind().rated_watts(), 9_600.0);
        assert_eq!(level1.name(), "evcs");
    }

    #[test]
    fn test_ev_charger_rejects_unknown_level() {
        assert_eq!(
            Device::ev_charger(3, 32.0).unwrap_err(),
            SimError::InvalidChargingLevel(3)
        );
        assert!(Device::ev_charger(0, 32.0).is_err());
    }

    #[test]
    fn test_pool_pump_expires_after_budget() {
        let mut pump = Device::pool_pump(2.0, 8);
        assert_eq!(pump.run_budget_s(), Some(8 * 3600));
        pump.turn_on(100);

        assert!(!pump.expire(100 + 8 * 3600));
        assert!(pump.is_on());

        assert!(pump.expire(100 + 8 * 3600 + 1));
        assert!(!pump.is_on());
        assert_eq!(pump.off_time(), Some(100 + 8 * 3600 + 1));
    }

    #[test]
    fn test_ev_charger_never_expires() {
        let mut evcs = Device::ev_charger(1, 200.0).unwrap();
        assert_eq!(evcs.run_budget_s(), None);
        evcs.turn_on(0);
        assert!(!evcs.expire(1_000_000));
        assert!(evcs.is_on());
    }
}

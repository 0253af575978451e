use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Household electrical storage.
///
/// Capacities are in joules. Every charge or discharge request appends the
/// resulting capacity to the history, including rejected requests, so the
/// history has exactly one entry per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    amp_hours: f64,
    voltage_v: f64,
    max_capacity_j: f64,
    current_capacity_j: f64,
    charge_history: Vec<f64>,
}

impl Default for Battery {
    /// 415 Ah deep-cycle bank at 12 V, starting empty.
    fn default() -> Self {
        Self::new(415.0, 12.0)
    }
}

impl Battery {
    pub fn new(amp_hours: f64, voltage_v: f64) -> Self {
        Self {
            amp_hours,
            voltage_v,
            // Wh -> J
            max_capacity_j: amp_hours * voltage_v * 3600.0,
            current_capacity_j: 0.0,
            charge_history: Vec::new(),
        }
    }

    /// Start at a given charge. Panics if `initial_j` is outside the capacity.
    pub fn with_charge(mut self, initial_j: f64) -> Self {
        assert!(
            (0.0..=self.max_capacity_j).contains(&initial_j),
            "initial charge {initial_j} J outside [0, {}]",
            self.max_capacity_j
        );
        self.current_capacity_j = initial_j;
        self
    }

    pub fn amp_hours(&self) -> f64 {
        self.amp_hours
    }

    pub fn voltage_v(&self) -> f64 {
        self.voltage_v
    }

    pub fn max_capacity(&self) -> f64 {
        self.max_capacity_j
    }

    pub fn current_capacity(&self) -> f64 {
        self.current_capacity_j
    }

    /// Current charge, or the value recorded by the `entry`-th request.
    pub fn current_charge(&self, entry: Option<usize>) -> Result<f64> {
        match entry {
            Some(i) => self
                .charge_history
                .get(i)
                .copied()
                .ok_or(SimError::StepNotRecorded {
                    step: i as u64,
                    latest: self.charge_history.len().saturating_sub(1) as u64,
                }),
            None => Ok(self.current_capacity_j),
        }
    }

    pub fn charge_history(&self) -> &[f64] {
        &self.charge_history
    }

    /// Add `joules`. Rejected (capacity unchanged) if the result would exceed
    /// the maximum capacity. Returns whether the charge was applied.
    pub fn charge(&mut self, joules: f64) -> bool {
        self.apply(joules)
    }

    /// Remove `joules`. Rejected (capacity unchanged) if the result would be
    /// negative. Returns whether the discharge was applied.
    pub fn discharge(&mut self, joules: f64) -> bool {
        self.apply(-joules)
    }

    fn apply(&mut self, delta_j: f64) -> bool {
        let next = self.current_capacity_j + delta_j;
        let accepted = (0.0..=self.max_capacity_j).contains(&next);
        if accepted {
            self.current_capacity_j = next;
        }
        self.record();
        accepted
    }

    fn record(&mut self) {
        assert!(
            (0.0..=self.max_capacity_j).contains(&self.current_capacity_j),
            "battery capacity {} J outside [0, {}]",
            self.current_capacity_j,
            self.max_capacity_j
        );
        self.charge_history.push(self.current_capacity_j);
    }
}

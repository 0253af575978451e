use serde::{Deserialize, Serialize};

/// Rooftop PV array with a constant per-second yield.
///
/// Irradiance and weather are not modelled; `efficiency` is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarPanel {
    cells: u32,
    watts_per_cell: f64,
    efficiency: f64,
}

impl SolarPanel {
    pub fn new(cells: u32, watts_per_cell: f64) -> Self {
        Self {
            cells,
            watts_per_cell,
            efficiency: 0.20,
        }
    }

    pub fn cells(&self) -> u32 {
        self.cells
    }

    pub fn watts_per_cell(&self) -> f64 {
        self.watts_per_cell
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Energy produced during one step.
    pub fn produce(&self) -> f64 {
        self.cells as f64 * self.watts_per_cell / 3600.0
    }
}

impl Default for SolarPanel {
    /// Five 300 W panels.
    fn default() -> Self {
        Self::new(5, 300.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_yield() {
        let pv = SolarPanel::default();
        let expected = 5.0 * 300.0 / 3600.0;
        assert!((pv.produce() - expected).abs() < 1e-12);
        assert_eq!(pv.produce(), pv.produce());
        assert_eq!(pv.efficiency(), 0.20);
    }
}

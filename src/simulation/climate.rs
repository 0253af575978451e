//! # Climate Model
//!
//! Derives the daily temperature bounds from season and weather and evaluates
//! the diurnal ambient temperature curve.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::{fahrenheit_to_celsius, Season, Weather};

pub const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateModel {
    season: Season,
    weather: Weather,
    lo_temp_c: f64,
    hi_temp_c: f64,
}

impl ClimateModel {
    /// Look up the seasonal bounds, shift them by the weather offset and
    /// convert to °C.
    pub fn configure(season: Season, weather: Weather) -> Self {
        let (lo_f, hi_f) = season.base_range_f();
        let offset = weather.offset_f();

        Self {
            season,
            weather,
            lo_temp_c: fahrenheit_to_celsius(lo_f + offset),
            hi_temp_c: fahrenheit_to_celsius(hi_f + offset),
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn lo_temp(&self) -> f64 {
        self.lo_temp_c
    }

    pub fn hi_temp(&self) -> f64 {
        self.hi_temp_c
    }

    pub fn midpoint(&self) -> f64 {
        (self.hi_temp_c + self.lo_temp_c) / 2.0
    }

    /// Ambient temperature at `clock`: a sinusoid with a one-day period that
    /// starts at the daily average.
    pub fn temp_at(&self, clock: u64) -> f64 {
        let avg = self.midpoint();
        let amp = self.hi_temp_c - avg;
        amp * ((2.0 * PI / SECONDS_PER_DAY) * clock as f64).sin() + avg
    }
}

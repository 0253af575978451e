//! # Simulation Observers
//!
//! Hook points through which the engine reports what happened during a step.
//! Observers only watch: they receive copies of values and cannot reach back
//! into the world.

#[cfg(test)]
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Interior temperatures of one neighborhood at a given clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodSnapshot {
    pub neighborhood_id: usize,
    pub clock: u64,
    /// Interior temperature per house, indexed by house id.
    pub interior_temps_c: Vec<f64>,
    pub ambient_temp_c: f64,
}

/// Identifies the building an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseRef {
    pub neighborhood_id: usize,
    pub house_id: usize,
}

pub trait SimObserver: Send + Sync {
    fn on_fan_on(&self, _house: HouseRef, _clock: u64, _end_time: u64) {}

    fn on_fan_off(&self, _house: HouseRef, _clock: u64) {}

    fn on_approach_ambient(&self, _house: HouseRef, _clock: u64, _interior_c: f64, _ambient_c: f64) {}

    /// Called once per neighborhood per step with the energy drawn from the
    /// grid by all of its buildings.
    fn on_neighborhood_step(&self, _neighborhood_id: usize, _clock: u64, _grid_draw_j: f64) {}

    /// Periodic snapshot, emitted every [`SNAPSHOT_INTERVAL`] ticks.
    ///
    /// [`SNAPSHOT_INTERVAL`]: crate::simulation::SNAPSHOT_INTERVAL
    fn on_snapshot(&self, _snapshot: &NeighborhoodSnapshot) {}
}

/// Lets a caller keep a handle on an observer it hands to the world.
impl<T: SimObserver + ?Sized> SimObserver for Arc<T> {
    fn on_fan_on(&self, house: HouseRef, clock: u64, end_time: u64) {
        (**self).on_fan_on(house, clock, end_time);
    }

    fn on_fan_off(&self, house: HouseRef, clock: u64) {
        (**self).on_fan_off(house, clock);
    }

    fn on_approach_ambient(&self, house: HouseRef, clock: u64, interior_c: f64, ambient_c: f64) {
        (**self).on_approach_ambient(house, clock, interior_c, ambient_c);
    }

    fn on_neighborhood_step(&self, neighborhood_id: usize, clock: u64, grid_draw_j: f64) {
        (**self).on_neighborhood_step(neighborhood_id, clock, grid_draw_j);
    }

    fn on_snapshot(&self, snapshot: &NeighborhoodSnapshot) {
        (**self).on_snapshot(snapshot);
    }
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_fan_on(&self, house: HouseRef, clock: u64, end_time: u64) {
        debug!(
            neighborhood = house.neighborhood_id,
            house = house.house_id,
            clock,
            end_time,
            "fan on"
        );
    }

    fn on_fan_off(&self, house: HouseRef, clock: u64) {
        debug!(
            neighborhood = house.neighborhood_id,
            house = house.house_id,
            clock,
            "fan off"
        );
    }

    fn on_approach_ambient(&self, house: HouseRef, clock: u64, interior_c: f64, ambient_c: f64) {
        trace!(
            neighborhood = house.neighborhood_id,
            house = house.house_id,
            clock,
            interior_c,
            ambient_c,
            "approaching ambient"
        );
    }

    fn on_neighborhood_step(&self, neighborhood_id: usize, clock: u64, grid_draw_j: f64) {
        debug!(neighborhood = neighborhood_id, clock, grid_draw_j, "neighborhood stepped");
    }

    fn on_snapshot(&self, snapshot: &NeighborhoodSnapshot) {
        info!(
            neighborhood = snapshot.neighborhood_id,
            clock = snapshot.clock,
            ambient_c = snapshot.ambient_temp_c,
            interior_c = ?snapshot.interior_temps_c,
            "neighborhood snapshot"
        );
    }
}

/// Keeps every snapshot and fan event in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    snapshots: Mutex<Vec<NeighborhoodSnapshot>>,
    fan_events: Mutex<Vec<(HouseRef, u64, bool)>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<NeighborhoodSnapshot> {
        self.snapshots.lock().clone()
    }

    /// `(house, clock, turned_on)` for every fan transition.
    pub fn fan_events(&self) -> Vec<(HouseRef, u64, bool)> {
        self.fan_events.lock().clone()
    }
}

#[cfg(test)]
impl SimObserver for RecordingObserver {
    fn on_fan_on(&self, house: HouseRef, clock: u64, _end_time: u64) {
        self.fan_events.lock().push((house, clock, true));
    }

    fn on_fan_off(&self, house: HouseRef, clock: u64) {
        self.fan_events.lock().push((house, clock, false));
    }

    fn on_snapshot(&self, snapshot: &NeighborhoodSnapshot) {
        self.snapshots.lock().push(snapshot.clone());
    }
}

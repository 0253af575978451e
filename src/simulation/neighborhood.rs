use rand::Rng;
use serde::{Deserialize, Serialize};

use super::building::{Building, StepContext};
use super::observer::NeighborhoodSnapshot;
use crate::domain::{GeometryBounds, GradientBounds};
use crate::error::{Result, SimError};

/// Ordered group of buildings sharing the world's clock and ambient temperature.
/// A building's position is its house id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    id: usize,
    buildings: Vec<Building>,
}

impl Neighborhood {
    pub fn generate<R: Rng + ?Sized>(
        id: usize,
        num_homes: usize,
        geometry: &GeometryBounds,
        gradient: GradientBounds,
        clock: u64,
        ambient_c: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let buildings = (0..num_homes)
            .map(|house_id| Building::generate(id, house_id, geometry, gradient, clock, ambient_c, &mut *rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { id, buildings })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, house_id: usize) -> Result<&Building> {
        self.buildings.get(house_id).ok_or(SimError::UnknownHouse {
            neighborhood: self.id,
            house: house_id,
        })
    }

    pub fn building_mut(&mut self, house_id: usize) -> Result<&mut Building> {
        let neighborhood = self.id;
        self.buildings
            .get_mut(house_id)
            .ok_or(SimError::UnknownHouse {
                neighborhood,
                house: house_id,
            })
    }

    /// Step every building in house id order and return the neighborhood's
    /// total grid draw. With `log_snapshot` set, a snapshot of the interior
    /// temperatures is handed to the observer once all buildings have stepped.
    pub fn step(&mut self, ctx: &StepContext<'_>, log_snapshot: bool) -> f64 {
        let grid_draw: f64 = self
            .buildings
            .iter_mut()
            .map(|building| building.step(ctx))
            .sum();

        ctx.observer.on_neighborhood_step(self.id, ctx.clock, grid_draw);

        if log_snapshot {
            ctx.observer.on_snapshot(&self.snapshot(ctx.clock, ctx.ambient_c));
        }

        grid_draw
    }

    /// Current interior temperatures, indexed by house id.
    pub fn snapshot(&self, clock: u64, ambient_c: f64) -> NeighborhoodSnapshot {
        NeighborhoodSnapshot {
            neighborhood_id: self.id,
            clock,
            interior_temps_c: self
                .buildings
                .iter()
                .map(|b| b.air().temp_c)
                .collect(),
            ambient_temp_c: ambient_c,
        }
    }
}

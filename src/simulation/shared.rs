use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

use super::world::World;

/// Cloneable handle to a world shared between threads.
///
/// Stepping takes the write lock, so only one caller advances the clock at a
/// time. Reads take the read lock and may run concurrently between ticks.
#[derive(Debug, Clone)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    pub fn step(&self) {
        self.inner.write().step();
    }

    pub fn run(&self, steps: u64) {
        self.inner.write().run(steps);
    }

    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.inner.read()
    }

    /// Run `f` with exclusive access, e.g. for the thermostat and device mutators.
    pub fn update<T>(&self, f: impl FnOnce(&mut World) -> T) -> T {
        f(&mut self.inner.write())
    }

    pub fn world_clock(&self) -> u64 {
        self.inner.read().world_clock()
    }
}

impl From<World> for SharedWorld {
    fn from(world: World) -> Self {
        Self::new(world)
    }
}

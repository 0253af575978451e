//! # Neighborhood Simulation Engine
//!
//! Steps a world of residential buildings one simulated second at a time.
//!
//! ## Components
//!
//! - **Climate**: season/weather bounds and the diurnal ambient temperature curve
//! - **Building**: passive heat exchange, thermostat cycling and energy accounting
//! - **Neighborhood**: ordered group of buildings stepped in house id order
//! - **World**: owns the clock, ambient temperature and all neighborhoods
//! - **Observer**: hook points for fan cycles, heat exchange and periodic snapshots
//!
//! ## Usage
//!
//! ```rust
//! use neighborhood_sim::domain::{Season, Weather};
//! use neighborhood_sim::simulation::{TracingObserver, World, WorldConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let config = WorldConfig::new(Season::Summer, Weather::Sunny, 2, 5);
//! let mut world = World::configure_and_generate(&config, &mut rng)
//!     .unwrap()
//!     .with_observer(Box::new(TracingObserver));
//!
//! world.run(60);
//!
//! assert_eq!(world.world_clock(), 60);
//! let interior = world.building_interior_temp(0, 3, None).unwrap();
//! let color = world.building_color(0, 3, Some(30)).unwrap();
//! # let _ = (interior, color);
//! ```

pub mod building;
pub mod climate;
pub mod color;
pub mod history;
pub mod info;
pub mod neighborhood;
pub mod observer;
pub mod shared;
pub mod world;

/// Ticks between two neighborhood snapshots.
pub const SNAPSHOT_INTERVAL: u64 = 15;

pub use building::{Building, BuildingKind, ResidentialProfile, StepContext};
pub use climate::{ClimateModel, SECONDS_PER_DAY};
pub use color::color_gradient;
pub use history::TempHistory;
pub use info::{BatteryInfo, BuildingInfo, DeviceInfo, SolarInfo, ThermostatInfo, WorldInfo};
pub use neighborhood::Neighborhood;
pub use observer::{HouseRef, NeighborhoodSnapshot, NoopObserver, SimObserver, TracingObserver};
pub use shared::SharedWorld;
pub use world::{World, WorldConfig};

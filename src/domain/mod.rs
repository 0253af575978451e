pub mod battery;
pub mod device;
pub mod hvac;
pub mod material;
pub mod solar;
pub mod thermostat;
pub mod types;

pub use battery::*;
pub use device::*;
pub use hvac::*;
pub use material::*;
pub use solar::*;
pub use thermostat::*;
pub use types::*;

pub mod config;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;

pub use error::{Result, SimError};

use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// Configuration errors are raised before any entity is created. Lookup errors
/// are returned to the caller as-is and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid bounds for {name}: [{min}, {max}]")]
    InvalidBounds { name: &'static str, min: f64, max: f64 },

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Unknown weather: {0}")]
    UnknownWeather(String),

    #[error("Invalid thermostat mode: {0} (expected 0, 1 or 2)")]
    InvalidMode(i64),

    #[error("Unsupported charging level: {0} (expected 1 or 2)")]
    InvalidChargingLevel(u8),

    #[error("World has already been generated")]
    AlreadyGenerated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Neighborhood not found: {0}")]
    UnknownNeighborhood(usize),

    #[error("House {house} not found in neighborhood {neighborhood}")]
    UnknownHouse { neighborhood: usize, house: usize },

    #[error("Device '{device}' not found in house {neighborhood}/{house}")]
    UnknownDevice {
        neighborhood: usize,
        house: usize,
        device: String,
    },

    #[error("Step {step} has not been recorded (latest step is {latest})")]
    StepNotRecorded { step: u64, latest: u64 },
}

impl SimError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidBounds { .. }
                | SimError::UnknownSeason(_)
                | SimError::UnknownWeather(_)
                | SimError::InvalidMode(_)
                | SimError::InvalidChargingLevel(_)
                | SimError::AlreadyGenerated
                | SimError::Config(_)
        )
    }

    pub fn is_lookup(&self) -> bool {
        !self.is_configuration()
    }
}

impl From<validator::ValidationErrors> for SimError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SimError::Config(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

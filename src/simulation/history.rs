use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Append-only temperature record indexed by world clock.
///
/// Entry 0 is the seed written at generation; every step appends exactly one
/// entry, so once written an index never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempHistory(Vec<f64>);

impl TempHistory {
    pub fn seeded(initial: f64) -> Self {
        Self(vec![initial])
    }

    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Entry recorded at `step`.
    pub fn get(&self, step: u64) -> Result<f64> {
        usize::try_from(step)
            .ok()
            .and_then(|i| self.0.get(i).copied())
            .ok_or(SimError::StepNotRecorded {
                step,
                latest: self.0.len().saturating_sub(1) as u64,
            })
    }

    /// Entry at `step`, or the latest entry when `step` is `None`.
    pub fn at(&self, step: Option<u64>) -> Result<f64> {
        match step {
            Some(step) => self.get(step),
            None => self.get(self.0.len().saturating_sub(1) as u64),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

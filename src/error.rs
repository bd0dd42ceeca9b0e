//! Error taxonomy for simulation runs.
//!
//! Every failure is synchronous and fatal to the run. Validation happens
//! before the first snapshot is emitted, so a failed run never surfaces a
//! partial snapshot sequence.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised while building or running a simulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Round-robin quantum was zero or negative.
    #[error("quantum must be greater than zero (got {quantum})")]
    InvalidQuantum { quantum: i64 },

    /// `Process::execute` was called with zero or negative units.
    #[error("execution units must be greater than zero (got {units})")]
    InvalidExecutionUnits { units: i64 },

    /// Initial executed time is negative or exceeds the CPU time.
    #[error(
        "invalid executed time for process {process_id}: {executed} is outside 0..={cpu_time}"
    )]
    InvalidExecutedTime {
        process_id: u32,
        executed: i64,
        cpu_time: i64,
    },

    /// A process starts `Finished` with CPU time still owed.
    #[error(
        "process {process_id} is marked finished but executed only {executed} of {cpu_time}"
    )]
    UnfinishedWork {
        process_id: u32,
        executed: i64,
        cpu_time: i64,
    },

    /// No free id is left above the largest explicit id.
    #[error("cannot assign a process id after {last}")]
    IdsExhausted { last: u32 },

    /// A serialized request could not be parsed.
    #[error("invalid simulation request: {0}")]
    InvalidRequest(String),
}

impl SimulationError {
    /// Whether this error belongs to the invalid-argument family.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantum { .. }
                | Self::InvalidExecutionUnits { .. }
                | Self::InvalidExecutedTime { .. }
                | Self::UnfinishedWork { .. }
        )
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

//! Process model.
//!
//! A process is a synthetic CPU-bound task: it needs a fixed number of CPU
//! time units and progresses only when the scheduler executes it.
//!
//! # State Machine
//! `Ready → Running → {Finished | Ready}`. `Finished` is absorbing.
//! `Blocked` exists in the model but no algorithm assigns it.

use serde::{Deserialize, Serialize};

use super::ProcessSnapshot;
use crate::error::{Result, SimulationError};

/// Highest priority value (lowest urgency). Also the number of priority buckets.
pub const MAX_PRIORITY: i32 = 5;

/// Lowest priority value (highest urgency).
pub const MIN_PRIORITY: i32 = 1;

/// Execution state of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting for the CPU.
    #[default]
    Ready,
    /// Currently holding the CPU.
    Running,
    /// Waiting on an event. Reserved; never assigned by the scheduler.
    Blocked,
    /// All CPU time consumed.
    Finished,
}

impl ProcessState {
    /// Whether the state is terminal.
    #[inline]
    pub fn is_finished(self) -> bool {
        self == Self::Finished
    }
}

/// Raw parameters used to build a [`Process`].
///
/// `id` may be omitted; the simulation runner assigns sequential ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessParams {
    /// Process identifier. `None` = assigned by the runner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Total CPU time required.
    pub cpu_time: i64,
    /// Priority (1 = highest, 5 = lowest).
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// CPU time already executed before the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed: Option<i64>,
    /// Initial state. `None` = `Ready`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProcessState>,
}

fn default_priority() -> i32 {
    MIN_PRIORITY
}

impl ProcessParams {
    /// Creates parameters without an id.
    pub fn new(cpu_time: i64, priority: i32) -> Self {
        Self {
            id: None,
            cpu_time,
            priority,
            executed: None,
            state: None,
        }
    }

    /// Sets the id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the initial executed time.
    pub fn with_executed(mut self, executed: i64) -> Self {
        self.executed = Some(executed);
        self
    }

    /// Sets the initial state.
    pub fn with_state(mut self, state: ProcessState) -> Self {
        self.state = Some(state);
        self
    }
}

/// A simulated process.
///
/// `cpu_time`, `priority` and `id` are fixed at construction. Only
/// [`execute`](Process::execute) and [`set_state`](Process::set_state)
/// mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProcessRecord")]
pub struct Process {
    id: u32,
    cpu_time: i64,
    priority: i32,
    executed: i64,
    state: ProcessState,
}

/// Unchecked wire form of a [`Process`].
#[derive(Deserialize)]
struct ProcessRecord {
    id: u32,
    cpu_time: i64,
    priority: i32,
    executed: i64,
    state: ProcessState,
}

impl TryFrom<ProcessRecord> for Process {
    type Error = SimulationError;

    fn try_from(record: ProcessRecord) -> Result<Self> {
        Self::with_progress(
            record.id,
            record.cpu_time,
            record.priority,
            record.executed,
            record.state,
        )
    }
}

impl Process {
    /// Creates a fresh `Ready` process with nothing executed.
    pub fn new(id: u32, cpu_time: i64, priority: i32) -> Result<Self> {
        Self::with_progress(id, cpu_time, priority, 0, ProcessState::Ready)
    }

    /// Creates a process with prior progress.
    ///
    /// # Errors
    /// - [`SimulationError::InvalidExecutedTime`] if `executed` is negative or
    ///   exceeds `cpu_time`
    /// - [`SimulationError::UnfinishedWork`] if `state` is `Finished` while
    ///   `executed < cpu_time`
    pub fn with_progress(
        id: u32,
        cpu_time: i64,
        priority: i32,
        executed: i64,
        state: ProcessState,
    ) -> Result<Self> {
        if executed < 0 || executed > cpu_time {
            return Err(SimulationError::InvalidExecutedTime {
                process_id: id,
                executed,
                cpu_time,
            });
        }
        if state.is_finished() && executed < cpu_time {
            return Err(SimulationError::UnfinishedWork {
                process_id: id,
                executed,
                cpu_time,
            });
        }
        Ok(Self {
            id,
            cpu_time,
            priority,
            executed,
            state,
        })
    }

    /// Builds a process from raw parameters, using `fallback_id` when the
    /// parameters carry none.
    pub fn from_params(params: &ProcessParams, fallback_id: u32) -> Result<Self> {
        Self::with_progress(
            params.id.unwrap_or(fallback_id),
            params.cpu_time,
            params.priority,
            params.executed.unwrap_or(0),
            params.state.unwrap_or_default(),
        )
    }

    /// Process identifier.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Total CPU time required.
    #[inline]
    pub fn cpu_time(&self) -> i64 {
        self.cpu_time
    }

    /// Priority as given (not clamped).
    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// CPU time executed so far.
    #[inline]
    pub fn executed(&self) -> i64 {
        self.executed
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Remaining CPU time, never negative.
    #[inline]
    pub fn remaining(&self) -> i64 {
        (self.cpu_time - self.executed).max(0)
    }

    /// Whether the process reached `Finished`.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Zero-based priority bucket index, clamping out-of-range priorities.
    pub fn priority_bucket(&self) -> usize {
        (self.priority.clamp(MIN_PRIORITY, MAX_PRIORITY) - MIN_PRIORITY) as usize
    }

    /// Assigns a state without transition checks.
    pub fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Executes up to `units` of CPU time.
    ///
    /// Returns the units actually consumed (`min(units, remaining)`), or 0 if
    /// the process is already `Finished`. Reaching the CPU time forces
    /// `Finished`.
    ///
    /// # Errors
    /// [`SimulationError::InvalidExecutionUnits`] if `units <= 0`.
    pub fn execute(&mut self, units: i64) -> Result<i64> {
        if units <= 0 {
            return Err(SimulationError::InvalidExecutionUnits { units });
        }
        if self.is_finished() {
            return Ok(0);
        }

        let consumed = units.min(self.remaining());
        self.executed += consumed;

        if self.executed >= self.cpu_time {
            self.executed = self.cpu_time;
            self.state = ProcessState::Finished;
        }
        Ok(consumed)
    }

    /// Captures the observable fields.
    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            id: self.id,
            cpu_time: self.cpu_time,
            priority: self.priority,
            executed: self.executed,
            remaining: self.remaining(),
            state: self.state,
        }
    }
}

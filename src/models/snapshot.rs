//! Immutable captures of queue state.
//!
//! A run emits one [`Snapshot`] per state-affecting event. The ordered
//! sequence is what a visualization layer replays.

use serde::{Deserialize, Serialize};

use super::{ProcessQueue, ProcessState};

/// Observable fields of one process at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    /// Process identifier.
    pub id: u32,
    /// Total CPU time required.
    pub cpu_time: i64,
    /// Priority (1 = highest).
    pub priority: i32,
    /// CPU time executed so far.
    pub executed: i64,
    /// CPU time still required.
    pub remaining: i64,
    /// State at capture time.
    pub state: ProcessState,
}

/// Every process's fields at one point of the simulated timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Position in the emitted sequence (0-based).
    pub step: usize,
    /// Simulated clock: CPU units executed since the run started.
    pub time: i64,
    /// Processes in queue order.
    pub processes: Vec<ProcessSnapshot>,
}

impl Snapshot {
    /// Captures all queues in order, flattened.
    ///
    /// `time` is the absolute executed total; a run rebases it so its first
    /// snapshot sits at zero.
    pub fn capture(step: usize, queues: &[ProcessQueue]) -> Self {
        let processes: Vec<ProcessSnapshot> = queues
            .iter()
            .flat_map(|q| q.iter().map(|p| p.snapshot()))
            .collect();
        let time = processes.iter().map(|p| p.executed).sum();
        Self {
            step,
            time,
            processes,
        }
    }

    /// The process holding the CPU, if any.
    pub fn running(&self) -> Option<&ProcessSnapshot> {
        self.processes
            .iter()
            .find(|p| p.state == ProcessState::Running)
    }

    /// Looks up a process by id.
    pub fn process(&self, id: u32) -> Option<&ProcessSnapshot> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Total CPU units executed across all processes.
    pub fn total_executed(&self) -> i64 {
        self.processes.iter().map(|p| p.executed).sum()
    }

    /// Whether every process is finished.
    pub fn all_finished(&self) -> bool {
        self.processes.iter().all(|p| p.state.is_finished())
    }
}

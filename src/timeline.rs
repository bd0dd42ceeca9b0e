//! Recorded snapshot sequence with a replay cursor.
//!
//! A `Timeline` is the data side of playback: it records every snapshot of a
//! run and lets a viewer step, seek and jump through them. Pacing (timers,
//! play/pause) belongs to the caller; the cursor only moves on request and
//! always stays within bounds.

use serde::{Deserialize, Serialize};

use crate::models::{ProcessState, Snapshot};
use crate::scheduler::{RunMetrics, SchedulerObserver};

/// An ordered, seekable sequence of snapshots.
///
/// # Example
///
/// ```
/// use cpu_schedule::models::{Process, ProcessQueue};
/// use cpu_schedule::scheduler::Scheduler;
/// use cpu_schedule::timeline::Timeline;
///
/// let mut queue = ProcessQueue::from_processes(vec![Process::new(1, 2, 1).unwrap()]);
/// let mut timeline = Timeline::new();
/// Scheduler::new().first_come_first_served(&mut queue, &mut timeline).unwrap();
///
/// assert_eq!(timeline.len(), 4);
/// assert_eq!(timeline.position(), 0);
/// timeline.last_step();
/// assert!(timeline.is_at_end());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already recorded sequence, cursor at the first step.
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            cursor: 0,
        }
    }

    /// Appends a snapshot. The cursor does not move.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// All recorded snapshots, in order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Consumes the timeline, returning the snapshots.
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Snapshot under the cursor. `None` when empty.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    /// Moves the cursor to `step`, clamped to the recorded range.
    pub fn seek(&mut self, step: usize) -> Option<&Snapshot> {
        self.cursor = step.min(self.snapshots.len().saturating_sub(1));
        self.current()
    }

    /// Advances one step, staying on the last step at the end.
    pub fn next_step(&mut self) -> Option<&Snapshot> {
        self.seek(self.cursor.saturating_add(1))
    }

    /// Goes back one step, staying on the first step at the start.
    pub fn previous_step(&mut self) -> Option<&Snapshot> {
        self.seek(self.cursor.saturating_sub(1))
    }

    /// Jumps to the first step.
    pub fn first_step(&mut self) -> Option<&Snapshot> {
        self.seek(0)
    }

    /// Jumps to the last step.
    pub fn last_step(&mut self) -> Option<&Snapshot> {
        self.seek(usize::MAX)
    }

    /// Whether the cursor sits on the last step (or nothing was recorded).
    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.snapshots.len()
    }

    /// Fraction of the replay shown so far, counting the current step.
    ///
    /// 0.0 for an empty timeline, 1.0 on the last step.
    pub fn progress(&self) -> f64 {
        if self.snapshots.is_empty() {
            0.0
        } else {
            (self.cursor + 1) as f64 / self.snapshots.len() as f64
        }
    }

    /// Running process id at every step, for drawing a Gantt strip.
    pub fn running_per_step(&self) -> Vec<Option<u32>> {
        self.snapshots
            .iter()
            .map(|s| s.running().map(|p| p.id))
            .collect()
    }

    /// Ids in the order they transitioned to `Finished` during the run.
    ///
    /// Processes finished before the first snapshot are not listed.
    pub fn completion_order(&self) -> Vec<u32> {
        let mut order = Vec::new();
        let mut steps = self.snapshots.iter().peekable();
        let Some(first) = steps.peek() else {
            return order;
        };
        let mut finished: Vec<u32> = first
            .processes
            .iter()
            .filter(|p| p.state == ProcessState::Finished)
            .map(|p| p.id)
            .collect();

        for snapshot in steps {
            for p in &snapshot.processes {
                if p.state == ProcessState::Finished && !finished.contains(&p.id) {
                    finished.push(p.id);
                    order.push(p.id);
                }
            }
        }
        order
    }

    /// Turnaround, waiting and dispatch metrics for the recorded run.
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics::calculate(&self.snapshots)
    }
}

impl SchedulerObserver for Timeline {
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
    }
}

//! Run quality metrics.
//!
//! Derived purely from an emitted snapshot sequence, so any recorded run
//! can be evaluated after the fact.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | First run | Clock when the process was first dispatched |
//! | Completion | Clock when the process reached `Finished` |
//! | Turnaround | Completion − first run |
//! | Waiting | Completion − CPU units executed during the run |
//! | Dispatches | Number of `Ready → Running` transitions |
//! | Makespan | Clock of the last snapshot |
//!
//! All processes arrive at t=0, so waiting time is measured from t=0.
//!
//! # Reference
//! Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5.2

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ProcessState, Snapshot};

/// Timings of one process over a run.
///
/// Timing fields are `None` for processes that never ran (e.g. already
/// finished before the run started).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub id: u32,
    /// Total CPU time required.
    pub cpu_time: i64,
    /// Clock at first dispatch.
    pub first_run_time: Option<i64>,
    /// Clock at completion.
    pub completion_time: Option<i64>,
    /// Completion − first dispatch.
    pub turnaround_time: Option<i64>,
    /// Completion − CPU units executed during the run.
    pub waiting_time: Option<i64>,
    /// Number of times the process was dispatched.
    pub dispatches: usize,
}

/// Aggregate metrics for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Per-process metrics, in first-snapshot order.
    pub processes: Vec<ProcessMetrics>,
    /// Clock of the last snapshot.
    pub makespan: i64,
    /// Mean turnaround over completed processes.
    pub avg_turnaround_time: f64,
    /// Mean waiting time over completed processes.
    pub avg_waiting_time: f64,
    /// Total dispatches across all processes.
    pub context_switches: usize,
}

struct Tracker {
    metrics: ProcessMetrics,
    initial_executed: i64,
    last_state: ProcessState,
}

impl RunMetrics {
    /// Computes metrics from an ordered snapshot sequence.
    pub fn calculate(snapshots: &[Snapshot]) -> Self {
        let mut trackers: Vec<Tracker> = Vec::new();
        let mut index: HashMap<u32, usize> = HashMap::new();

        for snapshot in snapshots {
            for p in &snapshot.processes {
                let slot = *index.entry(p.id).or_insert_with(|| {
                    trackers.push(Tracker {
                        metrics: ProcessMetrics {
                            id: p.id,
                            cpu_time: p.cpu_time,
                            first_run_time: None,
                            completion_time: None,
                            turnaround_time: None,
                            waiting_time: None,
                            dispatches: 0,
                        },
                        initial_executed: p.executed,
                        // Finished-before-run processes never record a completion.
                        last_state: if p.state.is_finished() {
                            ProcessState::Finished
                        } else {
                            ProcessState::Ready
                        },
                    });
                    trackers.len() - 1
                });
                let tracker = &mut trackers[slot];

                let dispatched = p.state == ProcessState::Running
                    && tracker.last_state != ProcessState::Running;
                if dispatched {
                    tracker.metrics.dispatches += 1;
                    tracker.metrics.first_run_time.get_or_insert(snapshot.time);
                }

                if p.state.is_finished() && !tracker.last_state.is_finished() {
                    let completion = snapshot.time;
                    let work = p.executed - tracker.initial_executed;
                    tracker.metrics.completion_time = Some(completion);
                    tracker.metrics.waiting_time = Some(completion - work);
                    tracker.metrics.turnaround_time = tracker
                        .metrics
                        .first_run_time
                        .map(|start| completion - start);
                }

                tracker.last_state = p.state;
            }
        }

        let processes: Vec<ProcessMetrics> = trackers.into_iter().map(|t| t.metrics).collect();
        let completed: Vec<&ProcessMetrics> = processes
            .iter()
            .filter(|m| m.completion_time.is_some())
            .collect();

        let mean = |values: Vec<i64>| -> f64 {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<i64>() as f64 / values.len() as f64
            }
        };
        let avg_turnaround_time =
            mean(completed.iter().filter_map(|m| m.turnaround_time).collect());
        let avg_waiting_time = mean(completed.iter().filter_map(|m| m.waiting_time).collect());
        let context_switches = processes.iter().map(|m| m.dispatches).sum();

        Self {
            makespan: snapshots.last().map_or(0, |s| s.time),
            avg_turnaround_time,
            avg_waiting_time,
            context_switches,
            processes,
        }
    }

    /// Metrics for one process.
    pub fn process(&self, id: u32) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Process, ProcessQueue};
    use crate::scheduler::Scheduler;

    fn run_fcfs(rows: &[(u32, i64)]) -> Vec<Snapshot> {
        let mut queue: ProcessQueue = rows
            .iter()
            .map(|&(id, cpu)| Process::new(id, cpu, 1).unwrap())
            .collect();
        let mut snaps = Vec::new();
        Scheduler::new()
            .first_come_first_served(&mut queue, &mut |s: Snapshot| snaps.push(s))
            .unwrap();
        snaps
    }

    #[test]
    fn test_metrics_fcfs() {
        let snaps = run_fcfs(&[(1, 3), (2, 2)]);
        let m = RunMetrics::calculate(&snaps);

        let p1 = m.process(1).unwrap();
        assert_eq!(p1.first_run_time, Some(0));
        assert_eq!(p1.completion_time, Some(3));
        assert_eq!(p1.turnaround_time, Some(3));
        assert_eq!(p1.waiting_time, Some(0));
        assert_eq!(p1.dispatches, 1);

        let p2 = m.process(2).unwrap();
        assert_eq!(p2.first_run_time, Some(3));
        assert_eq!(p2.completion_time, Some(5));
        assert_eq!(p2.turnaround_time, Some(2));
        assert_eq!(p2.waiting_time, Some(3));

        assert_eq!(m.makespan, 5);
        assert_eq!(m.context_switches, 2);
        assert!((m.avg_waiting_time - 1.5).abs() < 1e-10);
        assert!((m.avg_turnaround_time - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_metrics_round_robin_dispatches() {
        let mut queue: ProcessQueue = vec![
            Process::new(1, 4, 1).unwrap(),
            Process::new(2, 3, 1).unwrap(),
        ]
        .into_iter()
        .collect();
        let mut snaps = Vec::new();
        Scheduler::new()
            .round_robin(&mut queue, 2, &mut |s: Snapshot| snaps.push(s))
            .unwrap();

        let m = RunMetrics::calculate(&snaps);
        let p1 = m.process(1).unwrap();
        let p2 = m.process(2).unwrap();
        assert_eq!(p1.dispatches, 2);
        assert_eq!(p2.dispatches, 2);
        // P1 finishes at t=6, P2 at t=7.
        assert_eq!(p1.completion_time, Some(6));
        assert_eq!(p2.completion_time, Some(7));
        assert_eq!(p2.first_run_time, Some(2));
        assert_eq!(p2.turnaround_time, Some(5));
        assert_eq!(m.makespan, 7);
    }

    #[test]
    fn test_metrics_pre_finished_has_no_timings() {
        let done = Process::with_progress(1, 2, 1, 2, ProcessState::Finished).unwrap();
        let mut queue = ProcessQueue::from_processes(vec![done, Process::new(2, 1, 1).unwrap()]);
        let mut snaps = Vec::new();
        Scheduler::new()
            .first_come_first_served(&mut queue, &mut |s: Snapshot| snaps.push(s))
            .unwrap();

        let m = RunMetrics::calculate(&snaps);
        let p1 = m.process(1).unwrap();
        assert_eq!(p1.completion_time, None);
        assert_eq!(p1.dispatches, 0);
        // Prior progress does not advance the run clock.
        assert_eq!(m.process(2).unwrap().completion_time, Some(1));
        assert_eq!(m.process(2).unwrap().waiting_time, Some(0));
    }

    #[test]
    fn test_metrics_empty() {
        let m = RunMetrics::calculate(&[]);
        assert!(m.processes.is_empty());
        assert_eq!(m.makespan, 0);
        assert_eq!(m.context_switches, 0);
        assert!((m.avg_turnaround_time - 0.0).abs() < 1e-10);
    }
}

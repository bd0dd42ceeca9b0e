//! Simulation orchestration.
//!
//! Turns raw process parameters and an algorithm choice into queues, runs the
//! [`Scheduler`], and hands back the final queues. Snapshots flow to the
//! caller's observer, or into a [`Timeline`] with
//! [`SimulationRunner::run_recorded`].
//!
//! # Request Format
//!
//! ```json
//! {
//!   "processes": [{ "id": 1, "cpu_time": 6, "priority": 2 }, { "cpu_time": 3 }],
//!   "algorithm": { "kind": "round_robin", "quantum": 2 }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SimulationError};
use crate::models::{Process, ProcessParams, ProcessQueue, Snapshot, MAX_PRIORITY};
use crate::scheduler::{RunMetrics, Scheduler, SchedulerObserver};
use crate::timeline::Timeline;
use crate::validation::validate_processes;

/// Scheduling algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Algorithm {
    /// First-come-first-served.
    #[default]
    Fcfs,
    /// Shortest-job-first (non-preemptive).
    Sjf,
    /// Round-robin with a fixed quantum.
    RoundRobin {
        /// Maximum CPU units per turn. Must be positive.
        quantum: i64,
    },
    /// Multi-level priority queues, FCFS within each level.
    Priority,
}

impl Algorithm {
    /// Short identifier (`fcfs`, `sjf`, `round_robin`, `priority`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::RoundRobin { .. } => "round_robin",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "round_robin(q={quantum})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Input container for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Processes in arrival order.
    #[serde(default)]
    pub processes: Vec<ProcessParams>,
    /// Algorithm to run.
    #[serde(default)]
    pub algorithm: Algorithm,
}

impl SimulationRequest {
    /// Creates an empty request for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            processes: Vec::new(),
            algorithm,
        }
    }

    /// Appends a process.
    pub fn with_process(mut self, params: ProcessParams) -> Self {
        self.processes.push(params);
        self
    }

    /// Appends several processes.
    pub fn with_processes(mut self, params: impl IntoIterator<Item = ProcessParams>) -> Self {
        self.processes.extend(params);
        self
    }

    /// Parses a JSON request.
    ///
    /// # Errors
    /// [`SimulationError::InvalidRequest`](crate::SimulationError::InvalidRequest)
    /// on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of a recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Final queue state: one queue, or one per priority level.
    pub queues: Vec<ProcessQueue>,
    /// Every emitted snapshot.
    pub timeline: Timeline,
}

impl SimulationOutcome {
    /// Ids in the order they reached `Finished`.
    pub fn completion_order(&self) -> Vec<u32> {
        self.timeline.completion_order()
    }

    /// Turnaround and waiting metrics.
    pub fn metrics(&self) -> RunMetrics {
        self.timeline.metrics()
    }

    /// All final processes, in queue order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.queues.iter().flat_map(|q| q.iter())
    }
}

/// Builds queues from a request and dispatches to the selected algorithm.
///
/// # Example
///
/// ```
/// use cpu_schedule::generate::example_processes;
/// use cpu_schedule::simulation::{Algorithm, SimulationRequest, SimulationRunner};
///
/// let request = SimulationRequest::new(Algorithm::Sjf).with_processes(example_processes());
/// let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
///
/// assert_eq!(outcome.completion_order(), vec![2, 4, 1, 3]);
/// assert!(outcome.processes().all(|p| p.is_finished()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationRunner {
    scheduler: Scheduler,
}

impl SimulationRunner {
    /// Creates a runner.
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
        }
    }

    /// Runs `request`, streaming snapshots to `observer`.
    ///
    /// Returns the final queues: one for FCFS, SJF and round-robin, and
    /// `MAX_PRIORITY` buckets for priority scheduling.
    ///
    /// # Errors
    /// Invalid initial progress, a non-positive quantum, or exhausted ids.
    /// All are detected before the first snapshot.
    pub fn run<O>(
        &self,
        request: &SimulationRequest,
        observer: &mut O,
    ) -> Result<Vec<ProcessQueue>>
    where
        O: SchedulerObserver + ?Sized,
    {
        if let Err(issues) = validate_processes(&request.processes) {
            for issue in &issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        info!(
            algorithm = %request.algorithm,
            processes = request.processes.len(),
            "starting simulation"
        );

        let mut emitted = 0usize;
        let mut counted = |snapshot: Snapshot| {
            emitted += 1;
            observer.on_snapshot(snapshot);
        };

        let queues = match request.algorithm {
            Algorithm::Fcfs => {
                let mut queue = build_queue(&request.processes)?;
                self.scheduler.first_come_first_served(&mut queue, &mut counted)?;
                vec![queue]
            }
            Algorithm::Sjf => {
                let mut queue = build_queue(&request.processes)?;
                self.scheduler.shortest_job_first(&mut queue, &mut counted)?;
                vec![queue]
            }
            Algorithm::RoundRobin { quantum } => {
                let mut queue = build_queue(&request.processes)?;
                self.scheduler.round_robin(&mut queue, quantum, &mut counted)?;
                vec![queue]
            }
            Algorithm::Priority => {
                let mut buckets = build_priority_queues(&request.processes)?;
                self.scheduler.priority_queues(&mut buckets, &mut counted)?;
                buckets
            }
        };

        info!(
            algorithm = %request.algorithm,
            snapshots = emitted,
            "simulation finished"
        );
        Ok(queues)
    }

    /// Runs `request`, recording every snapshot into a [`Timeline`].
    pub fn run_recorded(&self, request: &SimulationRequest) -> Result<SimulationOutcome> {
        let mut timeline = Timeline::new();
        let queues = self.run(request, &mut timeline)?;
        Ok(SimulationOutcome { queues, timeline })
    }
}

/// Resolves ids: explicit ids are kept, missing ones count up from the
/// largest explicit id.
///
/// # Errors
/// [`SimulationError::IdsExhausted`] if counting up would pass `u32::MAX`.
fn assign_ids(params: &[ProcessParams]) -> Result<Vec<u32>> {
    let mut last = params.iter().filter_map(|p| p.id).max().unwrap_or(0);
    params
        .iter()
        .map(|p| -> Result<u32> {
            match p.id {
                Some(id) => Ok(id),
                None => {
                    last = last
                        .checked_add(1)
                        .ok_or(SimulationError::IdsExhausted { last })?;
                    Ok(last)
                }
            }
        })
        .collect()
}

fn build_processes(params: &[ProcessParams]) -> Result<Vec<Process>> {
    params
        .iter()
        .zip(assign_ids(params)?)
        .map(|(p, id)| Process::from_params(p, id))
        .collect()
}

/// One queue in arrival order.
fn build_queue(params: &[ProcessParams]) -> Result<ProcessQueue> {
    Ok(build_processes(params)?.into_iter().collect())
}

/// `MAX_PRIORITY` buckets; out-of-range priorities are clamped.
fn build_priority_queues(params: &[ProcessParams]) -> Result<Vec<ProcessQueue>> {
    let mut buckets = vec![ProcessQueue::new(); MAX_PRIORITY as usize];
    for process in build_processes(params)? {
        buckets[process.priority_bucket()].push_back(process);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::example_processes;
    use crate::models::ProcessState;

    fn params(rows: &[(u32, i64, i32)]) -> Vec<ProcessParams> {
        rows
            .iter()
            .map(|&(id, cpu, prio)| ProcessParams::new(cpu, prio).with_id(id))
            .collect()
    }

    fn run(algorithm: Algorithm, rows: &[(u32, i64, i32)]) -> SimulationOutcome {
        let request = SimulationRequest::new(algorithm).with_processes(params(rows));
        SimulationRunner::new().run_recorded(&request).unwrap()
    }

    fn assert_complete(outcome: &SimulationOutcome) {
        for p in outcome.processes() {
            assert_eq!(p.state(), ProcessState::Finished);
            assert_eq!(p.executed(), p.cpu_time());
        }
        let snaps = outcome.timeline.snapshots();
        for pair in snaps.windows(2) {
            assert!(pair[1].total_executed() >= pair[0].total_executed());
        }
    }

    #[test]
    fn test_every_algorithm_completes() {
        let algorithms = [
            Algorithm::Fcfs,
            Algorithm::Sjf,
            Algorithm::RoundRobin { quantum: 3 },
            Algorithm::Priority,
        ];
        for algorithm in algorithms {
            let request = SimulationRequest::new(algorithm).with_processes(example_processes());
            let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
            assert_complete(&outcome);
            assert_eq!(outcome.processes().count(), 4);
            assert_eq!(outcome.completion_order().len(), 4);
        }
    }

    #[test]
    fn test_fcfs_single_queue() {
        let outcome = run(Algorithm::Fcfs, &[(1, 2, 3), (2, 1, 1)]);
        assert_eq!(outcome.queues.len(), 1);
        assert_eq!(outcome.completion_order(), vec![1, 2]);
    }

    #[test]
    fn test_sjf_scenario() {
        let outcome = run(Algorithm::Sjf, &[(1, 6, 1), (2, 3, 1), (3, 8, 1)]);
        assert_eq!(outcome.completion_order(), vec![2, 1, 3]);
    }

    #[test]
    fn test_round_robin_scenario() {
        let outcome = run(Algorithm::RoundRobin { quantum: 2 }, &[(1, 4, 1), (2, 3, 1)]);
        let runs: Vec<(u32, i64)> = outcome
            .timeline
            .snapshots()
            .iter()
            .filter_map(|s| s.running().map(|p| (p.id, p.executed)))
            .collect();
        // Dispatch and post-slice snapshots of each turn.
        assert_eq!(
            runs,
            vec![(1, 0), (1, 2), (2, 0), (2, 2), (1, 2), (2, 2)]
        );
        assert_eq!(outcome.completion_order(), vec![1, 2]);
        assert_complete(&outcome);
    }

    #[test]
    fn test_round_robin_invalid_quantum_emits_nothing() {
        for quantum in [0, -1] {
            let request = SimulationRequest::new(Algorithm::RoundRobin { quantum })
                .with_processes(params(&[(1, 2, 1)]));
            let mut seen: Vec<Snapshot> = Vec::new();
            let err = SimulationRunner::new()
                .run(&request, &mut |s: Snapshot| seen.push(s))
                .unwrap_err();
            assert_eq!(err, SimulationError::InvalidQuantum { quantum });
            assert!(seen.is_empty());
        }
    }

    #[test]
    fn test_invalid_executed_time_emits_nothing() {
        let request = SimulationRequest::new(Algorithm::Fcfs)
            .with_process(ProcessParams::new(2, 1).with_id(1))
            .with_process(ProcessParams::new(2, 1).with_id(2).with_executed(5));
        let mut count = 0;
        let err = SimulationRunner::new()
            .run(&request, &mut |_s: Snapshot| count += 1)
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidExecutedTime { process_id: 2, .. }
        ));
        assert!(err.is_invalid_argument());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_priority_scenario() {
        let outcome = run(Algorithm::Priority, &[(1, 2, 3), (2, 2, 1), (3, 3, 1)]);
        assert_eq!(outcome.queues.len(), MAX_PRIORITY as usize);
        assert_eq!(outcome.queues[0].ids(), vec![2, 3]);
        assert_eq!(outcome.queues[2].ids(), vec![1]);

        let snaps = outcome.timeline.snapshots();
        let low_start = snaps
            .iter()
            .position(|s| s.running().map(|p| p.id) == Some(1))
            .unwrap();
        let at_start = &snaps[low_start];
        assert_eq!(at_start.process(2).unwrap().state, ProcessState::Finished);
        assert_eq!(at_start.process(3).unwrap().state, ProcessState::Finished);
        assert_eq!(outcome.completion_order(), vec![2, 3, 1]);
    }

    #[test]
    fn test_priority_clamps_out_of_range() {
        let outcome = run(Algorithm::Priority, &[(1, 1, 9), (2, 1, 0), (3, 1, 5)]);
        assert_eq!(outcome.queues[0].ids(), vec![2]);
        assert_eq!(outcome.queues[4].ids(), vec![1, 3]);
        assert_eq!(outcome.completion_order(), vec![2, 1, 3]);
    }

    #[test]
    fn test_sequential_ids() {
        let request = SimulationRequest::new(Algorithm::Fcfs)
            .with_process(ProcessParams::new(1, 1))
            .with_process(ProcessParams::new(1, 1).with_id(4))
            .with_process(ProcessParams::new(1, 1));
        let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
        assert_eq!(outcome.queues[0].ids(), vec![5, 4, 6]);

        let request = SimulationRequest::new(Algorithm::Fcfs)
            .with_processes(vec![ProcessParams::new(1, 1), ProcessParams::new(2, 1)]);
        let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
        assert_eq!(outcome.queues[0].ids(), vec![1, 2]);
    }

    #[test]
    fn test_id_assignment_overflow_is_an_error() {
        let request = SimulationRequest::new(Algorithm::Fcfs)
            .with_process(ProcessParams::new(1, 1).with_id(u32::MAX))
            .with_process(ProcessParams::new(1, 1));
        let mut count = 0;
        let err = SimulationRunner::new()
            .run(&request, &mut |_s: Snapshot| count += 1)
            .unwrap_err();
        assert_eq!(err, SimulationError::IdsExhausted { last: u32::MAX });
        assert_eq!(count, 0);

        let request = SimulationRequest::new(Algorithm::Fcfs)
            .with_process(ProcessParams::new(1, 1).with_id(u32::MAX - 1))
            .with_process(ProcessParams::new(1, 1));
        let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
        assert_eq!(outcome.queues[0].ids(), vec![u32::MAX - 1, u32::MAX]);
    }

    #[test]
    fn test_finished_without_full_progress_is_rejected() {
        let request = SimulationRequest::from_json(
            r#"{"processes":[{"id":1,"cpu_time":3,"state":"finished"}],"algorithm":{"kind":"fcfs"}}"#,
        )
        .unwrap();
        let err = SimulationRunner::new().run_recorded(&request).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnfinishedWork {
                process_id: 1,
                executed: 0,
                cpu_time: 3,
            }
        ));

        let request = SimulationRequest::from_json(
            r#"{"processes":[{"id":1,"cpu_time":3,"executed":3,"state":"finished"},{"id":2,"cpu_time":2}],"algorithm":{"kind":"fcfs"}}"#,
        )
        .unwrap();
        let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
        assert_complete(&outcome);
    }

    #[test]
    fn test_run_forwards_every_snapshot() {
        let request = SimulationRequest::new(Algorithm::RoundRobin { quantum: 2 })
            .with_processes(example_processes());
        let mut seen: Vec<Snapshot> = Vec::new();
        SimulationRunner::new()
            .run(&request, &mut |s: Snapshot| seen.push(s))
            .unwrap();
        let outcome = SimulationRunner::new().run_recorded(&request).unwrap();
        assert_eq!(seen.len(), outcome.timeline.len());
        assert_eq!(seen.last().map(|s| s.step), Some(seen.len() - 1));
    }

    #[test]
    fn test_empty_request() {
        let outcome = run(Algorithm::RoundRobin { quantum: 1 }, &[]);
        assert!(outcome.timeline.is_empty());
        assert_eq!(outcome.queues.len(), 1);
        assert!(outcome.queues[0].is_empty());
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "processes": [
                {"id": 1, "cpu_time": 4, "priority": 2},
                {"cpu_time": 3}
            ],
            "algorithm": {"kind": "round_robin", "quantum": 2}
        }"#;
        let request = SimulationRequest::from_json(json).unwrap();
        assert_eq!(request.algorithm, Algorithm::RoundRobin { quantum: 2 });
        assert_eq!(request.processes.len(), 2);
        assert_eq!(request.processes[1].priority, 1);

        let back = SimulationRequest::from_json(&request.to_json().unwrap()).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_request_from_json_unit_algorithms() {
        let request = SimulationRequest::from_json(r#"{"algorithm": {"kind": "sjf"}}"#).unwrap();
        assert_eq!(request.algorithm, Algorithm::Sjf);
        assert!(request.processes.is_empty());
    }

    #[test]
    fn test_request_from_json_invalid() {
        let err = SimulationRequest::from_json(r#"{"algorithm": {"kind": "lottery"}}"#)
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRequest(_)));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::Fcfs.to_string(), "fcfs");
        assert_eq!(
            Algorithm::RoundRobin { quantum: 4 }.to_string(),
            "round_robin(q=4)"
        );
        assert_eq!(Algorithm::Priority.name(), "priority");
    }

    #[test]
    fn test_outcome_metrics() {
        let outcome = run(Algorithm::Fcfs, &[(1, 3, 1), (2, 2, 1)]);
        let metrics = outcome.metrics();
        assert_eq!(metrics.makespan, 5);
        assert_eq!(metrics.process(2).unwrap().waiting_time, Some(3));
    }
}

//! Classical single-core scheduling algorithms.
//!
//! # Algorithms
//!
//! | Algorithm | Preemptive | Order |
//! |-----------|-----------|-------|
//! | FCFS | No | Queue (arrival) order |
//! | SJF | No | Stable sort by CPU time |
//! | Round-Robin | Yes, fixed quantum | Queue order, repeated passes |
//! | Priority queues | No | Bucket 1..5, FCFS within a bucket |
//!
//! Every transition (dispatch, each executed slice, preemption, finish)
//! emits a snapshot of all queues involved in the run.
//!
//! # Reference
//! Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5

use tracing::debug;

use super::observer::{Emitter, SchedulerObserver};
use crate::error::{Result, SimulationError};
use crate::models::{ProcessQueue, ProcessState};

/// Stateless scheduling algorithm library.
///
/// # Example
///
/// ```
/// use cpu_schedule::models::{Process, ProcessQueue, Snapshot};
/// use cpu_schedule::scheduler::Scheduler;
///
/// let mut queue = ProcessQueue::from_processes(vec![
///     Process::new(1, 6, 1).unwrap(),
///     Process::new(2, 3, 1).unwrap(),
///     Process::new(3, 8, 1).unwrap(),
/// ]);
/// let mut snapshots: Vec<Snapshot> = Vec::new();
/// Scheduler::new()
///     .shortest_job_first(&mut queue, &mut |s: Snapshot| snapshots.push(s))
///     .unwrap();
///
/// assert_eq!(queue.ids(), vec![2, 1, 3]);
/// assert!(queue.all_finished());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// First-come-first-served: runs each unfinished process to completion in
    /// queue order, one time unit per snapshot.
    pub fn first_come_first_served<O>(
        &self,
        queue: &mut ProcessQueue,
        observer: &mut O,
    ) -> Result<()>
    where
        O: SchedulerObserver + ?Sized,
    {
        let mut emitter = Emitter::new(observer);
        run_to_completion(std::slice::from_mut(queue), 0, &mut emitter)
    }

    /// Shortest-job-first: stable-sorts the queue by CPU time in place, then
    /// runs it like FCFS.
    pub fn shortest_job_first<O>(
        &self,
        queue: &mut ProcessQueue,
        observer: &mut O,
    ) -> Result<()>
    where
        O: SchedulerObserver + ?Sized,
    {
        queue.sort_by_cpu_time();
        debug!(order = ?queue.ids(), "sorted by cpu time");
        self.first_come_first_served(queue, observer)
    }

    /// Round-robin with a fixed quantum.
    ///
    /// Repeats passes over the queue until every process is finished. Each
    /// turn dispatches the process, executes `min(quantum, remaining)` in one
    /// step, then returns it to `Ready` if work remains. A turn emits three
    /// snapshots when preempted and two when the slice finishes the process.
    ///
    /// # Errors
    /// [`SimulationError::InvalidQuantum`] if `quantum <= 0`, before any
    /// snapshot is emitted.
    pub fn round_robin<O>(
        &self,
        queue: &mut ProcessQueue,
        quantum: i64,
        observer: &mut O,
    ) -> Result<()>
    where
        O: SchedulerObserver + ?Sized,
    {
        if quantum <= 0 {
            return Err(SimulationError::InvalidQuantum { quantum });
        }

        let mut emitter = Emitter::new(observer);
        let queues = std::slice::from_mut(queue);
        let mut pass = 0usize;

        while !queues[0].all_finished() {
            let mut progressed = false;

            for position in 0..queues[0].len() {
                let Some(process) = queues[0].get_mut(position) else {
                    break;
                };
                if process.is_finished() {
                    continue;
                }

                let slice = quantum.min(process.remaining());
                debug!(process_id = process.id(), pass, slice, "round-robin turn");
                process.set_state(ProcessState::Running);
                emitter.emit(queues);

                let Some(process) = queues[0].get_mut(position) else {
                    break;
                };
                if slice > 0 {
                    process.execute(slice)?;
                } else {
                    process.set_state(ProcessState::Finished);
                }
                let preempted = process.remaining() > 0;
                emitter.emit(queues);

                // A finished slice already produced its final frame.
                if preempted {
                    if let Some(process) = queues[0].get_mut(position) {
                        process.set_state(ProcessState::Ready);
                    }
                    emitter.emit(queues);
                }
                progressed = true;
            }

            // Nothing left to execute in a full pass.
            if !progressed {
                break;
            }
            pass += 1;
        }

        debug!(passes = pass, snapshots = emitter.emitted(), "round-robin done");
        Ok(())
    }

    /// Multi-level priority queues: each non-empty bucket runs FCFS to
    /// completion, bucket 0 (priority 1) first.
    ///
    /// Snapshots cover the processes of every bucket.
    pub fn priority_queues<O>(
        &self,
        queues: &mut [ProcessQueue],
        observer: &mut O,
    ) -> Result<()>
    where
        O: SchedulerObserver + ?Sized,
    {
        let mut emitter = Emitter::new(observer);
        for bucket in 0..queues.len() {
            if queues[bucket].is_empty() {
                continue;
            }
            debug!(bucket, len = queues[bucket].len(), "running priority bucket");
            run_to_completion(queues, bucket, &mut emitter)?;
        }
        Ok(())
    }
}

/// Runs every unfinished process of `queues[bucket]` to completion, in order.
fn run_to_completion<O>(
    queues: &mut [ProcessQueue],
    bucket: usize,
    emitter: &mut Emitter<'_, O>,
) -> Result<()>
where
    O: SchedulerObserver + ?Sized,
{
    for position in 0..queues[bucket].len() {
        let Some(process) = queues[bucket].get_mut(position) else {
            break;
        };
        if process.is_finished() {
            continue;
        }

        debug!(process_id = process.id(), cpu_time = process.cpu_time(), "dispatch");
        process.set_state(ProcessState::Running);
        emitter.emit(queues);

        while let Some(process) = queues[bucket].get_mut(position) {
            if process.remaining() == 0 {
                break;
            }
            process.execute(1)?;
            emitter.emit(queues);
        }

        if let Some(process) = queues[bucket].get_mut(position) {
            process.set_state(ProcessState::Finished);
        }
        emitter.emit(queues);
    }
    Ok(())
}

//! Scheduling algorithms, the snapshot sink, and run metrics.
//!
//! Provides FCFS, SJF, round-robin and multi-level priority scheduling over
//! [`ProcessQueue`](crate::models::ProcessQueue)s.
//!
//! # Algorithm
//!
//! `Scheduler` is stateless. Each call walks its queue(s) to completion and
//! hands a full [`Snapshot`](crate::models::Snapshot) to the observer after
//! every transition. A run is a synchronous batch computation.
//!
//! # Metrics
//!
//! `RunMetrics` computes turnaround, waiting time, dispatch counts and
//! makespan from a recorded snapshot sequence.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod algorithms;
mod metrics;
mod observer;

pub use algorithms::Scheduler;
pub use metrics::{ProcessMetrics, RunMetrics};
pub use observer::SchedulerObserver;

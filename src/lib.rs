//! CPU-scheduling simulator.
//!
//! Runs classical single-core scheduling algorithms over synthetic processes
//! and produces a deterministic, replayable sequence of snapshots: one per
//! state-affecting event.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `ProcessState`, `ProcessParams`,
//!   `ProcessQueue`, `Snapshot`
//! - **`scheduler`**: FCFS, SJF, round-robin and priority-queue algorithms,
//!   the `SchedulerObserver` sink, and `RunMetrics`
//! - **`simulation`**: Request parsing and orchestration (`SimulationRunner`)
//! - **`timeline`**: Recorded snapshots with a replay cursor
//! - **`generate`**: Demo and random workloads
//! - **`validation`**: Advisory input checks
//!
//! # Architecture
//!
//! A run is synchronous and eager. The runner builds fresh queues, the
//! scheduler mutates them quantum by quantum and calls the observer on every
//! transition, and the caller replays the recorded sequence at its own pace.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod error;
pub mod generate;
pub mod models;
pub mod scheduler;
pub mod simulation;
pub mod timeline;
pub mod validation;

pub use error::{Result, SimulationError};

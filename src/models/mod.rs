//! Simulation domain models.
//!
//! Provides the data types a scheduling run operates on and emits.
//!
//! # Domain Mappings
//!
//! | cpu-schedule | Operating system | Visualization |
//! |--------------|------------------|---------------|
//! | Process | Task / PCB | Table row |
//! | ProcessQueue | Ready queue | Row order |
//! | Snapshot | Scheduler trace point | One replay frame |

mod process;
mod queue;
mod snapshot;

pub use process::{Process, ProcessParams, ProcessState, MAX_PRIORITY, MIN_PRIORITY};
pub use queue::ProcessQueue;
pub use snapshot::{ProcessSnapshot, Snapshot};

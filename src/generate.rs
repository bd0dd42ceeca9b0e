//! Synthetic workloads.
//!
//! The scheduler only ever sees synthetic processes. This module supplies a
//! fixed demo workload and a seedable random generator.

use rand::Rng;

use crate::models::{ProcessParams, MAX_PRIORITY, MIN_PRIORITY};

/// The four-process demo workload.
///
/// | id | cpu time | priority |
/// |----|----------|----------|
/// | 1 | 6 | 2 |
/// | 2 | 3 | 1 |
/// | 3 | 8 | 4 |
/// | 4 | 4 | 3 |
pub fn example_processes() -> Vec<ProcessParams> {
    [(1, 6, 2), (2, 3, 1), (3, 8, 4), (4, 4, 3)]
        .into_iter()
        .map(|(id, cpu_time, priority)| ProcessParams::new(cpu_time, priority).with_id(id))
        .collect()
}

/// Draws `count` processes with ids `1..=count`.
///
/// CPU times fall in `1..=max_cpu_time` (at least 1) and priorities in
/// `MIN_PRIORITY..=MAX_PRIORITY`.
pub fn random_processes<R: Rng>(
    count: usize,
    max_cpu_time: i64,
    rng: &mut R,
) -> Vec<ProcessParams> {
    let max_cpu_time = max_cpu_time.max(1);
    (1..=count as u32)
        .map(|id| {
            let cpu_time = rng.random_range(1..=max_cpu_time);
            let priority = rng.random_range(MIN_PRIORITY..=MAX_PRIORITY);
            ProcessParams::new(cpu_time, priority).with_id(id)
        })
        .collect()
}

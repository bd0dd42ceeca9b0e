//! Ordered process queue.
//!
//! Holds processes in scheduling order. Order means arrival order for FCFS
//! and round-robin, sorted order after an SJF pass, and insertion order
//! within one priority bucket.
//!
//! Backed by a `VecDeque`, so insertion and removal are O(1) at both ends.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Process;

/// An ordered queue of processes owned for the duration of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessQueue {
    slots: VecDeque<Process>,
}

impl ProcessQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding `processes` in the given order.
    pub fn from_processes(processes: impl IntoIterator<Item = Process>) -> Self {
        Self {
            slots: processes.into_iter().collect(),
        }
    }

    /// Inserts at the head.
    pub fn push_front(&mut self, process: Process) {
        self.slots.push_front(process);
    }

    /// Inserts at the tail.
    pub fn push_back(&mut self, process: Process) {
        self.slots.push_back(process);
    }

    /// Removes from the head.
    pub fn pop_front(&mut self) -> Option<Process> {
        self.slots.pop_front()
    }

    /// Removes from the tail.
    pub fn pop_back(&mut self) -> Option<Process> {
        self.slots.pop_back()
    }

    /// Whether the queue holds no process.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Iterates in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.slots.iter()
    }

    /// Process at `position`.
    pub fn get(&self, position: usize) -> Option<&Process> {
        self.slots.get(position)
    }

    /// Mutable process at `position`.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Process> {
        self.slots.get_mut(position)
    }

    /// Finds a process by id.
    pub fn find(&self, id: u32) -> Option<&Process> {
        self.slots.iter().find(|p| p.id() == id)
    }

    /// Whether every process is finished. True for an empty queue.
    pub fn all_finished(&self) -> bool {
        self.slots.iter().all(Process::is_finished)
    }

    /// Visits every slot once, in order.
    ///
    /// The visitor receives the slot position and mutable access to the slot,
    /// so it may mutate the process in place or rebind the slot to another
    /// process.
    pub fn mutate<F>(&mut self, mut visitor: F)
    where
        F: FnMut(usize, &mut Process),
    {
        for (position, slot) in self.slots.iter_mut().enumerate() {
            visitor(position, slot);
        }
    }

    /// Stable-sorts by total CPU time ascending, rebinding slots in place.
    ///
    /// Ties keep their current relative order.
    pub fn sort_by_cpu_time(&mut self) {
        let mut sorted: Vec<Process> = self.slots.iter().cloned().collect();
        sorted.sort_by_key(Process::cpu_time);

        let mut sorted = sorted.into_iter();
        self.mutate(|_, slot| {
            if let Some(process) = sorted.next() {
                *slot = process;
            }
        });
    }

    /// Ids in queue order.
    pub fn ids(&self) -> Vec<u32> {
        self.slots.iter().map(Process::id).collect()
    }
}

impl FromIterator<Process> for ProcessQueue {
    fn from_iter<I: IntoIterator<Item = Process>>(iter: I) -> Self {
        Self::from_processes(iter)
    }
}

impl<'a> IntoIterator for &'a ProcessQueue {
    type Item = &'a Process;
    type IntoIter = std::collections::vec_deque::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

//! Snapshot sink.

use tracing::trace;

use crate::models::{ProcessQueue, Snapshot};

/// Receives every snapshot a run emits, in order.
///
/// Implemented for any `FnMut(Snapshot)` closure, so a plain closure
/// pushing into a `Vec` works as an observer.
pub trait SchedulerObserver {
    /// Called once per state-affecting event.
    fn on_snapshot(&mut self, snapshot: Snapshot);
}

impl<F> SchedulerObserver for F
where
    F: FnMut(Snapshot) + ?Sized,
{
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        self(snapshot)
    }
}

/// Numbers snapshots, rebases their clock and forwards them to an observer.
///
/// One emitter spans a whole run, so step numbers and the clock stay
/// contiguous across priority buckets. The clock starts at zero even when
/// processes carry prior progress.
pub(crate) struct Emitter<'a, O: ?Sized> {
    observer: &'a mut O,
    step: usize,
    origin: Option<i64>,
}

impl<'a, O> Emitter<'a, O>
where
    O: SchedulerObserver + ?Sized,
{
    pub(crate) fn new(observer: &'a mut O) -> Self {
        Self {
            observer,
            step: 0,
            origin: None,
        }
    }

    /// Captures `queues` and hands the snapshot to the observer.
    pub(crate) fn emit(&mut self, queues: &[ProcessQueue]) {
        let mut snapshot = Snapshot::capture(self.step, queues);
        let origin = *self.origin.get_or_insert(snapshot.time);
        snapshot.time -= origin;
        trace!(step = snapshot.step, time = snapshot.time, "snapshot");
        self.observer.on_snapshot(snapshot);
        self.step += 1;
    }

    /// Number of snapshots emitted so far.
    pub(crate) fn emitted(&self) -> usize {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;

    #[test]
    fn test_closure_observer_receives_numbered_steps() {
        let queue = ProcessQueue::from_processes(vec![Process::new(1, 2, 1).unwrap()]);
        let mut seen = Vec::new();
        let mut sink = |s: Snapshot| seen.push(s.step);
        let mut emitter = Emitter::new(&mut sink);
        emitter.emit(std::slice::from_ref(&queue));
        emitter.emit(std::slice::from_ref(&queue));
        assert_eq!(emitter.emitted(), 2);
        assert_eq!(seen, vec![0, 1]);
    }
}

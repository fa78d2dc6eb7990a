//! Simulated-time one-shot task queue.
//!
//! Tasks are scheduled against the world clock and drained in deadline order
//! as time advances. Tasks referring to towers carry the generation the tower
//! had when the task was armed, so tasks outlived by a session reset or a
//! re-arm are structurally inert when they fire.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use rampart_core::{DecalId, TowerId};

/// Work item executed when its deadline passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimelineTask {
    /// Ends the refractory window of the tower, if the generation still matches.
    ClearCooldown {
        /// Tower whose cooldown should end.
        tower: TowerId,
        /// Generation recorded when the cooldown was armed.
        generation: u64,
    },
    /// Removes the damage decal from the overlay.
    ExpireDecal {
        /// Decal that has reached its lifetime.
        decal: DecalId,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    deadline: Duration,
    seq: u64,
    task: TimelineTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of pending one-shots ordered by deadline, then insertion order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Timeline {
    pending: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Timeline {
    /// Schedules the task to run once `delay` of simulated time has elapsed
    /// past `now`.
    pub(crate) fn run_once(&mut self, now: Duration, delay: Duration, task: TimelineTask) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.pending.push(Reverse(Entry {
            deadline: now.saturating_add(delay),
            seq,
            task,
        }));
    }

    /// Pops the next task whose deadline is at or before `now`.
    ///
    /// Called in a loop so one tick drains every task it has passed, in
    /// deadline order.
    pub(crate) fn due(&mut self, now: Duration) -> Option<TimelineTask> {
        match self.pending.peek() {
            Some(Reverse(entry)) if entry.deadline <= now => {
                self.pending.pop().map(|Reverse(entry)| entry.task)
            }
            _ => None,
        }
    }

    /// Drops every pending task. Generation tags already protect against
    /// stale execution, so this is only needed when tearing a session down.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decal_task(raw: u32) -> TimelineTask {
        TimelineTask::ExpireDecal {
            decal: DecalId::new(raw),
        }
    }

    #[test]
    fn tasks_fire_in_deadline_order() {
        let mut timeline = Timeline::default();
        let now = Duration::ZERO;
        timeline.run_once(now, Duration::from_millis(300), decal_task(0));
        timeline.run_once(now, Duration::from_millis(100), decal_task(1));
        timeline.run_once(now, Duration::from_millis(200), decal_task(2));

        let late = Duration::from_millis(500);
        assert_eq!(timeline.due(late), Some(decal_task(1)));
        assert_eq!(timeline.due(late), Some(decal_task(2)));
        assert_eq!(timeline.due(late), Some(decal_task(0)));
        assert_eq!(timeline.due(late), None);
    }

    #[test]
    fn tasks_do_not_fire_before_their_deadline() {
        let mut timeline = Timeline::default();
        timeline.run_once(Duration::ZERO, Duration::from_millis(100), decal_task(0));
        assert_eq!(timeline.due(Duration::from_millis(99)), None);
        assert_eq!(
            timeline.due(Duration::from_millis(100)),
            Some(decal_task(0))
        );
    }

    #[test]
    fn equal_deadlines_fire_in_insertion_order() {
        let mut timeline = Timeline::default();
        let now = Duration::from_millis(50);
        timeline.run_once(now, Duration::from_millis(100), decal_task(7));
        timeline.run_once(now, Duration::from_millis(100), decal_task(8));

        let due = Duration::from_millis(150);
        assert_eq!(timeline.due(due), Some(decal_task(7)));
        assert_eq!(timeline.due(due), Some(decal_task(8)));
    }

    #[test]
    fn clear_drops_every_pending_task() {
        let mut timeline = Timeline::default();
        timeline.run_once(Duration::ZERO, Duration::from_millis(10), decal_task(0));
        timeline.run_once(Duration::ZERO, Duration::from_millis(20), decal_task(1));
        timeline.clear();
        assert_eq!(timeline.pending_len(), 0);
        assert_eq!(timeline.due(Duration::from_secs(1)), None);
    }
}

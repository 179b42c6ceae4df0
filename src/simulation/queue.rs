use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::taskset::TaskId;
use crate::time::{Instant, Time};

use super::job::Job;

/// Priority key of a ready job: the active discipline's primary
/// criterion, then release time, then task identifier. Smaller keys
/// mean higher priority; the two trailing components make every
/// scheduling decision deterministic.
pub(super) type PriorityKey = (Time, Instant, TaskId);

/// A pending release event: the next activation of one task.
///
/// Events are ordered by time, ties broken by task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Release {
    pub time: Instant,
    pub task: TaskId,
}

/// Min-ordered queue of future release events.
#[derive(Debug, Default)]
pub(super) struct EventQueue {
    heap: BinaryHeap<Reverse<Release>>,
}

impl EventQueue {
    pub fn push(&mut self, release: Release) {
        self.heap.push(Reverse(release));
    }

    /// Instant of the earliest pending release, if any.
    pub fn peek_time(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(r)| r.time)
    }

    pub fn pop(&mut self) -> Option<Release> {
        self.heap.pop().map(|Reverse(r)| r)
    }
}

#[derive(Debug)]
struct Entry {
    key: PriorityKey,
    job: Job,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
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
        self.key.cmp(&other.key)
    }
}

/// Min-ordered ready queue: the head is the highest-priority ready
/// job under the active discipline.
#[derive(Debug, Default)]
pub(super) struct ReadyQueue {
    heap: BinaryHeap<Reverse<Entry>>,
}

impl ReadyQueue {
    pub fn push(&mut self, key: PriorityKey, job: Job) {
        self.heap.push(Reverse(Entry { key, job }));
    }

    pub fn pop(&mut self) -> Option<(PriorityKey, Job)> {
        self.heap.pop().map(|Reverse(e)| (e.key, e.job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(task: TaskId, release: Instant) -> Job {
        Job {
            task,
            seq: 0,
            release,
            absolute_deadline: release + 100,
            cost: 1,
            remaining: 1,
        }
    }

    #[test]
    fn ready_queue_pops_smallest_key_first() {
        let mut q = ReadyQueue::default();
        q.push((20, 0, 1), job(1, 0));
        q.push((10, 5, 0), job(0, 5));
        q.push((20, 0, 0), job(0, 0));
        let order: Vec<PriorityKey> = std::iter::from_fn(|| q.pop().map(|(k, _)| k)).collect();
        assert_eq!(order, vec![(10, 5, 0), (20, 0, 0), (20, 0, 1)]);
    }

    #[test]
    fn ready_queue_breaks_primary_ties_by_release_then_id() {
        let mut q = ReadyQueue::default();
        q.push((15, 10, 0), job(0, 10));
        q.push((15, 0, 2), job(2, 0));
        q.push((15, 0, 1), job(1, 0));
        assert_eq!(q.pop().map(|(k, _)| k.2), Some(1));
        assert_eq!(q.pop().map(|(k, _)| k.2), Some(2));
        assert_eq!(q.pop().map(|(k, _)| k.2), Some(0));
    }

    #[test]
    fn event_queue_orders_by_time_then_task() {
        let mut q = EventQueue::default();
        q.push(Release { time: 7, task: 1 });
        q.push(Release { time: 3, task: 2 });
        q.push(Release { time: 3, task: 0 });
        assert_eq!(q.peek_time(), Some(3));
        assert_eq!(q.pop(), Some(Release { time: 3, task: 0 }));
        assert_eq!(q.pop(), Some(Release { time: 3, task: 2 }));
        assert_eq!(q.pop(), Some(Release { time: 7, task: 1 }));
        assert_eq!(q.pop(), None);
    }
}

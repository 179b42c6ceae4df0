use crate::taskset::{Task, TaskId};
use crate::time::{Duration, Instant, Service};

/// One activation of a periodic task.
///
/// A job is created at its release event with a freshly sampled
/// execution demand and retired when the demand is exhausted or the
/// simulation horizon cuts it off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Identifier of the releasing task.
    pub task: TaskId,
    /// Activation index within the run (0-based).
    pub seq: u64,
    /// Actual release instant, including the task's jitter offset.
    pub release: Instant,
    /// Release plus the task's relative deadline.
    pub absolute_deadline: Instant,
    /// Sampled total execution demand, in [BCET, WCET].
    pub cost: Service,
    /// Demand still to be served; decremented as the job runs.
    pub remaining: Service,
}

impl Job {
    pub fn new(task: &Task, seq: u64, release: Instant, cost: Service) -> Self {
        Job {
            task: task.id,
            seq,
            release,
            absolute_deadline: release + task.deadline,
            cost,
            remaining: cost,
        }
    }

    /// Response time assuming the job completed at `completion`.
    pub fn response_time(&self, completion: Instant) -> Duration {
        completion - self.release
    }
}

/*! The task-set model: periodic tasks and their derived quantities.

This module provides the [Task] record and the validated [TaskSet]
collection that every analysis in this crate consumes. A task set is
immutable once constructed; malformed parameters are rejected as a
whole at construction time via [InvalidTask], never silently repaired.
*/

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{Duration, Service, Time};

/// Identifier of a task, unique within a task set.
pub type TaskId = u32;

/// A periodic real-time task.
///
/// The record is immutable once it has been admitted to a [TaskSet];
/// no core computation ever mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the set.
    pub id: TaskId,
    /// Release jitter: the constant offset between a nominal periodic
    /// release point and the actual release.
    #[serde(default)]
    pub jitter: Duration,
    /// Best-case execution time (BCET).
    pub bcet: Service,
    /// Worst-case execution time (WCET).
    pub wcet: Service,
    /// Exact separation between two consecutive releases.
    pub period: Duration,
    /// Relative deadline; may differ from the period.
    pub deadline: Duration,
    /// Processing-element tag carried through from the input row.
    /// Accepted for the benefit of loaders, ignored by every
    /// computation in this crate.
    #[serde(default)]
    pub pe: Option<u32>,
}

impl Task {
    /// The task's utilization C/T.
    pub fn utilization(&self) -> f64 {
        self.wcet as f64 / self.period as f64
    }

    /// Whether the task satisfies C <= D <= T.
    ///
    /// Violating tasks are legal inputs, but a set containing one is
    /// potentially unschedulable by construction; see
    /// [TaskSet::unconstrained_tasks].
    pub fn constrained_deadline(&self) -> bool {
        self.wcet <= self.deadline && self.deadline <= self.period
    }
}

/// Reason for refusing a task set at construction time.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum InvalidTask {
    /// The period must be positive.
    #[error("task {id}: period must be positive")]
    NonPositivePeriod { id: TaskId },

    /// The relative deadline must be positive.
    #[error("task {id}: deadline must be positive")]
    NonPositiveDeadline { id: TaskId },

    /// Both execution-time bounds must be positive.
    #[error("task {id}: execution time must be positive")]
    NonPositiveExecutionTime { id: TaskId },

    /// The best-case execution time may not exceed the worst case.
    #[error("task {id}: BCET {bcet} exceeds WCET {wcet}")]
    BcetExceedsWcet {
        id: TaskId,
        bcet: Service,
        wcet: Service,
    },

    /// Task identifiers must be unique within a set.
    #[error("duplicate task identifier {id}")]
    DuplicateId { id: TaskId },
}

/// An ordered collection of [Task]s.
///
/// The stored order is display order only; every scheduling order is
/// derived (see [TaskSet::dm_order]), never taken from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Validate and wrap a collection of tasks.
    ///
    /// The whole set is refused on the first malformed task.
    pub fn new(tasks: Vec<Task>) -> Result<Self, InvalidTask> {
        let mut seen = BTreeSet::new();
        for t in &tasks {
            if t.period == 0 {
                return Err(InvalidTask::NonPositivePeriod { id: t.id });
            }
            if t.deadline == 0 {
                return Err(InvalidTask::NonPositiveDeadline { id: t.id });
            }
            if t.bcet == 0 || t.wcet == 0 {
                return Err(InvalidTask::NonPositiveExecutionTime { id: t.id });
            }
            if t.bcet > t.wcet {
                return Err(InvalidTask::BcetExceedsWcet {
                    id: t.id,
                    bcet: t.bcet,
                    wcet: t.wcet,
                });
            }
            if !seen.insert(t.id) {
                return Err(InvalidTask::DuplicateId { id: t.id });
            }
        }
        Ok(TaskSet { tasks })
    }

    /// The tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the set.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set contains no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by identifier.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Total utilization U = sum of C_i/T_i.
    ///
    /// The model enforces no upper bound on U; schedulability is the
    /// analyzers' business, not the model's.
    pub fn utilization(&self) -> f64 {
        self.tasks.iter().map(Task::utilization).sum()
    }

    /// Least common multiple of all periods.
    ///
    /// Returns `None` for an empty set or if the LCM overflows `u64`.
    pub fn hyperperiod(&self) -> Option<Time> {
        if self.tasks.is_empty() {
            return None;
        }
        self.tasks
            .iter()
            .try_fold(1, |acc, t| checked_lcm(acc, t.period))
    }

    /// The Deadline-Monotonic total order: ascending relative
    /// deadline, equal deadlines broken by ascending identifier.
    ///
    /// The tie-break makes the order (and thereby the membership of
    /// every higher-priority set) deterministic and repeatable.
    pub fn dm_order(&self) -> Vec<&Task> {
        let mut ordered: Vec<&Task> = self.tasks.iter().collect();
        ordered.sort_by_key(|t| (t.deadline, t.id));
        ordered
    }

    /// Identifiers of all tasks violating C <= D <= T.
    ///
    /// A non-empty result flags the set as potentially unschedulable
    /// by construction.
    pub fn unconstrained_tasks(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| !t.constrained_deadline())
            .map(|t| t.id)
            .collect()
    }
}

/// Iterative Euclidean GCD.
fn gcd(mut a: Time, mut b: Time) -> Time {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Overflow-checked LCM; the division happens first so that only the
/// final multiplication can overflow.
fn checked_lcm(a: Time, b: Time) -> Option<Time> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

#[cfg(test)]
mod tests;

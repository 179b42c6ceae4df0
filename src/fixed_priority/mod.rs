/*! Worst-case response-time analysis for Deadline-Monotonic scheduling.

Tasks are prioritized by ascending relative deadline (ties broken by
ascending identifier). For each task the classic response-time
recurrence

```text
R = C_i + sum over hp(i) of ceil(R / T_j) * C_j
```

is solved with the bounded search in [crate::fixed_point]. A task is
schedulable iff the recurrence converges to a value within the task's
deadline; a recurrence that fails to stabilize below the caller's
divergence limit is reported with a distinct diverged marker so that
callers can tell it apart from an ordinary deadline overrun.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fixed_point::{self, SearchResult};
use crate::taskset::{Task, TaskId, TaskSet};
use crate::time::{Duration, Service};

/// Response-time analysis outcome for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: TaskId,
    /// The task's WCRT if the recurrence converged, or the recorded
    /// divergence.
    pub wcrt: SearchResult,
    pub deadline: Duration,
    /// True iff the recurrence converged and the WCRT is within the
    /// deadline.
    pub schedulable: bool,
}

/// Response-time analysis outcome for a whole task set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtaResult {
    /// Per-task outcomes, in Deadline-Monotonic priority order.
    pub per_task: Vec<TaskResponse>,
    /// Set-level verdict: the conjunction over all tasks.
    pub schedulable: bool,
}

impl RtaResult {
    /// Look up the outcome for one task.
    pub fn get(&self, id: TaskId) -> Option<&TaskResponse> {
        self.per_task.iter().find(|r| r.id == id)
    }
}

/// Compute the WCRT of every task under Deadline-Monotonic priorities.
///
/// Each task's fixed point is self-contained given its higher-priority
/// set, so the per-task computations are independent; they are carried
/// out in priority order only for the sake of a deterministic result
/// layout. A search that does not stabilize at or below
/// `divergence_limit` yields a [diverged
/// marker][crate::fixed_point::SearchFailure] and renders the set
/// unschedulable.
pub fn response_times(ts: &TaskSet, divergence_limit: Duration) -> RtaResult {
    let ordered = ts.dm_order();
    let mut per_task = Vec::with_capacity(ordered.len());
    let mut schedulable = true;

    for (i, ti) in ordered.iter().enumerate() {
        let hp = &ordered[..i];
        let wcrt = fixed_point::search(ti.wcet, divergence_limit, |r| {
            ti.wcet + total_interference(hp, r)
        });
        let ok = matches!(wcrt, Ok(r) if r <= ti.deadline);
        debug!(
            task = ti.id,
            wcrt = ?wcrt,
            deadline = ti.deadline,
            schedulable = ok,
            "DM response-time analysis"
        );
        schedulable &= ok;
        per_task.push(TaskResponse {
            id: ti.id,
            wcrt,
            deadline: ti.deadline,
            schedulable: ok,
        });
    }

    RtaResult {
        per_task,
        schedulable,
    }
}

/// Worst-case interference of the given higher-priority tasks on a
/// busy window of length `window`.
fn total_interference(hp: &[&Task], window: Duration) -> Service {
    hp.iter()
        .map(|tj| divide_with_ceil(window, tj.period) * tj.wcet)
        .sum()
}

// common helper function
fn divide_with_ceil(a: Duration, b: Duration) -> u64 {
    a / b + (a % b > 0) as u64
}

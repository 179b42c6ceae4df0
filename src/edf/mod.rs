/*! Processor-demand schedulability analysis for EDF.

EDF feasibility on a dedicated uniprocessor is decided by checking
that the cumulative processor demand `h(t)` of all jobs with absolute
deadlines in `[0, t]` never exceeds `t`. It suffices to check the
instants at which `h` steps, i.e., the absolute-deadline lattice
`D_i + k * T_i` of every task, up to a caller-supplied horizon. The
lattice union must be complete up to the horizon; omitting a candidate
would turn the test into a false-positive oracle.
*/

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::taskset::{Task, TaskSet};
use crate::time::{Duration, Instant, Service};

/// Verdict of the processor-demand test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandResult {
    /// Whether the set is EDF-schedulable.
    pub schedulable: bool,
    /// Total utilization of the set.
    pub utilization: f64,
    /// Number of candidate instants examined; zero when the
    /// utilization short-circuit fired.
    pub points_checked: usize,
    /// Earliest candidate instant at which demand exceeded supply.
    pub first_violation: Option<Instant>,
}

/// Run the processor-demand test up to the given candidate horizon.
///
/// A total utilization above 1.0 is sufficient to reject without any
/// demand computation; it is a structured verdict, not an input error.
pub fn demand_test(ts: &TaskSet, horizon: Duration) -> DemandResult {
    let utilization = ts.utilization();
    if utilization > 1.0 {
        debug!(utilization, "utilization exceeds 1.0, EDF infeasible");
        return DemandResult {
            schedulable: false,
            utilization,
            points_checked: 0,
            first_violation: None,
        };
    }

    let candidates = ts
        .tasks()
        .iter()
        .map(|t| deadline_lattice(t, horizon))
        .kmerge()
        .dedup();

    let mut points_checked = 0;
    for t in candidates {
        points_checked += 1;
        let demand: Service = ts.tasks().iter().map(|task| demand_bound(task, t)).sum();
        if demand > t {
            debug!(
                instant = t,
                demand, points_checked, "processor demand exceeds supply"
            );
            return DemandResult {
                schedulable: false,
                utilization,
                points_checked,
                first_violation: Some(t),
            };
        }
    }

    debug!(utilization, points_checked, "EDF demand test passed");
    DemandResult {
        schedulable: true,
        utilization,
        points_checked,
        first_violation: None,
    }
}

/// Demand-bound function of a single task: the cumulative execution
/// requirement of all its jobs with absolute deadlines in `[0, t]`.
fn demand_bound(task: &Task, t: Instant) -> Service {
    if t < task.deadline {
        0
    } else {
        ((t - task.deadline) / task.period + 1) * task.wcet
    }
}

/// The instants at which one task's demand-bound function steps:
/// `D + k * T` for `k >= 0`, ascending, up to the horizon.
fn deadline_lattice(task: &Task, horizon: Duration) -> impl Iterator<Item = Instant> + '_ {
    (0u64..)
        .map(move |k| {
            k.checked_mul(task.period)
                .and_then(|kt| kt.checked_add(task.deadline))
        })
        .while_some()
        .take_while(move |t| *t <= horizon)
}

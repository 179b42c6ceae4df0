/*! Reconciliation of analytical and simulated verdicts.

The comparator merges the DM response-time analysis, the EDF
processor-demand verdict, and the simulated response times of both
disciplines into one structured result per task set. Beyond the plain
merge it performs one soundness check: under DM, an observed response
time may never exceed the converged analytical WCRT. A violation is a
defect in either the analysis or the simulator and is reported as a
distinct [SoundnessAlarm], never folded into the ordinary
deadline-miss bookkeeping.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edf::{self, DemandResult};
use crate::fixed_point::SearchResult;
use crate::fixed_priority::{self, RtaResult};
use crate::simulation::{
    self, Discipline, ExecutionModel, SimulationOutcome, SimulationParams, TaskObservation,
    Uniform,
};
use crate::taskset::{TaskId, TaskSet};
use crate::time::Duration;

/// Caller-supplied configuration for a full evaluation of one task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationParams {
    /// Divergence bound of the WCRT fixed-point iteration.
    pub rta_divergence_limit: Duration,
    /// Candidate-instant horizon of the processor-demand test.
    pub demand_horizon: Duration,
    /// Simulation settings, shared by the DM and EDF replays.
    pub sim: SimulationParams,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        EvaluationParams {
            rta_divergence_limit: 200_000,
            demand_horizon: 200_000,
            sim: SimulationParams::default(),
        }
    }
}

/// A simulated response time exceeded the analytical upper bound.
///
/// For DM, the analysis is a sound upper bound on every observable
/// response time; if a run beats it, one of the two engines is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundnessAlarm {
    pub task: TaskId,
    /// The converged analytical bound.
    pub wcrt: Duration,
    /// The larger observed response time.
    pub observed: Duration,
}

/// Analytical and empirical outcomes of one task, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskComparison {
    pub id: TaskId,
    pub deadline: Duration,
    /// Converged WCRT or the recorded divergence, from the DM analysis.
    pub wcrt: SearchResult,
    pub analytic_schedulable: bool,
    /// Aggregated DM simulation observations for this task.
    pub dm_observed: Option<TaskObservation>,
    /// Aggregated EDF simulation observations for this task.
    pub edf_observed: Option<TaskObservation>,
    /// True iff this task raised a [SoundnessAlarm].
    pub bound_exceeded: bool,
}

/// The merged verdict over one task set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Per-task reconciliation, in DM priority order.
    pub per_task: Vec<TaskComparison>,
    /// The full DM response-time analysis.
    pub dm: RtaResult,
    /// The full EDF demand-bound verdict.
    pub edf: DemandResult,
    /// Aggregated DM simulation outcome.
    pub dm_sim: SimulationOutcome,
    /// Aggregated EDF simulation outcome.
    pub edf_sim: SimulationOutcome,
    /// Soundness violations; anything here indicates a defect in an
    /// engine, not a property of the task set.
    pub alarms: Vec<SoundnessAlarm>,
    /// Tasks violating C <= D <= T, flagged at construction time as
    /// potentially unschedulable by construction.
    pub unconstrained: Vec<TaskId>,
}

impl Comparison {
    /// Whether any run of the given discipline observed a deadline miss.
    pub fn deadline_miss_observed(&self, discipline: Discipline) -> bool {
        let sim = match discipline {
            Discipline::DeadlineMonotonic => &self.dm_sim,
            Discipline::EarliestDeadlineFirst => &self.edf_sim,
        };
        sim.runs.iter().any(|r| r.deadline_miss)
    }
}

/// Merge previously computed analytical and simulated results.
///
/// All inputs must stem from the same task set; the merge itself is
/// pure and leaves every verdict as-is, only adding the soundness
/// cross-check.
pub fn compare(
    ts: &TaskSet,
    dm: &RtaResult,
    edf_verdict: &DemandResult,
    dm_sim: &SimulationOutcome,
    edf_sim: &SimulationOutcome,
) -> Comparison {
    let mut per_task = Vec::with_capacity(dm.per_task.len());
    let mut alarms = Vec::new();

    for resp in &dm.per_task {
        let dm_observed = dm_sim.per_task.get(&resp.id).cloned();
        let edf_observed = edf_sim.per_task.get(&resp.id).cloned();
        let bound_exceeded = match (resp.wcrt, dm_observed.as_ref().and_then(|o| o.max)) {
            (Ok(wcrt), Some(observed)) if observed > wcrt => {
                alarms.push(SoundnessAlarm {
                    task: resp.id,
                    wcrt,
                    observed,
                });
                true
            }
            // a diverged analysis offers no finite bound to violate
            _ => false,
        };
        per_task.push(TaskComparison {
            id: resp.id,
            deadline: resp.deadline,
            wcrt: resp.wcrt,
            analytic_schedulable: resp.schedulable,
            dm_observed,
            edf_observed,
            bound_exceeded,
        });
    }

    if !alarms.is_empty() {
        debug!(
            count = alarms.len(),
            "simulation exceeded analytical bounds"
        );
    }

    Comparison {
        per_task,
        dm: dm.clone(),
        edf: *edf_verdict,
        dm_sim: dm_sim.clone(),
        edf_sim: edf_sim.clone(),
        alarms,
        unconstrained: ts.unconstrained_tasks(),
    }
}

/// Run both analyzers and both simulations on one task set and merge
/// the outcomes, sampling execution times with the given model.
pub fn evaluate_with_model<M>(ts: &TaskSet, params: &EvaluationParams, model: &M) -> Comparison
where
    M: ExecutionModel + ?Sized,
{
    let dm = fixed_priority::response_times(ts, params.rta_divergence_limit);
    let edf_verdict = edf::demand_test(ts, params.demand_horizon);
    let dm_sim = simulation::simulate(ts, Discipline::DeadlineMonotonic, &params.sim, model);
    let edf_sim = simulation::simulate(ts, Discipline::EarliestDeadlineFirst, &params.sim, model);
    compare(ts, &dm, &edf_verdict, &dm_sim, &edf_sim)
}

/// [evaluate_with_model] with the default uniform sampling rule.
pub fn evaluate(ts: &TaskSet, params: &EvaluationParams) -> Comparison {
    evaluate_with_model(ts, params, &Uniform)
}

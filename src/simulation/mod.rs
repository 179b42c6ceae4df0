/*! Discrete-event simulation of DM and EDF scheduling.

The simulator replays the periodic release pattern of a task set on a
dedicated uniprocessor and records per-job response times. It is
event-driven, not tick-driven: an explicit min-ordered queue of
release events plus the running job's projected completion define the
next decision point, and time advances in variable-size steps between
decision points. Preemption is free and keeps the preempted job's
remaining demand; all priority ties are broken deterministically by
release time and then task identifier.

Each run draws every job's execution demand from a caller-chosen
[ExecutionModel]; repetitions are independently seeded and aggregated
per task. Work still pending when the horizon is reached is dropped:
it counts neither as a completion nor as a deadline miss.
*/

use std::collections::BTreeMap;

use derive_more::Display;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::taskset::{Task, TaskId, TaskSet};
use crate::time::{Duration, Instant};

mod exec;
mod job;
mod queue;

pub use exec::{ExecutionModel, Uniform, WorstCase};
pub use job::Job;

use queue::{EventQueue, PriorityKey, ReadyQueue, Release};

/// The two priority disciplines the simulator can replay.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discipline {
    /// Fixed priority by ascending relative deadline.
    #[display(fmt = "DM")]
    DeadlineMonotonic,
    /// Dynamic priority by ascending absolute deadline, recomputed at
    /// every scheduling decision rather than fixed per task.
    #[display(fmt = "EDF")]
    EarliestDeadlineFirst,
}

impl Discipline {
    /// Priority key of a ready job; smaller is higher priority.
    fn priority(self, task: &Task, job: &Job) -> PriorityKey {
        let primary = match self {
            Discipline::DeadlineMonotonic => task.deadline,
            Discipline::EarliestDeadlineFirst => job.absolute_deadline,
        };
        (primary, job.release, job.task)
    }
}

/// Caller-supplied simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Simulated time units per run. Releases happen strictly before
    /// the horizon; completions are recorded up to and including it.
    pub horizon: Duration,
    /// Number of independent repetitions, each with freshly sampled
    /// execution demands.
    pub repetitions: usize,
    /// Base RNG seed; repetition `k` is seeded with `seed + k`.
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            horizon: 100_000,
            repetitions: 5,
            seed: 42,
        }
    }
}

/// Observations from a single simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Response times of completed jobs, per task, in completion order.
    pub response_times: BTreeMap<TaskId, Vec<Duration>>,
    /// Completed jobs that missed their deadline, per task.
    pub misses: BTreeMap<TaskId, usize>,
    /// True iff any job in this run missed its deadline.
    pub deadline_miss: bool,
}

/// Per-task statistics aggregated over all repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskObservation {
    /// Number of completed jobs across all runs.
    pub samples: usize,
    /// Largest observed response time, if any job completed.
    pub max: Option<Duration>,
    /// Mean observed response time, if any job completed.
    pub mean: Option<f64>,
    /// Deadline misses across all runs.
    pub misses: usize,
    /// Set when the task completed no job in any run (e.g., its
    /// period or jitter exceeds the horizon). Reported explicitly so
    /// that zero misses is never mistaken for schedulability.
    pub insufficient_samples: bool,
}

/// Aggregated outcome of all repetitions under one discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub discipline: Discipline,
    /// The individual runs, in repetition order.
    pub runs: Vec<RunResult>,
    /// Per-task aggregation over all runs.
    pub per_task: BTreeMap<TaskId, TaskObservation>,
}

/// Mutable state of one simulation run.
struct Run<'a> {
    discipline: Discipline,
    horizon: Duration,
    now: Instant,
    tasks: BTreeMap<TaskId, &'a Task>,
    next_seq: BTreeMap<TaskId, u64>,
    events: EventQueue,
    ready: ReadyQueue,
}

impl<'a> Run<'a> {
    fn new(ts: &'a TaskSet, discipline: Discipline, horizon: Duration) -> Self {
        let mut events = EventQueue::default();
        for t in ts.tasks() {
            // first release at the jitter offset
            if t.jitter < horizon {
                events.push(Release {
                    time: t.jitter,
                    task: t.id,
                });
            }
        }
        Run {
            discipline,
            horizon,
            now: 0,
            tasks: ts.tasks().iter().map(|t| (t.id, t)).collect(),
            next_seq: ts.tasks().iter().map(|t| (t.id, 0)).collect(),
            events,
            ready: ReadyQueue::default(),
        }
    }

    /// Admit every release due at the current instant and schedule
    /// each task's following release.
    fn admit_releases<M, R>(&mut self, model: &M, rng: &mut R)
    where
        M: ExecutionModel + ?Sized,
        R: Rng,
    {
        while self.events.peek_time() == Some(self.now) {
            let release = match self.events.pop() {
                Some(r) => r,
                None => break,
            };
            let task = match self.tasks.get(&release.task) {
                Some(t) => *t,
                None => continue,
            };
            let seq = self.next_seq.entry(release.task).or_insert(0);
            let cost = model.sample(task, rng);
            let job = Job::new(task, *seq, release.time, cost);
            *seq += 1;
            trace!(task = task.id, release = release.time, cost, "job released");
            self.ready.push(self.discipline.priority(task, &job), job);
            let next = release.time + task.period;
            if next < self.horizon {
                self.events.push(Release {
                    time: next,
                    task: task.id,
                });
            }
        }
    }
}

/// Replay a single run of the given discipline over a task set.
///
/// Events are processed strictly in time order; a completion that
/// coincides with a release is handled first, so a job finishing at
/// instant `t` can never be preempted by a release at `t`.
pub fn simulate_run<M, R>(
    ts: &TaskSet,
    discipline: Discipline,
    horizon: Duration,
    model: &M,
    rng: &mut R,
) -> RunResult
where
    M: ExecutionModel + ?Sized,
    R: Rng,
{
    let mut response_times: BTreeMap<TaskId, Vec<Duration>> =
        ts.tasks().iter().map(|t| (t.id, Vec::new())).collect();
    let mut misses: BTreeMap<TaskId, usize> = ts.tasks().iter().map(|t| (t.id, 0)).collect();
    let mut run = Run::new(ts, discipline, horizon);

    loop {
        match run.ready.pop() {
            None => match run.events.peek_time() {
                // idle until the next release
                Some(t) => {
                    run.now = t;
                    run.admit_releases(model, rng);
                }
                None => break,
            },
            Some((key, mut job)) => {
                let completion = run.now + job.remaining;
                match run.events.peek_time() {
                    Some(next_release) if next_release < completion => {
                        // run up to the release, then let the queue
                        // decide who continues; a preempted job keeps
                        // its remaining demand
                        job.remaining -= next_release - run.now;
                        run.now = next_release;
                        run.ready.push(key, job);
                        run.admit_releases(model, rng);
                    }
                    _ => {
                        if completion > horizon {
                            // work pending at the horizon is dropped:
                            // neither a completion nor a miss
                            break;
                        }
                        run.now = completion;
                        let response = job.response_time(completion);
                        let missed = completion > job.absolute_deadline;
                        trace!(
                            task = job.task,
                            release = job.release,
                            response,
                            missed,
                            "job completed"
                        );
                        if let Some(rts) = response_times.get_mut(&job.task) {
                            rts.push(response);
                        }
                        if missed {
                            if let Some(m) = misses.get_mut(&job.task) {
                                *m += 1;
                            }
                        }
                    }
                }
            }
        }
    }

    let deadline_miss = misses.values().any(|&m| m > 0);
    RunResult {
        response_times,
        misses,
        deadline_miss,
    }
}

/// Run `params.repetitions` independent repetitions and aggregate the
/// observations per task.
///
/// Repetitions share nothing beyond the immutable task set, so a
/// caller may parallelize across task sets freely; within one run,
/// events are processed strictly in time order.
pub fn simulate<M>(
    ts: &TaskSet,
    discipline: Discipline,
    params: &SimulationParams,
    model: &M,
) -> SimulationOutcome
where
    M: ExecutionModel + ?Sized,
{
    let mut runs = Vec::with_capacity(params.repetitions);
    for rep in 0..params.repetitions {
        let mut rng = SmallRng::seed_from_u64(params.seed.wrapping_add(rep as u64));
        let run = simulate_run(ts, discipline, params.horizon, model, &mut rng);
        debug!(
            discipline = %discipline,
            rep,
            deadline_miss = run.deadline_miss,
            "simulation run finished"
        );
        runs.push(run);
    }
    let per_task = aggregate(ts, &runs);
    SimulationOutcome {
        discipline,
        runs,
        per_task,
    }
}

fn aggregate(ts: &TaskSet, runs: &[RunResult]) -> BTreeMap<TaskId, TaskObservation> {
    ts.tasks()
        .iter()
        .map(|t| {
            let samples: Vec<Duration> = runs
                .iter()
                .filter_map(|run| run.response_times.get(&t.id))
                .flatten()
                .copied()
                .collect();
            let misses = runs
                .iter()
                .filter_map(|run| run.misses.get(&t.id))
                .copied()
                .sum();
            let max = samples.iter().copied().max();
            let mean = if samples.is_empty() {
                None
            } else {
                Some(samples.iter().map(|&r| r as f64).sum::<f64>() / samples.len() as f64)
            };
            let observation = TaskObservation {
                samples: samples.len(),
                max,
                mean,
                misses,
                insufficient_samples: samples.is_empty(),
            };
            (t.id, observation)
        })
        .collect()
}

/*! Schedulability evaluation for periodic real-time task systems.

This crate decides whether a set of periodic tasks is schedulable on a
dedicated uniprocessor under two disciplines, Deadline Monotonic (DM)
and Earliest Deadline First (EDF), and reconciles the analytical
verdicts with a discrete-event simulation:

- [taskset]: the validated task-set model and its derived quantities
  (utilization, hyperperiod, DM priority order).
- [fixed_priority]: worst-case response-time analysis for DM via
  bounded fixed-point iteration ([fixed_point]).
- [edf]: the processor-demand schedulability test for EDF.
- [simulation]: an event-driven scheduler replay producing per-job
  response times under either discipline.
- [comparison]: the merged verdict, including the soundness
  cross-check that simulated response times never beat the analytical
  DM bound.

The analyzers are deterministic and side-effect-free; the simulator is
deterministic given its seed. Nothing in this crate performs I/O:
loading task sets, batch orchestration, and report rendering are the
callers' business, consuming the plain result structures exposed here.
*/

pub mod comparison;
pub mod edf;
pub mod fixed_point;
pub mod fixed_priority;
pub mod simulation;
pub mod taskset;
pub mod time;

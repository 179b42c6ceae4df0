use auto_impl::auto_impl;
use rand::Rng;

use crate::taskset::Task;
use crate::time::Service;

/// Per-job execution-time sampling rule.
///
/// The simulator draws one sample per released job; the drawn value
/// becomes the job's total demand. Implementations must stay within
/// the task's [BCET, WCET] envelope.
#[auto_impl(&, Box, Rc)]
pub trait ExecutionModel {
    /// Draw the total execution demand of a newly released job of `task`.
    fn sample<R: Rng>(&self, task: &Task, rng: &mut R) -> Service;
}

/// Uniformly distributed demand over [BCET, WCET]; the default rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl ExecutionModel for Uniform {
    fn sample<R: Rng>(&self, task: &Task, rng: &mut R) -> Service {
        rng.random_range(task.bcet..=task.wcet)
    }
}

/// Every job takes its full WCET; deterministic worst-case replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstCase;

impl ExecutionModel for WorstCase {
    fn sample<R: Rng>(&self, task: &Task, _rng: &mut R) -> Service {
        task.wcet
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::taskset::Task;

    fn task() -> Task {
        Task {
            id: 0,
            jitter: 0,
            bcet: 5,
            wcet: 10,
            period: 100,
            deadline: 100,
            pe: None,
        }
    }

    #[test]
    fn uniform_stays_within_the_envelope() {
        let mut rng = SmallRng::seed_from_u64(42);
        let t = task();
        for _ in 0..1000 {
            let c = Uniform.sample(&t, &mut rng);
            assert!((t.bcet..=t.wcet).contains(&c));
        }
    }

    #[test]
    fn worst_case_always_draws_the_wcet() {
        let mut rng = SmallRng::seed_from_u64(42);
        let t = task();
        for _ in 0..10 {
            assert_eq!(WorstCase.sample(&t, &mut rng), t.wcet);
        }
    }

    #[test]
    fn degenerate_envelope_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(7);
        let t = Task { bcet: 10, ..task() };
        assert_eq!(Uniform.sample(&t, &mut rng), 10);
    }
}

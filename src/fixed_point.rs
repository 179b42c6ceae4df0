/*! Bounded iterative fixed-point search.

The worst-case response time of a task under fixed-priority scheduling
is the least fixed point of a monotone recurrence. This module
implements the classic iterative search for it, bounded by an explicit
divergence limit so that an infeasible recurrence terminates with a
tagged failure instead of looping forever.
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{Duration, Service};

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum SearchFailure {
    /// No fixed point found at or below the given divergence threshold.
    #[error("no fixed point at or below {limit} found")]
    DivergenceLimitExceeded { limit: Duration },
}

/// Either the least fixed point found, or the recorded divergence.
pub type SearchResult = Result<Duration, SearchFailure>;

/// Conduct an iterative fixed point search up to a given divergence
/// threshold.
///
/// Starting from `seed`, the iteration `r <- workload(r)` is repeated
/// until it stabilizes. `workload` must be monotone and `seed` must
/// not exceed the least fixed point; both hold for the response-time
/// recurrences in this crate, which start at the task's own WCET.
pub fn search<RHS>(seed: Service, divergence_limit: Duration, workload: RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let fp = iterate(seed, divergence_limit, &workload);
    // In debug mode, compare against the brute-force solution.
    #[cfg(debug_assertions)]
    debug_assert_eq!(brute_force(seed, divergence_limit, &workload), fp);
    fp
}

fn iterate<RHS>(seed: Service, divergence_limit: Duration, workload: &RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let mut assumed_response_time = seed;
    while assumed_response_time <= divergence_limit {
        let demand = workload(assumed_response_time);
        if demand <= assumed_response_time {
            // we have converged
            return Ok(demand);
        } else {
            // continue iterating
            assumed_response_time = demand
        }
    }
    // if we get here, we failed to converge => no solution
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
    })
}

/// Very slow, naive scan for the least fixed point at or above `seed`.
/// Only used to cross-check [search] in debug builds.
#[cfg(debug_assertions)]
fn brute_force<RHS>(seed: Service, divergence_limit: Duration, workload: &RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    for r in seed..=divergence_limit {
        if workload(r) <= r {
            return Ok(workload(r));
        }
    }
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
    })
}

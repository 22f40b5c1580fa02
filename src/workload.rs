//! Workload sources: text parsing and seeded random generation.

use rand::prelude::*;
use serde::Deserialize;

use crate::core::Ticks;
use crate::error::SimError;
use crate::sim::Job;

/// Parse `"arrival:burst"` pairs separated by commas or whitespace, e.g.
/// `"0:5, 1:3"`. Ids are assigned in input order starting at 0.
pub fn parse_jobs(text: &str) -> Result<Vec<Job>, SimError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .enumerate()
        .map(|(i, item)| {
            let (arrival, burst) = item.split_once(':').ok_or_else(|| {
                SimError::workload("jobs", format!("{item:?} is not an arrival:burst pair"))
            })?;
            let parse = |field: &'static str, value: &str| {
                value.trim().parse::<i64>().map_err(|_| {
                    SimError::workload(field, format!("{value:?} is not an integer"))
                })
            };
            Job::try_new(
                i as u64,
                parse("arrival_time", arrival)?,
                parse("burst_time", burst)?,
            )
        })
        .collect()
}

// Signed fields so negative values are reported as workload errors rather
// than as opaque deserialization failures.
#[derive(Deserialize)]
struct RawJob {
    id: u64,
    arrival_time: i64,
    burst_time: i64,
}

/// Parse a JSON array of `{"id", "arrival_time", "burst_time"}` objects.
pub fn jobs_from_json(text: &str) -> Result<Vec<Job>, SimError> {
    let raw: Vec<RawJob> =
        serde_json::from_str(text).map_err(|e| SimError::workload("jobs", e.to_string()))?;
    raw.into_iter()
        .map(|j| Job::try_new(j.id, j.arrival_time, j.burst_time))
        .collect()
}

/// `n` jobs with arrival uniform in `0..10` and burst uniform in `1..=10`.
pub fn uniform_jobs(n: usize, seed: u64) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| Job::new(i as u64, rng.random_range(0..10), rng.random_range(1..=10)))
        .collect()
}

/// Bernoulli arrival stream over `ticks`: each tick spawns a job with
/// probability `p_arrival`, short with probability `p_short`, long otherwise.
pub fn bernoulli_jobs(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst_time = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(Job {
                id: jobs.len() as u64,
                arrival_time: t,
                burst_time,
            });
        }
    }

    jobs
}

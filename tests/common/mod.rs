#![allow(dead_code)]

use sched_sim::{Job, SimResult};

/// Initialize tracing from `RUST_LOG` once per test binary.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Timeline as `(pid, start, end)` triples.
pub fn spans(result: &SimResult) -> Vec<(u64, u64, u64)> {
    result
        .timeline
        .iter()
        .map(|s| (s.process_id, s.start, s.end))
        .collect()
}

/// Build a workload from `(arrival, burst)` pairs, ids in order.
pub fn jobs(pairs: &[(u64, u64)]) -> Vec<Job> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(arrival, burst))| Job::new(i as u64, arrival, burst))
        .collect()
}

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::state::Ticks;
use crate::error::SimError;

pub use crate::core::state::JobId;

/// One workload entry as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
}

impl Job {
    pub fn new(id: JobId, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
        }
    }

    /// Build a job from signed input, rejecting negative arrivals and
    /// non-positive bursts instead of wrapping them.
    pub fn try_new(id: JobId, arrival_time: i64, burst_time: i64) -> Result<Self, SimError> {
        let arrival_time = Ticks::try_from(arrival_time).map_err(|_| {
            SimError::workload(
                "arrival_time",
                format!("P{id} arrives at {arrival_time}; must be >= 0"),
            )
        })?;
        let burst_time = Ticks::try_from(burst_time)
            .ok()
            .filter(|&b| b > 0)
            .ok_or_else(|| {
                SimError::workload(
                    "burst_time",
                    format!("P{id} has burst time {burst_time}; must be > 0"),
                )
            })?;
        Ok(Self::new(id, arrival_time, burst_time))
    }
}

/// Check a workload before it reaches the engine.
pub fn validate_jobs(jobs: &[Job]) -> Result<(), SimError> {
    if jobs.is_empty() {
        return Err(SimError::workload(
            "jobs",
            "workload must contain at least one process",
        ));
    }

    let mut seen = FxHashSet::default();
    for job in jobs {
        if job.burst_time == 0 {
            return Err(SimError::workload(
                "burst_time",
                format!("P{} has burst time 0; must be > 0", job.id),
            ));
        }
        if !seen.insert(job.id) {
            return Err(SimError::workload(
                "id",
                format!("P{} appears more than once", job.id),
            ));
        }
    }

    Ok(())
}

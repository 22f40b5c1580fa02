use serde::Serialize;

use crate::core::{JobId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedEvent {
    Arrived {
        process: JobId,
    },
    Dispatched {
        process: JobId,
        slice: Ticks,
        level: Option<usize>,
    },
    // Slice ended with work left; the process went back to a ready queue
    Preempted {
        process: JobId,
        remaining: Ticks,
    },
    Completed {
        process: JobId,
    },
    Demoted {
        process: JobId,
        from: usize,
        to: usize,
    },
    Boosted {
        processes: Vec<JobId>,
    },
    // CPU idle even after dispatch()
    CpuIdle,
}

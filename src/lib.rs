//! Discrete-time simulator for uniprocessor CPU scheduling policies.
//!
//! A workload of [`Job`]s is replayed tick by tick under one of five
//! policies (FIFO, SJF, SRTF, Round-Robin, MLFQ). Each run produces an
//! execution timeline plus per-process completion, turnaround and response
//! times.
//!
//! ```
//! use sched_sim::{Job, PolicyConfig, schedule};
//!
//! let jobs = [Job::new(0, 0, 5), Job::new(1, 1, 3)];
//! let result = schedule(&jobs, &PolicyConfig::Fifo).unwrap();
//! assert_eq!(result.process(1).unwrap().turnaround_time, Some(7));
//! ```

pub mod core;
pub mod error;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod sim;
pub mod workload;

pub use crate::core::{Process, SchedEvent, Segment, Ticks};
pub use error::SimError;
pub use metrics::Summary;
pub use scheduler::{
    Budget, FifoScheduler, MlfqConfig, MlfqScheduler, PolicyConfig, PolicyKind,
    RoundRobinScheduler, Scheduler, SjfScheduler, SrtfScheduler,
};
pub use sim::{Job, JobId, Sim, SimResult};

/// Run `jobs` to completion under `policy`.
///
/// Parameters and workload are validated up front; on error nothing is
/// simulated.
pub fn schedule(jobs: &[Job], policy: &PolicyConfig) -> Result<SimResult, SimError> {
    schedule_with(jobs, policy, |_, _| {})
}

/// Like [`schedule`], also handing every engine event to `on_event` together
/// with the tick of the decision point that produced it.
pub fn schedule_with(
    jobs: &[Job],
    policy: &PolicyConfig,
    on_event: impl FnMut(Ticks, &SchedEvent),
) -> Result<SimResult, SimError> {
    policy.validate()?;
    let jobs = jobs.to_vec();

    let result = match policy {
        PolicyConfig::Fifo => Sim::new(jobs, FifoScheduler::new())?.run_with(on_event),
        PolicyConfig::Sjf => Sim::new(jobs, SjfScheduler::new())?.run_with(on_event),
        PolicyConfig::Srtf => Sim::new(jobs, SrtfScheduler::new())?.run_with(on_event),
        PolicyConfig::RoundRobin { time_slice } => {
            Sim::new(jobs, RoundRobinScheduler::new(*time_slice)?)?.run_with(on_event)
        }
        PolicyConfig::Mlfq(config) => {
            Sim::new(jobs, MlfqScheduler::new(config.clone())?)?.run_with(on_event)
        }
    };

    Ok(result)
}

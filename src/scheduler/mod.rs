pub mod fifo;
pub mod mlfq;
pub mod round_robin;
pub mod sjf;
pub mod srtf;

use std::fmt;
use std::str::FromStr;

use crate::core::{
    Ticks,
    state::{ProcId, SimCtx},
};
use crate::error::SimError;
pub use fifo::FifoScheduler;
pub use mlfq::{Budget, MlfqConfig, MlfqScheduler};
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

pub type EnqueueFlags = u64;

/// First admission after the process's arrival tick.
pub const ENQ_ARRIVAL: EnqueueFlags = 1 << 0;
/// Re-enqueue of a process whose slice ended with work left.
pub const ENQ_REENQ: EnqueueFlags = 1 << 40;

#[derive(Debug)]
pub enum DispatchError {
    NoRunnableTask,
}

/// What the policy hands the CPU: a process and how long it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub proc: ProcId,
    pub slice: Ticks,
}

pub trait Scheduler {
    fn init(&mut self, ctx: &mut SimCtx);

    /// Called at every decision point before arrivals are admitted.
    fn tick(&mut self, _ctx: &mut SimCtx) {}

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, flags: EnqueueFlags);

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError>;

    /// Called after `proc` ran for `ran` ticks, before it is completed or
    /// re-enqueued.
    fn stopping(&mut self, _ctx: &mut SimCtx, _proc: ProcId, _ran: Ticks) {}

    /// Queue level reported on timeline segments.
    fn level(&self, _ctx: &SimCtx, _proc: ProcId) -> Option<usize> {
        None
    }
}

/// Policy selector without parameters, parsed from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fifo,
    Sjf,
    Srtf,
    RoundRobin,
    Mlfq,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fifo,
        PolicyKind::Sjf,
        PolicyKind::Srtf,
        PolicyKind::RoundRobin,
        PolicyKind::Mlfq,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Sjf => "sjf",
            PolicyKind::Srtf => "srtf",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::Mlfq => "mlfq",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(PolicyKind::Fifo),
            "sjf" => Ok(PolicyKind::Sjf),
            "srtf" => Ok(PolicyKind::Srtf),
            "rr" | "round-robin" | "roundrobin" => Ok(PolicyKind::RoundRobin),
            "mlfq" => Ok(PolicyKind::Mlfq),
            _ => Err(SimError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

/// A policy together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyConfig {
    Fifo,
    Sjf,
    Srtf,
    RoundRobin { time_slice: Ticks },
    Mlfq(MlfqConfig),
}

impl PolicyConfig {
    pub fn kind(&self) -> PolicyKind {
        match self {
            PolicyConfig::Fifo => PolicyKind::Fifo,
            PolicyConfig::Sjf => PolicyKind::Sjf,
            PolicyConfig::Srtf => PolicyKind::Srtf,
            PolicyConfig::RoundRobin { .. } => PolicyKind::RoundRobin,
            PolicyConfig::Mlfq(_) => PolicyKind::Mlfq,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            PolicyConfig::RoundRobin { time_slice: 0 } => Err(SimError::param(
                "time_slice",
                "time slice must be a positive number of ticks",
            )),
            PolicyConfig::Mlfq(config) => config.validate(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("FIFO".parse::<PolicyKind>(), Ok(PolicyKind::Fifo));
        assert_eq!(" round-robin ".parse::<PolicyKind>(), Ok(PolicyKind::RoundRobin));
        for kind in PolicyKind::ALL {
            assert_eq!(kind.name().parse::<PolicyKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "lottery".parse::<PolicyKind>().unwrap_err();
        assert_eq!(
            err,
            SimError::UnknownPolicy {
                name: "lottery".into()
            }
        );
    }

    #[test]
    fn zero_time_slice_is_rejected() {
        let err = PolicyConfig::RoundRobin { time_slice: 0 }
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidPolicyParameter {
                param: "time_slice",
                ..
            }
        ));
    }
}

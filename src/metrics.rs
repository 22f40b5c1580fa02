//! Summary statistics over a finished run.

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::Ticks;
use crate::sim::SimResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub avg_waiting: f64,
    /// Tick at which the last process completed.
    pub makespan: Ticks,
    pub busy_time: Ticks,
    /// Fraction of `[first arrival, makespan)` the CPU spent running.
    pub utilization: f64,
}

impl Summary {
    pub fn of(result: &SimResult) -> Self {
        let procs = &result.processes;

        let avg_turnaround = avg(procs.iter().filter_map(|p| p.turnaround_time));
        let avg_response = avg(procs.iter().filter_map(|p| p.response_time));
        let avg_waiting = avg(procs.iter().filter_map(|p| p.waiting_time()));

        let makespan = procs
            .iter()
            .filter_map(|p| p.completion_time)
            .max()
            .unwrap_or(0);
        let first_arrival = procs.iter().map(|p| p.arrival_time).min().unwrap_or(0);
        let busy_time: Ticks = result.timeline.iter().map(|s| s.len()).sum();
        let span = makespan.saturating_sub(first_arrival);
        let utilization = if span == 0 {
            0.0
        } else {
            busy_time as f64 / span as f64
        };

        Self {
            avg_turnaround,
            avg_response,
            avg_waiting,
            makespan,
            busy_time,
            utilization,
        }
    }
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    iter.map(|t| t as f64).collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FifoScheduler;
    use crate::{Job, Sim};

    #[test]
    fn fifo_summary() {
        let jobs = vec![Job::new(0, 0, 5), Job::new(1, 1, 3)];
        let summary = Sim::new(jobs, FifoScheduler::new()).unwrap().run().summary();

        assert_eq!(summary.avg_turnaround, 6.0);
        assert_eq!(summary.avg_response, 2.0);
        assert_eq!(summary.avg_waiting, 2.0);
        assert_eq!(summary.makespan, 8);
        assert_eq!(summary.busy_time, 8);
        assert_eq!(summary.utilization, 1.0);
    }

    #[test]
    fn idle_time_lowers_utilization() {
        let jobs = vec![Job::new(0, 0, 2), Job::new(1, 4, 2)];
        let summary = Sim::new(jobs, FifoScheduler::new()).unwrap().run().summary();
        assert_eq!(summary.makespan, 6);
        assert!((summary.utilization - 4.0 / 6.0).abs() < 1e-9);
    }
}

use super::{Dispatch, DispatchError, EnqueueFlags, ProcId, Scheduler, SimCtx};
use crate::core::{QueueId, Rank};

/// Non-preemptive shortest-job-first. The ready set is ordered by total burst
/// time, ties going to the earlier admission. Long jobs can starve while short
/// ones keep arriving.
#[derive(Debug, Default)]
pub struct SjfScheduler {
    ready: Option<QueueId>,
}

impl SjfScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn ready(&self) -> QueueId {
        self.ready.expect("SjfScheduler used before init()")
    }
}

impl Scheduler for SjfScheduler {
    fn init(&mut self, ctx: &mut SimCtx) {
        self.ready = Some(ctx.create_queue_priq());
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let p = ctx.proc(proc);
        let rank = Rank {
            key: p.burst_time,
            seq: p.seq(),
        };
        ctx.queue_push_priq(self.ready(), proc, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let proc = ctx
            .queue_pop(self.ready())
            .ok_or(DispatchError::NoRunnableTask)?;
        // Never preempted: the whole burst in one go
        Ok(Dispatch {
            proc,
            slice: ctx.proc(proc).remaining_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Job, Sim};

    fn spans(jobs: Vec<Job>) -> Vec<(u64, u64, u64)> {
        Sim::new(jobs, SjfScheduler::new())
            .unwrap()
            .run()
            .timeline
            .iter()
            .map(|s| (s.process_id, s.start, s.end))
            .collect()
    }

    #[test]
    fn running_job_is_not_preempted() {
        let jobs = vec![Job::new(0, 0, 6), Job::new(1, 1, 2), Job::new(2, 2, 4)];
        assert_eq!(spans(jobs), vec![(0, 0, 6), (1, 6, 8), (2, 8, 12)]);
    }

    #[test]
    fn shortest_ready_job_goes_first() {
        let jobs = vec![Job::new(0, 0, 8), Job::new(1, 0, 3), Job::new(2, 0, 5)];
        assert_eq!(spans(jobs), vec![(1, 0, 3), (2, 3, 8), (0, 8, 16)]);
    }

    #[test]
    fn equal_bursts_break_ties_by_arrival() {
        let jobs = vec![Job::new(0, 0, 4), Job::new(1, 2, 2), Job::new(2, 1, 2)];
        assert_eq!(spans(jobs), vec![(0, 0, 4), (2, 4, 6), (1, 6, 8)]);
    }
}

use super::{Dispatch, DispatchError, EnqueueFlags, ProcId, Scheduler, SimCtx};
use crate::core::{QueueId, Ticks};
use crate::error::SimError;

/// Round-robin over a single FIFO ready queue. Each turn runs for at most
/// `time_slice` ticks; an unfinished process goes back to the tail, behind
/// anything that arrived while it was running.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    time_slice: Ticks,
    queue: Option<QueueId>,
}

impl RoundRobinScheduler {
    pub fn new(time_slice: Ticks) -> Result<Self, SimError> {
        if time_slice == 0 {
            return Err(SimError::param(
                "time_slice",
                "time slice must be a positive number of ticks",
            ));
        }
        Ok(Self {
            time_slice,
            queue: None,
        })
    }

    pub fn time_slice(&self) -> Ticks {
        self.time_slice
    }

    fn queue(&self) -> QueueId {
        self.queue.expect("RoundRobinScheduler used before init()")
    }
}

impl Scheduler for RoundRobinScheduler {
    fn init(&mut self, ctx: &mut SimCtx) {
        self.queue = Some(ctx.create_queue_fifo());
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        ctx.queue_push_fifo(self.queue(), proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let proc = ctx
            .queue_pop(self.queue())
            .ok_or(DispatchError::NoRunnableTask)?;
        let slice = self.time_slice.min(ctx.proc(proc).remaining_time);
        Ok(Dispatch { proc, slice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Job, Sim};

    fn spans(jobs: Vec<Job>, time_slice: Ticks) -> Vec<(u64, u64, u64)> {
        let rr = RoundRobinScheduler::new(time_slice).unwrap();
        Sim::new(jobs, rr)
            .unwrap()
            .run()
            .timeline
            .iter()
            .map(|s| (s.process_id, s.start, s.end))
            .collect()
    }

    #[test]
    fn alternates_every_slice() {
        let jobs = vec![Job::new(0, 0, 4), Job::new(1, 1, 4)];
        assert_eq!(
            spans(jobs, 2),
            vec![(0, 0, 2), (1, 2, 4), (0, 4, 6), (1, 6, 8)]
        );
    }

    #[test]
    fn arrival_at_slice_end_goes_before_requeue() {
        // P1 arrives at t=3, exactly when P0's first slice ends.
        let jobs = vec![Job::new(0, 0, 6), Job::new(1, 3, 3)];
        assert_eq!(
            spans(jobs, 3),
            vec![(0, 0, 3), (1, 3, 6), (0, 6, 9)]
        );
    }

    #[test]
    fn lone_process_slices_merge() {
        let jobs = vec![Job::new(0, 0, 7)];
        assert_eq!(spans(jobs, 2), vec![(0, 0, 7)]);
    }

    #[test]
    fn short_final_turn() {
        let jobs = vec![Job::new(0, 0, 3), Job::new(1, 0, 2)];
        assert_eq!(
            spans(jobs, 2),
            vec![(0, 0, 2), (1, 2, 4), (0, 4, 5)]
        );
    }

    #[test]
    fn zero_slice_is_rejected() {
        assert!(matches!(
            RoundRobinScheduler::new(0),
            Err(SimError::InvalidPolicyParameter {
                param: "time_slice",
                ..
            })
        ));
    }
}

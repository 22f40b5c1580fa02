use super::{Dispatch, DispatchError, EnqueueFlags, ProcId, Scheduler, SimCtx};
use crate::core::{QueueId, Rank};

/// Preemptive shortest-remaining-time-first, decided one tick at a time.
#[derive(Debug, Default)]
pub struct SrtfScheduler {
    ready: Option<QueueId>,
}

impl SrtfScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn ready(&self) -> QueueId {
        self.ready.expect("SrtfScheduler used before init()")
    }
}

impl Scheduler for SrtfScheduler {
    fn init(&mut self, ctx: &mut SimCtx) {
        self.ready = Some(ctx.create_queue_priq());
    }

    // Rank is recomputed on every enqueue, so a preempted process competes
    // with what it has left
    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let p = ctx.proc(proc);
        let rank = Rank {
            key: p.remaining_time,
            seq: p.seq(),
        };
        ctx.queue_push_priq(self.ready(), proc, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let proc = ctx
            .queue_pop(self.ready())
            .ok_or(DispatchError::NoRunnableTask)?;
        Ok(Dispatch { proc, slice: 1 })
    }
}

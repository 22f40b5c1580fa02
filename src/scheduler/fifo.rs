use super::{Dispatch, DispatchError, EnqueueFlags, ProcId, Scheduler, SimCtx};
use crate::core::QueueId;

/// Non-preemptive first-come first-served: one queue in admission order, each
/// process runs to completion.
#[derive(Debug, Default)]
pub struct FifoScheduler {
    queue: Option<QueueId>,
}

impl FifoScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> QueueId {
        self.queue.expect("FifoScheduler used before init()")
    }
}

impl Scheduler for FifoScheduler {
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
        Ok(Dispatch {
            proc,
            slice: ctx.proc(proc).remaining_time,
        })
    }
}

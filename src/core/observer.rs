use super::state::{ProcState, SimCtx};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if let Some(proc_id) = ctx.current {
            debug_assert_eq!(
                ctx.proc(proc_id).state,
                ProcState::Running,
                "current process {proc_id} must be Running"
            );
        }

        let mut ready = 0;
        for (proc_id, proc) in ctx.procs.iter().enumerate() {
            debug_assert!(
                proc.remaining_time <= proc.burst_time,
                "Process {} has more work left than it started with",
                proc.id
            );

            match proc.state {
                ProcState::Waiting => {
                    debug_assert_eq!(proc.remaining_time, proc.burst_time);
                    debug_assert!(proc.response_time.is_none());
                }
                ProcState::Ready(queue_id) => {
                    ready += 1;
                    if let Some(queue) = ctx.queues.get(queue_id) {
                        debug_assert!(
                            queue.contains(proc_id),
                            "Process {proc_id} tagged Ready({queue_id:?}), but queue does not contain it"
                        );
                    } else {
                        debug_assert!(false, "Process {proc_id} references unknown queue {queue_id:?}");
                    }
                }
                ProcState::Running => {
                    debug_assert_eq!(
                        ctx.current,
                        Some(proc_id),
                        "Running process {proc_id} is not current"
                    );
                }
                ProcState::Done => {
                    debug_assert_eq!(proc.remaining_time, 0);
                    debug_assert!(proc.completion_time.is_some());
                    debug_assert!(proc.response_time.is_some());
                }
            }
        }

        // No queue holds a process twice or a process that is not Ready
        let queued: usize = ctx.queues.values().map(|q| q.len()).sum();
        debug_assert_eq!(queued, ready, "ready queues out of sync with state tags");
    }
}

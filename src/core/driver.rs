use tracing::{debug, trace};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{ProcId, Process, SimCtx, Ticks},
    timeline::Timeline,
};
use crate::scheduler::{Dispatch, DispatchError, ENQ_ARRIVAL, ENQ_REENQ, Scheduler};

/// Single-CPU simulation engine: owns the clock, the process table, the
/// timeline and the active policy.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    timeline: Timeline,
    observer: Observer,
    // Process indices sorted by (arrival_time, input order)
    arrivals: Vec<ProcId>,
    arrival_cursor: usize,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut procs: Vec<Process>, mut scheduler: S) -> Self {
        let mut arrivals: Vec<ProcId> = (0..procs.len()).collect();
        // Stable, so equal arrivals keep input order
        arrivals.sort_by_key(|&p| procs[p].arrival_time);
        for (seq, &p) in arrivals.iter().enumerate() {
            procs[p].seq = seq;
        }

        let mut ctx = SimCtx::new(procs);
        scheduler.init(&mut ctx);

        Self {
            ctx,
            scheduler,
            timeline: Timeline::new(),
            observer: Observer::new(),
            arrivals,
            arrival_cursor: 0,
        }
    }

    /// Run one decision point: either a dispatched slice or one idle tick.
    /// Returns what happened, in order.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        self.scheduler.tick(&mut self.ctx);
        self.handle_arrivals();

        match self.scheduler.dispatch(&mut self.ctx) {
            Ok(dispatch) => self.run_slice(dispatch),
            Err(DispatchError::NoRunnableTask) => {
                // Scheduler left CPU idle.
                trace!(now = self.ctx.now, "cpu idle");
                self.ctx.emit(SchedEvent::CpuIdle);
                self.ctx.advance_time(1);
            }
        }

        self.observer.observe(&self.ctx);
        self.ctx.take_events()
    }

    fn run_slice(&mut self, dispatch: Dispatch) {
        let Dispatch { proc, slice } = dispatch;
        let remaining = self.ctx.proc(proc).remaining_time;
        assert!(
            slice > 0 && slice <= remaining,
            "Scheduler dispatched slice {slice} with {remaining} ticks remaining"
        );

        let level = self.scheduler.level(&self.ctx, proc);
        self.ctx.set_running(proc);

        let id = self.ctx.proc(proc).id;
        let start = self.ctx.now;
        debug!(now = start, process = id, slice, ?level, "dispatch");
        self.ctx.emit(SchedEvent::Dispatched {
            process: id,
            slice,
            level,
        });

        self.ctx.advance_time(slice);
        self.ctx.consume(proc, slice);
        self.timeline.record(id, level, start, self.ctx.now);
        self.scheduler.stopping(&mut self.ctx, proc, slice);

        // Arrivals during the slice queue up ahead of the process it preempts
        self.handle_arrivals();

        let remaining = self.ctx.proc(proc).remaining_time;
        if remaining == 0 {
            let now = self.ctx.now;
            self.ctx.mark_completed(proc, now);
            debug!(now, process = id, "completed");
            self.ctx.emit(SchedEvent::Completed { process: id });
        } else {
            self.ctx.clear_current();
            self.ctx.emit(SchedEvent::Preempted {
                process: id,
                remaining,
            });
            self.scheduler.enqueue(&mut self.ctx, proc, ENQ_REENQ);
        }
    }

    fn handle_arrivals(&mut self) {
        let now = self.ctx.now;
        // Contiguous, since arrivals are sorted
        while let Some(&proc) = self.arrivals.get(self.arrival_cursor) {
            if self.ctx.proc(proc).arrival_time > now {
                break;
            }
            self.arrival_cursor += 1;

            let id = self.ctx.proc(proc).id;
            trace!(now, process = id, "arrived");
            self.ctx.emit(SchedEvent::Arrived { process: id });
            self.scheduler.enqueue(&mut self.ctx, proc, ENQ_ARRIVAL);
        }
    }

    pub fn all_completed(&self) -> bool {
        self.ctx.all_completed()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn into_parts(self) -> (Vec<Process>, Timeline) {
        (self.ctx.procs, self.timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FifoScheduler, RoundRobinScheduler};

    #[test]
    fn idle_ticks_then_dispatch() {
        let mut core = SchedCore::new(vec![Process::new(0, 2, 1)], FifoScheduler::new());

        assert_eq!(core.step(), vec![SchedEvent::CpuIdle]);
        assert_eq!(core.step(), vec![SchedEvent::CpuIdle]);
        assert_eq!(
            core.step(),
            vec![
                SchedEvent::Arrived { process: 0 },
                SchedEvent::Dispatched {
                    process: 0,
                    slice: 1,
                    level: None
                },
                SchedEvent::Completed { process: 0 },
            ]
        );
        assert!(core.all_completed());
        assert_eq!(core.now(), 3);
        assert_eq!(core.observer().steps(), 3);
        assert_eq!(core.timeline().busy_time(), 1);
    }

    #[test]
    fn mid_slice_arrival_is_admitted_before_requeue() {
        let procs = vec![Process::new(0, 0, 4), Process::new(1, 1, 2)];
        let mut core = SchedCore::new(procs, RoundRobinScheduler::new(2).unwrap());

        let events = core.step();
        assert_eq!(
            &events[2..],
            &[
                SchedEvent::Arrived { process: 1 },
                SchedEvent::Preempted {
                    process: 0,
                    remaining: 2
                },
            ]
        );
    }
}

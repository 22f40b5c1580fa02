//! Multi-level feedback queue.
//!
//! Level 0 has the highest priority. A process enters at level 0 and is
//! demoted one level each time it uses up the level's allotment. Every
//! `boost_interval` ticks all queued processes are lifted back to level 0 so
//! long-running work cannot starve.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::{
    Dispatch, DispatchError, ENQ_ARRIVAL, ENQ_REENQ, EnqueueFlags, ProcId, Scheduler, SimCtx,
};
use crate::core::{QueueId, SchedEvent, Ticks};
use crate::error::SimError;

/// A per-level limit on run time, either a tick count or no limit at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Budget {
    Bounded(Ticks),
    Unbounded,
}

impl Budget {
    /// Clamp `ticks` to this budget.
    pub fn cap(self, ticks: Ticks) -> Ticks {
        match self {
            Budget::Bounded(limit) => limit.min(ticks),
            Budget::Unbounded => ticks,
        }
    }

    pub fn is_exhausted_by(self, used: Ticks) -> bool {
        match self {
            Budget::Bounded(limit) => used >= limit,
            Budget::Unbounded => false,
        }
    }

    /// Ticks left after `used`, or `None` when unbounded.
    pub fn remaining(self, used: Ticks) -> Option<Ticks> {
        match self {
            Budget::Bounded(limit) => Some(limit.saturating_sub(used)),
            Budget::Unbounded => None,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Bounded(ticks) => write!(f, "{ticks}"),
            Budget::Unbounded => f.write_str("inf"),
        }
    }
}

impl FromStr for Budget {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "inf" | "infinity" | "unbounded" => Ok(Budget::Unbounded),
            _ => s.parse::<Ticks>().map(Budget::Bounded).map_err(|_| {
                SimError::param(
                    "budget",
                    format!("{s:?} is neither a tick count nor \"inf\""),
                )
            }),
        }
    }
}

/// Level tables and boost period for [`MlfqScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlfqConfig {
    pub boost_interval: Ticks,
    pub quanta: Vec<Budget>,
    pub allotments: Vec<Budget>,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            boost_interval: 20,
            quanta: vec![Budget::Bounded(4), Budget::Bounded(8), Budget::Unbounded],
            allotments: vec![Budget::Bounded(8), Budget::Bounded(16), Budget::Unbounded],
        }
    }
}

impl MlfqConfig {
    pub fn with_boost_interval(mut self, boost_interval: Ticks) -> Self {
        self.boost_interval = boost_interval;
        self
    }

    pub fn with_levels(mut self, quanta: Vec<Budget>, allotments: Vec<Budget>) -> Self {
        self.quanta = quanta;
        self.allotments = allotments;
        self
    }

    pub fn num_levels(&self) -> usize {
        self.quanta.len()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.boost_interval == 0 {
            return Err(SimError::param(
                "boost_interval",
                "boost interval must be a positive number of ticks",
            ));
        }
        if self.quanta.is_empty() {
            return Err(SimError::param("quanta", "at least one level is required"));
        }
        if self.quanta.len() != self.allotments.len() {
            return Err(SimError::param(
                "allotments",
                format!(
                    "{} allotments given for {} quanta",
                    self.allotments.len(),
                    self.quanta.len()
                ),
            ));
        }

        let last = self.quanta.len() - 1;
        for (param, budgets) in [("quanta", &self.quanta), ("allotments", &self.allotments)] {
            for (level, budget) in budgets.iter().enumerate() {
                match budget {
                    Budget::Bounded(0) => {
                        return Err(SimError::param(
                            param,
                            format!("level {level} must be a positive number of ticks"),
                        ));
                    }
                    Budget::Unbounded if level != last => {
                        return Err(SimError::param(
                            param,
                            format!("only the last level may be unbounded, level {level} is"),
                        ));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct MlfqScheduler {
    config: MlfqConfig,
    levels: Vec<QueueId>,
    last_boost: Ticks,
}

impl MlfqScheduler {
    pub fn new(config: MlfqConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            levels: Vec::new(),
            last_boost: 0,
        })
    }

    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    fn boost(&mut self, ctx: &mut SimCtx) {
        let top = self.levels[0];
        let mut boosted = Vec::new();
        for &level in &self.levels[1..] {
            for proc in ctx.queue_transfer(level, top) {
                let p = ctx.proc_mut(proc);
                p.queue_level = 0;
                p.time_in_queue = 0;
                boosted.push(p.id);
            }
        }

        self.last_boost = ctx.now;
        if !boosted.is_empty() {
            debug!(now = ctx.now, count = boosted.len(), "priority boost");
            ctx.emit(SchedEvent::Boosted {
                processes: boosted,
            });
        }
    }
}

impl Scheduler for MlfqScheduler {
    fn init(&mut self, ctx: &mut SimCtx) {
        self.levels = (0..self.config.num_levels())
            .map(|_| ctx.create_queue_fifo())
            .collect();
        self.last_boost = 0;
    }

    fn tick(&mut self, ctx: &mut SimCtx) {
        if ctx.now != 0 && ctx.now - self.last_boost >= self.config.boost_interval {
            self.boost(ctx);
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, flags: EnqueueFlags) {
        let lowest = self.levels.len() - 1;
        let p = ctx.proc_mut(proc);

        if flags & ENQ_ARRIVAL != 0 {
            p.queue_level = 0;
            p.time_in_queue = 0;
        }

        let mut demotion = None;
        if flags & ENQ_REENQ != 0
            && self.config.allotments[p.queue_level].is_exhausted_by(p.time_in_queue)
        {
            // Fresh allotment either way; the lowest level has nowhere to go
            p.time_in_queue = 0;
            if p.queue_level < lowest {
                demotion = Some((p.queue_level, p.queue_level + 1));
                p.queue_level += 1;
            }
        }

        let (id, level) = (p.id, p.queue_level);
        if let Some((from, to)) = demotion {
            debug!(process = id, from, to, "demoted");
            ctx.emit(SchedEvent::Demoted {
                process: id,
                from,
                to,
            });
        }
        ctx.queue_push_fifo(self.levels[level], proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let level = self
            .levels
            .iter()
            .position(|&q| !ctx.queue_is_empty(q))
            .ok_or(DispatchError::NoRunnableTask)?;
        let proc = ctx
            .queue_pop(self.levels[level])
            .ok_or(DispatchError::NoRunnableTask)?;

        let p = ctx.proc(proc);
        debug_assert_eq!(p.queue_level, level);
        let mut slice = self.config.quanta[level].cap(p.remaining_time);
        if let Some(left) = self.config.allotments[level].remaining(p.time_in_queue) {
            slice = slice.min(left);
        }
        debug_assert!(slice > 0, "P{} dispatched with an empty slice", p.id);

        Ok(Dispatch { proc, slice })
    }

    fn stopping(&mut self, ctx: &mut SimCtx, proc: ProcId, ran: Ticks) {
        ctx.proc_mut(proc).time_in_queue += ran;
    }

    fn level(&self, ctx: &SimCtx, proc: ProcId) -> Option<usize> {
        Some(ctx.proc(proc).queue_level)
    }
}

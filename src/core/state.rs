use keyed_priority_queue::KeyedPriorityQueue;
use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use super::event::SchedEvent;

// Index into Process Vec
pub type ProcId = usize;
pub type JobId = u64;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

/// Ordering key for priority ready queues: smallest `key` first, then the
/// process admitted earliest.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Rank {
    pub key: Ticks,
    pub seq: usize,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Not yet arrived.
    Waiting,
    /// Sitting in exactly one ready queue.
    Ready(QueueId),
    Running,
    Done,
}

/// One simulated job and the timing facts accumulated while it runs.
#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub remaining_time: Ticks,
    pub completion_time: Option<Ticks>,
    pub turnaround_time: Option<Ticks>,
    pub response_time: Option<Ticks>,
    pub queue_level: usize,
    pub time_in_queue: Ticks,
    #[serde(skip)]
    pub state: ProcState,
    // Admission rank: position in (arrival_time, input order)
    #[serde(skip)]
    pub(crate) seq: usize,
}

impl Process {
    pub fn new(id: JobId, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            completion_time: None,
            turnaround_time: None,
            response_time: None,
            queue_level: 0,
            time_in_queue: 0,
            state: ProcState::Waiting,
            seq: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ProcState::Done
    }

    /// Admission rank used to break ties between equally ranked processes.
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// Time spent runnable but not running. Only known once completed.
    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time.map(|t| t - self.burst_time)
    }
}

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo {
        procs: VecDeque<ProcId>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcId, Rank>,
    },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    // Linear; only used by debug checks.
    pub fn contains(&self, proc_id: ProcId) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&proc_id),
            Self::Priq { procs } => procs.iter().any(|p| *p.0 == proc_id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub current: Option<ProcId>,
    pub procs: Vec<Process>,
    pub queues: SlotMap<QueueId, ReadyQueue>,
    // Drained by the driver after every step
    events: Vec<SchedEvent>,
}

impl SimCtx {
    pub fn new(procs: Vec<Process>) -> Self {
        Self {
            now: 0,
            current: None,
            procs,
            queues: SlotMap::with_key(),
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: SchedEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_queue_fifo(&mut self) -> QueueId {
        self.queues.insert(ReadyQueue::new_fifo())
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(ReadyQueue::new_priq())
    }

    fn queue_push(&mut self, queue_id: QueueId, proc_id: ProcId, rank: Option<Rank>) {
        let proc = self.proc_mut(proc_id);
        assert!(
            !matches!(proc.state, ProcState::Ready(_)),
            "Process {proc_id} already present in some ready queue"
        );
        debug_assert!(
            proc.state != ProcState::Done,
            "Process {proc_id} must not be Done when enqueued"
        );
        proc.state = ProcState::Ready(queue_id);

        if self.current == Some(proc_id) {
            self.current = None;
        }

        let queue = self.queues.get_mut(queue_id).expect("Unknown ready queue");
        match queue {
            ReadyQueue::Fifo { procs } => procs.push_back(proc_id),
            ReadyQueue::Priq { procs } => {
                procs.push(
                    proc_id,
                    rank.expect("Attempted to push to a priority queue with no rank"),
                );
            }
        };
    }

    pub fn queue_push_fifo(&mut self, queue_id: QueueId, proc_id: ProcId) {
        self.queue_push(queue_id, proc_id, None);
    }

    pub fn queue_push_priq(&mut self, queue_id: QueueId, proc_id: ProcId, rank: Rank) {
        self.queue_push(queue_id, proc_id, Some(rank));
    }

    /// Dequeue the next process for dispatch. The popped process is marked
    /// `Running`; the engine makes it current.
    pub fn queue_pop(&mut self, queue_id: QueueId) -> Option<ProcId> {
        let queue = self.queues.get_mut(queue_id)?;
        let proc_id = match queue {
            ReadyQueue::Fifo { procs } => procs.pop_front(),
            ReadyQueue::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let proc = self.proc_mut(proc_id);
        debug_assert_eq!(
            proc.state,
            ProcState::Ready(queue_id),
            "Process {proc_id} popped from a queue it was not tagged with"
        );
        proc.state = ProcState::Running;

        Some(proc_id)
    }

    /// Move every process from one FIFO queue onto the tail of another,
    /// preserving order. Returns the moved processes.
    pub fn queue_transfer(&mut self, from: QueueId, to: QueueId) -> Vec<ProcId> {
        let moved: Vec<ProcId> = match self.queues.get_mut(from) {
            Some(ReadyQueue::Fifo { procs }) => procs.drain(..).collect(),
            Some(ReadyQueue::Priq { .. }) => panic!("queue_transfer only supports FIFO queues"),
            None => return Vec::new(),
        };

        for &proc_id in &moved {
            self.proc_mut(proc_id).state = ProcState::Ready(to);
        }
        match self.queues.get_mut(to) {
            Some(ReadyQueue::Fifo { procs }) => procs.extend(moved.iter().copied()),
            _ => panic!("queue_transfer target must be a known FIFO queue"),
        }

        moved
    }

    pub fn queue_is_empty(&self, queue_id: QueueId) -> bool {
        self.queues.get(queue_id).is_none_or(ReadyQueue::is_empty)
    }

    pub fn proc(&self, proc_id: ProcId) -> &Process {
        &self.procs[proc_id]
    }

    pub fn proc_mut(&mut self, proc_id: ProcId) -> &mut Process {
        &mut self.procs[proc_id]
    }

    pub fn all_completed(&self) -> bool {
        self.procs.iter().all(Process::is_done)
    }

    // Records the first-dispatch response time
    pub fn set_running(&mut self, proc_id: ProcId) {
        debug_assert!(self.current.is_none(), "CPU already running a process");

        let now = self.now;
        let proc = self.proc_mut(proc_id);
        debug_assert_eq!(
            proc.state,
            ProcState::Running,
            "Process {proc_id} must be dequeued before it runs"
        );
        if proc.response_time.is_none() {
            proc.response_time = Some(now - proc.arrival_time);
        }
        self.current = Some(proc_id);
    }

    pub fn consume(&mut self, proc_id: ProcId, ticks: Ticks) {
        let proc = self.proc_mut(proc_id);
        assert!(
            ticks <= proc.remaining_time,
            "Process {} ran {ticks} ticks with only {} remaining",
            proc.id,
            proc.remaining_time
        );
        proc.remaining_time -= ticks;
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn mark_completed(&mut self, proc_id: ProcId, completion_time: Ticks) {
        let proc = &mut self.procs[proc_id];
        debug_assert!(
            proc.state == ProcState::Running,
            "Process {proc_id} must have been running before marked complete"
        );
        debug_assert_eq!(proc.remaining_time, 0);
        debug_assert!(proc.completion_time.is_none());

        proc.state = ProcState::Done;
        proc.completion_time = Some(completion_time);
        proc.turnaround_time = Some(completion_time - proc.arrival_time);
        if self.current == Some(proc_id) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(n: usize) -> SimCtx {
        SimCtx::new(
            (0..n)
                .map(|i| Process::new(i as JobId, 0, 3))
                .collect(),
        )
    }

    #[test]
    fn rank_orders_smallest_key_first() {
        let mut q = KeyedPriorityQueue::new();
        q.push(0usize, Rank { key: 5, seq: 0 });
        q.push(1usize, Rank { key: 2, seq: 1 });
        q.push(2usize, Rank { key: 2, seq: 2 });
        assert_eq!(q.pop().map(|p| p.0), Some(1));
        assert_eq!(q.pop().map(|p| p.0), Some(2));
        assert_eq!(q.pop().map(|p| p.0), Some(0));
    }

    #[test]
    fn push_and_pop_update_state_tag() {
        let mut ctx = ctx_with(2);
        let q = ctx.create_queue_fifo();
        ctx.queue_push_fifo(q, 1);
        ctx.queue_push_fifo(q, 0);
        assert_eq!(ctx.proc(1).state, ProcState::Ready(q));

        assert_eq!(ctx.queue_pop(q), Some(1));
        assert_eq!(ctx.proc(1).state, ProcState::Running);
        assert_eq!(ctx.queue_pop(q), Some(0));
        assert_eq!(ctx.queue_pop(q), None);
        assert!(ctx.queue_is_empty(q));
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn double_enqueue_is_rejected() {
        let mut ctx = ctx_with(1);
        let q = ctx.create_queue_fifo();
        ctx.queue_push_fifo(q, 0);
        ctx.queue_push_fifo(q, 0);
    }

    #[test]
    fn transfer_preserves_order_and_retags() {
        let mut ctx = ctx_with(3);
        let low = ctx.create_queue_fifo();
        let high = ctx.create_queue_fifo();
        ctx.queue_push_fifo(high, 2);
        ctx.queue_push_fifo(low, 0);
        ctx.queue_push_fifo(low, 1);

        assert_eq!(ctx.queue_transfer(low, high), vec![0, 1]);
        assert!(ctx.queue_is_empty(low));
        assert_eq!(ctx.proc(0).state, ProcState::Ready(high));
        assert_eq!(ctx.queue_pop(high), Some(2));
        assert_eq!(ctx.queue_pop(high), Some(0));
        assert_eq!(ctx.queue_pop(high), Some(1));
    }

    #[test]
    fn response_time_is_set_once() {
        let mut ctx = ctx_with(1);
        let q = ctx.create_queue_fifo();
        ctx.advance_time(4);
        ctx.queue_push_fifo(q, 0);
        ctx.queue_pop(q);
        ctx.set_running(0);
        ctx.consume(0, 1);
        ctx.clear_current();

        ctx.queue_push_fifo(q, 0);
        ctx.advance_time(3);
        ctx.queue_pop(q);
        ctx.set_running(0);
        assert_eq!(ctx.proc(0).response_time, Some(4));
    }
}

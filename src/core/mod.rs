pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SchedEvent;
pub use state::{
    JobId, ProcId, ProcState, Process, QueueId, Rank, ReadyQueue, SimCtx, Ticks,
};
pub use timeline::{Segment, Timeline};

pub mod driver;
pub mod job;

pub use driver::{Sim, SimResult};
pub use job::{Job, JobId, validate_jobs};

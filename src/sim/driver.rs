use super::job::{Job, JobId, validate_jobs};
use crate::{
    core::{Process, SchedCore, SchedEvent, Segment, Ticks},
    error::SimError,
    metrics::Summary,
    scheduler::Scheduler,
};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A validated workload bound to one policy.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(jobs: Vec<Job>, scheduler: S) -> Result<Self, SimError> {
        validate_jobs(&jobs)?;

        // Each run owns fresh records, so runs never see each other's state
        let procs = jobs
            .iter()
            .map(|job| Process::new(job.id, job.arrival_time, job.burst_time))
            .collect();

        Ok(Self {
            core: SchedCore::new(procs, scheduler),
        })
    }

    pub fn step(&mut self) -> Vec<SchedEvent> {
        self.core.step()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.all_completed()
    }

    pub fn run(self) -> SimResult {
        self.run_with(|_, _| {})
    }

    /// Run to completion, handing every event to `on_event` along with the
    /// tick at which its decision point started.
    pub fn run_with(mut self, mut on_event: impl FnMut(Ticks, &SchedEvent)) -> SimResult {
        while !self.all_jobs_completed() {
            let now = self.core.now();
            for event in self.step() {
                on_event(now, &event);
            }
        }
        self.finish()
    }

    fn finish(self) -> SimResult {
        debug_assert!(self.all_jobs_completed());
        let (processes, timeline) = self.core.into_parts();
        SimResult::new(timeline.into_segments(), processes)
    }
}

/// Timeline plus the completed process records, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct SimResult {
    pub timeline: Vec<Segment>,
    pub processes: Vec<Process>,
    #[serde(skip)]
    index: FxHashMap<JobId, usize>,
}

impl SimResult {
    pub fn new(timeline: Vec<Segment>, processes: Vec<Process>) -> Self {
        let index = processes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        Self {
            timeline,
            processes,
            index,
        }
    }

    pub fn process(&self, id: JobId) -> Option<&Process> {
        self.index.get(&id).map(|&i| &self.processes[i])
    }

    /// Segments belonging to one process, in time order.
    pub fn segments_of(&self, id: JobId) -> impl Iterator<Item = &Segment> {
        self.timeline.iter().filter(move |s| s.process_id == id)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self)
    }
}

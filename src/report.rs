//! Plain-text rendering of a run: Gantt line, per-process table, averages.

use std::fmt::{self, Write};

use crate::core::{SchedEvent, Segment, Ticks};
use crate::metrics::Summary;
use crate::sim::SimResult;

/// `P0 [0-5] -> P1 [5-8]`, with a `Q<level>` suffix for multi-level runs.
pub fn gantt(timeline: &[Segment]) -> String {
    timeline
        .iter()
        .map(|s| match s.level {
            Some(level) => format!("P{} [{}-{}] Q{level}", s.process_id, s.start, s.end),
            None => format!("P{} [{}-{}]", s.process_id, s.start, s.end),
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn cell(value: Option<Ticks>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn process_table(result: &SimResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6}{:>8}{:>8}{:>8}{:>8}{:>10}",
        "PID", "Arrival", "Burst", "Finish", "TAT", "Response"
    );
    for p in &result.processes {
        let _ = writeln!(
            out,
            "{:<6}{:>8}{:>8}{:>8}{:>8}{:>10}",
            format!("P{}", p.id),
            p.arrival_time,
            p.burst_time,
            cell(p.completion_time),
            cell(p.turnaround_time),
            cell(p.response_time),
        );
    }
    out
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Turnaround Time: {:.2}", self.avg_turnaround)?;
        writeln!(f, "Average Response Time: {:.2}", self.avg_response)?;
        writeln!(f, "Average Waiting Time: {:.2}", self.avg_waiting)?;
        write!(
            f,
            "Makespan: {} ticks, CPU utilization: {:.1}%",
            self.makespan,
            self.utilization * 100.0
        )
    }
}

/// Full report as printed by the command-line tool.
pub fn render(result: &SimResult) -> String {
    format!(
        "Gantt Chart:\n{}\n\nProcess Metrics:\n{}\n{}\n",
        gantt(&result.timeline),
        process_table(result),
        result.summary()
    )
}

/// One line per event, `t=<tick> <event>`.
pub fn event_line(now: Ticks, event: &SchedEvent) -> String {
    let desc = match event {
        SchedEvent::Arrived { process } => format!("ARRIVE   P{process}"),
        SchedEvent::Dispatched {
            process,
            slice,
            level: Some(level),
        } => format!("DISPATCH P{process} slice={slice} q={level}"),
        SchedEvent::Dispatched {
            process,
            slice,
            level: None,
        } => format!("DISPATCH P{process} slice={slice}"),
        SchedEvent::Preempted { process, remaining } => {
            format!("PREEMPT  P{process} remaining={remaining}")
        }
        SchedEvent::Completed { process } => format!("COMPLETE P{process}"),
        SchedEvent::Demoted { process, from, to } => format!("DEMOTE   P{process} q{from}->q{to}"),
        SchedEvent::Boosted { processes } => format!("BOOST    {processes:?}"),
        SchedEvent::CpuIdle => "IDLE".to_string(),
    };
    format!("t={now:<6} {desc}")
}

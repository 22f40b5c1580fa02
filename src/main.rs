use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use serde::Serialize;
use tracing::info;

use sched_sim::{
    Budget, Job, MlfqConfig, PolicyConfig, PolicyKind, SchedEvent, SimResult, Summary, Ticks,
    report, schedule_with, workload,
};

/// Simulate a uniprocessor CPU scheduling policy over a workload.
#[derive(Parser)]
#[command(name = "sched_sim", version)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["jobs", "workload", "random", "bernoulli"]),
))]
struct Cli {
    /// Policy: fifo, sjf, srtf, rr or mlfq.
    policy: PolicyKind,

    /// Round-Robin time slice in ticks.
    #[arg(long, default_value_t = 2)]
    time_slice: Ticks,

    /// MLFQ ticks between priority boosts.
    #[arg(long)]
    boost_interval: Option<Ticks>,

    /// MLFQ per-level quanta, highest priority first ("inf" for no limit).
    #[arg(long, value_delimiter = ',', requires = "allotments")]
    quanta: Vec<Budget>,

    /// MLFQ per-level allotments, highest priority first ("inf" for no limit).
    #[arg(long, value_delimiter = ',', requires = "quanta")]
    allotments: Vec<Budget>,

    /// Inline workload as "arrival:burst" pairs, e.g. "0:5,1:3,2:1".
    #[arg(long)]
    jobs: Option<String>,

    /// JSON workload file: an array of {id, arrival_time, burst_time}.
    #[arg(long, value_name = "PATH")]
    workload: Option<PathBuf>,

    /// Generate N jobs with uniform arrival and burst times.
    #[arg(long, value_name = "N")]
    random: Option<usize>,

    /// Generate Bernoulli arrivals over the given number of ticks.
    #[arg(long, value_name = "TICKS")]
    bernoulli: Option<Ticks>,

    /// Per-tick arrival probability for --bernoulli.
    #[arg(long, default_value_t = 0.3)]
    p_arrival: f64,

    /// Probability that a --bernoulli job is short.
    #[arg(long, default_value_t = 0.3)]
    p_short: f64,

    /// Burst of a short --bernoulli job.
    #[arg(long, default_value_t = 2)]
    short_ticks: Ticks,

    /// Burst of a long --bernoulli job.
    #[arg(long, default_value_t = 6)]
    long_ticks: Ticks,

    /// Seed for generated workloads.
    #[arg(long, env = "SCHED_SIM_SEED", default_value_t = 0)]
    seed: u64,

    /// Print the result as JSON instead of a text report.
    #[arg(long)]
    json: bool,

    /// Print every scheduling event.
    #[arg(long)]
    events: bool,
}

#[derive(Serialize)]
struct TimedEvent {
    time: Ticks,
    #[serde(flatten)]
    event: SchedEvent,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    policy: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<TimedEvent>,
    #[serde(flatten)]
    result: &'a SimResult,
    summary: Summary,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let jobs = load_jobs(&cli)?;
    let policy = policy_config(&cli);
    info!(policy = %cli.policy, jobs = jobs.len(), "starting simulation");

    let mut events = Vec::new();
    let result = schedule_with(&jobs, &policy, |time, event| {
        if !cli.events {
            return;
        }
        if cli.json {
            events.push(TimedEvent {
                time,
                event: event.clone(),
            });
        } else {
            println!("{}", report::event_line(time, event));
        }
    })
    .with_context(|| format!("failed to run {} simulation", cli.policy))?;

    let summary = result.summary();
    info!(
        makespan = summary.makespan,
        utilization = summary.utilization,
        "simulation finished"
    );

    if cli.json {
        let out = JsonReport {
            policy: cli.policy.name(),
            events,
            result: &result,
            summary,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("failed to serialize result")?
        );
    } else {
        if cli.events {
            println!();
        }
        print!("{}", report::render(&result));
    }

    Ok(())
}

fn load_jobs(cli: &Cli) -> Result<Vec<Job>> {
    if let Some(text) = &cli.jobs {
        return workload::parse_jobs(text).context("failed to parse --jobs");
    }
    if let Some(path) = &cli.workload {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return workload::jobs_from_json(&text)
            .with_context(|| format!("failed to parse workload {}", path.display()));
    }
    if let Some(n) = cli.random {
        return Ok(workload::uniform_jobs(n, cli.seed));
    }
    if let Some(ticks) = cli.bernoulli {
        return Ok(workload::bernoulli_jobs(
            ticks,
            cli.p_arrival,
            cli.p_short,
            cli.short_ticks,
            cli.long_ticks,
            cli.seed,
        ));
    }
    anyhow::bail!("no workload source given")
}

fn policy_config(cli: &Cli) -> PolicyConfig {
    match cli.policy {
        PolicyKind::Fifo => PolicyConfig::Fifo,
        PolicyKind::Sjf => PolicyConfig::Sjf,
        PolicyKind::Srtf => PolicyConfig::Srtf,
        PolicyKind::RoundRobin => PolicyConfig::RoundRobin {
            time_slice: cli.time_slice,
        },
        PolicyKind::Mlfq => {
            let mut config = MlfqConfig::default();
            if let Some(interval) = cli.boost_interval {
                config = config.with_boost_interval(interval);
            }
            if !cli.quanta.is_empty() {
                config = config.with_levels(cli.quanta.clone(), cli.allotments.clone());
            }
            PolicyConfig::Mlfq(config)
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

mod common;

use common::{jobs, setup_test, spans};
use sched_sim::{Budget, MlfqConfig, PolicyConfig, SchedEvent, SimError, schedule, schedule_with};

#[test]
fn fifo_runs_in_arrival_order() {
    setup_test();
    let result = schedule(&jobs(&[(0, 5), (1, 3)]), &PolicyConfig::Fifo).unwrap();

    assert_eq!(spans(&result), vec![(0, 0, 5), (1, 5, 8)]);
    let p0 = result.process(0).unwrap();
    let p1 = result.process(1).unwrap();
    assert_eq!((p0.turnaround_time, p0.response_time), (Some(5), Some(0)));
    assert_eq!((p1.turnaround_time, p1.response_time), (Some(7), Some(4)));
}

#[test]
fn sjf_does_not_preempt_running_job() {
    setup_test();
    let result = schedule(&jobs(&[(0, 6), (1, 2), (2, 4)]), &PolicyConfig::Sjf).unwrap();
    assert_eq!(spans(&result), vec![(0, 0, 6), (1, 6, 8), (2, 8, 12)]);
}

#[test]
fn srtf_preempts_on_shorter_arrival() {
    setup_test();
    let result = schedule(&jobs(&[(0, 6), (1, 2), (2, 4)]), &PolicyConfig::Srtf).unwrap();
    assert_eq!(
        spans(&result),
        vec![(0, 0, 1), (1, 1, 3), (2, 3, 7), (0, 7, 12)]
    );
}

#[test]
fn round_robin_alternates_slices() {
    setup_test();
    let result = schedule(
        &jobs(&[(0, 4), (1, 4)]),
        &PolicyConfig::RoundRobin { time_slice: 2 },
    )
    .unwrap();
    assert_eq!(
        spans(&result),
        vec![(0, 0, 2), (1, 2, 4), (0, 4, 6), (1, 6, 8)]
    );
}

#[test]
fn mlfq_demotes_after_allotment() {
    setup_test();
    let result = schedule(&jobs(&[(0, 20)]), &PolicyConfig::Mlfq(MlfqConfig::default())).unwrap();

    let levels: Vec<_> = result.timeline.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![Some(0), Some(1)]);
    assert_eq!(spans(&result), vec![(0, 0, 8), (0, 8, 20)]);
}

#[test]
fn mlfq_event_stream_reports_demotion() {
    setup_test();
    let mut demotions = Vec::new();
    schedule_with(
        &jobs(&[(0, 20)]),
        &PolicyConfig::Mlfq(MlfqConfig::default()),
        |now, event| {
            if let SchedEvent::Demoted { process, from, to } = event {
                demotions.push((now, *process, *from, *to));
            }
        },
    )
    .unwrap();
    assert_eq!(demotions, vec![(4, 0, 0, 1)]);
}

#[test]
fn idle_gap_before_late_arrival() {
    setup_test();
    for policy in [
        PolicyConfig::Fifo,
        PolicyConfig::Sjf,
        PolicyConfig::Srtf,
        PolicyConfig::RoundRobin { time_slice: 3 },
        PolicyConfig::Mlfq(MlfqConfig::default()),
    ] {
        let result = schedule(&jobs(&[(3, 2)]), &policy).unwrap();
        let p = result.process(0).unwrap();
        assert_eq!(p.completion_time, Some(5), "{policy:?}");
        assert_eq!(p.response_time, Some(0), "{policy:?}");
    }
}

#[test]
fn results_keep_input_order() {
    setup_test();
    let workload = vec![
        sched_sim::Job::new(9, 4, 1),
        sched_sim::Job::new(2, 0, 3),
    ];
    let result = schedule(&workload, &PolicyConfig::Sjf).unwrap();
    let ids: Vec<_> = result.processes.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![9, 2]);
    assert_eq!(spans(&result), vec![(2, 0, 3), (9, 4, 5)]);
}

#[test]
fn invalid_input_is_rejected_up_front() {
    setup_test();
    assert!(matches!(
        schedule(&[], &PolicyConfig::Fifo),
        Err(SimError::InvalidWorkload { .. })
    ));
    assert!(matches!(
        schedule(&jobs(&[(0, 0)]), &PolicyConfig::Fifo),
        Err(SimError::InvalidWorkload {
            field: "burst_time",
            ..
        })
    ));
    assert!(matches!(
        schedule(&jobs(&[(0, 1)]), &PolicyConfig::RoundRobin { time_slice: 0 }),
        Err(SimError::InvalidPolicyParameter {
            param: "time_slice",
            ..
        })
    ));

    let mismatched = MlfqConfig::default()
        .with_levels(vec![Budget::Bounded(2), Budget::Unbounded], vec![Budget::Unbounded]);
    assert!(matches!(
        schedule(&jobs(&[(0, 1)]), &PolicyConfig::Mlfq(mismatched)),
        Err(SimError::InvalidPolicyParameter {
            param: "allotments",
            ..
        })
    ));
}

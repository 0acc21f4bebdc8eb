//! Integration tests for timetable generation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dayplan_core::{
    find_gaps, total_free, DayWindow, FixedTask, FlexibleTask, ProportionalTask, ScheduleError,
    ScheduleErrorKind, ScheduledInterval, Scheduler,
};
use proptest::prelude::*;

fn wake() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
}

fn minutes_after_wake(minutes: i64) -> DateTime<Utc> {
    wake() + Duration::minutes(minutes)
}

fn window() -> DayWindow {
    DayWindow::new(wake(), minutes_after_wake(840)).unwrap()
}

fn time_for(result: &[ScheduledInterval], name: &str) -> Duration {
    result
        .iter()
        .filter(|i| i.name == name)
        .fold(Duration::zero(), |acc, i| acc + i.duration())
}

#[test]
fn test_overlap_is_reported_regardless_of_order() {
    let a = FixedTask::new("A", minutes_after_wake(60), minutes_after_wake(120)).unwrap();
    let b = FixedTask::new("B", minutes_after_wake(90), minutes_after_wake(150)).unwrap();

    for fixed in [vec![a.clone(), b.clone()], vec![b, a]] {
        let err = Scheduler::new(window(), fixed, vec![], vec![])
            .generate()
            .unwrap_err();
        assert_eq!(err.kind(), ScheduleErrorKind::TaskOverlap);
    }
}

#[test]
fn test_window_errors_are_independent_of_other_tasks() {
    let fine = FixedTask::new("Fine", minutes_after_wake(60), minutes_after_wake(120)).unwrap();
    let early = FixedTask::new("Early", minutes_after_wake(-30), minutes_after_wake(30)).unwrap();
    let late = FixedTask::new("Late", minutes_after_wake(800), minutes_after_wake(900)).unwrap();

    let err = Scheduler::new(window(), vec![fine.clone(), early], vec![], vec![])
        .generate()
        .unwrap_err();
    assert!(matches!(err, ScheduleError::BeforeWindowStart { ref task, .. } if task == "Early"));

    let err = Scheduler::new(window(), vec![fine, late], vec![], vec![])
        .generate()
        .unwrap_err();
    assert!(matches!(err, ScheduleError::AfterWindowEnd { ref task, .. } if task == "Late"));
}

#[test]
fn test_flexible_fragments_interleave_with_other_tasks() {
    let fixed = vec![
        FixedTask::new("Standup", minutes_after_wake(60), minutes_after_wake(75)).unwrap(),
        FixedTask::new("Lunch", minutes_after_wake(240), minutes_after_wake(300)).unwrap(),
    ];
    let flexible = vec![
        FlexibleTask::new("Inbox", 30).unwrap(),
        FlexibleTask::new("Report", 120).unwrap(),
    ];

    let result = Scheduler::new(window(), fixed, flexible, vec![])
        .generate()
        .unwrap();

    let report: Vec<_> = result
        .iter()
        .filter(|i| i.name == "Report")
        .map(|i| (i.start, i.end))
        .collect();
    // 30 minutes left before standup, the other 90 right after it
    assert_eq!(
        report,
        vec![
            (minutes_after_wake(30), minutes_after_wake(60)),
            (minutes_after_wake(75), minutes_after_wake(165)),
        ]
    );
}

#[test]
fn test_proportional_remainder_stays_free() {
    // Free time: 839 minutes = 50_340 s; weights sum to 7 -> unit 7_191 s, 3 s left over
    let fixed = vec![FixedTask::new("Call", minutes_after_wake(0), minutes_after_wake(1)).unwrap()];
    let proportional = vec![
        ProportionalTask::new("Read", 3.0).unwrap(),
        ProportionalTask::new("Write", 4.0).unwrap(),
    ];

    let scheduler = Scheduler::new(window(), fixed, vec![], proportional);
    let result = scheduler.generate().unwrap();

    assert_eq!(time_for(&result, "Read"), Duration::seconds(7_191 * 3));
    assert_eq!(time_for(&result, "Write"), Duration::seconds(7_191 * 4));

    let left = total_free(&find_gaps(&result, scheduler.window()));
    assert_eq!(left, Duration::seconds(3));
}

#[test]
fn test_failure_returns_no_partial_schedule() {
    let fixed = vec![FixedTask::new("Lunch", minutes_after_wake(240), minutes_after_wake(300)).unwrap()];
    let flexible = vec![
        FlexibleTask::new("Small", 30).unwrap(),
        FlexibleTask::new("Huge", 900).unwrap(),
    ];

    let result = Scheduler::new(window(), fixed, flexible, vec![]).generate();
    assert!(matches!(
        result,
        Err(ScheduleError::InsufficientCapacity { ref task, .. }) if task == "Huge"
    ));
}

/// Non-overlapping fixed tasks inside the window, built from
/// (idle before, length) pairs in minutes.
fn fixed_tasks() -> impl Strategy<Value = Vec<FixedTask>> {
    prop::collection::vec((0i64..180, 1i64..120), 0..6).prop_map(|spans| {
        let mut cursor = 0;
        let mut tasks = Vec::new();
        for (i, (idle, len)) in spans.into_iter().enumerate() {
            let start = cursor + idle;
            let end = start + len;
            if end > 840 {
                break;
            }
            tasks.push(
                FixedTask::new(format!("fixed-{i}"), minutes_after_wake(start), minutes_after_wake(end))
                    .unwrap(),
            );
            cursor = end;
        }
        tasks
    })
}

fn flexible_tasks() -> impl Strategy<Value = Vec<FlexibleTask>> {
    prop::collection::vec(1u32..240, 0..4).prop_map(|mins| {
        mins.into_iter()
            .enumerate()
            .map(|(i, m)| FlexibleTask::new(format!("flex-{i}"), m).unwrap())
            .collect()
    })
}

fn proportional_tasks() -> impl Strategy<Value = Vec<ProportionalTask>> {
    prop::collection::vec(1u32..6, 0..4).prop_map(|weights| {
        weights
            .into_iter()
            .enumerate()
            .map(|(i, w)| ProportionalTask::new(format!("prop-{i}"), f64::from(w)).unwrap())
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_output_sorted_disjoint_and_inside_window(
        fixed in fixed_tasks(),
        flexible in flexible_tasks(),
        proportional in proportional_tasks(),
    ) {
        let scheduler = Scheduler::new(window(), fixed.clone(), flexible.clone(), proportional);

        match scheduler.generate() {
            Ok(result) => {
                for pair in result.windows(2) {
                    prop_assert!(pair[0].start <= pair[1].start);
                    prop_assert!(pair[0].end <= pair[1].start);
                }
                for interval in &result {
                    prop_assert!(interval.start < interval.end);
                    prop_assert!(interval.start >= window().wake());
                    prop_assert!(interval.end <= window().bed());
                }
                for task in &flexible {
                    prop_assert_eq!(time_for(&result, task.name()), task.duration());
                }
            }
            Err(err) => {
                let kind = err.kind();
                prop_assert!(
                    kind == ScheduleErrorKind::InsufficientCapacity
                        || (kind == ScheduleErrorKind::EmptySchedule && fixed.is_empty()),
                    "unexpected error {:?}", err
                );
            }
        }
    }

    #[test]
    fn prop_generation_is_idempotent(
        fixed in fixed_tasks(),
        flexible in flexible_tasks(),
        proportional in proportional_tasks(),
    ) {
        let scheduler = Scheduler::new(window(), fixed, flexible, proportional);
        prop_assert_eq!(scheduler.generate(), scheduler.generate());
    }

    #[test]
    fn prop_flexible_capacity_boundary(fixed in fixed_tasks(), extra in 0i64..2) {
        prop_assume!(!fixed.is_empty());
        let probe: Vec<ScheduledInterval> = fixed.iter().map(ScheduledInterval::from).collect();
        let free = total_free(&find_gaps(&probe, &window())).num_minutes();
        prop_assume!(free + extra > 0);

        let minutes = u32::try_from(free + extra).unwrap();
        let flexible = vec![FlexibleTask::new("fill", minutes).unwrap()];
        let result = Scheduler::new(window(), fixed, flexible, vec![]).generate();

        if extra == 0 {
            let result = result.unwrap();
            prop_assert!(find_gaps(&result, &window()).is_empty());
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ScheduleErrorKind::InsufficientCapacity);
        }
    }
}

//! Day timetable generation.
//!
//! This module fills a day window with three kinds of requested tasks:
//! - Fixed tasks are validated against the window and each other, then pinned
//! - Flexible tasks are packed into the earliest free gaps, split if needed
//! - Proportional tasks share whatever free time is left, by weight
//!
//! Generation is a straight pipeline (`Init → FixedPlaced → FlexiblePlaced →
//! ProportionalPlaced → Done`). Any failure aborts it and no partial schedule
//! is returned.

mod placement;
mod proportion;

use std::fmt;

use chrono::Duration;

use crate::error::ScheduleError;
use crate::schedule::{DayWindow, FixedTask, FlexibleTask, ProportionalTask, ScheduledInterval};
use crate::timeline::total_free;

pub use placement::{place_fixed, place_split, WorkingSchedule};
pub use proportion::{allocate, Allocation};

/// Pipeline stage reached by a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    FixedPlaced,
    FlexiblePlaced,
    ProportionalPlaced,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::FixedPlaced => "fixed_placed",
            Stage::FlexiblePlaced => "flexible_placed",
            Stage::ProportionalPlaced => "proportional_placed",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Builds one day's timetable from stored task lists.
///
/// The scheduler holds no working state between calls: every
/// [`Scheduler::generate`] starts from an empty schedule, so repeated calls
/// return identical results.
#[derive(Debug, Clone)]
pub struct Scheduler {
    window: DayWindow,
    fixed: Vec<FixedTask>,
    flexible: Vec<FlexibleTask>,
    proportional: Vec<ProportionalTask>,
}

impl Scheduler {
    pub fn new(
        window: DayWindow,
        fixed: Vec<FixedTask>,
        flexible: Vec<FlexibleTask>,
        proportional: Vec<ProportionalTask>,
    ) -> Self {
        Self {
            window,
            fixed,
            flexible,
            proportional,
        }
    }

    pub fn window(&self) -> &DayWindow {
        &self.window
    }

    pub fn fixed_tasks(&self) -> &[FixedTask] {
        &self.fixed
    }

    pub fn flexible_tasks(&self) -> &[FlexibleTask] {
        &self.flexible
    }

    pub fn proportional_tasks(&self) -> &[ProportionalTask] {
        &self.proportional
    }

    /// Generate the timetable.
    ///
    /// # Returns
    /// Intervals sorted by start, pairwise non-overlapping.
    ///
    /// # Errors
    /// `BeforeWindowStart`, `AfterWindowEnd` or `TaskOverlap` from fixed
    /// task validation; `InsufficientCapacity` when a flexible or
    /// proportional task does not fit; `EmptySchedule` when such a task has
    /// no placed interval to be scheduled around.
    pub fn generate(&self) -> Result<Vec<ScheduledInterval>, ScheduleError> {
        let mut schedule = WorkingSchedule::new();
        let mut stage = Stage::Init;
        tracing::debug!(
            %stage,
            wake = %self.window.wake(),
            bed = %self.window.bed(),
            fixed = self.fixed.len(),
            flexible = self.flexible.len(),
            proportional = self.proportional.len(),
            "starting generation"
        );

        place_fixed(&self.fixed, &self.window, &mut schedule)?;
        stage = Stage::FixedPlaced;
        tracing::debug!(%stage, placed = schedule.len());

        for task in &self.flexible {
            place_split(task.name(), task.duration(), &self.window, &mut schedule)?;
        }
        stage = Stage::FlexiblePlaced;
        tracing::debug!(%stage, placed = schedule.len());

        self.place_proportional(&mut schedule)?;
        stage = Stage::ProportionalPlaced;
        tracing::debug!(%stage, placed = schedule.len());

        stage = Stage::Done;
        tracing::debug!(%stage, intervals = schedule.len(), "generation finished");
        Ok(schedule.into_intervals())
    }

    fn place_proportional(&self, schedule: &mut WorkingSchedule) -> Result<(), ScheduleError> {
        let first = match self.proportional.first() {
            Some(task) => task,
            None => return Ok(()),
        };
        if schedule.is_empty() {
            return Err(ScheduleError::EmptySchedule {
                task: first.name().to_string(),
            });
        }

        let capacity = total_free(&schedule.gaps(&self.window));
        let allocation = allocate(&self.proportional, capacity);
        tracing::debug!(
            capacity_secs = allocation.capacity.num_seconds(),
            unit_secs = allocation.unit_secs,
            remainder_secs = allocation.remainder().num_seconds(),
            "allocated proportional time"
        );

        for (task, duration) in self.proportional.iter().zip(allocation.durations) {
            if duration <= Duration::zero() {
                tracing::debug!(task = task.name(), "proportional share rounds to zero, skipped");
                continue;
            }
            place_split(task.name(), duration, &self.window, schedule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, hour, minute, 0).unwrap()
    }

    fn window() -> DayWindow {
        DayWindow::new(at(8, 0), at(22, 0)).unwrap()
    }

    fn lunch() -> FixedTask {
        FixedTask::new("Lunch", at(12, 0), at(13, 0)).unwrap()
    }

    fn row(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduledInterval {
        ScheduledInterval::new(name, start, end)
    }

    #[test]
    fn test_reference_day() {
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![FlexibleTask::new("Exercise", 30).unwrap()],
            vec![ProportionalTask::new("Read", 1.0).unwrap()],
        );

        let result = scheduler.generate().unwrap();
        assert_eq!(
            result,
            vec![
                row("Exercise", at(8, 0), at(8, 30)),
                row("Read", at(8, 30), at(12, 0)),
                row("Lunch", at(12, 0), at(13, 0)),
                row("Read", at(13, 0), at(22, 0)),
            ]
        );
    }

    #[test]
    fn test_fixed_only() {
        let scheduler = Scheduler::new(window(), vec![lunch()], vec![], vec![]);
        assert_eq!(scheduler.generate().unwrap(), vec![row("Lunch", at(12, 0), at(13, 0))]);
    }

    #[test]
    fn test_flexible_tasks_in_input_order() {
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![
                FlexibleTask::new("Email", 20).unwrap(),
                FlexibleTask::new("Review", 40).unwrap(),
            ],
            vec![],
        );

        let result = scheduler.generate().unwrap();
        assert_eq!(result[0], row("Email", at(8, 0), at(8, 20)));
        assert_eq!(result[1], row("Review", at(8, 20), at(9, 0)));
    }

    #[test]
    fn test_exact_capacity_consumes_everything() {
        // 240 morning + 540 evening = 780 free minutes
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![FlexibleTask::new("Marathon", 780).unwrap()],
            vec![],
        );

        let result = scheduler.generate().unwrap();
        let gaps = crate::timeline::find_gaps(&result, scheduler.window());
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_over_capacity_fails() {
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![FlexibleTask::new("Marathon", 781).unwrap()],
            vec![],
        );

        let err = scheduler.generate().unwrap_err();
        assert!(matches!(err, ScheduleError::InsufficientCapacity { ref task, .. } if task == "Marathon"));
    }

    #[test]
    fn test_fixed_error_aborts_before_flexible() {
        let scheduler = Scheduler::new(
            window(),
            vec![FixedTask::new("Dawn", at(7, 0), at(7, 30)).unwrap()],
            vec![FlexibleTask::new("Email", 20).unwrap()],
            vec![],
        );
        assert!(matches!(
            scheduler.generate(),
            Err(ScheduleError::BeforeWindowStart { .. })
        ));
    }

    #[test]
    fn test_proportional_weights() {
        // Free: 240 + 540 = 780 minutes, weights 1 + 2 -> unit 260 minutes
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![],
            vec![
                ProportionalTask::new("Read", 1.0).unwrap(),
                ProportionalTask::new("Code", 2.0).unwrap(),
            ],
        );

        let result = scheduler.generate().unwrap();
        let total = |name: &str| {
            result
                .iter()
                .filter(|i| i.name == name)
                .fold(Duration::zero(), |acc, i| acc + i.duration())
        };
        assert_eq!(total("Read"), Duration::minutes(260));
        assert_eq!(total("Code"), Duration::minutes(520));
    }

    #[test]
    fn test_no_fixed_tasks_is_empty_schedule() {
        let scheduler = Scheduler::new(
            window(),
            vec![],
            vec![FlexibleTask::new("Email", 20).unwrap()],
            vec![],
        );
        assert_eq!(
            scheduler.generate().unwrap_err(),
            ScheduleError::EmptySchedule { task: "Email".into() }
        );

        let scheduler = Scheduler::new(
            window(),
            vec![],
            vec![],
            vec![ProportionalTask::new("Read", 1.0).unwrap()],
        );
        assert_eq!(
            scheduler.generate().unwrap_err(),
            ScheduleError::EmptySchedule { task: "Read".into() }
        );
    }

    #[test]
    fn test_tiny_weight_fills_free_time() {
        for weight in [1e-12, 1e-300] {
            let scheduler = Scheduler::new(
                window(),
                vec![lunch()],
                vec![],
                vec![ProportionalTask::new("Tiny", weight).unwrap()],
            );
            let result = scheduler.generate().unwrap();

            assert_eq!(result.len(), 3, "weight {weight}");
            assert_eq!(result[0], row("Tiny", at(8, 0), at(12, 0)));
            assert_eq!(result[1], ScheduledInterval::from(&lunch()));
            assert_eq!(result[2].start, at(13, 0));
            assert!(result[2].end <= at(22, 0));
            assert!(result[2].end >= at(22, 0) - Duration::seconds(1));
        }
    }

    #[test]
    fn test_full_window_skips_proportional() {
        let all_day = FixedTask::new("All day", at(8, 0), at(22, 0)).unwrap();
        let scheduler = Scheduler::new(
            window(),
            vec![all_day.clone()],
            vec![],
            vec![ProportionalTask::new("Read", 1.0).unwrap()],
        );
        assert_eq!(scheduler.generate().unwrap(), vec![ScheduledInterval::from(&all_day)]);
    }

    #[test]
    fn test_nothing_requested() {
        let scheduler = Scheduler::new(window(), vec![], vec![], vec![]);
        assert!(scheduler.generate().unwrap().is_empty());
    }

    #[test]
    fn test_generate_is_idempotent() {
        let scheduler = Scheduler::new(
            window(),
            vec![lunch()],
            vec![FlexibleTask::new("Exercise", 30).unwrap()],
            vec![ProportionalTask::new("Read", 1.0).unwrap()],
        );
        assert_eq!(scheduler.generate().unwrap(), scheduler.generate().unwrap());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::FlexiblePlaced.to_string(), "flexible_placed");
    }
}

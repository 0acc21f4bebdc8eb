//! Placement primitives shared by every stage of generation.
//!
//! - [`WorkingSchedule`]: the sorted buffer one `generate()` call builds
//! - [`place_fixed`]: window and overlap validation for pinned tasks
//! - [`place_split`]: greedy earliest-gap-first placement with splitting

use chrono::Duration;

use crate::error::ScheduleError;
use crate::schedule::{DayWindow, FixedTask, ScheduledInterval};
use crate::timeline::{find_gaps, TimeGap};

/// Placed intervals kept sorted by start.
///
/// Invariant: `intervals` is sorted by `start` and contains no two
/// overlapping intervals. Insertion goes through [`WorkingSchedule::insert`],
/// which finds the position with a binary search instead of re-sorting.
#[derive(Debug, Clone, Default)]
pub struct WorkingSchedule {
    intervals: Vec<ScheduledInterval>,
}

impl WorkingSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping start order. Equal starts keep insertion order.
    pub fn insert(&mut self, interval: ScheduledInterval) {
        let idx = self
            .intervals
            .partition_point(|existing| existing.start <= interval.start);
        self.intervals.insert(idx, interval);
    }

    pub fn as_slice(&self) -> &[ScheduledInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Current free gaps of `window` around the placed intervals
    pub fn gaps(&self, window: &DayWindow) -> Vec<TimeGap> {
        find_gaps(&self.intervals, window)
    }

    pub fn into_intervals(self) -> Vec<ScheduledInterval> {
        self.intervals
    }
}

/// Validate fixed tasks against the window and each other, then insert them.
///
/// Tasks are checked in input order. For each task: start before wake, then
/// end after bed, then overlap with any other fixed task in the list. The
/// first failure aborts.
pub fn place_fixed(
    tasks: &[FixedTask],
    window: &DayWindow,
    schedule: &mut WorkingSchedule,
) -> Result<(), ScheduleError> {
    for (i, task) in tasks.iter().enumerate() {
        if task.start() < window.wake() {
            return Err(ScheduleError::BeforeWindowStart {
                task: task.name().to_string(),
                start: task.start(),
                wake: window.wake(),
            });
        }

        if task.end() > window.bed() {
            return Err(ScheduleError::AfterWindowEnd {
                task: task.name().to_string(),
                end: task.end(),
                bed: window.bed(),
            });
        }

        let clash = tasks
            .iter()
            .enumerate()
            .find(|(j, other)| *j != i && task.overlaps(other));
        if let Some((_, other)) = clash {
            return Err(ScheduleError::TaskOverlap {
                first: task.name().to_string(),
                second: other.name().to_string(),
            });
        }

        schedule.insert(ScheduledInterval::from(task));
    }

    Ok(())
}

/// Place `duration` worth of `name` into the earliest free gaps.
///
/// Each pass rescans the gaps and takes the first one. If the remainder fits
/// it is placed at the start of that gap and placement ends; otherwise the
/// whole gap is consumed and the scan restarts from the morning. The evening
/// gap is never split: a remainder longer than the evening gap fails with
/// `InsufficientCapacity` instead of partially filling it.
pub fn place_split(
    name: &str,
    duration: Duration,
    window: &DayWindow,
    schedule: &mut WorkingSchedule,
) -> Result<(), ScheduleError> {
    if schedule.is_empty() {
        return Err(ScheduleError::EmptySchedule {
            task: name.to_string(),
        });
    }

    let mut remaining = duration;
    let mut fragments = 0usize;

    while remaining > Duration::zero() {
        let gap = match schedule.gaps(window).first() {
            Some(gap) => *gap,
            None => return Err(insufficient(name, remaining)),
        };

        if gap.can_fit(remaining) {
            let end = gap.start_time + remaining;
            schedule.insert(ScheduledInterval::new(name, gap.start_time, end));
            fragments += 1;
            tracing::debug!(task = name, start = %gap.start_time, end = %end, "placed final fragment");
            remaining = Duration::zero();
        } else if gap.is_evening() {
            return Err(insufficient(name, remaining));
        } else {
            schedule.insert(ScheduledInterval::new(name, gap.start_time, gap.end_time));
            fragments += 1;
            remaining = remaining - gap.length();
            tracing::debug!(
                task = name,
                start = %gap.start_time,
                end = %gap.end_time,
                remaining_secs = remaining.num_seconds(),
                "filled gap"
            );
        }
    }

    tracing::debug!(task = name, fragments, "task placed");
    Ok(())
}

fn insufficient(name: &str, remaining: Duration) -> ScheduleError {
    // Round up so a few leftover seconds never report as "0 min".
    let secs = remaining.num_seconds();
    ScheduleError::InsufficientCapacity {
        task: name.to_string(),
        remaining_minutes: (secs + 59) / 60,
    }
}

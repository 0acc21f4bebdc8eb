//! Free-time gap detection within a day window.
//!
//! Finds the unscheduled stretches around a sorted list of placed intervals:
//! the morning gap before the first interval, the gaps between neighbours,
//! and the evening gap after the last one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{DayWindow, ScheduledInterval};

/// Where in the day a gap sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// Between wake and the first placed interval
    Morning,
    /// Between two consecutive placed intervals
    Between,
    /// Between the last placed interval and bed
    Evening,
}

/// A free stretch of the day window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGap {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: GapKind,
}

impl TimeGap {
    /// Create a gap, or `None` when the range has no positive length
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, kind: GapKind) -> Option<Self> {
        if end_time <= start_time {
            return None;
        }

        Some(Self {
            start_time,
            end_time,
            kind,
        })
    }

    pub fn length(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.length().num_minutes()
    }

    /// Check if this gap can hold `duration` without splitting
    pub fn can_fit(&self, duration: Duration) -> bool {
        self.length() >= duration
    }

    pub fn is_evening(&self) -> bool {
        self.kind == GapKind::Evening
    }
}

/// Find the free gaps of `window` around `schedule`.
///
/// `schedule` must be sorted by start and non-overlapping. Gaps come back in
/// chronological order and every one has positive length. An empty schedule
/// yields no gaps at all: there is nothing to measure a morning or evening
/// gap against.
pub fn find_gaps(schedule: &[ScheduledInterval], window: &DayWindow) -> Vec<TimeGap> {
    let (first, last) = match (schedule.first(), schedule.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut gaps = Vec::with_capacity(schedule.len() + 1);

    if let Some(gap) = TimeGap::new(window.wake(), first.start, GapKind::Morning) {
        gaps.push(gap);
    }

    for pair in schedule.windows(2) {
        if let Some(gap) = TimeGap::new(pair[0].end, pair[1].start, GapKind::Between) {
            gaps.push(gap);
        }
    }

    if let Some(gap) = TimeGap::new(last.end, window.bed(), GapKind::Evening) {
        gaps.push(gap);
    }

    tracing::trace!(gaps = gaps.len(), placed = schedule.len(), "scanned gaps");
    gaps
}

/// Sum of gap lengths
pub fn total_free(gaps: &[TimeGap]) -> Duration {
    gaps.iter().fold(Duration::zero(), |acc, gap| acc + gap.length())
}

//! Schedule types: the day window, the three kinds of requested tasks, and
//! the intervals a generated timetable is made of.
//!
//! Constructors validate their own fields. Placement rules that depend on
//! other tasks or on the window (containment, overlap, capacity) are checked
//! by the scheduler during `generate()`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// The wake-to-bed range bounding all placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    wake: DateTime<Utc>,
    bed: DateTime<Utc>,
}

impl DayWindow {
    /// Create a window. Fails with `InvalidWindow` unless `wake < bed`.
    pub fn new(wake: DateTime<Utc>, bed: DateTime<Utc>) -> Result<Self, ScheduleError> {
        if wake >= bed {
            return Err(ScheduleError::InvalidWindow { wake, bed });
        }
        Ok(Self { wake, bed })
    }

    pub fn wake(&self) -> DateTime<Utc> {
        self.wake
    }

    pub fn bed(&self) -> DateTime<Utc> {
        self.bed
    }

    /// Total length of the window
    pub fn length(&self) -> Duration {
        self.bed - self.wake
    }
}

/// A task pinned to absolute start and end instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedTask {
    name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl FixedTask {
    /// Create a fixed task. Fails with `InvalidTaskRange` unless `start < end`.
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        if start >= end {
            return Err(ScheduleError::InvalidTaskRange {
                task: name,
                start,
                end,
            });
        }
        Ok(Self { name, start, end })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Open-interval overlap: touching endpoints do not count.
    pub fn overlaps(&self, other: &FixedTask) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A task with a total duration that may be split across several gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlexibleTask {
    name: String,
    duration: Duration,
}

impl FlexibleTask {
    /// Create a flexible task lasting `minutes`. Zero minutes is rejected.
    pub fn new(name: impl Into<String>, minutes: u32) -> Result<Self, ScheduleError> {
        let name = name.into();
        if minutes == 0 {
            return Err(ScheduleError::InvalidDuration { task: name });
        }
        Ok(Self {
            name,
            duration: Duration::minutes(i64::from(minutes)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// A task sized as a share of the free time left after fixed and flexible
/// tasks are placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionalTask {
    name: String,
    weight: f64,
}

impl ProportionalTask {
    /// Create a proportional task. The weight must be finite and positive.
    pub fn new(name: impl Into<String>, weight: f64) -> Result<Self, ScheduleError> {
        let name = name.into();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ScheduleError::InvalidWeight { task: name, weight });
        }
        Ok(Self { name, weight })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// One placed piece of the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledInterval {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduledInterval {
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Open-interval overlap against another placed interval
    pub fn overlaps(&self, other: &ScheduledInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<&FixedTask> for ScheduledInterval {
    fn from(task: &FixedTask) -> Self {
        Self::new(task.name.clone(), task.start, task.end)
    }
}

//! Proportional sizing of weighted tasks from the day's remaining free time.

use chrono::Duration;

use crate::schedule::ProportionalTask;

/// Result of splitting free capacity across weighted tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Free time the split was computed from
    pub capacity: Duration,
    /// Seconds granted per unit of weight, floored. Tiny weights push this
    /// far past the `Duration` range, so it stays a float.
    pub unit_secs: f64,
    /// One duration per task, in input order
    pub durations: Vec<Duration>,
}

impl Allocation {
    /// Total time handed out
    pub fn allocated(&self) -> Duration {
        self.durations
            .iter()
            .fold(Duration::zero(), |acc, d| acc + *d)
    }

    /// Capacity lost to flooring, left unscheduled
    pub fn remainder(&self) -> Duration {
        self.capacity - self.allocated()
    }
}

/// Compute each task's duration as `floor(capacity / sum(weights)) * weight`.
///
/// Arithmetic is in whole seconds; each product is truncated toward zero
/// and never exceeds `capacity`. The flooring remainder is not redistributed.
pub fn allocate(tasks: &[ProportionalTask], capacity: Duration) -> Allocation {
    let total_weight: f64 = tasks.iter().map(ProportionalTask::weight).sum();
    let capacity_secs = capacity.num_seconds().max(0);

    let unit_secs = if total_weight > 0.0 {
        (capacity_secs as f64 / total_weight).floor()
    } else {
        0.0
    };

    let durations = tasks
        .iter()
        .map(|task| share(unit_secs, task.weight(), capacity_secs))
        .collect();

    Allocation {
        capacity,
        unit_secs,
        durations,
    }
}

/// `trunc(unit * weight)` clamped to `[0, capacity_secs]`.
fn share(unit_secs: f64, weight: f64, capacity_secs: i64) -> Duration {
    let secs = (unit_secs * weight).trunc();
    if secs.is_nan() || secs <= 0.0 {
        Duration::zero()
    } else if secs >= capacity_secs as f64 {
        Duration::seconds(capacity_secs)
    } else {
        Duration::seconds(secs as i64)
    }
}

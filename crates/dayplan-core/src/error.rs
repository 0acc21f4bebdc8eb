//! Core error types for dayplan-core.
//!
//! `ScheduleError` covers everything that can go wrong while building a
//! scheduler or generating a timetable. `CoreError` wraps it together with
//! the configuration and plan-file failures the surrounding tooling hits.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing tasks or generating a timetable.
///
/// Every variant aborts the current `generate()` call; no partial schedule
/// is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A fixed task starts before the wake instant
    #[error("task '{task}' starts at {start} which is before wake time {wake}")]
    BeforeWindowStart {
        task: String,
        start: DateTime<Utc>,
        wake: DateTime<Utc>,
    },

    /// A fixed task ends after the bed instant
    #[error("task '{task}' ends at {end} which is after bed time {bed}")]
    AfterWindowEnd {
        task: String,
        end: DateTime<Utc>,
        bed: DateTime<Utc>,
    },

    /// Two fixed tasks share interior time
    #[error("tasks '{first}' and '{second}' overlap")]
    TaskOverlap { first: String, second: String },

    /// Not enough free time left to place the whole task
    #[error("not enough free time for '{task}': {remaining_minutes} min could not be placed")]
    InsufficientCapacity { task: String, remaining_minutes: i64 },

    /// A flexible or proportional task had nothing to be placed around
    #[error("cannot place '{task}': the schedule has no fixed or flexible tasks to anchor gaps")]
    EmptySchedule { task: String },

    /// Wake is not strictly before bed
    #[error("invalid day window: wake ({wake}) must be before bed ({bed})")]
    InvalidWindow {
        wake: DateTime<Utc>,
        bed: DateTime<Utc>,
    },

    /// A fixed task does not end after it starts
    #[error("invalid time range for '{task}': end ({end}) must be after start ({start})")]
    InvalidTaskRange {
        task: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A flexible task asked for no time at all
    #[error("invalid duration for '{task}': minutes must be positive")]
    InvalidDuration { task: String },

    /// A proportional weight that is zero, negative or not finite
    #[error("invalid weight for '{task}': {weight} (must be a positive number)")]
    InvalidWeight { task: String, weight: f64 },
}

/// Field-free discriminant of [`ScheduleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleErrorKind {
    BeforeWindowStart,
    AfterWindowEnd,
    TaskOverlap,
    InsufficientCapacity,
    EmptySchedule,
    InvalidWindow,
    InvalidTaskRange,
    InvalidDuration,
    InvalidWeight,
}

impl ScheduleError {
    /// Which kind of failure this is, for callers that only need to branch.
    pub fn kind(&self) -> ScheduleErrorKind {
        match self {
            Self::BeforeWindowStart { .. } => ScheduleErrorKind::BeforeWindowStart,
            Self::AfterWindowEnd { .. } => ScheduleErrorKind::AfterWindowEnd,
            Self::TaskOverlap { .. } => ScheduleErrorKind::TaskOverlap,
            Self::InsufficientCapacity { .. } => ScheduleErrorKind::InsufficientCapacity,
            Self::EmptySchedule { .. } => ScheduleErrorKind::EmptySchedule,
            Self::InvalidWindow { .. } => ScheduleErrorKind::InvalidWindow,
            Self::InvalidTaskRange { .. } => ScheduleErrorKind::InvalidTaskRange,
            Self::InvalidDuration { .. } => ScheduleErrorKind::InvalidDuration,
            Self::InvalidWeight { .. } => ScheduleErrorKind::InvalidWeight,
        }
    }
}

impl ScheduleErrorKind {
    /// Stable snake_case name, used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeWindowStart => "before_window_start",
            Self::AfterWindowEnd => "after_window_end",
            Self::TaskOverlap => "task_overlap",
            Self::InsufficientCapacity => "insufficient_capacity",
            Self::EmptySchedule => "empty_schedule",
            Self::InvalidWindow => "invalid_window",
            Self::InvalidTaskRange => "invalid_task_range",
            Self::InvalidDuration => "invalid_duration",
            Self::InvalidWeight => "invalid_weight",
        }
    }
}

/// Core error type for dayplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Scheduling failures
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan file errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CoreError {
    /// Whether the failure came from the user's plan rather than the
    /// environment.
    pub fn is_plan_failure(&self) -> bool {
        matches!(self, CoreError::Plan(_) | CoreError::Schedule(_))
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Cannot prepare config directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Plan file errors.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The plan file could not be read
    #[error("Failed to read plan {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plan document is malformed
    #[error("Failed to parse plan: {0}")]
    Parse(String),

    /// Unknown file extension
    #[error("Unsupported plan format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    /// A time field is neither HH:MM nor RFC 3339
    #[error("Invalid time for '{field}': '{value}' (expected HH:MM or RFC 3339)")]
    InvalidTime { field: String, value: String },

    /// The date field is not YYYY-MM-DD
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Task construction rejected the plan contents
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl From<toml::de::Error> for PlanError {
    fn from(err: toml::de::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

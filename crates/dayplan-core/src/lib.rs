//! # Dayplan Core Library
//!
//! This library builds a single day's timetable between a wake time and a bed
//! time. It follows a CLI-first philosophy: the `dayplan` binary is a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Schedule types**: the day window and the fixed, flexible and
//!   proportional task kinds
//! - **Timeline**: free-gap detection around already placed intervals
//! - **Scheduler**: fixed placement, greedy gap filling with splitting, and
//!   proportional sizing of the time left over
//! - **Plan**: TOML/JSON day plan documents
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Scheduler`]: owns the task lists and generates the timetable
//! - [`Plan`]: parses plan files into a [`Scheduler`]
//! - [`Config`]: application configuration management

pub mod error;
pub mod plan;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use error::{ConfigError, CoreError, PlanError, Result, ScheduleError, ScheduleErrorKind};
pub use plan::Plan;
pub use schedule::{DayWindow, FixedTask, FlexibleTask, ProportionalTask, ScheduledInterval};
pub use scheduler::{Scheduler, Stage};
pub use storage::{Config, OutputFormat};
pub use timeline::{find_gaps, total_free, GapKind, TimeGap};

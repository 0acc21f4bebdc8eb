//! Day plan documents.
//!
//! A plan is the on-disk description of one day: the window plus the three
//! task lists. Times are either `HH:MM` clock times on the plan's date or
//! full RFC 3339 instants. Plans are read from TOML or JSON and turned into
//! a validated [`Scheduler`].

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PlanError;
use crate::schedule::{DayWindow, FixedTask, FlexibleTask, ProportionalTask};
use crate::scheduler::Scheduler;
use crate::storage::DayConfig;

/// A fixed entry in a plan file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedEntry {
    pub name: String,
    pub start: String,
    pub end: String,
}

/// A flexible entry in a plan file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleEntry {
    pub name: String,
    pub minutes: u32,
}

/// A proportional entry in a plan file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalEntry {
    pub name: String,
    pub weight: f64,
}

/// One day's requested activities as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// YYYY-MM-DD; today (UTC) when absent
    #[serde(default)]
    pub date: Option<String>,
    /// Falls back to the configured default wake time
    #[serde(default)]
    pub wake: Option<String>,
    /// Falls back to the configured default bed time
    #[serde(default)]
    pub bed: Option<String>,
    #[serde(default)]
    pub fixed: Vec<FixedEntry>,
    #[serde(default)]
    pub flexible: Vec<FlexibleEntry>,
    #[serde(default)]
    pub proportional: Vec<ProportionalEntry>,
}

/// Resolves clock times against the plan's date.
///
/// When bed's clock time is earlier than wake's the window runs past
/// midnight, and any clock time earlier than wake belongs to the next day.
struct ClockAnchor {
    date: NaiveDate,
    wake_clock: Option<NaiveTime>,
    crosses_midnight: bool,
}

impl ClockAnchor {
    fn resolve(&self, field: &str, value: &str) -> Result<DateTime<Utc>, PlanError> {
        if let Some(clock) = parse_clock(value) {
            let mut instant = self.date.and_time(clock).and_utc();
            if self.crosses_midnight && self.wake_clock.is_some_and(|wake| clock < wake) {
                instant += Duration::days(1);
            }
            return Ok(instant);
        }

        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| PlanError::InvalidTime {
                field: field.to_string(),
                value: value.to_string(),
            })
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

impl Plan {
    /// Read a plan, picking the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(PlanError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(content)?)
    }

    /// The plan's date, or `today` when the plan has none.
    pub fn resolve_date(&self, today: NaiveDate) -> Result<NaiveDate, PlanError> {
        match &self.date {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| PlanError::InvalidDate(raw.clone())),
            None => Ok(today),
        }
    }

    /// Build a scheduler for this plan.
    ///
    /// `defaults` supplies wake and bed when the plan leaves them out;
    /// `today` is used when the plan carries no date.
    ///
    /// # Errors
    /// Malformed dates or times, and any task the constructors reject.
    pub fn to_scheduler(
        &self,
        defaults: &DayConfig,
        today: NaiveDate,
    ) -> Result<Scheduler, PlanError> {
        let date = self.resolve_date(today)?;
        let wake_raw = self.wake.as_deref().unwrap_or(&defaults.wake);
        let bed_raw = self.bed.as_deref().unwrap_or(&defaults.bed);

        let wake_clock = parse_clock(wake_raw);
        let crosses_midnight = match (wake_clock, parse_clock(bed_raw)) {
            (Some(wake), Some(bed)) => bed < wake,
            _ => false,
        };
        let anchor = ClockAnchor {
            date,
            wake_clock,
            crosses_midnight,
        };

        let window = DayWindow::new(
            anchor.resolve("wake", wake_raw)?,
            anchor.resolve("bed", bed_raw)?,
        )?;

        let fixed = self
            .fixed
            .iter()
            .map(|entry| -> Result<FixedTask, PlanError> {
                let start = anchor.resolve(&format!("{}.start", entry.name), &entry.start)?;
                let end = anchor.resolve(&format!("{}.end", entry.name), &entry.end)?;
                Ok(FixedTask::new(entry.name.clone(), start, end)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let flexible = self
            .flexible
            .iter()
            .map(|entry| FlexibleTask::new(entry.name.clone(), entry.minutes))
            .collect::<Result<Vec<_>, _>>()?;

        let proportional = self
            .proportional
            .iter()
            .map(|entry| ProportionalTask::new(entry.name.clone(), entry.weight))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            %date,
            fixed = fixed.len(),
            flexible = flexible.len(),
            proportional = proportional.len(),
            "plan resolved"
        );
        Ok(Scheduler::new(window, fixed, flexible, proportional))
    }
}

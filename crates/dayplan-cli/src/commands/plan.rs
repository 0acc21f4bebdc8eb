//! Day plan commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use dayplan_core::{
    find_gaps, total_free, Config, OutputFormat, Plan, PlanError, Result, ScheduledInterval, TimeGap,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

const EXAMPLE_PLAN: &str = indoc::indoc! {r#"
    # Day plan. Times are HH:MM on `date` or RFC 3339 instants.
    date = "2026-10-16"
    wake = "08:00"
    bed = "22:00"

    # Pinned to exact times
    [[fixed]]
    name = "Lunch"
    start = "12:00"
    end = "13:00"

    # Packed into the earliest free time, split if needed
    [[flexible]]
    name = "Exercise"
    minutes = 30

    # Shares what is left, by weight
    [[proportional]]
    name = "Read"
    weight = 1
"#};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate the timetable for a plan file
    Generate {
        /// Plan file (.toml or .json)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Override the plan's date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Also list the free time left over
        #[arg(long)]
        free: bool,
    },
    /// Validate a plan file without printing the timetable
    Check {
        /// Plan file (.toml or .json)
        file: PathBuf,
    },
    /// Print an example plan file
    Example,
}

/// JSON shape of a generated timetable
#[derive(Serialize)]
struct TimetableOutput {
    wake: DateTime<Utc>,
    bed: DateTime<Utc>,
    intervals: Vec<ScheduledInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    free: Option<Vec<TimeGap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    free_minutes: Option<i64>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn load_plan(file: &Path, date: Option<NaiveDate>) -> Result<Plan, PlanError> {
    let mut plan = Plan::from_path(file)?;
    if let Some(date) = date {
        plan.date = Some(date.format("%Y-%m-%d").to_string());
    }
    Ok(plan)
}

fn print_table(output: &TimetableOutput, time_format: &str) {
    let width = output
        .intervals
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(0);

    for interval in &output.intervals {
        println!(
            "{}-{}  {:<width$}  {:>4} min",
            interval.start.format(time_format),
            interval.end.format(time_format),
            interval.name,
            interval.duration_minutes(),
        );
    }

    if let (Some(gaps), Some(minutes)) = (&output.free, output.free_minutes) {
        println!();
        println!("free: {minutes} min");
        for gap in gaps {
            println!(
                "{}-{}  {:>4} min",
                gap.start_time.format(time_format),
                gap.end_time.format(time_format),
                gap.duration_minutes(),
            );
        }
    }
}

pub fn run(action: PlanAction, config: &Config) -> Result<()> {
    match action {
        PlanAction::Generate {
            file,
            json,
            date,
            free,
        } => {
            let plan = load_plan(&file, date)?;
            let scheduler = plan.to_scheduler(&config.day, today())?;
            let intervals = scheduler.generate()?;
            tracing::info!(intervals = intervals.len(), file = %file.display(), "timetable generated");

            let (free, free_minutes) = if free || config.output.show_free {
                let gaps = find_gaps(&intervals, scheduler.window());
                let minutes = total_free(&gaps).num_minutes();
                (Some(gaps), Some(minutes))
            } else {
                (None, None)
            };

            let output = TimetableOutput {
                wake: scheduler.window().wake(),
                bed: scheduler.window().bed(),
                intervals,
                free,
                free_minutes,
            };

            if json || config.output.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_table(&output, &config.output.time_format);
            }
        }
        PlanAction::Check { file } => {
            let plan = load_plan(&file, None)?;
            let scheduler = plan.to_scheduler(&config.day, today())?;
            match scheduler.generate() {
                Ok(intervals) => println!("ok: {} intervals", intervals.len()),
                Err(err) => {
                    println!("invalid: {}", err.kind().as_str());
                    return Err(err.into());
                }
            }
        }
        PlanAction::Example => {
            print!("{EXAMPLE_PLAN}");
        }
    }
    Ok(())
}

mod cli_args;
mod logging;
mod scenario;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use meeting_engine::{parse_days, parse_hours, SchedulerConfig, TimeSlot};
use serde::Serialize;
use tracing::debug;

use crate::cli_args::{Cli, Command, GlobalArgs};
use crate::scenario::{Entry, Scenario};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose)?;

    match &cli.command {
        Command::Demo => {
            let scenario = Scenario::from_toml_str(scenario::DEMO)?;
            run_scenario(&cli.global, &scenario)
        }
        Command::Run(args) => {
            let scenario = Scenario::load(&args.scenario)?;
            run_scenario(&cli.global, &scenario)
        }
        Command::ParseSlot(args) => parse_slot(&cli.global, &args.slot),
    }
}

fn run_scenario(global: &GlobalArgs, scenario: &Scenario) -> Result<()> {
    let now = resolve_now(global, scenario)?;
    let config = resolve_config(global, scenario)?;
    debug!(%now, steps = scenario.steps.len(), "running scenario");

    let entries = scenario::run(&scenario.steps, config, now)?;
    print_entries(global, &entries)
}

/// `--now`, then the scenario's `now`, then the local clock.
fn resolve_now(global: &GlobalArgs, scenario: &Scenario) -> Result<NaiveDateTime> {
    if let Some(slot) = global.now {
        return Ok(slot.datetime());
    }
    if let Some(slot) = scenario.anchor()? {
        return Ok(slot.datetime());
    }
    Ok(chrono::Local::now().naive_local())
}

/// `--config`, then the scenario's `[config]`, then defaults. `--days` and
/// `--hours` then replace the default preferences.
fn resolve_config(global: &GlobalArgs, scenario: &Scenario) -> Result<SchedulerConfig> {
    let mut config = if let Some(path) = &global.config {
        SchedulerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
    } else {
        match &scenario.config {
            Some(config) => {
                config.validate().context("invalid scenario config")?;
                config.clone()
            }
            None => SchedulerConfig::default(),
        }
    };

    if let Some(days) = &global.days {
        config.preferences.days = parse_days(days).context("invalid --days")?;
    }
    if let Some(hours) = &global.hours {
        config.preferences.hours = parse_hours(hours).context("invalid --hours")?;
    }
    Ok(config)
}

fn print_entries(global: &GlobalArgs, entries: &[Entry]) -> Result<()> {
    if global.json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else {
        for entry in entries {
            println!("{entry}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SlotInfo {
    slot: String,
    datetime: NaiveDateTime,
    weekday: chrono::Weekday,
}

fn parse_slot(global: &GlobalArgs, input: &str) -> Result<()> {
    let slot = TimeSlot::parse(input)?;
    let info = SlotInfo {
        slot: slot.to_string(),
        datetime: slot.datetime(),
        weekday: slot.weekday(),
    };
    if global.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{} {} {}", info.slot, info.weekday, info.datetime);
    }
    Ok(())
}

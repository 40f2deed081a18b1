use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use meeting_engine::TimeSlot;

/// Book meetings and find free slots for groups of people.
#[derive(Parser, Debug)]
#[command(name = "meetings", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Args, Default)]
pub struct GlobalArgs {
    /// Anchor time as HH-dd-MM-yyyy. Overrides the scenario's `now`; the local
    /// clock is used when neither is given.
    #[arg(long, global = true, value_name = "HH-dd-MM-yyyy")]
    pub now: Option<TimeSlot>,

    /// Scheduler config (TOML). Replaces any `[config]` table in the scenario.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Default preferred days, comma-separated (`mon,wed`, `weekdays`, `weekend`, `all`).
    /// Overrides the config's `[preferences] days`.
    #[arg(long, global = true, value_name = "DAYS")]
    pub days: Option<String>,

    /// Default preferred hours, comma-separated, first one starts the search.
    /// Overrides the config's `[preferences] hours`.
    #[arg(long, global = true, value_name = "HOURS")]
    pub hours: Option<String>,

    /// Print the transcript as JSON instead of text.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the built-in demo: ten people, a week of meetings, and suggestions.
    Demo,
    /// Run a scenario file.
    Run(RunArgs),
    /// Parse an HH-dd-MM-yyyy slot and show what it means.
    ParseSlot(ParseSlotArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Scenario file (TOML), or `-` for stdin.
    #[arg(value_hint = ValueHint::FilePath)]
    pub scenario: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ParseSlotArgs {
    pub slot: String,
}

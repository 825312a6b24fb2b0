//! `calendar` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and start logging.
//! - Open the calendar (database + snapshot) and dispatch subcommands.
//! - Save the snapshot after every mutating command.

mod cmd;
mod output;

use anyhow::Context;
use calendar_core::{
    init_logging, CalendarConfig, CalendarService, SqliteStore, XmlSnapshotStore,
};
use clap::{Parser, Subcommand};
use log::warn;
use output::OutputMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "calendar: events, contacts and categories", long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the database, snapshot and logs.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip the database and work on the snapshot file only.
    #[arg(long, global = true)]
    offline: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage categories.
    Category(cmd::category::CategoryArgs),
    /// Manage events.
    Event(cmd::event::EventArgs),
    /// Manage contacts.
    Contact(cmd::contact::ContactArgs),
    /// Attach a contact to an event.
    Link(cmd::LinkArgs),
    /// Detach a contact from an event.
    Unlink(cmd::LinkArgs),
    /// List reminders due at a minute (default: now).
    Reminders(cmd::RemindersArgs),
    /// Print reminders as they become due until interrupted.
    Watch,
    /// Show a snapshot file without opening the calendar.
    Inspect(cmd::InspectArgs),
    /// Print the core version.
    Version,
}

pub type Calendar = CalendarService<SqliteStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match &cli.command {
        Commands::Version => {
            println!("calendar_core {}", calendar_core::core_version());
            return Ok(());
        }
        Commands::Inspect(args) => return cmd::run_inspect(args, output),
        _ => {}
    }

    let config = load_config(&cli)?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    let mut calendar = open_calendar(&config, cli.offline)?;

    match cli.command {
        Commands::Category(args) => cmd::category::run(&mut calendar, args, output),
        Commands::Event(args) => cmd::event::run(&mut calendar, args, output),
        Commands::Contact(args) => cmd::contact::run(&mut calendar, args, output),
        Commands::Link(args) => cmd::run_link(&mut calendar, &args, true, output),
        Commands::Unlink(args) => cmd::run_link(&mut calendar, &args, false, output),
        Commands::Reminders(args) => cmd::run_reminders(&calendar, &args, output),
        Commands::Watch => cmd::run_watch(&calendar),
        Commands::Inspect(_) | Commands::Version => Ok(()),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CalendarConfig> {
    let config = CalendarConfig::load(cli.config.as_deref()).context("loading configuration")?;
    Ok(match &cli.data_dir {
        Some(dir) => config.rebase(dir),
        None => config,
    })
}

fn open_calendar(config: &CalendarConfig, offline: bool) -> anyhow::Result<Calendar> {
    let store = if offline || !config.database_enabled {
        None
    } else {
        match SqliteStore::open(&config.database_path) {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(
                    "event=store_open module=cli status=error mode=file_only error={}",
                    err
                );
                eprintln!("warning: database unavailable, working on the snapshot only: {err}");
                None
            }
        }
    };

    let snapshot = XmlSnapshotStore::new(&config.snapshot_path);
    CalendarService::open(store, snapshot).context("opening calendar")
}

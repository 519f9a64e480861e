//! Offmap CLI - Command-line interface
//!
//! Thin front end over the `offmap` library: configure an area, sync it and
//! browse the stored attractions.

mod commands;
mod error;
mod runner;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::clear::ClearTarget;
use commands::config::ConfigCommands;

#[derive(Debug, Parser)]
#[command(name = "offmap", version, about = "Offline map tiles and points of interest")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the configuration file and data directories
    Init,

    /// Download tiles, then the attraction catalog, for the configured area
    Sync,

    /// List stored attractions
    List {
        /// Only this category (e.g. "Nature" or "food_&_drink")
        #[arg(short, long)]
        category: Option<String>,

        /// Sort by distance from LAT,LON
        #[arg(long, value_name = "LAT,LON")]
        near: Option<String>,

        /// Maximum number of attractions shown
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show what is stored for the configured area
    Status,

    /// Delete stored tiles or attractions
    Clear {
        #[command(subcommand)]
        target: ClearTarget,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init => commands::init::run(),
        Command::Sync => commands::sync::run(),
        Command::List {
            category,
            near,
            limit,
        } => commands::list::run(category.as_deref(), near.as_deref(), limit),
        Command::Status => commands::status::run(),
        Command::Clear { target } => commands::clear::run(target),
        Command::Config { command } => commands::config::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

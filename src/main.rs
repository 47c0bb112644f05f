//! usbshare CLI
//!
//! Usage: usbshare [COMMAND]
//!
//! Commands:
//!   run      Watch the share and remount the gadget after changes settle (default)
//!   remount  Unmount, sync and mount the gadget once, then exit
//!   config   Print the effective configuration

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let globals = commands::Globals {
        config: cli.config,
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        None => commands::run::cmd_run(&globals, &cli::RunArgs::default()),
        Some(Commands::Run(args)) => commands::run::cmd_run(&globals, &args),
        Some(Commands::Remount(args)) => commands::remount::cmd_remount(&globals, &args),
        Some(Commands::Config) => commands::config::cmd_config(&globals),
    }
}

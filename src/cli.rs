use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// usbshare - expose a directory as a USB gadget and remount after edits settle
#[derive(Parser, Debug)]
#[command(name = "usbshare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: /etc/usbshare/config.toml, then ~/.config/usbshare/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print controller events as NDJSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the share and remount the gadget after changes settle (default)
    Run(RunArgs),

    /// Unmount, sync and mount the gadget once, then exit
    Remount(TimingArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Directory shared over USB
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Seconds of quiet required after the last change
    #[arg(long, value_name = "SECS")]
    pub settle: Option<f64>,

    /// Seconds between dirty-state checks
    #[arg(long, value_name = "SECS")]
    pub poll: Option<f64>,

    #[command(flatten)]
    pub timing: TimingArgs,

    /// Skip the unmount + mount performed at startup
    #[arg(long)]
    pub no_initial_remount: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct TimingArgs {
    /// Seconds to pause between unmount, sync and mount
    #[arg(long, value_name = "SECS")]
    pub pause: Option<f64>,
}

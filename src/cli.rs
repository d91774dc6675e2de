use crate::types::BrowserId;
use clap::{Parser, Subcommand};

/// CLI arguments for chromtune
#[derive(Parser, Debug)]
#[command(name = "chromtune")]
#[command(about = "Detect Chromium-based browsers and tune them via registry policies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported browsers and whether they are installed
    Detect,

    /// Show the previously applied configuration, if any
    Show,

    /// Write the selected optimization policies and persist them
    Apply {
        /// Browsers to configure (default: every installed browser)
        #[arg(short, long = "browser", value_enum)]
        browsers: Vec<BrowserId>,

        /// Memory cap per browser process, in gigabytes (must be at least 1)
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
        memory_limit_gb: u32,

        /// Skip the memory cap policy
        #[arg(long, conflicts_with = "memory_limit_gb")]
        no_memory_limit: bool,

        /// Leave page preloading enabled
        #[arg(long)]
        keep_preload: bool,

        /// Leave hardware acceleration enabled
        #[arg(long)]
        keep_hardware_acceleration: bool,

        /// Overwrite an existing configuration without asking
        #[arg(short = 'y', long)]
        yes: bool,

        /// Kill the configured browsers afterwards so the policies take
        /// effect on the next launch
        #[arg(long)]
        restart: bool,
    },

    /// Kill the running processes of the given browsers
    Kill {
        /// Browsers to kill
        #[arg(value_enum, required = true)]
        browsers: Vec<BrowserId>,
    },
}

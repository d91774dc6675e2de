use chromtune::cli::{Cli, Commands};
use chromtune::commands;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect => commands::detect(),
        Commands::Show => commands::show(),
        Commands::Apply {
            browsers,
            memory_limit_gb,
            no_memory_limit,
            keep_preload,
            keep_hardware_acceleration,
            yes,
            restart,
        } => commands::apply(commands::ApplyArgs {
            browsers,
            memory_limit_gb,
            no_memory_limit,
            keep_preload,
            keep_hardware_acceleration,
            yes,
            restart,
        }),
        Commands::Kill { browsers } => commands::kill(&browsers),
    }
}

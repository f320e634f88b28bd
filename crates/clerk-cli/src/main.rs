use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;
mod replay;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::ClerkConfig::load(cli.config.as_deref())?;
    let level = if cli.verbose { Level::DEBUG } else { config.level()? };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    commands::run_command(cli, &config)
}

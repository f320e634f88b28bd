use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use clerk_keeper::MAX_PAGE_LIMIT;
use clerk_types::RootChainType;

#[derive(Parser)]
#[command(
    name = "clerk",
    about = "Clerk: write-once keeper of bridged root-chain events",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay an event file through the keeper, one transaction per event
    Replay(ReplayArgs),
    /// Show a record by canonical ID
    Get(GetArgs),
    /// Find a record by root chain and origin ID
    Lookup(LookupArgs),
    /// List records in canonical ID order
    List(ListArgs),
    /// List records whose record time falls in a closed range
    Range(RangeArgs),
    /// List processed sequence tokens
    Sequences(StateArgs),
    /// Print the BLAKE3 digest of the keeper state
    Digest(StateArgs),
}

/// Where the keeper state comes from. Without a genesis file the keeper
/// starts empty.
#[derive(Args, Clone, Debug, Default)]
pub struct StateArgs {
    /// Genesis JSON file to load before running the command
    #[arg(short, long)]
    pub genesis: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON array of events to apply
    pub events: PathBuf,
    #[command(flatten)]
    pub state: StateArgs,
    /// Write the resulting state as a genesis file
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: u64,
    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct LookupArgs {
    pub chain: RootChainType,
    pub origin_id: u64,
    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    #[arg(long, default_value_t = MAX_PAGE_LIMIT)]
    pub limit: u64,
    /// Ignore pagination and print every record
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct RangeArgs {
    /// Inclusive lower bound (RFC 3339)
    #[arg(long)]
    pub from: DateTime<Utc>,
    /// Inclusive upper bound (RFC 3339)
    #[arg(long)]
    pub to: DateTime<Utc>,
    /// Restrict to one root chain
    #[arg(long)]
    pub chain: Option<RootChainType>,
    /// Page number; 0 together with --limit 0 returns the whole range
    #[arg(long, default_value_t = 0)]
    pub page: u64,
    #[arg(long, default_value_t = 0)]
    pub limit: u64,
    #[command(flatten)]
    pub state: StateArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_range_with_chain() {
        let cli = Cli::parse_from([
            "clerk",
            "range",
            "--from",
            "2024-01-01T00:00:00Z",
            "--to",
            "2024-01-02T00:00:00Z",
            "--chain",
            "tron",
            "--genesis",
            "state.json",
        ]);
        let Command::Range(args) = cli.command else {
            panic!("expected range command");
        };
        assert_eq!(args.chain, Some(RootChainType::Tron));
        assert_eq!((args.page, args.limit), (0, 0));
        assert_eq!(args.state.genesis, Some(PathBuf::from("state.json")));
    }

    #[test]
    fn list_defaults_to_first_full_page() {
        let cli = Cli::parse_from(["clerk", "--format", "json", "list"]);
        assert_eq!(cli.format, OutputFormat::Json);
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!((args.page, args.limit), (1, MAX_PAGE_LIMIT));
        assert!(!args.all);
    }

    #[test]
    fn empty_chain_tag_is_rejected() {
        assert!(Cli::try_parse_from(["clerk", "lookup", "", "1"]).is_err());
    }
}

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clerk_keeper::{ClerkKeeper, GenesisState, RecordReader, SequenceLedger};
use clerk_store::{state_digest, InMemoryKvStore, ReadOnlyStore};
use clerk_types::EventRecord;
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;
use crate::config::ClerkConfig;
use crate::replay::{load_events, replay_all};

pub fn run_command(cli: Cli, config: &ClerkConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Replay(args) => cmd_replay(args, config, format),
        Command::Get(args) => cmd_get(args, config, format),
        Command::Lookup(args) => cmd_lookup(args, config, format),
        Command::List(args) => cmd_list(args, config, format),
        Command::Range(args) => cmd_range(args, config, format),
        Command::Sequences(args) => cmd_sequences(args, config, format),
        Command::Digest(args) => cmd_digest(args, config),
    }
}

/// Build the keeper state a command runs against.
pub fn load_state(args: &StateArgs, config: &ClerkConfig) -> anyhow::Result<InMemoryKvStore> {
    let store = InMemoryKvStore::new();
    if let Some(path) = &args.genesis {
        let state = read_genesis(path)?;
        ClerkKeeper::new(&store, &config.params)
            .init_genesis(&state)
            .with_context(|| format!("importing genesis {}", path.display()))?;
    }
    Ok(store)
}

pub fn read_genesis(path: &Path) -> anyhow::Result<GenesisState> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading genesis {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing genesis {}", path.display()))
}

pub fn write_genesis(path: &Path, state: &GenesisState) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).with_context(|| format!("writing genesis {}", path.display()))
}

pub fn digest_hex(store: &InMemoryKvStore) -> anyhow::Result<String> {
    Ok(hex::encode(state_digest(store)?))
}

pub fn render_record(record: &EventRecord) -> String {
    format!(
        "{:>6}  {}:{}  {}",
        format!("#{}", record.id).yellow(),
        record.root_chain_type.to_string().cyan(),
        record.origin_id,
        record.record_time.to_rfc3339().dimmed(),
    )
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_records(records: &[EventRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No records.");
            }
            for record in records {
                println!("{}", render_record(record));
            }
            Ok(())
        }
    }
}

fn print_record(record: &EventRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            println!("{}", render_record(record));
            println!("  Contract: {}", record.payload.contract);
            println!("  Tx hash: {}", record.payload.tx_hash);
            println!("  Log index: {}", record.payload.log_index);
            println!("  Chain id: {}", record.payload.chain_id);
            println!("  Data: {}", hex::encode(&record.payload.data).blue());
            Ok(())
        }
    }
}

fn cmd_replay(args: ReplayArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args.state, config)?;
    let entries = load_events(&args.events)?;
    let summary = replay_all(&store, &config.params, &entries)?;

    if let Some(out) = &args.out {
        let state = ClerkKeeper::new(&store, &config.params).export_genesis()?;
        write_genesis(out, &state)?;
    }

    let digest = digest_hex(&store)?;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": summary,
            "digest": digest,
        })),
        OutputFormat::Text => {
            println!("{} Replay complete.", "✓".green().bold());
            println!("  Ingested: {}", summary.ingested.to_string().bold());
            println!("  Sequence already seen: {}", summary.sequence_seen);
            println!("  Duplicates: {}", summary.duplicates);
            println!("  Rejected: {}", summary.rejected);
            println!("  Digest: {}", digest.cyan());
            if let Some(out) = &args.out {
                println!("  Genesis written to {}", out.display().to_string().bold());
            }
            Ok(())
        }
    }
}

fn cmd_get(args: GetArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args.state, config)?;
    let keeper = ClerkKeeper::new(ReadOnlyStore::new(&store), &config.params);
    let Some(record) = keeper.get_by_id(args.id)? else {
        bail!("no record with id {}", args.id);
    };
    print_record(&record, format)
}

fn cmd_lookup(args: LookupArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args.state, config)?;
    let keeper = ClerkKeeper::new(ReadOnlyStore::new(&store), &config.params);
    let Some(record) = keeper.get_by_root_chain(&args.chain, args.origin_id)? else {
        bail!("no record for {}:{}", args.chain, args.origin_id);
    };
    print_record(&record, format)
}

fn cmd_list(args: ListArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args.state, config)?;
    let keeper = ClerkKeeper::new(ReadOnlyStore::new(&store), &config.params);
    let records = if args.all {
        keeper.list_all()?
    } else {
        keeper.list_paginated(args.page, args.limit)?
    };
    print_records(&records, format)
}

fn cmd_range(args: RangeArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args.state, config)?;
    let keeper = ClerkKeeper::new(ReadOnlyStore::new(&store), &config.params);
    let records = match &args.chain {
        Some(chain) => keeper.list_by_root_chain_time_range(
            chain, &args.from, &args.to, args.page, args.limit,
        )?,
        None => keeper.list_by_time_range(&args.from, &args.to, args.page, args.limit)?,
    };
    print_records(&records, format)
}

fn cmd_sequences(args: StateArgs, config: &ClerkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_state(&args, config)?;
    let keeper = ClerkKeeper::new(ReadOnlyStore::new(&store), &config.params);
    let sequences = keeper.list_sequences()?;
    match format {
        OutputFormat::Json => print_json(&sequences),
        OutputFormat::Text => {
            if sequences.is_empty() {
                println!("No sequences.");
            }
            for sequence in &sequences {
                println!("{sequence}");
            }
            Ok(())
        }
    }
}

fn cmd_digest(args: StateArgs, config: &ClerkConfig) -> anyhow::Result<()> {
    let store = load_state(&args, config)?;
    println!("{}", digest_hex(&store)?);
    Ok(())
}

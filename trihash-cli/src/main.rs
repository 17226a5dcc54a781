//! trihash - command-line front end for content fingerprinting
//!
//! Fingerprints identifier triples, validates components, converts base-96
//! values, and runs batch fingerprint + novelty scoring over JSON input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trihash_common::config::load_config_with_source;
use trihash_common::ids::{build_cuid_now, build_version_id};
use trihash_common::records::save_records;
use trihash_common::{decode_base96, try_encode_base96, validate};

mod batch;

/// Command-line arguments for trihash
#[derive(Parser, Debug)]
#[command(name = "trihash")]
#[command(about = "Deterministic content fingerprints and novelty scores")]
#[command(version)]
struct Args {
    /// Config file (overrides TRIHASH_CONFIG and the platform default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fingerprint one identifier triple
    Fingerprint {
        #[arg(long)]
        shc: String,
        #[arg(long)]
        cuid: String,
        #[arg(long)]
        uuid: String,
        /// Optional version appended to the canonical string
        #[arg(long)]
        version: Option<String>,
        /// Suffix appended verbatim instead of the configured default
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Check identifier components without fingerprinting
    Validate {
        #[arg(long)]
        shc: String,
        #[arg(long)]
        cuid: String,
        #[arg(long)]
        uuid: String,
    },
    /// Build a CUID and version id for a document section
    Ids {
        #[arg(long)]
        path: String,
        #[arg(long, default_value = "1")]
        section: String,
        #[arg(long)]
        doc_id: String,
        #[arg(long, default_value = "1")]
        doc_version: String,
    },
    /// Encode a non-negative integer in base-96
    Encode {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Decode a base-96 string
    Decode { value: String },
    /// Fingerprint and score a JSON array of entries
    Batch {
        /// JSON file with entries {shc, cuid, uuid, version?, suffix?, parent?, entropy?, age_factor?}
        input: PathBuf,
        /// Write records here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Tracker snapshot, restored before and saved after the run
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Resolved before the subscriber exists, which needs the configured level;
    // the outcome is logged once it is installed
    let (config, config_source) =
        load_config_with_source(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting trihash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let fingerprinter = config.fingerprinter();
    info!(
        "Hash strategy: {}, {} symbols",
        fingerprinter.strategy_name(),
        fingerprinter.symbols().len()
    );

    match args.command {
        Command::Fingerprint {
            shc,
            cuid,
            uuid,
            version,
            suffix,
        } => {
            let fp = fingerprinter.fingerprint(
                &shc,
                &cuid,
                &uuid,
                suffix.as_deref(),
                version.as_deref(),
            )?;
            println!("{}", fp);
        }
        Command::Validate { shc, cuid, uuid } => {
            validate(fingerprinter.symbols(), &shc, &cuid, &uuid)?;
            println!("valid");
        }
        Command::Ids {
            path,
            section,
            doc_id,
            doc_version,
        } => {
            println!("{}", build_cuid_now(&path, &section));
            println!("{}", build_version_id(&doc_id, &doc_version, &section));
        }
        Command::Encode { value } => {
            println!("{}", try_encode_base96(value)?);
        }
        Command::Decode { value } => {
            println!("{}", decode_base96(&value)?);
        }
        Command::Batch {
            input,
            output,
            state,
        } => {
            let tracker = config.tracker();
            if let Some(state) = &state {
                batch::load_state(&tracker, state)?;
            }

            let entries = batch::load_entries(&input)?;
            let records = batch::process(&fingerprinter, &tracker, &entries)?;

            match &output {
                Some(path) => {
                    save_records(path, &records)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} records to {}", records.len(), path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }

            if let Some(state) = &state {
                batch::save_state(&tracker, state)?;
                let stats = tracker.stats();
                info!(
                    "Saved tracker state ({} fingerprints, {} lineage links)",
                    stats.fingerprints, stats.lineage_links
                );
            }
        }
    }

    Ok(())
}

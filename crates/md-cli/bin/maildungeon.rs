//! Mail dungeon generator
//!
//! Reads a JSON list of mail threads, lays out the dungeon and writes the
//! block dump for a map writer.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use md_core::dungeon::DungeonLayout;
use md_core::emit::emit;
use md_core::mail::{Thread, normalize};
use md_core::{GeneratorConfig, build_layout, truncate_to_fit};
use md_export::{load_config, load_threads, write_emission, write_stream};

/// Turn mail threads into a dungeon
#[derive(Parser, Debug)]
#[command(name = "maildungeon")]
#[command(author, version, about = "Generate a dungeon from mail threads", long_about = None)]
struct Args {
    /// Thread list (JSON, optionally .gz)
    #[arg(short = 't', long = "threads")]
    threads: PathBuf,

    /// Output dump; a .gz suffix compresses it
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Generator config (JSON); defaults are used when omitted
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Keep only the first N messages of every thread
    #[arg(long = "message-cap")]
    message_cap: Option<usize>,

    /// Override the world extent from the config
    #[arg(long = "max-world-extent")]
    max_world_extent: Option<i32>,

    /// Drop the oldest threads when the dungeon does not fit
    #[arg(long = "truncate")]
    truncate: bool,

    /// Fail when any thread is invalid instead of skipping it
    #[arg(long = "strict")]
    strict: bool,

    /// Write JSON Lines, one record per room, instead of a single document
    #[arg(long = "stream")]
    stream: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "maildungeon=debug,md_core=debug,md_export=debug"
    } else {
        "maildungeon=info,md_core=info,md_export=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.message_cap.is_some() {
        config.message_cap = args.message_cap;
    }
    if let Some(extent) = args.max_world_extent {
        config.max_world_extent = extent;
    }
    config.validate().context("invalid generator config")?;

    let raw = load_threads(&args.threads)
        .with_context(|| format!("loading threads from {}", args.threads.display()))?;
    let normalized = normalize(&raw, config.message_cap);
    for dropped in &normalized.dropped {
        warn!(index = dropped.index, reason = %dropped.reason, "skipped thread");
    }
    if args.strict && normalized.dropped_count() > 0 {
        let first = normalized.into_strict().err();
        bail!(
            "input has invalid threads{}",
            first.map(|e| format!(": {e}")).unwrap_or_default()
        );
    }

    let layout = layout_with_recovery(normalized.threads, &config, args.truncate)?;
    info!(
        branches = layout.branch_count(),
        rooms = layout.room_count(),
        spine_length = layout.spine.length(),
        "layout ready"
    );

    let blocks = if args.stream {
        write_stream(&layout, &args.out)?
    } else {
        let emission = emit(&layout)?;
        write_emission(&emission, &args.out)?;
        emission.block_count()
    };
    info!(path = %args.out.display(), blocks, "done");
    Ok(())
}

fn layout_with_recovery(
    threads: Vec<Thread>,
    config: &GeneratorConfig,
    truncate: bool,
) -> anyhow::Result<DungeonLayout> {
    match build_layout(&threads, config) {
        Ok(layout) => Ok(layout),
        Err(err) if truncate && err.is_recoverable() => {
            warn!(%err, "layout does not fit, dropping the oldest threads");
            let truncation = truncate_to_fit(threads, config);
            for id in &truncation.excluded {
                info!(thread = %id, "left out");
            }
            Ok(build_layout(&truncation.kept, config)?)
        }
        Err(err) if err.is_recoverable() => Err(anyhow::Error::new(err)
            .context("rerun with --truncate to keep only the threads that fit")),
        Err(err) => Err(err.into()),
    }
}

//! Apportionment pipeline.
//!
//! Loads block groups and resolved locations, splits every location's
//! segment across the block groups it crosses, and writes the distance and
//! error tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blockmiles::config::Config;
use blockmiles::io::{load_block_groups, read_locations, write_distances, write_errors};
use blockmiles::{Apportioner, BlockGroupCatalog, DistanceTable};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "apportion")]
#[command(about = "Apportion location segments across block groups")]
struct Args {
    /// Resolved locations table
    #[arg(short, long)]
    locations: PathBuf,

    /// Block-group boundary table (id, WKT boundary)
    #[arg(short, long)]
    blockgroups: PathBuf,

    /// Output distance table
    #[arg(long, default_value = "distances.csv")]
    distances: PathBuf,

    /// Output error table
    #[arg(long, default_value = "errors.csv")]
    errors: PathBuf,

    /// TOML config with tolerance overrides (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads; overrides [run] threads from the config
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Loading config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(threads) = args.threads.or(config.run.threads) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to build thread pool")?;
        info!("Using {} worker thread(s)", threads);
    }

    info!("Blockmiles apportionment");
    let catalog = BlockGroupCatalog::new(load_block_groups(&args.blockgroups)?);
    if catalog.is_empty() {
        anyhow::bail!("No block groups loaded from {}", args.blockgroups.display());
    }
    let locations = read_locations(&args.locations)?;

    let apportioner = Apportioner::new(&catalog, config.apportion);

    let pb = ProgressBar::new(locations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    // Catalog is read-only here; results come back in input order.
    let outcomes: Vec<_> = locations
        .par_iter()
        .map(|location| {
            let outcome = apportioner.apportion(location);
            pb.inc(1);
            outcome
        })
        .collect();
    pb.finish_and_clear();

    let mut table = DistanceTable::new();
    for (location, outcome) in locations.iter().zip(outcomes) {
        table.record(location, outcome);
    }
    table.log_summary();

    let (distances, errors) = table.into_parts();
    write_distances(&args.distances, &distances)?;
    write_errors(&args.errors, &errors)?;

    Ok(())
}

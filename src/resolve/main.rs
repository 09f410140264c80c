//! Endpoint resolver.
//!
//! Reads geocoded locations, matches each endpoint coordinate to the block
//! group containing it, and writes the locations table back out with
//! `from_blockgroup` / `to_blockgroup` filled in.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blockmiles::catalog::BlockGroupCatalog;
use blockmiles::config::Config;
use blockmiles::endpoints::{has_empty_coordinates, resolve_rows};
use blockmiles::io::{load_block_groups, read_location_rows, write_location_rows};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve location endpoints to block groups")]
struct Args {
    /// Locations table with from_lat_long / to_lat_long columns
    #[arg(short, long)]
    locations: PathBuf,

    /// Block-group boundary table (id, WKT boundary)
    #[arg(short, long)]
    blockgroups: PathBuf,

    /// Where to write the resolved locations table
    #[arg(short, long)]
    output: PathBuf,

    /// TOML config; only [run] applies here (optional)
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
    }

    info!("Blockmiles endpoint resolver");
    let catalog = BlockGroupCatalog::new(load_block_groups(&args.blockgroups)?);
    if catalog.is_empty() {
        anyhow::bail!("No block groups loaded from {}", args.blockgroups.display());
    }

    let mut rows = read_location_rows(&args.locations)?;
    let before = rows.len();
    rows.retain(|row| !has_empty_coordinates(row));
    if rows.len() < before {
        info!("Dropped {} row(s) with empty coordinates", before - rows.len());
    }

    resolve_rows(&catalog, &mut rows);
    write_location_rows(&args.output, &rows)?;

    Ok(())
}

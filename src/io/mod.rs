//! Table I/O: block-group boundaries in, locations in and out, results out.

pub mod blockgroups;
pub mod latlong;
pub mod locations;
pub mod output;
pub mod wkt;

pub use blockgroups::load_block_groups;
pub use latlong::parse_lat_long;
pub use locations::{read_location_rows, read_locations, write_location_rows, LocationRow};
pub use output::{write_distances, write_errors};
pub use wkt::parse_multipolygon;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Open an input table, transparently decompressing `.gz` files
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

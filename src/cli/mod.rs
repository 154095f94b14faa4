//! Command-line interface for eva-commons.
//!
//! Queries a dataset exported from the variant database. Available commands:
//!
//! - **region**: Variants overlapping regions, with frequency/effect filters
//! - **beacon**: Variants starting and ending within coordinate ranges
//! - **boundaries**: Lowest/highest reported coordinate of studies on a chromosome
//! - **count**: Total number of stored variants
//! - **annotations**: Available annotation versions
//!
//! ## Usage
//!
//! ```text
//! # Variants overlapping a region, annotated with the default version
//! eva-commons region 11:190062-190064 --data variants.json
//!
//! # Beacon lookup: allele A>T starting and ending at 9:10099
//! eva-commons beacon --start-range 9:10099 --reference A --alternate T --data variants.json
//!
//! # Chromosome boundaries for two studies, as JSON
//! eva-commons boundaries 11 --study PRJEB8661 --study PRJEB6930 --data variants.json --format json
//!
//! # Show the query sent to the store
//! eva-commons region 11:190000-191000 --polyphen '>0.5' --explain --data variants.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::StoreConfig;
use crate::core::types::Pageable;
use crate::filter::predicate::Predicate;
use crate::store::memory::InMemoryStore;

pub mod beacon;
pub mod region;
pub mod summary;

#[derive(Parser)]
#[command(name = "eva-commons")]
#[command(version)]
#[command(about = "Query a genomic variant database by region, study and filters")]
#[command(
    long_about = "eva-commons runs region, beacon and boundary queries against a dataset exported from the variant database.\n\nFilters are composed into a single store query:\n- Regions match variants that overlap them\n- Start/end ranges match variants starting and ending within them\n- Studies match variants belonging to any of the listed studies"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find variants overlapping one or more regions
    Region(region::RegionArgs),

    /// Find variants by start range, end range and alleles
    Beacon(beacon::BeaconArgs),

    /// Report the lowest and highest coordinate of studies on a chromosome
    Boundaries(summary::BoundariesArgs),

    /// Count stored variants
    Count(summary::CountArgs),

    /// List annotation versions
    Annotations(summary::AnnotationsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Where the data comes from
#[derive(clap::Args)]
pub struct StoreArgs {
    /// Dataset file exported from the variant database (JSON, optionally .gz)
    #[arg(short, long, required = true)]
    pub data: PathBuf,

    /// Store configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Load the configuration and the dataset it describes
    pub fn open(&self) -> anyhow::Result<(StoreConfig, InMemoryStore)> {
        let config = match &self.config {
            Some(path) => StoreConfig::load_from_file(path)?,
            None => StoreConfig::default(),
        };
        let store = InMemoryStore::load_from_file(&self.data, &config)?;
        info!(
            path = %self.data.display(),
            variants = store.len(),
            "opened dataset"
        );
        Ok((config, store))
    }
}

/// Paging options shared by listing commands
#[derive(clap::Args)]
pub struct PageArgs {
    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Page size (defaults to the configured page size)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: Option<u32>,
}

impl PageArgs {
    pub fn pageable(&self, config: &StoreConfig) -> Pageable {
        let size = self
            .size
            .map_or(config.default_page_size, |s| usize::try_from(s).unwrap_or(usize::MAX));
        Pageable::new(self.page, size)
    }
}

/// Print the store query for `--explain`
pub(crate) fn print_explain(predicate: &Predicate) -> anyhow::Result<()> {
    eprintln!(
        "Query: {}",
        serde_json::to_string_pretty(&predicate.to_document())?
    );
    Ok(())
}

//! # eva-commons
//!
//! Data access for a genomic variant database.
//!
//! Variants, their annotations and the files they were imported from live in a
//! document store. This crate turns caller requests (genomic regions, start/end
//! ranges, study lists, allele/type/score filters) into a single store query
//! with well-defined boundary semantics, runs it through a minimal storage
//! trait, and joins the results with annotations and sample names.
//!
//! ## Features
//!
//! - **Region overlap**: variants whose interval intersects any requested region
//! - **Beacon ranges**: variants starting within one range and ending within another
//! - **Composable filters**: reference/alternate allele, type, studies, files,
//!   allele frequency, SIFT/PolyPhen scores and consequence types
//! - **Chromosome boundaries**: lowest/highest reported coordinate of a set of studies
//! - **Annotation selection**: explicit, default or newest annotation version
//!
//! ## Example
//!
//! ```rust,no_run
//! use eva_commons::{InMemoryStore, Pageable, Region, StoreConfig, VariantService};
//! use eva_commons::filter::builder::FilterBuilder;
//! use std::path::Path;
//!
//! let config = StoreConfig::default();
//! let store = InMemoryStore::load_from_file(Path::new("variants.json"), &config).unwrap();
//! let service = VariantService::new(&store, &config);
//!
//! let range = Region::new("11", 190238, 190276).unwrap();
//! let filters = FilterBuilder::beacon_filters(Some("A"), Some("T"), None, None::<&[&str]>).unwrap();
//! let found = service
//!     .find_by_region_and_other_beacon_filters(&range, &range, &filters, Pageable::new(0, 100))
//!     .unwrap();
//!
//! for variant in found {
//!     println!("{}", variant.id);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Regions, variants, annotations, files, publications and studies
//! - [`filter`]: Filter construction and query composition
//! - [`store`]: Storage trait and in-memory implementation
//! - [`services`]: Variant and annotation metadata services
//! - [`config`]: Store configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod filter;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use config::StoreConfig;
pub use core::region::Region;
pub use core::types::*;
pub use filter::builder::{FilterBuilder, VariantRepositoryFilter};
pub use services::variant::VariantService;
pub use services::ServiceError;
pub use store::memory::InMemoryStore;
pub use store::VariantStore;

//! Query services over a [`VariantStore`](crate::store::VariantStore).
//!
//! - [`variant::VariantService`]: region, id and beacon queries, chromosome
//!   boundaries and counters
//! - [`annotation_metadata::AnnotationMetadataService`]: lookup and selection of
//!   the annotation version joined into results
//!
//! Services borrow the store and configuration and hold no other state, so one
//! store can serve any number of concurrent callers.

use thiserror::Error;

use crate::core::region::RegionError;
use crate::filter::builder::FilterError;
use crate::store::StoreError;

pub mod annotation_metadata;
pub mod variant;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidRegion(#[from] RegionError),

    #[error(transparent)]
    FilterConstruction(#[from] FilterError),

    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),

    #[error("Annotation metadata not found: {0}")]
    AnnotationMetadataNotFound(String),
}

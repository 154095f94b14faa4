//! Storage collaborator used by the services.
//!
//! The document store is external to this crate. [`VariantStore`] is the
//! minimal surface the services need from it: run a composed query one page at
//! a time, count matches, aggregate coordinate boundaries, and fetch the
//! annotation, annotation-metadata and file documents joined into results.
//!
//! [`memory::InMemoryStore`] implements the trait over a dataset loaded from a
//! JSON export, and is what the CLI and tests use.

use thiserror::Error;

use crate::core::annotation::{Annotation, AnnotationMetadata};
use crate::core::source::VariantSource;
use crate::core::types::{Page, Pageable};
use crate::core::variant::VariantDocument;
use crate::filter::predicate::{Field, Predicate};
use crate::filter::query::VariantQuery;

pub mod memory;

/// Failures of the storage collaborator (StorageUnavailable)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset has no '{0}' collection")]
    MissingCollection(String),
}

/// Read-only access to the variant database.
///
/// Implementations must be shareable between threads; every call is an
/// independent request and no ordering between calls is implied.
pub trait VariantStore: Send + Sync {
    /// Run `query`, returning the requested page and the total number of matches
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn execute(
        &self,
        query: &VariantQuery,
        pageable: Pageable,
    ) -> Result<Page<VariantDocument>, StoreError>;

    /// Number of variants matching `predicate`
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Lowest and highest value of a coordinate `field` among matching variants,
    /// or `None` when nothing matches
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn aggregate_min_max(
        &self,
        field: Field,
        predicate: &Predicate,
    ) -> Result<Option<(u64, u64)>, StoreError>;

    /// Annotations with the given ids; unknown ids are skipped
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn find_annotations(&self, ids: &[String]) -> Result<Vec<Annotation>, StoreError>;

    /// Every annotation metadata entry, in storage order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn find_annotation_metadata(&self) -> Result<Vec<AnnotationMetadata>, StoreError>;

    /// Files with the given ids; unknown ids are skipped
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be reached.
    fn find_sources(&self, file_ids: &[String]) -> Result<Vec<VariantSource>, StoreError>;
}

//! In-memory [`VariantStore`] over a dataset exported from the document store.
//!
//! A dataset is a JSON object with one array per collection, keyed by the
//! collection names of the [`StoreConfig`]. Gzip-compressed files (`.gz`) are
//! decompressed transparently.
//!
//! Predicates are evaluated with document-store semantics: a condition on a
//! multi-valued field (study ids, statistics, annotation scores) holds if any
//! element satisfies it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::StoreConfig;
use crate::core::annotation::{Annotation, AnnotationMetadata};
use crate::core::source::VariantSource;
use crate::core::types::{Page, Pageable};
use crate::core::variant::VariantDocument;
use crate::filter::predicate::{Field, Predicate, Value};
use crate::filter::query::{ExcludedField, SortDirection, VariantQuery};

use super::{StoreError, VariantStore};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    variants: Vec<VariantDocument>,
    annotations: HashMap<String, Annotation>,
    annotation_metadata: Vec<AnnotationMetadata>,
    sources: Vec<VariantSource>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset file, gzip-compressed if its name ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read, `StoreError::Parse` if
    /// it is not a valid dataset, or `StoreError::MissingCollection` if it has no
    /// variants collection.
    pub fn load_from_file(path: &Path, config: &StoreConfig) -> Result<Self, StoreError> {
        let file = std::fs::File::open(path)?;
        let mut content = String::new();
        if is_gzipped(path) {
            BufReader::new(GzDecoder::new(file)).read_to_string(&mut content)?;
        } else {
            BufReader::new(file).read_to_string(&mut content)?;
        }
        Self::from_json(&content, config)
    }

    /// Parse a dataset from JSON text
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` on malformed JSON and
    /// `StoreError::MissingCollection` if the variants collection is absent.
    pub fn from_json(json: &str, config: &StoreConfig) -> Result<Self, StoreError> {
        let mut dataset: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let variants: Vec<VariantDocument> = dataset
            .remove(&config.variants_collection)
            .map(serde_json::from_value)
            .transpose()?
            .ok_or_else(|| StoreError::MissingCollection(config.variants_collection.clone()))?;

        let mut store = Self {
            variants,
            annotation_metadata: optional_collection(
                &mut dataset,
                &config.annotation_metadata_collection,
            )?,
            sources: optional_collection(&mut dataset, &config.files_collection)?,
            ..Self::default()
        };
        let annotations: Vec<Annotation> =
            optional_collection(&mut dataset, &config.annotations_collection)?;
        for annotation in annotations {
            store.add_annotation(annotation);
        }

        debug!(
            variants = store.variants.len(),
            annotations = store.annotations.len(),
            files = store.sources.len(),
            "loaded dataset"
        );
        Ok(store)
    }

    pub fn add_variant(&mut self, variant: VariantDocument) {
        self.variants.push(variant);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.insert(annotation.id.clone(), annotation);
    }

    pub fn add_annotation_metadata(&mut self, metadata: AnnotationMetadata) {
        self.annotation_metadata.push(metadata);
    }

    pub fn add_source(&mut self, source: VariantSource) {
        self.sources.push(source);
    }

    /// Number of stored variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a VariantDocument> + 'a {
        self.variants.iter().filter(move |v| matches(predicate, v))
    }
}

fn optional_collection<T: DeserializeOwned>(
    dataset: &mut HashMap<String, serde_json::Value>,
    name: &str,
) -> Result<Vec<T>, StoreError> {
    match dataset.remove(name) {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Every value `field` takes on `variant`
#[must_use]
pub fn field_values(variant: &VariantDocument, field: Field) -> Vec<Value> {
    match field {
        Field::Id => vec![Value::text(variant.id.as_str())],
        Field::Ids => variant.ids.iter().map(|id| Value::text(id.as_str())).collect(),
        Field::Chromosome => vec![Value::text(variant.chromosome.as_str())],
        Field::Start => vec![Value::Integer(variant.start)],
        Field::End => vec![Value::Integer(variant.end)],
        Field::Reference => vec![Value::text(variant.reference.as_str())],
        Field::Alternate => vec![Value::text(variant.alternate.as_str())],
        Field::Type => vec![Value::text(variant.variant_type.as_str())],
        Field::StudyId => variant
            .source_entries
            .iter()
            .map(|e| Value::text(e.study_id.as_str()))
            .collect(),
        Field::FileId => variant
            .source_entries
            .iter()
            .map(|e| Value::text(e.file_id.as_str()))
            .collect(),
        Field::Maf => variant.stats.iter().map(|s| Value::Number(s.maf)).collect(),
        Field::Sift => variant
            .annotation_index
            .iter()
            .flat_map(|a| a.sift.iter().map(|&x| Value::Number(x)))
            .collect(),
        Field::Polyphen => variant
            .annotation_index
            .iter()
            .flat_map(|a| a.polyphen.iter().map(|&x| Value::Number(x)))
            .collect(),
        Field::ConsequenceType => variant
            .annotation_index
            .iter()
            .flat_map(|a| a.so_accessions.iter().map(|&so| Value::Integer(u64::from(so))))
            .collect(),
    }
}

/// Evaluate `predicate` against one variant
#[must_use]
pub fn matches(predicate: &Predicate, variant: &VariantDocument) -> bool {
    match predicate {
        Predicate::All => true,
        Predicate::Nothing => false,
        Predicate::Condition { field, condition } => field_values(variant, *field)
            .iter()
            .any(|value| condition.accepts(value)),
        Predicate::And(terms) => terms.iter().all(|t| matches(t, variant)),
        Predicate::Or(terms) => terms.iter().any(|t| matches(t, variant)),
    }
}

fn compare_by(sort: &[(Field, SortDirection)], a: &VariantDocument, b: &VariantDocument) -> Ordering {
    for &(field, direction) in sort {
        let left = field_values(a, field);
        let right = field_values(b, field);
        let ordering = left
            .first()
            .partial_cmp(&right.first())
            .unwrap_or(Ordering::Equal);
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Copy of `variant` without the excluded parts
fn project(variant: &VariantDocument, exclude: &[ExcludedField]) -> VariantDocument {
    let mut projected = variant.clone();
    for field in exclude {
        match field {
            ExcludedField::SourceEntries => projected.source_entries.clear(),
            ExcludedField::SamplesData => {
                for entry in &mut projected.source_entries {
                    entry.samples = None;
                }
            }
            ExcludedField::CohortStats => projected.stats.clear(),
            ExcludedField::Annotation => projected.annotation_index.clear(),
        }
    }
    projected
}

impl VariantStore for InMemoryStore {
    fn execute(
        &self,
        query: &VariantQuery,
        pageable: Pageable,
    ) -> Result<Page<VariantDocument>, StoreError> {
        let mut matched: Vec<&VariantDocument> = self.matching(&query.predicate).collect();
        matched.sort_by(|a, b| compare_by(&query.sort, a, b));

        let total = matched.len() as u64;
        let items: Vec<VariantDocument> = matched
            .into_iter()
            .skip(pageable.offset())
            .take(pageable.size)
            .map(|v| project(v, &query.exclude))
            .collect();

        debug!(
            total,
            returned = items.len(),
            page = pageable.page,
            "executed variant query"
        );
        Ok(Page { items, total })
    }

    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        Ok(self.matching(predicate).count() as u64)
    }

    fn aggregate_min_max(
        &self,
        field: Field,
        predicate: &Predicate,
    ) -> Result<Option<(u64, u64)>, StoreError> {
        let bounds = self
            .matching(predicate)
            .flat_map(|v| field_values(v, field))
            .filter_map(|value| match value {
                Value::Integer(n) => Some(n),
                _ => None,
            })
            .fold(None, |bounds: Option<(u64, u64)>, n| match bounds {
                None => Some((n, n)),
                Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
            });
        Ok(bounds)
    }

    fn find_annotations(&self, ids: &[String]) -> Result<Vec<Annotation>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.annotations.get(id))
            .cloned()
            .collect())
    }

    fn find_annotation_metadata(&self) -> Result<Vec<AnnotationMetadata>, StoreError> {
        Ok(self.annotation_metadata.clone())
    }

    fn find_sources(&self, file_ids: &[String]) -> Result<Vec<VariantSource>, StoreError> {
        Ok(self
            .sources
            .iter()
            .filter(|s| file_ids.contains(&s.file_id))
            .cloned()
            .collect())
    }
}

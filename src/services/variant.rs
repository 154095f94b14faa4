use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::core::annotation::{Annotation, AnnotationMetadata};
use crate::core::enriched::{SampleData, VariantSourceEntryWithSampleNames, VariantWithSamplesAndAnnotation};
use crate::core::region::Region;
use crate::core::source::VariantSource;
use crate::core::types::Pageable;
use crate::core::variant::{CompressedSamples, SourceEntry, VariantDocument};
use crate::filter::builder::VariantRepositoryFilter;
use crate::filter::compose::{
    chromosome_studies_predicate, ids_predicate, ranges_predicate, regions_predicate, with_filters,
};
use crate::filter::predicate::{Field, Predicate};
use crate::filter::query::{ExcludedField, VariantQuery};
use crate::services::annotation_metadata::AnnotationMetadataService;
use crate::services::ServiceError;
use crate::store::VariantStore;

/// FORMAT key under which decoded genotypes are reported
pub const GENOTYPE_KEY: &str = "GT";

/// Genotype reported for a sample absent from the compressed data when no default exists
pub const MISSING_GENOTYPE: &str = ".";

/// Queries over the variants collection.
///
/// Region and id queries return [`VariantWithSamplesAndAnnotation`]s, with
/// genotypes decoded to sample names and one annotation version joined in;
/// beacon queries return the stored documents.
pub struct VariantService<'a, S: VariantStore + ?Sized> {
    store: &'a S,
    config: &'a StoreConfig,
}

impl<'a, S: VariantStore + ?Sized> VariantService<'a, S> {
    pub fn new(store: &'a S, config: &'a StoreConfig) -> Self {
        Self { store, config }
    }

    /// Variants overlapping any of `regions` and passing every filter.
    ///
    /// `annotation_metadata` selects the annotation version to join; without it
    /// the default version is used.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AnnotationMetadataNotFound` if no annotation version
    /// can be selected (unless annotations are excluded), or
    /// `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_by_regions_and_complex_filters(
        &self,
        regions: &[Region],
        filters: &[VariantRepositoryFilter],
        annotation_metadata: Option<&AnnotationMetadata>,
        exclude: &[ExcludedField],
        pageable: Pageable,
    ) -> Result<Vec<VariantWithSamplesAndAnnotation>, ServiceError> {
        let predicate = with_filters(regions_predicate(regions), filters);
        self.find_enriched(predicate, annotation_metadata, exclude, pageable)
    }

    /// Variants whose id or external id (e.g. an rs id) is in `ids`, passing every filter
    ///
    /// # Errors
    ///
    /// Same as [`Self::find_by_regions_and_complex_filters`].
    pub fn find_by_ids_and_complex_filters(
        &self,
        ids: &[String],
        filters: &[VariantRepositoryFilter],
        annotation_metadata: Option<&AnnotationMetadata>,
        exclude: &[ExcludedField],
        pageable: Pageable,
    ) -> Result<Vec<VariantWithSamplesAndAnnotation>, ServiceError> {
        let predicate = with_filters(ids_predicate(ids), filters);
        self.find_enriched(predicate, annotation_metadata, exclude, pageable)
    }

    /// Number of variants overlapping any of `regions` and passing every filter
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn count_by_regions_and_complex_filters(
        &self,
        regions: &[Region],
        filters: &[VariantRepositoryFilter],
    ) -> Result<u64, ServiceError> {
        let predicate = with_filters(regions_predicate(regions), filters);
        Ok(self.store.count(&predicate)?)
    }

    /// Variants starting within `start_range` and ending within `end_range`, passing every filter
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidRegion` if the ranges are on different
    /// chromosomes, or `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_by_region_and_other_beacon_filters(
        &self,
        start_range: &Region,
        end_range: &Region,
        filters: &[VariantRepositoryFilter],
        pageable: Pageable,
    ) -> Result<Vec<VariantDocument>, ServiceError> {
        let predicate = with_filters(ranges_predicate(start_range, end_range)?, filters);
        let page = self.store.execute(&VariantQuery::new(predicate), pageable)?;
        Ok(page.items)
    }

    /// Lowest start coordinate on `chromosome` among variants of any of `studies`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_chromosome_lowest_reported_coordinate<T: AsRef<str>>(
        &self,
        chromosome: &str,
        studies: &[T],
    ) -> Result<Option<u64>, ServiceError> {
        Ok(self
            .find_chromosome_boundaries(chromosome, studies)?
            .map(|(lowest, _)| lowest))
    }

    /// Highest start coordinate on `chromosome` among variants of any of `studies`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_chromosome_highest_reported_coordinate<T: AsRef<str>>(
        &self,
        chromosome: &str,
        studies: &[T],
    ) -> Result<Option<u64>, ServiceError> {
        Ok(self
            .find_chromosome_boundaries(chromosome, studies)?
            .map(|(_, highest)| highest))
    }

    /// Lowest and highest start coordinate, or `None` when no variant of the studies is on the chromosome
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_chromosome_boundaries<T: AsRef<str>>(
        &self,
        chromosome: &str,
        studies: &[T],
    ) -> Result<Option<(u64, u64)>, ServiceError> {
        let predicate =
            chromosome_studies_predicate(chromosome, studies, self.config.empty_study_list);
        let bounds = self.store.aggregate_min_max(Field::Start, &predicate)?;
        debug!(chromosome, studies = studies.len(), ?bounds, "chromosome boundaries");
        Ok(bounds)
    }

    /// Number of stored variants, regardless of any filter
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn count_total_number_of_variants(&self) -> Result<u64, ServiceError> {
        Ok(self.store.count(&Predicate::All)?)
    }

    fn find_enriched(
        &self,
        predicate: Predicate,
        annotation_metadata: Option<&AnnotationMetadata>,
        exclude: &[ExcludedField],
        pageable: Pageable,
    ) -> Result<Vec<VariantWithSamplesAndAnnotation>, ServiceError> {
        let with_annotation = !exclude.contains(&ExcludedField::Annotation);
        let metadata = if with_annotation {
            Some(AnnotationMetadataService::new(self.store).resolve(annotation_metadata)?)
        } else {
            None
        };

        let query = VariantQuery::new(predicate).with_exclusions(exclude);
        let variants = self.store.execute(&query, pageable)?.items;

        let annotations = match &metadata {
            Some(metadata) => self.annotations_for(&variants, metadata)?,
            None => HashMap::new(),
        };
        let sources = self.sources_for(&variants)?;

        Ok(variants
            .iter()
            .map(|variant| {
                let mut enriched = VariantWithSamplesAndAnnotation::from_document(variant);
                enriched.source_entries = variant
                    .source_entries
                    .iter()
                    .map(|entry| self.enrich_entry(variant, entry, &sources))
                    .collect();
                enriched.annotation = metadata
                    .as_ref()
                    .and_then(|m| annotations.get(&Annotation::build_id(&variant.id, m)))
                    .cloned();
                enriched
            })
            .collect())
    }

    fn annotations_for(
        &self,
        variants: &[VariantDocument],
        metadata: &AnnotationMetadata,
    ) -> Result<HashMap<String, Annotation>, ServiceError> {
        let ids: Vec<String> = variants
            .iter()
            .map(|v| Annotation::build_id(&v.id, metadata))
            .collect();
        Ok(self
            .store
            .find_annotations(&ids)?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect())
    }

    /// Files holding genotypes for any of `variants`, keyed by (study id, file id)
    fn sources_for(
        &self,
        variants: &[VariantDocument],
    ) -> Result<HashMap<(String, String), VariantSource>, ServiceError> {
        let mut seen = HashSet::new();
        let file_ids: Vec<String> = variants
            .iter()
            .flat_map(|v| &v.source_entries)
            .filter(|e| e.samples.as_ref().is_some_and(|s| !s.is_empty()))
            .map(|e| e.file_id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect();
        if file_ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self
            .store
            .find_sources(&file_ids)?
            .into_iter()
            .map(|s| ((s.study_id.clone(), s.file_id.clone()), s))
            .collect())
    }

    fn enrich_entry(
        &self,
        variant: &VariantDocument,
        entry: &SourceEntry,
        sources: &HashMap<(String, String), VariantSource>,
    ) -> VariantSourceEntryWithSampleNames {
        let cohort_stats = variant
            .stats_for(&entry.study_id, &entry.file_id)
            .map(|s| (self.config.unescape_key(&s.cohort_id), s.clone()))
            .collect();
        let attributes = entry
            .attributes
            .iter()
            .map(|(k, v)| (self.config.unescape_key(k), v.clone()))
            .collect();

        let samples_data = match &entry.samples {
            Some(samples) if !samples.is_empty() => {
                match sources.get(&(entry.study_id.clone(), entry.file_id.clone())) {
                    Some(source) => self.decode_samples(samples, source),
                    None => {
                        warn!(
                            variant = %variant.id,
                            file = %entry.file_id,
                            "no file metadata for source entry, sample names unavailable"
                        );
                        BTreeMap::new()
                    }
                }
            }
            _ => BTreeMap::new(),
        };

        VariantSourceEntryWithSampleNames {
            file_id: entry.file_id.clone(),
            study_id: entry.study_id.clone(),
            secondary_alternates: entry.secondary_alternates.clone(),
            attributes,
            format: entry.format.clone(),
            cohort_stats,
            samples_data,
        }
    }

    /// Expand compressed genotypes into one entry per sample of the file
    fn decode_samples(
        &self,
        samples: &CompressedSamples,
        source: &VariantSource,
    ) -> BTreeMap<String, SampleData> {
        source
            .samples_position
            .iter()
            .map(|(name, &position)| {
                let genotype = samples.genotype_at(position).unwrap_or(MISSING_GENOTYPE);
                let data = SampleData::from([(GENOTYPE_KEY.to_string(), genotype.to_string())]);
                (self.config.unescape_key(name), data)
            })
            .collect()
    }
}

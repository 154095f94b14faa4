use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::annotation::Annotation;
use crate::core::types::VariantType;
use crate::core::variant::{VariantDocument, VariantStats};

/// Genotype data of one sample, keyed by FORMAT field (e.g. `GT`)
pub type SampleData = BTreeMap<String, String>;

/// A source entry with genotypes resolved to sample names and statistics grouped by cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSourceEntryWithSampleNames {
    pub file_id: String,
    pub study_id: String,
    pub secondary_alternates: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub format: Option<String>,
    pub cohort_stats: BTreeMap<String, VariantStats>,
    pub samples_data: BTreeMap<String, SampleData>,
}

/// A variant ready to be returned to clients: decoded samples plus one annotation version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantWithSamplesAndAnnotation {
    pub id: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub length: u64,
    pub reference: String,
    pub alternate: String,
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    pub ids: Vec<String>,
    pub source_entries: Vec<VariantSourceEntryWithSampleNames>,
    pub annotation: Option<Annotation>,
}

impl VariantWithSamplesAndAnnotation {
    /// Copy the positional fields of `variant`; entries and annotation are filled in by the caller
    pub fn from_document(variant: &VariantDocument) -> Self {
        Self {
            id: variant.id.clone(),
            chromosome: variant.chromosome.clone(),
            start: variant.start,
            end: variant.end,
            length: variant.length,
            reference: variant.reference.clone(),
            alternate: variant.alternate.clone(),
            variant_type: variant.variant_type,
            ids: variant.ids.clone(),
            source_entries: Vec::new(),
            annotation: None,
        }
    }

    pub fn source_entry(&self, file_id: &str) -> Option<&VariantSourceEntryWithSampleNames> {
        self.source_entries.iter().find(|e| e.file_id == file_id)
    }
}

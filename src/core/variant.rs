use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::VariantType;

/// A variant as stored in the variants collection.
///
/// Field names follow the stored document layout so that datasets exported from
/// the document store deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDocument {
    /// `{chromosome}_{start}_{reference}_{alternate}`
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "chr")]
    pub chromosome: String,

    pub start: u64,

    pub end: u64,

    #[serde(rename = "len", default)]
    pub length: u64,

    #[serde(rename = "ref", default)]
    pub reference: String,

    #[serde(rename = "alt", default)]
    pub alternate: String,

    #[serde(rename = "type")]
    pub variant_type: VariantType,

    /// External identifiers such as dbSNP rs ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,

    #[serde(rename = "files", default, skip_serializing_if = "Vec::is_empty")]
    pub source_entries: Vec<SourceEntry>,

    #[serde(rename = "st", default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<VariantStats>,

    #[serde(rename = "annot", default, skip_serializing_if = "Vec::is_empty")]
    pub annotation_index: Vec<AnnotationIndex>,
}

impl VariantDocument {
    /// Build the canonical id used as the document key
    #[must_use]
    pub fn build_id(chromosome: &str, start: u64, reference: &str, alternate: &str) -> String {
        format!("{chromosome}_{start}_{reference}_{alternate}")
    }

    /// Study ids of every source entry, in storage order
    pub fn study_ids(&self) -> impl Iterator<Item = &str> {
        self.source_entries.iter().map(|e| e.study_id.as_str())
    }

    /// Statistics recorded for one file of one study
    pub fn stats_for<'a>(
        &'a self,
        study_id: &'a str,
        file_id: &'a str,
    ) -> impl Iterator<Item = &'a VariantStats> + 'a {
        self.stats
            .iter()
            .filter(move |s| s.study_id == study_id && s.file_id == file_id)
    }
}

/// One file's view of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    #[serde(rename = "fid")]
    pub file_id: String,

    #[serde(rename = "sid")]
    pub study_id: String,

    /// Secondary alternate alleles at the same site
    #[serde(rename = "alts", default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_alternates: Vec<String>,

    /// INFO attributes; keys are stored with dots escaped
    #[serde(rename = "attrs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(rename = "fm", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "samp", default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<CompressedSamples>,
}

/// Genotypes stored as a default plus the sample positions that differ from it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompressedSamples {
    #[serde(rename = "def", default, skip_serializing_if = "Option::is_none")]
    pub default_genotype: Option<String>,

    #[serde(flatten)]
    pub genotypes: BTreeMap<String, Vec<usize>>,
}

impl CompressedSamples {
    /// Genotype of the sample at `position`, falling back to the default genotype
    #[must_use]
    pub fn genotype_at(&self, position: usize) -> Option<&str> {
        self.genotypes
            .iter()
            .find(|(_, positions)| positions.contains(&position))
            .map(|(genotype, _)| genotype.as_str())
            .or(self.default_genotype.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.default_genotype.is_none() && self.genotypes.is_empty()
    }
}

/// Allele and genotype frequencies for one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    #[serde(rename = "cid")]
    pub cohort_id: String,

    #[serde(rename = "sid")]
    pub study_id: String,

    #[serde(rename = "fid")]
    pub file_id: String,

    pub maf: f64,

    pub mgf: f64,

    #[serde(rename = "mafAl", default, skip_serializing_if = "Option::is_none")]
    pub maf_allele: Option<String>,

    #[serde(rename = "mgfGt", default, skip_serializing_if = "Option::is_none")]
    pub mgf_genotype: Option<String>,

    #[serde(rename = "missAl", default)]
    pub missing_alleles: u32,

    #[serde(rename = "missGt", default)]
    pub missing_genotypes: u32,
}

/// Summary of one annotation version, kept on the variant so it can be filtered on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationIndex {
    #[serde(rename = "vepv")]
    pub vep_version: String,

    #[serde(rename = "cachev")]
    pub cache_version: String,

    /// Sequence Ontology accessions (numeric part of `SO:0001583`)
    #[serde(rename = "so", default, skip_serializing_if = "Vec::is_empty")]
    pub so_accessions: Vec<u32>,

    /// Lowest and highest SIFT score among consequence types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sift: Vec<f64>,

    /// Lowest and highest PolyPhen score among consequence types
    #[serde(rename = "pol", default, skip_serializing_if = "Vec::is_empty")]
    pub polyphen: Vec<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xrefs: Vec<String>,
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Functional annotation of a variant produced by one VEP/cache version pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// `{variant_id}_{vep_version}_{cache_version}`
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "chr")]
    pub chromosome: String,

    pub start: u64,

    pub end: u64,

    #[serde(rename = "vepVersion")]
    pub vep_version: String,

    #[serde(rename = "cacheVersion")]
    pub cache_version: String,

    #[serde(rename = "ct", default, skip_serializing_if = "Vec::is_empty")]
    pub consequence_types: Vec<ConsequenceType>,

    #[serde(rename = "xrefs", default, skip_serializing_if = "Vec::is_empty")]
    pub xrefs: Vec<Xref>,
}

impl Annotation {
    /// Key under which the annotation of `variant_id` is stored for one metadata version
    #[must_use]
    pub fn build_id(variant_id: &str, metadata: &AnnotationMetadata) -> String {
        format!(
            "{variant_id}_{}_{}",
            metadata.vep_version, metadata.cache_version
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceType {
    #[serde(rename = "gn", default, skip_serializing_if = "Option::is_none")]
    pub gene_name: Option<String>,

    #[serde(rename = "ensg", default, skip_serializing_if = "Option::is_none")]
    pub ensembl_gene_id: Option<String>,

    #[serde(rename = "enst", default, skip_serializing_if = "Option::is_none")]
    pub ensembl_transcript_id: Option<String>,

    #[serde(rename = "bt", default, skip_serializing_if = "Option::is_none")]
    pub biotype: Option<String>,

    #[serde(rename = "so", default)]
    pub so_accessions: Vec<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sift: Option<Score>,

    #[serde(rename = "polyphen", default, skip_serializing_if = "Option::is_none")]
    pub polyphen: Option<Score>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "sc")]
    pub score: f64,

    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub id: String,

    #[serde(rename = "src")]
    pub source: String,
}

/// One VEP/cache version pair for which annotations were imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "vepVersion")]
    pub vep_version: String,

    #[serde(rename = "cacheVersion")]
    pub cache_version: String,

    #[serde(rename = "defaultVersion", default)]
    pub default_version: bool,
}

impl AnnotationMetadata {
    pub fn new(vep_version: impl Into<String>, cache_version: impl Into<String>) -> Self {
        Self {
            id: None,
            vep_version: vep_version.into(),
            cache_version: cache_version.into(),
            default_version: false,
        }
    }

    #[must_use]
    pub fn with_default_version(mut self, default_version: bool) -> Self {
        self.default_version = default_version;
        self
    }

    /// Newest first: cache version descending, then VEP version descending
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        compare_versions(&b.cache_version, &a.cache_version)
            .then_with(|| compare_versions(&b.vep_version, &a.vep_version))
    }

    /// Whether this entry describes the same version pair as `other`
    #[must_use]
    pub fn same_version(&self, other: &Self) -> bool {
        self.vep_version == other.vep_version && self.cache_version == other.cache_version
    }
}

impl std::fmt::Display for AnnotationMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VEP {} / cache {}", self.vep_version, self.cache_version)
    }
}

/// Versions compare numerically when both parse, otherwise as text
fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_is_numeric() {
        let mut all = vec![
            AnnotationMetadata::new("78", "78"),
            AnnotationMetadata::new("100", "100"),
            AnnotationMetadata::new("82", "82"),
            AnnotationMetadata::new("83", "82"),
        ];
        all.sort_by(AnnotationMetadata::newest_first);
        let versions: Vec<_> = all
            .iter()
            .map(|m| (m.vep_version.as_str(), m.cache_version.as_str()))
            .collect();
        assert_eq!(
            versions,
            vec![("100", "100"), ("83", "82"), ("82", "82"), ("78", "78")]
        );
    }

    #[test]
    fn test_annotation_id() {
        let metadata = AnnotationMetadata::new("82", "83");
        assert_eq!(
            Annotation::build_id("11_190060_CTGA_C", &metadata),
            "11_190060_CTGA_C_82_83"
        );
    }
}

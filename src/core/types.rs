use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::filter::builder::FilterError;

/// Classification of a variant, stored on each variant document and usable as a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    /// Single nucleotide variant
    Snv,
    /// Single nucleotide polymorphism (SNV with population frequency)
    Snp,
    /// Multi-nucleotide variant
    Mnv,
    /// Multi-nucleotide polymorphism
    Mnp,
    /// Insertion or deletion
    Indel,
    /// Structural variant
    Sv,
    /// Copy number variant
    Cnv,
    /// Reference call, no alternate allele
    NoVariation,
    /// Symbolic allele such as `<DEL>`
    Symbolic,
    /// Mixture of the above at one site
    Mixed,
}

impl VariantType {
    /// Name as stored in the `type` field of variant documents
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snv => "SNV",
            Self::Snp => "SNP",
            Self::Mnv => "MNV",
            Self::Mnp => "MNP",
            Self::Indel => "INDEL",
            Self::Sv => "SV",
            Self::Cnv => "CNV",
            Self::NoVariation => "NO_VARIATION",
            Self::Symbolic => "SYMBOLIC",
            Self::Mixed => "MIXED",
        }
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariantType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "SNV" => Ok(Self::Snv),
            "SNP" => Ok(Self::Snp),
            "MNV" => Ok(Self::Mnv),
            "MNP" => Ok(Self::Mnp),
            "INDEL" => Ok(Self::Indel),
            "SV" => Ok(Self::Sv),
            "CNV" => Ok(Self::Cnv),
            "NO_VARIATION" => Ok(Self::NoVariation),
            "SYMBOLIC" => Ok(Self::Symbolic),
            "MIXED" => Ok(Self::Mixed),
            _ => Err(FilterError::InvalidVariantType(s.to_string())),
        }
    }
}

/// Comparison applied by numeric score filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationalOperator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl RelationalOperator {
    /// MongoDB query operator for this comparison
    #[must_use]
    pub fn mongo_operator(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Gt => "$gt",
            Self::Lt => "$lt",
            Self::Gte => "$gte",
            Self::Lte => "$lte",
        }
    }

    /// Split a threshold such as `">=0.5"` into its operator and the remaining text.
    /// A bare number means equality.
    #[must_use]
    pub fn split_prefix(s: &str) -> (Self, &str) {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(">=") {
            (Self::Gte, rest)
        } else if let Some(rest) = s.strip_prefix("<=") {
            (Self::Lte, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (Self::Gt, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (Self::Lt, rest)
        } else if let Some(rest) = s.strip_prefix('=') {
            (Self::Eq, rest)
        } else {
            (Self::Eq, s)
        }
    }

    pub fn compare<T: PartialOrd>(self, value: &T, threshold: &T) -> bool {
        match self {
            Self::Eq => value == threshold,
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
            Self::Gte => value >= threshold,
            Self::Lte => value <= threshold,
        }
    }
}

impl std::fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        };
        write!(f, "{symbol}")
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub page: usize,
    pub size: usize,
}

impl Pageable {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Number of documents skipped before this page
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results together with the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

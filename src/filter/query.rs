use std::str::FromStr;

use crate::filter::builder::FilterError;
use crate::filter::predicate::{Field, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Part of a stored variant left out of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExcludedField {
    SourceEntries,
    SamplesData,
    CohortStats,
    Annotation,
}

impl ExcludedField {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SourceEntries => "sourceEntries",
            Self::SamplesData => "sourceEntries.samplesData",
            Self::CohortStats => "sourceEntries.cohortStats",
            Self::Annotation => "annotation",
        }
    }
}

impl FromStr for ExcludedField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sourceEntries" | "files" => Ok(Self::SourceEntries),
            "sourceEntries.samplesData" | "files.samp" => Ok(Self::SamplesData),
            "sourceEntries.cohortStats" | "st" => Ok(Self::CohortStats),
            "annotation" | "annot" => Ok(Self::Annotation),
            other => Err(FilterError::UnknownExclusion(other.to_string())),
        }
    }
}

/// A predicate plus the ordering and projection the store should apply
#[derive(Debug, Clone, PartialEq)]
pub struct VariantQuery {
    pub predicate: Predicate,
    pub sort: Vec<(Field, SortDirection)>,
    pub exclude: Vec<ExcludedField>,
}

impl VariantQuery {
    /// Query sorted by chromosome, start and id
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            sort: vec![
                (Field::Chromosome, SortDirection::Ascending),
                (Field::Start, SortDirection::Ascending),
                (Field::Id, SortDirection::Ascending),
            ],
            exclude: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_exclusions(mut self, exclude: &[ExcludedField]) -> Self {
        self.exclude = exclude.to_vec();
        self
    }

    #[must_use]
    pub fn excludes(&self, field: ExcludedField) -> bool {
        self.exclude.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exclusions() {
        assert_eq!(
            "sourceEntries.samplesData".parse::<ExcludedField>().unwrap(),
            ExcludedField::SamplesData
        );
        assert_eq!("annot".parse::<ExcludedField>().unwrap(), ExcludedField::Annotation);
        assert_eq!(
            "ids".parse::<ExcludedField>().unwrap_err(),
            FilterError::UnknownExclusion("ids".to_string())
        );
    }

    #[test]
    fn test_default_sort() {
        let query = VariantQuery::new(Predicate::All).with_exclusions(&[ExcludedField::CohortStats]);
        assert_eq!(query.sort[0], (Field::Chromosome, SortDirection::Ascending));
        assert!(query.excludes(ExcludedField::CohortStats));
        assert!(!query.excludes(ExcludedField::Annotation));
    }
}

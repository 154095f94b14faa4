use thiserror::Error;

use crate::core::types::{RelationalOperator, VariantType};
use crate::filter::predicate::{Field, Predicate, Value};

/// Raised when filter criteria are malformed (FilterConstructionError)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("{0} allele must be a non-empty sequence without whitespace")]
    InvalidAllele(&'static str),

    #[error("{name} threshold {value} must be a finite number between 0 and 1")]
    ScoreOutOfRange { name: &'static str, value: f64 },

    #[error("Malformed {name} threshold '{text}': expected e.g. '>0.5', '<=0.1' or '0.3'")]
    InvalidThreshold { name: &'static str, text: String },

    #[error("Malformed consequence type '{0}': expected a Sequence Ontology term such as SO:0001583")]
    InvalidConsequenceType(String),

    #[error("{0} id must not be blank")]
    BlankId(&'static str),

    #[error("Unknown variant type '{0}'")]
    InvalidVariantType(String),

    #[error("Unknown field to exclude '{0}'")]
    UnknownExclusion(String),
}

#[derive(Debug, Clone, PartialEq)]
enum FilterKind {
    Reference(String),
    Alternate(String),
    Type(VariantType),
    Studies(Vec<String>),
    Files(Vec<String>),
    Score {
        field: Field,
        operator: RelationalOperator,
        value: f64,
    },
    ConsequenceTypes(Vec<u32>),
}

/// One constraint on stored variants.
///
/// Instances are immutable and only constructed through [`FilterBuilder`],
/// which validates the criteria first.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRepositoryFilter(FilterKind);

impl VariantRepositoryFilter {
    /// Field the filter constrains
    #[must_use]
    pub fn field(&self) -> Field {
        match &self.0 {
            FilterKind::Reference(_) => Field::Reference,
            FilterKind::Alternate(_) => Field::Alternate,
            FilterKind::Type(_) => Field::Type,
            FilterKind::Studies(_) => Field::StudyId,
            FilterKind::Files(_) => Field::FileId,
            FilterKind::Score { field, .. } => *field,
            FilterKind::ConsequenceTypes(_) => Field::ConsequenceType,
        }
    }

    #[must_use]
    pub fn to_predicate(&self) -> Predicate {
        match &self.0 {
            FilterKind::Reference(allele) => {
                Predicate::eq(Field::Reference, Value::text(allele.as_str()))
            }
            FilterKind::Alternate(allele) => {
                Predicate::eq(Field::Alternate, Value::text(allele.as_str()))
            }
            FilterKind::Type(variant_type) => {
                Predicate::eq(Field::Type, Value::text(variant_type.as_str()))
            }
            FilterKind::Studies(ids) => Predicate::one_of(Field::StudyId, text_values(ids)),
            FilterKind::Files(ids) => Predicate::one_of(Field::FileId, text_values(ids)),
            FilterKind::Score {
                field,
                operator,
                value,
            } => Predicate::compare(*field, *operator, Value::Number(*value)),
            FilterKind::ConsequenceTypes(accessions) => Predicate::one_of(
                Field::ConsequenceType,
                accessions.iter().map(|&a| Value::Integer(u64::from(a))).collect(),
            ),
        }
    }
}

impl std::fmt::Display for VariantRepositoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            FilterKind::Reference(a) | FilterKind::Alternate(a) => {
                write!(f, "{} = {a}", self.field())
            }
            FilterKind::Type(t) => write!(f, "{} = {t}", self.field()),
            FilterKind::Studies(ids) | FilterKind::Files(ids) => {
                write!(f, "{} in [{}]", self.field(), ids.join(", "))
            }
            FilterKind::Score {
                field,
                operator,
                value,
            } => write!(f, "{field} {operator} {value}"),
            FilterKind::ConsequenceTypes(accessions) => {
                let terms: Vec<String> = accessions.iter().map(|a| format!("SO:{a:07}")).collect();
                write!(f, "{} in [{}]", self.field(), terms.join(", "))
            }
        }
    }
}

fn text_values(ids: &[String]) -> Vec<Value> {
    ids.iter().map(|id| Value::text(id.as_str())).collect()
}

/// Collects optional criteria and turns the present ones into filters.
///
/// Absent criteria and empty lists impose no constraint.
///
/// ```
/// use eva_commons::filter::builder::FilterBuilder;
/// use eva_commons::core::types::VariantType;
///
/// let filters = FilterBuilder::beacon_filters(Some("A"), Some("T"), Some(VariantType::Snv), None::<&[&str]>).unwrap();
/// assert_eq!(filters.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    reference: Option<String>,
    alternate: Option<String>,
    variant_type: Option<VariantType>,
    studies: Vec<String>,
    files: Vec<String>,
    maf: Option<String>,
    polyphen: Option<String>,
    sift: Option<String>,
    consequence_types: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_alternate(mut self, alternate: Option<&str>) -> Self {
        self.alternate = alternate.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_variant_type(mut self, variant_type: Option<VariantType>) -> Self {
        self.variant_type = variant_type;
        self
    }

    #[must_use]
    pub fn with_studies<S: AsRef<str>>(mut self, studies: Option<&[S]>) -> Self {
        self.studies = studies
            .map(|s| s.iter().map(|id| id.as_ref().to_string()).collect())
            .unwrap_or_default();
        self
    }

    #[must_use]
    pub fn with_files<S: AsRef<str>>(mut self, files: Option<&[S]>) -> Self {
        self.files = files
            .map(|f| f.iter().map(|id| id.as_ref().to_string()).collect())
            .unwrap_or_default();
        self
    }

    /// Minor allele frequency threshold such as `"<0.05"`
    #[must_use]
    pub fn with_maf(mut self, maf: Option<&str>) -> Self {
        self.maf = maf.map(str::to_string);
        self
    }

    /// PolyPhen score threshold such as `">0.5"`
    #[must_use]
    pub fn with_polyphen(mut self, polyphen: Option<&str>) -> Self {
        self.polyphen = polyphen.map(str::to_string);
        self
    }

    /// SIFT score threshold such as `"<0.05"`
    #[must_use]
    pub fn with_sift(mut self, sift: Option<&str>) -> Self {
        self.sift = sift.map(str::to_string);
        self
    }

    /// Sequence Ontology terms such as `"SO:0001583"`
    #[must_use]
    pub fn with_consequence_types<S: AsRef<str>>(mut self, terms: Option<&[S]>) -> Self {
        self.consequence_types = terms
            .map(|t| t.iter().map(|term| term.as_ref().to_string()).collect())
            .unwrap_or_default();
        self
    }

    /// Validate the collected criteria and produce the filters, in a fixed order.
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` describing the first malformed criterion.
    pub fn build(self) -> Result<Vec<VariantRepositoryFilter>, FilterError> {
        let mut filters = Vec::new();

        if let Some(reference) = self.reference {
            filters.push(FilterKind::Reference(validate_allele("reference", reference)?));
        }
        if let Some(alternate) = self.alternate {
            filters.push(FilterKind::Alternate(validate_allele("alternate", alternate)?));
        }
        if let Some(variant_type) = self.variant_type {
            filters.push(FilterKind::Type(variant_type));
        }
        let studies = validate_ids("study", self.studies)?;
        if !studies.is_empty() {
            filters.push(FilterKind::Studies(studies));
        }
        let files = validate_ids("file", self.files)?;
        if !files.is_empty() {
            filters.push(FilterKind::Files(files));
        }
        for (name, field, threshold) in [
            ("maf", Field::Maf, self.maf),
            ("polyphen", Field::Polyphen, self.polyphen),
            ("sift", Field::Sift, self.sift),
        ] {
            if let Some(text) = threshold {
                let (operator, value) = parse_threshold(name, &text)?;
                filters.push(FilterKind::Score {
                    field,
                    operator,
                    value,
                });
            }
        }
        if !self.consequence_types.is_empty() {
            let accessions = self
                .consequence_types
                .iter()
                .map(String::as_str)
                .map(parse_so_term)
                .collect::<Result<Vec<_>, _>>()?;
            filters.push(FilterKind::ConsequenceTypes(accessions));
        }

        Ok(filters.into_iter().map(VariantRepositoryFilter).collect())
    }

    /// Filters used by beacon queries: reference, alternate, type and studies
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` if an allele or study id is malformed.
    pub fn beacon_filters<S: AsRef<str>>(
        reference: Option<&str>,
        alternate: Option<&str>,
        variant_type: Option<VariantType>,
        studies: Option<&[S]>,
    ) -> Result<Vec<VariantRepositoryFilter>, FilterError> {
        Self::new()
            .with_reference(reference)
            .with_alternate(alternate)
            .with_variant_type(variant_type)
            .with_studies(studies)
            .build()
    }

    /// Filters used by region browsing: frequency and effect scores, studies and consequences
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` if a threshold, study id or consequence term is malformed.
    pub fn variant_filters<S: AsRef<str>, T: AsRef<str>>(
        maf: Option<&str>,
        polyphen: Option<&str>,
        sift: Option<&str>,
        studies: Option<&[S]>,
        consequence_types: Option<&[T]>,
    ) -> Result<Vec<VariantRepositoryFilter>, FilterError> {
        Self::new()
            .with_maf(maf)
            .with_polyphen(polyphen)
            .with_sift(sift)
            .with_studies(studies)
            .with_consequence_types(consequence_types)
            .build()
    }
}

fn validate_allele(name: &'static str, allele: String) -> Result<String, FilterError> {
    if allele.is_empty() || allele.chars().any(char::is_whitespace) {
        return Err(FilterError::InvalidAllele(name));
    }
    Ok(allele)
}

/// Reject blank ids and drop repeats, keeping the first occurrence
fn validate_ids(name: &'static str, ids: Vec<String>) -> Result<Vec<String>, FilterError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(FilterError::BlankId(name));
    }
    let mut seen = std::collections::HashSet::new();
    Ok(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
}

/// Parse `">=0.5"` style thresholds; scores live in `[0, 1]`
fn parse_threshold(name: &'static str, text: &str) -> Result<(RelationalOperator, f64), FilterError> {
    let (operator, number) = RelationalOperator::split_prefix(text);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| FilterError::InvalidThreshold {
            name,
            text: text.to_string(),
        })?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(FilterError::ScoreOutOfRange { name, value });
    }
    Ok((operator, value))
}

/// `SO:0001583` -> `1583`
fn parse_so_term(term: &str) -> Result<u32, FilterError> {
    let trimmed = term.trim();
    let digits = trimmed
        .strip_prefix("SO:")
        .or_else(|| trimmed.strip_prefix("so:"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FilterError::InvalidConsequenceType(term.to_string()));
    }
    digits
        .parse()
        .map_err(|_| FilterError::InvalidConsequenceType(term.to_string()))
}

use serde_json::{json, Map};
use std::cmp::Ordering;

use crate::core::types::RelationalOperator;

/// Queryable attribute of a stored variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    /// External identifiers (dbSNP rs ids)
    Ids,
    Chromosome,
    Start,
    End,
    Reference,
    Alternate,
    Type,
    StudyId,
    FileId,
    Maf,
    Sift,
    Polyphen,
    ConsequenceType,
}

impl Field {
    /// Dotted path of the field in the stored document
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Ids => "ids",
            Self::Chromosome => "chr",
            Self::Start => "start",
            Self::End => "end",
            Self::Reference => "ref",
            Self::Alternate => "alt",
            Self::Type => "type",
            Self::StudyId => "files.sid",
            Self::FileId => "files.fid",
            Self::Maf => "st.maf",
            Self::Sift => "annot.sift",
            Self::Polyphen => "annot.pol",
            Self::ConsequenceType => "annot.so",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Literal compared against a field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(u64),
    Number(f64),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => json!(s),
            Self::Integer(n) => json!(n),
            Self::Number(x) => json!(x),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Number(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Number(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    /// Matches if the field equals any of the values
    In(Vec<Value>),
    Compare(RelationalOperator, Value),
}

impl Condition {
    /// Whether a single field value satisfies the condition
    #[must_use]
    pub fn accepts(&self, candidate: &Value) -> bool {
        match self {
            Self::Eq(value) => candidate == value,
            Self::In(values) => values.contains(candidate),
            Self::Compare(operator, value) => operator.compare(candidate, value),
        }
    }
}

/// Composed query predicate handed to a [`crate::store::VariantStore`].
///
/// A condition on a multi-valued field (study ids, scores) holds when any
/// element satisfies it.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every document
    All,
    /// Matches no document
    Nothing,
    Condition { field: Field, condition: Condition },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: Field, value: Value) -> Self {
        Self::Condition {
            field,
            condition: Condition::Eq(value),
        }
    }

    pub fn one_of(field: Field, values: Vec<Value>) -> Self {
        Self::Condition {
            field,
            condition: Condition::In(values),
        }
    }

    pub fn compare(field: Field, operator: RelationalOperator, value: Value) -> Self {
        Self::Condition {
            field,
            condition: Condition::Compare(operator, value),
        }
    }

    /// Conjunction, dropping `All` terms and flattening nested conjunctions
    #[must_use]
    pub fn all_of(terms: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Self::All => {}
                Self::Nothing => return Self::Nothing,
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::All,
            1 => flat.swap_remove(0),
            _ => Self::And(flat),
        }
    }

    /// Disjunction, dropping `Nothing` terms and flattening nested disjunctions
    #[must_use]
    pub fn any_of(terms: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Self::Nothing => {}
                Self::All => return Self::All,
                Self::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::Nothing,
            1 => flat.swap_remove(0),
            _ => Self::Or(flat),
        }
    }

    /// Render as a MongoDB filter document
    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        match self {
            Self::All => json!({}),
            Self::Nothing => json!({ "_id": { "$in": [] } }),
            Self::Condition { field, condition } => {
                let rendered = match condition {
                    Condition::Eq(value) => value.to_json(),
                    Condition::In(values) => {
                        json!({ "$in": values.iter().map(Value::to_json).collect::<Vec<_>>() })
                    }
                    Condition::Compare(operator, value) => {
                        let mut inner = Map::new();
                        inner.insert(operator.mongo_operator().to_string(), value.to_json());
                        serde_json::Value::Object(inner)
                    }
                };
                let mut document = Map::new();
                document.insert(field.path().to_string(), rendered);
                serde_json::Value::Object(document)
            }
            Self::And(terms) => {
                json!({ "$and": terms.iter().map(Predicate::to_document).collect::<Vec<_>>() })
            }
            Self::Or(terms) => {
                json!({ "$or": terms.iter().map(Predicate::to_document).collect::<Vec<_>>() })
            }
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

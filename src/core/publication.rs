use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublicationError {
    #[error("'{0}' cannot be the first author because it is not in the list of authors")]
    UnknownFirstAuthor(String),
}

/// Bibliographic record describing a study.
///
/// Two publications are equal when they share a PubMed id. The set of studies
/// citing a publication is maintained by [`crate::core::study::Study`]; it is
/// readable here but not writable outside the `core` module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPublication")]
pub struct Publication {
    pub pmid: u32,
    pub database: String,
    pub title: String,
    pub journal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_author: Option<String>,

    #[serde(default)]
    authors: Vec<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    studies: BTreeSet<String>,
}

/// Wire form; the author invariant is checked when converting, and citing
/// studies are only ever recorded by the owning study.
#[derive(Deserialize)]
struct RawPublication {
    pmid: u32,
    database: String,
    title: String,
    journal: String,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    start_page: Option<u32>,
    #[serde(default)]
    end_page: Option<u32>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    publication_date: Option<NaiveDate>,
    #[serde(default)]
    first_author: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
}

impl TryFrom<RawPublication> for Publication {
    type Error = PublicationError;

    fn try_from(raw: RawPublication) -> Result<Self, Self::Error> {
        let mut publication = Publication::new(raw.pmid, raw.database, raw.title, raw.journal);
        publication.volume = raw.volume;
        publication.start_page = raw.start_page;
        publication.end_page = raw.end_page;
        publication.doi = raw.doi;
        publication.isbn = raw.isbn;
        publication.publication_date = raw.publication_date;
        publication.set_authors(raw.authors);
        if let Some(first) = raw.first_author {
            publication.set_first_author(&first)?;
        }
        Ok(publication)
    }
}

impl Publication {
    pub fn new(
        pmid: u32,
        database: impl Into<String>,
        title: impl Into<String>,
        journal: impl Into<String>,
    ) -> Self {
        Self {
            pmid,
            database: database.into(),
            title: title.into(),
            journal: journal.into(),
            volume: None,
            start_page: None,
            end_page: None,
            doi: None,
            isbn: None,
            publication_date: None,
            first_author: None,
            authors: Vec::new(),
            studies: BTreeSet::new(),
        }
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn first_author(&self) -> Option<&str> {
        self.first_author.as_deref()
    }

    pub fn add_author(&mut self, author: impl Into<String>) {
        self.authors.push(author.into());
    }

    /// Replace the author list. A first author no longer in the list is cleared.
    pub fn set_authors<I, S>(&mut self, authors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        if let Some(first) = &self.first_author {
            if !self.authors.contains(first) {
                self.first_author = None;
            }
        }
    }

    /// # Errors
    ///
    /// Returns `PublicationError::UnknownFirstAuthor` if `author` has not been added yet.
    pub fn set_first_author(&mut self, author: &str) -> Result<(), PublicationError> {
        if !self.authors.iter().any(|a| a == author) {
            return Err(PublicationError::UnknownFirstAuthor(author.to_string()));
        }
        self.first_author = Some(author.to_string());
        Ok(())
    }

    /// Accessions of the studies citing this publication
    pub fn studies(&self) -> &BTreeSet<String> {
        &self.studies
    }

    pub(super) fn add_study(&mut self, study_id: &str) {
        self.studies.insert(study_id.to_string());
    }

    pub(super) fn remove_study(&mut self, study_id: &str) {
        self.studies.remove(study_id);
    }
}

impl PartialEq for Publication {
    fn eq(&self, other: &Self) -> bool {
        self.pmid == other.pmid
    }
}

impl Eq for Publication {}

impl Hash for Publication {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pmid.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication() -> Publication {
        Publication::new(25_741_868, "PubMed", "Title", "Nature")
    }

    #[test]
    fn test_first_author_must_be_author() {
        let mut p = publication();
        let err = p.set_first_author("Smith J").unwrap_err();
        assert_eq!(err, PublicationError::UnknownFirstAuthor("Smith J".to_string()));
        assert!(p.first_author().is_none());

        p.add_author("Smith J");
        p.set_first_author("Smith J").unwrap();
        assert_eq!(p.first_author(), Some("Smith J"));
    }

    #[test]
    fn test_set_authors_clears_stale_first_author() {
        let mut p = publication();
        p.set_authors(["Smith J", "Doe A"]);
        p.set_first_author("Doe A").unwrap();

        p.set_authors(["Smith J"]);
        assert!(p.first_author().is_none());
        assert_eq!(p.authors(), ["Smith J".to_string()]);
    }

    #[test]
    fn test_equality_by_pmid() {
        let mut a = publication();
        let b = Publication::new(25_741_868, "Other", "Other title", "Science");
        a.doi = Some("10.1000/xyz".to_string());
        assert_eq!(a, b);
        assert_ne!(a, Publication::new(1, "PubMed", "Title", "Nature"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_first_author() {
        let json = r#"{"pmid": 1, "database": "PubMed", "title": "T", "journal": "J",
            "first_author": "Ghost", "authors": ["Smith J"]}"#;
        let err = serde_json::from_str::<Publication>(json).unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_deserialize_keeps_valid_first_author() {
        let json = r#"{"pmid": 1, "database": "PubMed", "title": "T", "journal": "J",
            "first_author": "Doe A", "authors": ["Smith J", "Doe A"],
            "studies": ["PRJEB6930"]}"#;
        let p: Publication = serde_json::from_str(json).unwrap();
        assert_eq!(p.first_author(), Some("Doe A"));
        assert_eq!(p.authors().len(), 2);
        assert!(p.studies().is_empty());
    }

    #[test]
    fn test_publication_date_round_trip() {
        let mut p = publication();
        p.publication_date = NaiveDate::from_ymd_opt(2015, 3, 5);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("2015-03-05"));
    }
}

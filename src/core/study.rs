use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::publication::Publication;

/// A study and the publications describing it.
///
/// The study owns the association: adding or removing a publication here is
/// the only way to change the publication's list of citing studies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawStudy")]
pub struct Study {
    pub id: String,
    pub name: String,
    publications: BTreeMap<u32, Publication>,
}

#[derive(Deserialize)]
struct RawStudy {
    id: String,
    name: String,
    #[serde(default)]
    publications: BTreeMap<u32, Publication>,
}

impl From<RawStudy> for Study {
    fn from(raw: RawStudy) -> Self {
        let mut study = Study::new(raw.id, raw.name);
        for publication in raw.publications.into_values() {
            study.add_publication(publication);
        }
        study
    }
}

impl Study {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            publications: BTreeMap::new(),
        }
    }

    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.values()
    }

    pub fn publication(&self, pmid: u32) -> Option<&Publication> {
        self.publications.get(&pmid)
    }

    /// Attach a publication, recording this study on it. Replaces any publication with the same pmid.
    pub fn add_publication(&mut self, mut publication: Publication) {
        publication.add_study(&self.id);
        self.publications.insert(publication.pmid, publication);
    }

    /// Detach a publication and hand it back without this study recorded on it
    pub fn remove_publication(&mut self, pmid: u32) -> Option<Publication> {
        let mut publication = self.publications.remove(&pmid)?;
        publication.remove_study(&self.id);
        Some(publication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_maintains_back_reference() {
        let mut study = Study::new("PRJEB6930", "1000 Genomes phase 3");
        study.add_publication(Publication::new(26_432_245, "PubMed", "A map", "Nature"));

        let attached = study.publication(26_432_245).unwrap();
        assert!(attached.studies().contains("PRJEB6930"));

        let detached = study.remove_publication(26_432_245).unwrap();
        assert!(detached.studies().is_empty());
        assert_eq!(study.publications().count(), 0);
        assert!(study.remove_publication(26_432_245).is_none());
    }

    #[test]
    fn test_publication_shared_between_studies() {
        let mut a = Study::new("PRJEB1", "A");
        let mut b = Study::new("PRJEB2", "B");
        let publication = Publication::new(7, "PubMed", "Shared", "Cell");

        a.add_publication(publication);
        let from_a = a.remove_publication(7).unwrap();
        b.add_publication(from_a);

        let in_b = b.publication(7).unwrap();
        assert_eq!(in_b.studies().iter().collect::<Vec<_>>(), vec!["PRJEB2"]);
    }

    #[test]
    fn test_deserialize_restores_back_reference() {
        let json = r#"{
            "id": "PRJEB8661",
            "name": "Exome",
            "publications": {"42": {"pmid": 42, "database": "PubMed", "title": "T", "journal": "J"}}
        }"#;
        let study: Study = serde_json::from_str(json).unwrap();
        let publication = study.publication(42).unwrap();
        assert!(publication.studies().contains("PRJEB8661"));
    }
}

//! Translation of regions, coordinate ranges and filters into one predicate.

use tracing::debug;

use crate::config::EmptyStudyList;
use crate::core::region::{Region, RegionError};
use crate::core::types::RelationalOperator;
use crate::filter::builder::VariantRepositoryFilter;
use crate::filter::predicate::{Field, Predicate, Value};

fn chromosome(name: &str) -> Predicate {
    Predicate::eq(Field::Chromosome, Value::text(name))
}

fn bounded(field: Field, operator: RelationalOperator, position: u64) -> Predicate {
    Predicate::compare(field, operator, Value::Integer(position))
}

/// Variants whose own interval intersects `region` (closed-interval overlap)
#[must_use]
pub fn region_predicate(region: &Region) -> Predicate {
    if region.is_whole_chromosome() {
        return chromosome(region.chromosome());
    }
    let mut terms = vec![chromosome(region.chromosome())];
    if region.end() != u64::MAX {
        terms.push(bounded(Field::Start, RelationalOperator::Lte, region.end()));
    }
    terms.push(bounded(Field::End, RelationalOperator::Gte, region.start()));
    Predicate::all_of(terms)
}

/// Variants overlapping any of `regions`; no regions matches nothing
#[must_use]
pub fn regions_predicate(regions: &[Region]) -> Predicate {
    Predicate::any_of(regions.iter().map(region_predicate).collect())
}

/// Variants starting within `start_range` and ending within `end_range`, edges included.
///
/// The two ranges are tested independently: this is not an overlap test of a
/// combined interval.
///
/// # Errors
///
/// Returns `RegionError::InvalidRegion` if the ranges lie on different chromosomes.
pub fn ranges_predicate(start_range: &Region, end_range: &Region) -> Result<Predicate, RegionError> {
    if start_range.chromosome() != end_range.chromosome() {
        return Err(RegionError::InvalidRegion(format!(
            "start range {start_range} and end range {end_range} are on different chromosomes"
        )));
    }
    Ok(Predicate::all_of(vec![
        chromosome(start_range.chromosome()),
        bounded(Field::Start, RelationalOperator::Gte, start_range.start()),
        bounded(Field::Start, RelationalOperator::Lte, start_range.end()),
        bounded(Field::End, RelationalOperator::Gte, end_range.start()),
        bounded(Field::End, RelationalOperator::Lte, end_range.end()),
    ]))
}

/// Variants whose id or any external id is one of `ids`
#[must_use]
pub fn ids_predicate(ids: &[String]) -> Predicate {
    if ids.is_empty() {
        return Predicate::Nothing;
    }
    let values: Vec<Value> = ids.iter().map(|id| Value::text(id.as_str())).collect();
    Predicate::any_of(vec![
        Predicate::one_of(Field::Id, values.clone()),
        Predicate::one_of(Field::Ids, values),
    ])
}

/// AND every filter into `base`
#[must_use]
pub fn with_filters(base: Predicate, filters: &[VariantRepositoryFilter]) -> Predicate {
    let mut terms = Vec::with_capacity(filters.len() + 1);
    terms.push(base);
    terms.extend(filters.iter().map(VariantRepositoryFilter::to_predicate));
    let predicate = Predicate::all_of(terms);
    debug!(filters = filters.len(), query = %predicate, "composed variant query");
    predicate
}

/// Variants on `chromosome` belonging to any of `studies`
#[must_use]
pub fn chromosome_studies_predicate<S: AsRef<str>>(
    chromosome_name: &str,
    studies: &[S],
    empty: EmptyStudyList,
) -> Predicate {
    let study_term = match (studies.is_empty(), empty) {
        (true, EmptyStudyList::MatchNothing) => Predicate::Nothing,
        (true, EmptyStudyList::NoConstraint) => Predicate::All,
        (false, _) => Predicate::one_of(
            Field::StudyId,
            studies.iter().map(|s| Value::text(s.as_ref())).collect(),
        ),
    };
    Predicate::all_of(vec![chromosome(chromosome_name), study_term])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::builder::FilterBuilder;
    use serde_json::json;

    #[test]
    fn test_region_overlap_document() {
        let region = Region::new("11", 190062, 190064).unwrap();
        assert_eq!(
            region_predicate(&region).to_document(),
            json!({"$and": [
                {"chr": "11"},
                {"start": {"$lte": 190064}},
                {"end": {"$gte": 190062}}
            ]})
        );
    }

    #[test]
    fn test_region_from_first_base_still_bounds_end() {
        let region = Region::new("1", 1, 100).unwrap();
        assert_eq!(
            region_predicate(&region).to_document(),
            json!({"$and": [
                {"chr": "1"},
                {"start": {"$lte": 100}},
                {"end": {"$gte": 1}}
            ]})
        );
    }

    #[test]
    fn test_whole_chromosome_only_constrains_chromosome() {
        let region = Region::whole_chromosome("X").unwrap();
        assert_eq!(region_predicate(&region), chromosome("X"));
    }

    #[test]
    fn test_several_regions_are_ored() {
        let regions = vec![
            Region::new("1", 10, 20).unwrap(),
            Region::new("2", 30, 40).unwrap(),
        ];
        match regions_predicate(&regions) {
            Predicate::Or(terms) => assert_eq!(terms.len(), 2),
            other => panic!("expected disjunction, got {other:?}"),
        }
        assert_eq!(regions_predicate(&[]), Predicate::Nothing);
    }

    #[test]
    fn test_ranges_are_independent() {
        let start = Region::new("9", 10099, 10099).unwrap();
        let end = Region::new("9", 10098, 10098).unwrap();
        assert_eq!(
            ranges_predicate(&start, &end).unwrap().to_document(),
            json!({"$and": [
                {"chr": "9"},
                {"start": {"$gte": 10099}},
                {"start": {"$lte": 10099}},
                {"end": {"$gte": 10098}},
                {"end": {"$lte": 10098}}
            ]})
        );
    }

    #[test]
    fn test_ranges_on_different_chromosomes_rejected() {
        let start = Region::new("9", 1, 2).unwrap();
        let end = Region::new("10", 1, 2).unwrap();
        assert!(matches!(
            ranges_predicate(&start, &end),
            Err(RegionError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_with_filters_ands_each_filter() {
        let filters =
            FilterBuilder::beacon_filters(Some("A"), Some("T"), None, Some(&["PRJEB5829"][..]))
                .unwrap();
        let base = chromosome("9");
        let composed = with_filters(base, &filters);
        assert_eq!(
            composed.to_document(),
            json!({"$and": [
                {"chr": "9"},
                {"ref": "A"},
                {"alt": "T"},
                {"files.sid": {"$in": ["PRJEB5829"]}}
            ]})
        );
        assert_eq!(with_filters(chromosome("9"), &[]), chromosome("9"));
    }

    #[test]
    fn test_ids_predicate() {
        let ids = vec!["rs123".to_string()];
        assert_eq!(
            ids_predicate(&ids).to_document(),
            json!({"$or": [{"_id": {"$in": ["rs123"]}}, {"ids": {"$in": ["rs123"]}}]})
        );
        assert_eq!(ids_predicate(&[]), Predicate::Nothing);
    }

    #[test]
    fn test_empty_study_list_policies() {
        let none: [&str; 0] = [];
        assert_eq!(
            chromosome_studies_predicate("11", &none, EmptyStudyList::MatchNothing),
            Predicate::Nothing
        );
        assert_eq!(
            chromosome_studies_predicate("11", &none, EmptyStudyList::NoConstraint),
            chromosome("11")
        );
        assert_eq!(
            chromosome_studies_predicate("11", &["PRJEB8661"], EmptyStudyList::MatchNothing)
                .to_document(),
            json!({"$and": [{"chr": "11"}, {"files.sid": {"$in": ["PRJEB8661"]}}]})
        );
    }
}

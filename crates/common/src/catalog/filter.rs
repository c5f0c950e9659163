//! Faceted filter engine
//!
//! Pure predicates over borrowed records. The full set is re-filtered on
//! every call; at directory scale (hundreds of records) there is no index.

use super::criteria::FilterCriteria;
use super::record::UniversityRecord;

/// Records matching every active facet, in their original order
pub fn filter_records<'a>(
    records: &'a [UniversityRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a UniversityRecord> {
    let search = criteria.search_text.to_lowercase();

    records
        .iter()
        .filter(|record| matches_lowered(record, criteria, &search))
        .collect()
}

/// Owned variant of [`filter_records`] for handing results to a response
pub fn filter_owned(records: Vec<UniversityRecord>, criteria: &FilterCriteria) -> Vec<UniversityRecord> {
    let search = criteria.search_text.to_lowercase();

    records
        .into_iter()
        .filter(|record| matches_lowered(record, criteria, &search))
        .collect()
}

/// True when `record` satisfies every active facet of `criteria`
pub fn matches(record: &UniversityRecord, criteria: &FilterCriteria) -> bool {
    matches_lowered(record, criteria, &criteria.search_text.to_lowercase())
}

fn matches_lowered(record: &UniversityRecord, criteria: &FilterCriteria, search: &str) -> bool {
    matches_search(record, search)
        && matches_exact(&record.country, &criteria.country)
        && matches_exact(&record.city, &criteria.city)
        && matches_any(record.intakes(), &criteria.intake)
        && matches_any(record.degrees(), &criteria.degree)
        && matches_any(record.languages(), &criteria.taught_language)
        && matches_any(record.majors(), &criteria.major)
}

/// `search` must already be lowercased
pub fn matches_search(record: &UniversityRecord, search: &str) -> bool {
    search.is_empty()
        || record.name.to_lowercase().contains(search)
        || record.location.to_lowercase().contains(search)
}

fn matches_exact(value: &str, wanted: &str) -> bool {
    wanted.is_empty() || value == wanted
}

fn matches_any(values: &[String], wanted: &str) -> bool {
    wanted.is_empty() || values.iter().any(|v| v == wanted)
}

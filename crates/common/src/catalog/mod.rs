//! University directory core
//!
//! - Record model tolerant of partial documents
//! - Filter criteria with reducer-style transitions
//! - Faceted filter engine (logical AND over seven facets)
//! - Derived option lists for dependent dropdowns

mod criteria;
mod filter;
mod options;
mod record;
mod remote;

pub use criteria::{CriteriaChange, FilterCriteria};
pub use filter::{filter_owned, filter_records, matches};
pub use options::{compute_cities, compute_majors, DirectoryOptions};
pub use record::{Deadlines, Details, InfoEntry, Rankings, UniversityRecord};
pub use remote::RemoteCatalog;

/// Countries offered by the directory's country dropdown.
///
/// Record countries are free text and are not checked against this list on
/// write; see [`is_known_country`].
pub const KNOWN_COUNTRIES: &[&str] = &[
    "China",
    "South Korea",
    "UK",
    "Malaysia",
    "Turkey",
    "Hungary",
    "Cyprus",
];

pub const INTAKES: &[&str] = &["March", "September"];

pub const DEGREES: &[&str] = &["Diploma", "Bachelor", "Masters", "PhD", "Language", "Foundation"];

pub const TAUGHT_LANGUAGES: &[&str] = &["English", "Chinese", "Korean", "Turkish"];

/// Whether `country` can be reached through the country dropdown
pub fn is_known_country(country: &str) -> bool {
    KNOWN_COUNTRIES.contains(&country)
}

/// Intake, degree and language values of `record` that no dropdown offers.
///
/// Each entry is `(facet, value)`. Such values only match a hand-typed
/// criteria value, never one picked from the fixed lists.
pub fn off_list_values(record: &UniversityRecord) -> Vec<(&'static str, &str)> {
    let facets: [(&'static str, &[String], &[&str]); 3] = [
        ("intake", record.intakes(), INTAKES),
        ("degree", record.degrees(), DEGREES),
        ("taught", record.languages(), TAUGHT_LANGUAGES),
    ];

    facets
        .into_iter()
        .flat_map(|(facet, values, allowed)| {
            values
                .iter()
                .filter(move |v| !allowed.contains(&v.as_str()))
                .map(move |v| (facet, v.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_chinese_universities() -> Vec<UniversityRecord> {
        serde_json::from_value(json!([
            {
                "slug": "sichuan-university",
                "name": "Sichuan University",
                "country": "China",
                "city": "Chengdu",
                "intake": ["September"],
                "degree": ["Bachelor"],
                "taught": ["English"],
                "details": { "majors": ["Software Engineering"] }
            },
            {
                "slug": "xidian-university",
                "name": "Xidian University",
                "country": "China",
                "city": "Xi'an",
                "intake": ["September"],
                "degree": ["Bachelor"],
                "taught": ["English"],
                "details": { "majors": ["Applied Physics"] }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_major_scenario() {
        let records = two_chinese_universities();
        let criteria = FilterCriteria::default().apply(CriteriaChange::Major("Applied Physics".into()));
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Xidian University");
    }

    #[test]
    fn test_city_options_scenario() {
        let records = two_chinese_universities();
        let criteria = FilterCriteria::default().apply(CriteriaChange::Country("China".into()));
        assert_eq!(compute_cities(&records, &criteria.country), vec!["Chengdu", "Xi'an"]);
    }

    #[test]
    fn test_search_scenario() {
        let records = two_chinese_universities();
        let criteria = FilterCriteria::default().apply(CriteriaChange::Search("sichuan".into()));
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Sichuan University");
    }

    #[test]
    fn test_masters_scenario() {
        let records = two_chinese_universities();
        let criteria = FilterCriteria::default().apply(CriteriaChange::Degree("Masters".into()));
        assert!(filter_records(&records, &criteria).is_empty());
    }

    #[test]
    fn test_missing_details_scenario() {
        let records: Vec<UniversityRecord> =
            serde_json::from_value(json!([{ "slug": "no-details", "name": "No Details" }])).unwrap();
        let criteria = FilterCriteria::default().apply(CriteriaChange::Major("Anything".into()));
        assert!(filter_records(&records, &criteria).is_empty());
        assert!(compute_majors(&records).is_empty());
    }

    #[test]
    fn test_country_reset_scenario() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaChange::Country("China".into()))
            .apply(CriteriaChange::City("Xi'an".into()))
            .apply(CriteriaChange::Country(String::new()));
        assert_eq!(criteria.city, "");
    }

    #[test]
    fn test_known_countries() {
        assert!(is_known_country("South Korea"));
        assert!(!is_known_country("south korea"));
        assert!(!is_known_country("People's Republic of China"));
    }

    #[test]
    fn test_off_list_values() {
        let records = two_chinese_universities();
        assert!(off_list_values(&records[0]).is_empty());

        let record: UniversityRecord = serde_json::from_value(json!({
            "slug": "singular-degree",
            "name": "Singular Degree",
            "intake": ["January", "September"],
            "degree": ["Master"],
            "taught": ["English"]
        }))
        .unwrap();
        assert_eq!(
            off_list_values(&record),
            vec![("intake", "January"), ("degree", "Master")]
        );
    }
}

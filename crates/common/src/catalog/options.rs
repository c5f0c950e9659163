//! Derived dropdown options
//!
//! Cities and majors are computed from the record set rather than hardcoded.
//! Output is always deduplicated and sorted, so identical inputs give
//! identical lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::record::UniversityRecord;
use super::{DEGREES, INTAKES, KNOWN_COUNTRIES, TAUGHT_LANGUAGES};

/// Distinct majors across every record, sorted
pub fn compute_majors(records: &[UniversityRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.majors())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct cities, restricted to `country` when it is non-empty
pub fn compute_cities(records: &[UniversityRecord], country: &str) -> Vec<String> {
    records
        .iter()
        .filter(|record| country.is_empty() || record.country == country)
        .map(|record| record.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Everything the directory's dropdowns need for one selection of country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryOptions {
    pub countries: Vec<String>,
    pub cities: Vec<String>,
    pub intakes: Vec<String>,
    pub degrees: Vec<String>,
    pub taught_languages: Vec<String>,
    pub majors: Vec<String>,
}

impl DirectoryOptions {
    pub fn compute(records: &[UniversityRecord], country: &str) -> Self {
        Self {
            countries: owned(KNOWN_COUNTRIES),
            cities: compute_cities(records, country),
            intakes: owned(INTAKES),
            degrees: owned(DEGREES),
            taught_languages: owned(TAUGHT_LANGUAGES),
            majors: compute_majors(records),
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

//! Directory filter criteria and their state transitions

use serde::{Deserialize, Serialize};

/// The full set of facet selections for one directory view.
///
/// Every field is optional; an empty string means "any". The value is
/// immutable from the engine's point of view: changes go through
/// [`FilterCriteria::apply`], which enforces the dependent-facet rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(alias = "search")]
    pub search_text: String,
    pub country: String,
    pub city: String,
    pub intake: String,
    pub degree: String,
    #[serde(alias = "taught")]
    pub taught_language: String,
    pub major: String,
}

/// A single user-driven change to the criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaChange {
    Search(String),
    Country(String),
    City(String),
    Intake(String),
    Degree(String),
    TaughtLanguage(String),
    Major(String),
    Clear,
}

impl FilterCriteria {
    /// Produce the criteria that follow `change`.
    ///
    /// Any country change clears the city, even when the old city would still
    /// be offered under the new country.
    pub fn apply(&self, change: CriteriaChange) -> FilterCriteria {
        let mut next = self.clone();
        match change {
            CriteriaChange::Search(text) => next.search_text = text,
            CriteriaChange::Country(country) => {
                next.country = country;
                next.city.clear();
            }
            CriteriaChange::City(city) => next.city = city,
            CriteriaChange::Intake(intake) => next.intake = intake,
            CriteriaChange::Degree(degree) => next.degree = degree,
            CriteriaChange::TaughtLanguage(language) => next.taught_language = language,
            CriteriaChange::Major(major) => next.major = major,
            CriteriaChange::Clear => next = FilterCriteria::default(),
        }
        next
    }

    /// True when no facet is selected
    pub fn is_empty(&self) -> bool {
        self.active_facets() == 0
    }

    /// Number of facets with a selection
    pub fn active_facets(&self) -> usize {
        [
            &self.search_text,
            &self.country,
            &self.city,
            &self.intake,
            &self.degree,
            &self.taught_language,
            &self.major,
        ]
        .iter()
        .filter(|value| !value.is_empty())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn china_xian() -> FilterCriteria {
        FilterCriteria::default()
            .apply(CriteriaChange::Country("China".into()))
            .apply(CriteriaChange::City("Xi'an".into()))
    }

    #[test]
    fn test_clearing_country_clears_city() {
        let criteria = china_xian().apply(CriteriaChange::Country(String::new()));
        assert_eq!(criteria.country, "");
        assert_eq!(criteria.city, "");
    }

    #[test]
    fn test_country_change_clears_city_even_if_still_valid() {
        let criteria = china_xian().apply(CriteriaChange::Country("China".into()));
        assert_eq!(criteria.country, "China");
        assert_eq!(criteria.city, "");
    }

    #[test]
    fn test_other_facets_leave_city_alone() {
        let criteria = china_xian()
            .apply(CriteriaChange::Degree("Bachelor".into()))
            .apply(CriteriaChange::Search("xidian".into()));
        assert_eq!(criteria.city, "Xi'an");
        assert_eq!(criteria.active_facets(), 4);
    }

    #[test]
    fn test_apply_does_not_mutate_original() {
        let original = china_xian();
        let _ = original.apply(CriteriaChange::Clear);
        assert_eq!(original.city, "Xi'an");
    }

    #[test]
    fn test_clear_resets_everything() {
        let criteria = china_xian()
            .apply(CriteriaChange::Major("Applied Physics".into()))
            .apply(CriteriaChange::Clear);
        assert!(criteria.is_empty());
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_deserialize_query_aliases() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"search":"seoul","taught":"Korean"}"#).unwrap();
        assert_eq!(criteria.search_text, "seoul");
        assert_eq!(criteria.taught_language, "Korean");
        assert_eq!(criteria.country, "");
    }
}

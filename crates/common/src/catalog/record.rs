//! University record model
//!
//! The JSON shape follows what the site's admin form and the seed data set
//! produce. Every array field defaults to empty and every nested object is
//! optional, so partially populated documents always decode. Missing nested
//! data is resolved in the accessor methods below; filter predicates never
//! look at the raw `Option`s.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// One institution's admissions profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRecord {
    /// Unique slug, used for routing and upsert matching
    #[serde(default, alias = "id", deserialize_with = "null_as_default")]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Free-text display location, e.g. "Chengdu, Sichuan"
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, max = 100))]
    pub country: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub intake: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: Vec<String>,

    /// Languages of instruction
    #[serde(default, deserialize_with = "null_as_default")]
    pub taught: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rankings: Option<Rankings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: Vec<InfoEntry>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub scholarships: Vec<InfoEntry>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<InfoEntry>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<InfoEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadlines: Option<Deadlines>,

    #[serde(default = "default_active", deserialize_with = "null_as_active")]
    pub is_active: bool,
}

/// National and world ranks.
///
/// Older documents key the national rank as `country`; it is read as an
/// alias and always written back as `national`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    #[serde(default, alias = "country", skip_serializing_if = "Option::is_none")]
    pub national: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    #[serde(default, deserialize_with = "null_as_default")]
    pub majors: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tuition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_details: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadlines {
    #[serde(default, deserialize_with = "null_as_default")]
    pub application: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
}

/// Display-only list entry: either a plain line of text or a small object
/// such as `{ "label": "Application fee", "amount": "400 CNY" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoEntry {
    Text(String),
    Fields(serde_json::Map<String, serde_json::Value>),
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_active() -> bool {
    true
}

fn null_as_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_active))
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= 120
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("slug must be lowercase letters, digits and inner hyphens".into()))
    }
}

impl UniversityRecord {
    /// Majors offered, empty when `details` is absent
    pub fn majors(&self) -> &[String] {
        self.details
            .as_ref()
            .map(|d| d.majors.as_slice())
            .unwrap_or_default()
    }

    pub fn intakes(&self) -> &[String] {
        &self.intake
    }

    pub fn degrees(&self) -> &[String] {
        &self.degree
    }

    pub fn languages(&self) -> &[String] {
        &self.taught
    }

    pub fn national_rank(&self) -> Option<u32> {
        self.rankings.as_ref().and_then(|r| r.national)
    }

    pub fn world_rank(&self) -> Option<u32> {
        self.rankings.as_ref().and_then(|r| r.world)
    }
}

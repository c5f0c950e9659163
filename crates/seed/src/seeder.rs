//! Validation and upsert of a university data set

use std::collections::HashSet;

use unipath_common::{
    catalog::{self, UniversityRecord},
    db::{UniversityStore, UpsertOutcome},
    errors::{AppError, Result},
};
use validator::Validate;

/// Data set compiled into the binary
pub const BUNDLED_CATALOG: &str = include_str!("../data/universities.json");

/// Counts from one seeding run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub unknown_countries: usize,
    /// Records carrying an intake, degree or language no dropdown offers
    pub off_list_facets: usize,
}

pub fn parse_records(json: &str) -> Result<Vec<UniversityRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Validate every record, then upsert the valid ones by slug.
///
/// Invalid records and repeated slugs are skipped with a warning. With
/// `dry_run` nothing is written and valid records count as skipped.
pub async fn seed_records(
    store: &dyn UniversityStore,
    records: Vec<UniversityRecord>,
    dry_run: bool,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut seen = HashSet::new();

    for record in records {
        if let Err(errors) = record.validate() {
            tracing::warn!(slug = %record.slug, error = %AppError::from_validation(errors), "Skipping invalid record");
            report.skipped += 1;
            continue;
        }

        if !seen.insert(record.slug.clone()) {
            tracing::warn!(slug = %record.slug, "Skipping repeated slug");
            report.skipped += 1;
            continue;
        }

        if !catalog::is_known_country(&record.country) {
            tracing::warn!(
                slug = %record.slug,
                country = %record.country,
                "Country is not offered by the directory filter"
            );
            report.unknown_countries += 1;
        }

        let off_list = catalog::off_list_values(&record);
        if !off_list.is_empty() {
            tracing::warn!(
                slug = %record.slug,
                values = ?off_list,
                "Facet values are not offered by the directory filter"
            );
            report.off_list_facets += 1;
        }

        if dry_run {
            tracing::info!(slug = %record.slug, "Dry run, not writing");
            report.skipped += 1;
            continue;
        }

        let slug = record.slug.clone();
        match store.upsert(record).await? {
            UpsertOutcome::Inserted => {
                tracing::debug!(slug = %slug, "Inserted");
                report.inserted += 1;
            }
            UpsertOutcome::Updated => {
                tracing::debug!(slug = %slug, "Updated");
                report.updated += 1;
            }
        }
    }

    Ok(report)
}

//! Record store seam used by the directory handlers

use async_trait::async_trait;

use crate::catalog::UniversityRecord;
use crate::errors::Result;

use super::models::Lead;
use super::repository::{NewLead, Repository, UpsertOutcome};

/// Source and sink of university records.
///
/// `fetch_all` is the directory's only read path: it returns the full
/// current array and all filtering happens in memory afterwards.
#[async_trait]
pub trait UniversityStore: Send + Sync {
    async fn fetch_all(&self, include_inactive: bool) -> Result<Vec<UniversityRecord>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<UniversityRecord>>;

    async fn insert(&self, record: UniversityRecord) -> Result<UniversityRecord>;

    async fn replace(&self, slug: &str, record: UniversityRecord) -> Result<UniversityRecord>;

    async fn set_active(&self, slug: &str, is_active: bool) -> Result<UniversityRecord>;

    async fn upsert(&self, record: UniversityRecord) -> Result<UpsertOutcome>;

    async fn ping(&self) -> Result<()>;
}

/// Sink for captured leads
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead>;
}

#[async_trait]
impl LeadStore for Repository {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        Repository::create_lead(self, lead).await
    }
}

#[async_trait]
impl UniversityStore for Repository {
    async fn fetch_all(&self, include_inactive: bool) -> Result<Vec<UniversityRecord>> {
        self.list_universities(include_inactive).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<UniversityRecord>> {
        self.find_university(slug).await
    }

    async fn insert(&self, record: UniversityRecord) -> Result<UniversityRecord> {
        self.insert_university(record).await
    }

    async fn replace(&self, slug: &str, record: UniversityRecord) -> Result<UniversityRecord> {
        self.replace_university(slug, record).await
    }

    async fn set_active(&self, slug: &str, is_active: bool) -> Result<UniversityRecord> {
        self.set_university_active(slug, is_active).await
    }

    async fn upsert(&self, record: UniversityRecord) -> Result<UpsertOutcome> {
        self.upsert_university(record).await
    }

    async fn ping(&self) -> Result<()> {
        Repository::ping(self).await
    }
}

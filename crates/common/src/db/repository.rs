//! Repository pattern for database operations

use crate::catalog::UniversityRecord;
use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Fields of a lead as captured from the site
#[derive(Debug, Clone)]
pub struct NewLead {
    pub kind: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub destination: Option<String>,
    pub organization: Option<String>,
    pub message: String,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // University Operations
    // ========================================================================

    /// All universities in insertion order, skipping documents that no
    /// longer decode
    pub async fn list_universities(&self, include_inactive: bool) -> Result<Vec<UniversityRecord>> {
        let mut query = UniversityEntity::find();
        if !include_inactive {
            query = query.filter(UniversityColumn::IsActive.eq(true));
        }

        let rows = query
            .order_by_asc(UniversityColumn::CreatedAt)
            .order_by_asc(UniversityColumn::Slug)
            .all(self.conn())
            .await?;

        Ok(rows.into_iter().filter_map(decode_row).collect())
    }

    pub async fn find_university(&self, slug: &str) -> Result<Option<UniversityRecord>> {
        let row = UniversityEntity::find_by_id(slug.to_string())
            .one(self.conn())
            .await?;

        Ok(row.and_then(decode_row))
    }

    /// Insert a new university; fails if the slug is taken.
    ///
    /// The primary key decides, so two concurrent inserts of one slug yield
    /// one success and one `DuplicateUniversity`.
    pub async fn insert_university(&self, record: UniversityRecord) -> Result<UniversityRecord> {
        let now = chrono::Utc::now();
        let active = UniversityActiveModel {
            slug: Set(record.slug.clone()),
            name: Set(record.name.clone()),
            country: Set(record.country.clone()),
            city: Set(record.city.clone()),
            is_active: Set(record.is_active),
            document: Set(serde_json::to_value(&record)?),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        match active.insert(self.conn()).await {
            Ok(_) => Ok(record),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::DuplicateUniversity { slug: record.slug })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the whole document stored under `slug`
    pub async fn replace_university(
        &self,
        slug: &str,
        mut record: UniversityRecord,
    ) -> Result<UniversityRecord> {
        let row = self
            .find_row(slug)
            .await?
            .ok_or_else(|| AppError::UniversityNotFound { slug: slug.to_string() })?;

        record.slug = slug.to_string();

        let mut active: UniversityActiveModel = row.into();
        active.name = Set(record.name.clone());
        active.country = Set(record.country.clone());
        active.city = Set(record.city.clone());
        active.is_active = Set(record.is_active);
        active.document = Set(serde_json::to_value(&record)?);
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.conn()).await?;
        Ok(record)
    }

    /// Flip the visibility flag, keeping the document in sync
    pub async fn set_university_active(&self, slug: &str, is_active: bool) -> Result<UniversityRecord> {
        let mut record = self
            .find_university(slug)
            .await?
            .ok_or_else(|| AppError::UniversityNotFound { slug: slug.to_string() })?;

        record.is_active = is_active;
        self.replace_university(slug, record).await
    }

    /// Insert or replace, matched by slug
    pub async fn upsert_university(&self, record: UniversityRecord) -> Result<UpsertOutcome> {
        if self.find_row(&record.slug).await?.is_some() {
            let slug = record.slug.clone();
            self.replace_university(&slug, record).await?;
            Ok(UpsertOutcome::Updated)
        } else {
            let slug = record.slug.clone();
            match self.insert_university(record.clone()).await {
                Ok(_) => Ok(UpsertOutcome::Inserted),
                // Inserted by someone else since the lookup
                Err(AppError::DuplicateUniversity { .. }) => {
                    self.replace_university(&slug, record).await?;
                    Ok(UpsertOutcome::Updated)
                }
                Err(e) => Err(e),
            }
        }
    }

    async fn find_row(&self, slug: &str) -> Result<Option<University>> {
        UniversityEntity::find_by_id(slug.to_string())
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Lead Operations
    // ========================================================================

    pub async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        let active = LeadActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(lead.kind),
            full_name: Set(lead.full_name),
            email: Set(lead.email),
            phone: Set(lead.phone),
            destination: Set(lead.destination),
            organization: Set(lead.organization),
            message: Set(lead.message),
            created_at: Set(chrono::Utc::now().into()),
        };

        active.insert(self.conn()).await.map_err(Into::into)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn decode_row(row: University) -> Option<UniversityRecord> {
    match serde_json::from_value(row.document) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(slug = %row.slug, error = %e, "Skipping undecodable university document");
            None
        }
    }
}

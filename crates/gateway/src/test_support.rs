//! In-memory stores and request helpers for handler tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use unipath_common::{
    catalog::UniversityRecord,
    config::AppConfig,
    db::{models::Lead, LeadStore, NewLead, UniversityStore, UpsertOutcome},
    errors::{AppError, Result},
};

use crate::{create_router, AppState};

#[derive(Default)]
struct Inner {
    records: Vec<UniversityRecord>,
    leads: Vec<Lead>,
}

/// Vec-backed store; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    down: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn with_records(records: serde_json::Value) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().records = serde_json::from_value(records).unwrap();
        store
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.inner.lock().unwrap().leads.clone()
    }
}

#[async_trait]
impl UniversityStore for MemoryStore {
    async fn fetch_all(&self, include_inactive: bool) -> Result<Vec<UniversityRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .filter(|r| include_inactive || r.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<UniversityRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.iter().find(|r| r.slug == slug).cloned())
    }

    async fn insert(&self, record: UniversityRecord) -> Result<UniversityRecord> {
        let mut inner = self.inner.lock().unwrap();
        if inner.records.iter().any(|r| r.slug == record.slug) {
            return Err(AppError::DuplicateUniversity { slug: record.slug });
        }
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn replace(&self, slug: &str, mut record: UniversityRecord) -> Result<UniversityRecord> {
        let mut inner = self.inner.lock().unwrap();
        let existing = inner
            .records
            .iter_mut()
            .find(|r| r.slug == slug)
            .ok_or_else(|| AppError::UniversityNotFound { slug: slug.to_string() })?;
        record.slug = slug.to_string();
        *existing = record.clone();
        Ok(record)
    }

    async fn set_active(&self, slug: &str, is_active: bool) -> Result<UniversityRecord> {
        let mut inner = self.inner.lock().unwrap();
        let existing = inner
            .records
            .iter_mut()
            .find(|r| r.slug == slug)
            .ok_or_else(|| AppError::UniversityNotFound { slug: slug.to_string() })?;
        existing.is_active = is_active;
        Ok(existing.clone())
    }

    async fn upsert(&self, record: UniversityRecord) -> Result<UpsertOutcome> {
        let mut inner = self.inner.lock().unwrap();
        match inner.records.iter_mut().find(|r| r.slug == record.slug) {
            Some(existing) => {
                *existing = record;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                inner.records.push(record);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn ping(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseConnection {
                message: "store marked down".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        let created = Lead {
            id: uuid::Uuid::new_v4(),
            kind: lead.kind,
            full_name: lead.full_name,
            email: lead.email,
            phone: lead.phone,
            destination: lead.destination,
            organization: lead.organization,
            message: lead.message,
            created_at: chrono::Utc::now().fixed_offset(),
        };
        self.inner.lock().unwrap().leads.push(created.clone());
        Ok(created)
    }
}

fn app_with_config(store: MemoryStore, config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        universities: Arc::new(store.clone()),
        leads: Arc::new(store),
    };
    create_router(state, None)
}

pub fn test_app(store: MemoryStore) -> Router {
    app_with_config(store, AppConfig::default())
}

pub fn test_app_with_rate_limit(store: MemoryStore, per_second: u32, burst: u32) -> Router {
    let mut config = AppConfig::default();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = per_second;
    config.rate_limit.burst = burst;
    app_with_config(store, config)
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    call(app, request).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    payload: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    call(app, request).await
}

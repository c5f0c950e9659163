//! University directory and admin handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use unipath_common::{
    catalog::{self, DirectoryOptions, FilterCriteria, UniversityRecord},
    errors::{AppError, Result},
    metrics,
};

/// Directory listing response
#[derive(Serialize)]
pub struct ListingResponse {
    pub total: usize,
    pub results: Vec<UniversityRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRequest {
    pub is_active: bool,
}

/// List universities matching the query's facets
pub async fn list_universities(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<ListingResponse>> {
    let records = state
        .universities
        .fetch_all(state.config.catalog.include_inactive)
        .await?;
    let fetched = records.len();

    let start = Instant::now();
    let results = catalog::filter_owned(records, &criteria);
    let elapsed = start.elapsed();

    metrics::record_directory_query(elapsed.as_secs_f64(), criteria.active_facets(), results.len());

    tracing::debug!(
        fetched,
        results = results.len(),
        facets = criteria.active_facets(),
        filter_us = elapsed.as_micros() as u64,
        "Directory query"
    );

    Ok(Json(ListingResponse {
        total: results.len(),
        results,
    }))
}

/// Dropdown options; cities are scoped to `country` when given
pub async fn directory_options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<DirectoryOptions>> {
    let records = state
        .universities
        .fetch_all(state.config.catalog.include_inactive)
        .await?;

    Ok(Json(DirectoryOptions::compute(&records, &query.country)))
}

/// Get one university by slug
pub async fn get_university(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<UniversityRecord>> {
    let record = state
        .universities
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::UniversityNotFound { slug })?;

    Ok(Json(record))
}

/// Admin: create a university
pub async fn create_university(
    State(state): State<AppState>,
    Json(record): Json<UniversityRecord>,
) -> Result<(StatusCode, Json<UniversityRecord>)> {
    record.validate().map_err(AppError::from_validation)?;
    warn_unknown_country(&record);

    let created = state.universities.insert(record).await?;
    metrics::record_university_write("insert");

    tracing::info!(slug = %created.slug, country = %created.country, "University created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Admin: replace the whole document under `slug`
pub async fn replace_university(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(mut record): Json<UniversityRecord>,
) -> Result<Json<UniversityRecord>> {
    record.slug = slug.clone();
    record.validate().map_err(AppError::from_validation)?;
    warn_unknown_country(&record);

    let replaced = state.universities.replace(&slug, record).await?;
    metrics::record_university_write("replace");

    tracing::info!(slug = %replaced.slug, "University replaced");

    Ok(Json(replaced))
}

/// Admin: show or hide a university without touching the rest of it
pub async fn set_university_active(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<ActiveRequest>,
) -> Result<Json<UniversityRecord>> {
    let updated = state.universities.set_active(&slug, request.is_active).await?;
    metrics::record_university_write("toggle");

    tracing::info!(slug = %slug, is_active = request.is_active, "University visibility changed");

    Ok(Json(updated))
}

/// Countries outside the dropdown list are accepted but can only be found
/// through free-text search
fn warn_unknown_country(record: &UniversityRecord) {
    if !catalog::is_known_country(&record.country) {
        tracing::warn!(
            slug = %record.slug,
            country = %record.country,
            "Country is not offered by the directory filter"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get_json, send_json, test_app, MemoryStore};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn seeded() -> MemoryStore {
        MemoryStore::with_records(json!([
            {
                "slug": "sichuan-university",
                "name": "Sichuan University",
                "location": "Chengdu, Sichuan",
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
                "location": "Xi'an, Shaanxi",
                "country": "China",
                "city": "Xi'an",
                "intake": ["September"],
                "degree": ["Bachelor"],
                "taught": ["English"],
                "details": { "majors": ["Applied Physics"] }
            },
            {
                "slug": "hidden-college",
                "name": "Hidden College",
                "country": "UK",
                "city": "Leeds",
                "isActive": false
            }
        ]))
    }

    #[tokio::test]
    async fn test_list_all_active() {
        let (status, body) = get_json(test_app(seeded()), "/v1/universities").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["results"][0]["slug"], "sichuan-university");
        assert_eq!(body["results"][1]["slug"], "xidian-university");
    }

    #[tokio::test]
    async fn test_list_with_facets() {
        let (_, body) = get_json(test_app(seeded()), "/v1/universities?major=Applied%20Physics").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"][0]["name"], "Xidian University");

        let (_, body) = get_json(test_app(seeded()), "/v1/universities?search=SICHUAN").await;
        assert_eq!(body["total"], 1);

        let (_, body) = get_json(test_app(seeded()), "/v1/universities?degree=Masters").await;
        assert_eq!(body["total"], 0);

        let (_, body) = get_json(test_app(seeded()), "/v1/universities?country=China&taught=English").await;
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_options_scoped_by_country() {
        let (status, body) = get_json(test_app(seeded()), "/v1/universities/options?country=China").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cities"], json!(["Chengdu", "Xi'an"]));
        assert_eq!(body["majors"], json!(["Applied Physics", "Software Engineering"]));
        assert!(body["countries"].as_array().unwrap().contains(&json!("China")));
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let (status, body) = get_json(test_app(seeded()), "/v1/universities/xidian-university").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Xi'an");

        let (status, body) = get_json(test_app(seeded()), "/v1/universities/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNIVERSITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_then_duplicate() {
        let store = seeded();
        let payload = json!({
            "slug": "kyung-hee-university",
            "name": "Kyung Hee University",
            "country": "South Korea",
            "city": "Seoul",
            "intake": ["March", "September"]
        });

        let (status, body) =
            send_json(test_app(store.clone()), Method::POST, "/v1/universities", payload.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["isActive"], true);

        let (status, body) = send_json(test_app(store), Method::POST, "/v1/universities", payload).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "DUPLICATE_UNIVERSITY");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_slug() {
        let payload = json!({ "slug": "Bad Slug", "name": "Bad", "country": "China" });
        let (status, body) = send_json(test_app(seeded()), Method::POST, "/v1/universities", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "slug");
    }

    #[tokio::test]
    async fn test_replace_keeps_path_slug() {
        let store = seeded();
        let payload = json!({ "name": "Xidian University (Main Campus)", "country": "China", "city": "Xi'an" });

        let (status, body) = send_json(
            test_app(store.clone()),
            Method::PUT,
            "/v1/universities/xidian-university",
            payload,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "xidian-university");

        let (_, body) = get_json(test_app(store), "/v1/universities/xidian-university").await;
        assert_eq!(body["name"], "Xidian University (Main Campus)");
        assert_eq!(body["intake"], json!([]));
    }

    #[tokio::test]
    async fn test_replace_ignores_malformed_body_slug() {
        let store = seeded();
        let payload = json!({ "slug": "Not A Slug", "name": "Xidian University", "country": "China" });

        let (status, body) = send_json(
            test_app(store),
            Method::PUT,
            "/v1/universities/xidian-university",
            payload,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "xidian-university");
    }

    #[tokio::test]
    async fn test_replace_missing() {
        let payload = json!({ "slug": "ghost", "name": "Ghost", "country": "China" });
        let (status, _) = send_json(test_app(seeded()), Method::PUT, "/v1/universities/ghost", payload).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_toggle_visibility() {
        let store = seeded();
        let (status, body) = send_json(
            test_app(store.clone()),
            Method::PATCH,
            "/v1/universities/sichuan-university/active",
            json!({ "isActive": false }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isActive"], false);

        let (_, body) = get_json(test_app(store), "/v1/universities").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"][0]["slug"], "xidian-university");
    }
}

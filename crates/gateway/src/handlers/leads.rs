//! Lead capture handlers (contact and partnership forms)

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::AppState;
use unipath_common::{
    db::NewLead,
    errors::{AppError, Result},
    metrics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    Contact,
    Partnership,
}

impl LeadKind {
    fn as_str(&self) -> &'static str {
        match self {
            LeadKind::Contact => "contact",
            LeadKind::Partnership => "partnership",
        }
    }
}

/// Form submission
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_organization"))]
pub struct LeadRequest {
    pub kind: LeadKind,

    #[validate(length(min = 2, max = 120))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub destination: Option<String>,

    #[validate(length(max = 200))]
    pub organization: Option<String>,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: String,
    pub kind: String,
    pub received_at: String,
}

/// Partnership inquiries must name the organization
fn validate_organization(request: &LeadRequest) -> std::result::Result<(), ValidationError> {
    let named = request
        .organization
        .as_deref()
        .is_some_and(|o| !o.trim().is_empty());

    if request.kind == LeadKind::Partnership && !named {
        return Err(ValidationError::new("organization_required")
            .with_message("partnership inquiries require an organization".into()));
    }
    Ok(())
}

/// Capture a lead
pub async fn create_lead(
    State(state): State<AppState>,
    Json(request): Json<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>)> {
    request.validate().map_err(AppError::from_validation)?;

    let kind = request.kind.as_str();
    let lead = state
        .leads
        .create_lead(NewLead {
            kind: kind.to_string(),
            full_name: request.full_name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            phone: request.phone,
            destination: request.destination,
            organization: request.organization,
            message: request.message,
        })
        .await?;

    metrics::record_lead(kind);

    tracing::info!(
        lead_id = %lead.id,
        kind = kind,
        destination = ?lead.destination,
        "Lead captured"
    );

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            id: lead.id.to_string(),
            kind: lead.kind,
            received_at: lead.created_at.to_rfc3339(),
        }),
    ))
}

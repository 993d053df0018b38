//! # Requirements API

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::records::RequirementRecord;
use crate::service::CreateRequirement;
use crate::state::AppState;

/// Request to create a requirement.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequirementRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreateRequirementRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequirementList {
    pub requirements: Vec<RequirementRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequirementResponse {
    pub message: String,
    pub requirement: RequirementRecord,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/requirements",
        get(list_requirements).post(create_requirement),
    )
}

/// GET /requirements: All requirements with documents and derived status.
#[utoipa::path(
    get,
    path = "/requirements",
    responses(
        (status = 200, description = "Requirements with nested documents", body = RequirementList),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
async fn list_requirements(
    State(state): State<AppState>,
) -> Result<Json<RequirementList>, AppError> {
    let requirements = state.requirements.list().await?;
    Ok(Json(RequirementList { requirements }))
}

/// POST /requirements: Create a requirement.
#[utoipa::path(
    post,
    path = "/requirements",
    request_body = CreateRequirementRequest,
    responses(
        (status = 201, description = "Requirement created", body = RequirementResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "requirements"
)]
async fn create_requirement(
    State(state): State<AppState>,
    body: Result<Json<CreateRequirementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RequirementResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let requirement = state
        .requirements
        .create(CreateRequirement {
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequirementResponse {
            message: "Requirement created successfully".to_string(),
            requirement,
        }),
    ))
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use error_common::Code;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::duration::parse_go_duration;
use crate::error::{ApiError, ApiJson};
use crate::schemas::{MappingSchema, UpdateMappingRequest};
use crate::state::AppState;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("invalid token ID"))
}

pub async fn get_mapping(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MappingSchema>, ApiError> {
    let id = parse_id(&id)?;

    let mapping = state.mapping.get_mapping(id).await.map_err(|e| match e.code {
        Code::NotFound => {
            info!(id = %id, "mapping not found");
            ApiError::NotFound("mapping not found")
        }
        Code::InvalidArgument => ApiError::BadRequest("invalid arguments for get mapping"),
        Code::DeadlineExceeded => {
            info!(id = %id, "mapping expired");
            ApiError::NotFound("mapping expired")
        }
        _ => {
            error!(id = %id, error = %e, "failed to get mapping");
            ApiError::Internal("failed to get mapping")
        }
    })?;

    Ok(Json(MappingSchema::from(&mapping)))
}

pub async fn list_mappings(
    State(state): State<AppState>,
) -> Result<Json<Vec<MappingSchema>>, ApiError> {
    let mappings = state.mapping.list_mappings().await.map_err(|e| {
        error!(error = %e, "failed to get mapping list");
        ApiError::Internal("failed to get mapping list")
    })?;

    Ok(Json(mappings.iter().map(MappingSchema::from).collect()))
}

pub async fn update_mapping(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateMappingRequest>,
) -> Result<Json<MappingSchema>, ApiError> {
    let id = parse_id(&id)?;
    let token_ttl = parse_go_duration(&body.token_ttl)
        .map_err(|_| ApiError::BadRequest("invalid request body"))?;

    let mapping = state
        .mapping
        .update_mapping(id, token_ttl)
        .await
        .map_err(|e| match e.code {
            Code::NotFound => {
                info!(id = %id, "mapping not found");
                ApiError::NotFound("mapping not found")
            }
            Code::InvalidArgument => {
                warn!(id = %id, "invalid arguments for update mapping");
                ApiError::BadRequest("invalid arguments for update mapping")
            }
            _ => {
                error!(id = %id, error = %e, "failed to update mapping");
                ApiError::Internal("failed to update mapping")
            }
        })?;

    Ok(Json(MappingSchema::from(&mapping)))
}

pub async fn delete_mapping(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state.mapping.delete_mapping(id).await.map_err(|e| match e.code {
        Code::NotFound => {
            info!(id = %id, "mapping not found");
            ApiError::NotFound("mapping not found")
        }
        Code::InvalidArgument => ApiError::BadRequest("invalid arguments for delete mapping"),
        _ => {
            warn!(id = %id, error = %e, "failed to delete mapping");
            ApiError::Internal("failed to delete mapping")
        }
    })?;

    Ok(StatusCode::OK)
}

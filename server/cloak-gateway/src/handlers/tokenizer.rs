use axum::extract::State;
use axum::Json;
use error_common::Code;
use tracing::{error, info, warn};
use uuid::Uuid;

use mapping_store::NewMapping;

use crate::error::{ApiError, ApiJson};
use crate::schemas::{DetokenizeRequest, DetokenizeResponse, MappingSchema, TokenizeRequest};
use crate::state::AppState;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Tokenize: encrypt the payload, then persist the mapping. The mapping
/// identifier is the token handed back to the caller.
pub async fn tokenize(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TokenizeRequest>,
) -> Result<Json<MappingSchema>, ApiError> {
    let token_ttl = body
        .token_ttl
        .checked_mul(NANOS_PER_SEC)
        .filter(|ttl| *ttl > 0)
        .ok_or(ApiError::BadRequest("invalid arguments"))?;

    let sealed = state
        .tokenizer
        .tokenize(&body.plaintext, body.deterministic, body.reversible)
        .await
        .map_err(|e| match e.code {
            Code::InvalidArgument => {
                warn!(error = %e, "tokenize rejected");
                ApiError::BadRequest("invalid arguments")
            }
            _ => {
                error!(error = %e, "tokenize failed");
                ApiError::Internal("failed to tokenize")
            }
        })?;

    let mapping = state
        .mapping
        .create_mapping(&NewMapping {
            cipher_text: sealed.cipher_text,
            dek_wrapped: sealed.dek_wrapped,
            deterministic: body.deterministic,
            reversible: body.reversible,
            token_ttl,
        })
        .await
        .map_err(|e| match e.code {
            Code::AlreadyExists => {
                info!("token already exists");
                ApiError::Conflict("token already exists")
            }
            Code::InvalidArgument => ApiError::BadRequest("invalid arguments"),
            _ => {
                error!(error = %e, "failed to create mapping");
                ApiError::Internal("failed to tokenize")
            }
        })?;

    Ok(Json(MappingSchema::from(&mapping)))
}

/// Detokenize: resolve the token to its mapping, enforce the TTL, then
/// decrypt.
pub async fn detokenize(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DetokenizeRequest>,
) -> Result<Json<DetokenizeResponse>, ApiError> {
    let id =
        Uuid::parse_str(&body.token).map_err(|_| ApiError::BadRequest("invalid arguments"))?;

    let mapping = state.mapping.get_mapping(id).await.map_err(|e| match e.code {
        Code::NotFound => {
            info!(token = %id, "token not found");
            ApiError::NotFound("token not found")
        }
        Code::InvalidArgument => ApiError::BadRequest("invalid arguments"),
        Code::DeadlineExceeded => {
            info!(token = %id, "token expired");
            ApiError::NotFound("token expired")
        }
        _ => {
            error!(token = %id, error = %e, "failed to detokenize");
            ApiError::Internal("failed to detokenize")
        }
    })?;

    let plaintext = state
        .tokenizer
        .detokenize(&mapping.cipher_text, &mapping.dek_wrapped, mapping.deterministic)
        .await
        .map_err(|e| match e.code {
            Code::InvalidArgument => {
                warn!(token = %id, error = %e, "detokenize rejected");
                ApiError::BadRequest("invalid request body")
            }
            _ => {
                error!(token = %id, error = %e, "detokenize failed");
                ApiError::Internal("failed to detokenize")
            }
        })?;

    Ok(Json(DetokenizeResponse { plaintext }))
}

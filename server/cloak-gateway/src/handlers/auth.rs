use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use error_common::Code;
use tracing::{error, warn};
use uuid::Uuid;

use crate::cookies::{access_token_cookie, refresh_token_cookie};
use crate::error::{ApiError, ApiJson};
use crate::schemas::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse,
};
use crate::state::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user_id = state
        .auth
        .register(&body.login, &body.password, body.role_id)
        .await
        .map_err(|e| match e.code {
            Code::InvalidArgument => {
                warn!(login = %body.login, error = %e, "register rejected");
                ApiError::BadRequest("invalid request body")
            }
            Code::AlreadyExists => {
                warn!(login = %body.login, "login already registered");
                ApiError::Conflict("user with same login already exists")
            }
            _ => {
                error!(login = %body.login, error = %e, "failed to register user");
                ApiError::Internal("failed to register user")
            }
        })?;

    Ok(Json(RegisterResponse { user_id }))
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let (user_id, tokens) = state
        .auth
        .login(&body.login, &body.password)
        .await
        .map_err(|e| match e.code {
            Code::InvalidArgument => ApiError::BadRequest("invalid request body"),
            Code::Unauthenticated => {
                warn!(login = %body.login, "invalid credentials");
                ApiError::InvalidCredentials
            }
            _ => {
                error!(login = %body.login, error = %e, "failed to login");
                ApiError::Internal("failed to login")
            }
        })?;

    let jar = jar
        .add(access_token_cookie(
            tokens.access_token.clone(),
            state.cookies.access_max_age_secs,
        ))
        .add(refresh_token_cookie(
            tokens.refresh_token.clone(),
            state.cookies.refresh_max_age_secs,
        ));

    Ok((
        jar,
        Json(LoginResponse {
            user_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let tokens = state
        .auth
        .refresh(&body.refresh_token)
        .await
        .map_err(|e| match e.code {
            Code::InvalidArgument => ApiError::BadRequest("invalid request body"),
            Code::Unauthenticated => {
                warn!(error = %e, "refresh rejected");
                ApiError::BadRequest("failed to refresh token")
            }
            _ => {
                error!(error = %e, "failed to refresh token");
                ApiError::Internal("failed to refresh token")
            }
        })?;

    Ok(Json(RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

pub async fn is_admin(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<IsAdminRequest>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    let user_id = Uuid::parse_str(&body.user_id)
        .map_err(|_| ApiError::BadRequest("invalid request body"))?;

    let result = state.auth.is_admin(user_id).await.map_err(|e| match e.code {
        Code::InvalidArgument => ApiError::BadRequest("invalid request body"),
        Code::NotFound => {
            warn!(user_id = %user_id, "user not found for admin check");
            ApiError::BadRequest("failed to check if user is admin")
        }
        _ => {
            error!(user_id = %user_id, error = %e, "failed to check if user is admin");
            ApiError::Internal("failed to check if user is admin")
        }
    })?;

    Ok(Json(IsAdminResponse { result }))
}

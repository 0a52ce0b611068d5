//! Access-token middleware for protected routes.
//!
//! A request arrives with a bearer header or an `access_token` cookie. A
//! missing, malformed or expired token triggers exactly one refresh
//! attempt against the `refresh_token` cookie; on success the new access
//! token is re-armed on the in-flight request's Authorization header and
//! both cookies are set on the response. A refresh token presented where
//! an access token belongs is rejected outright.

use axum::extract::{Request, State};
use axum::http::header::{HeaderValue, AUTHORIZATION, SET_COOKIE};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, warn};

use auth_identity::{SessionClaims, SessionTokens};

use crate::cookies::{
    access_token_cookie, refresh_token_cookie, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    eprintln!("DEBUG: require_auth entered for {}", request.uri().path());
    let presented = extract_access_token(&request, &jar);
    let mut issued: Option<SessionTokens> = None;

    let claims = ensure_valid_access_token(&state, &jar, presented, &mut issued).await?;
    debug!(user_id = %claims.sub, "request authenticated");

    if let Some(pair) = &issued {
        set_bearer(&mut request, &pair.access_token);
    }

    let mut response = next.run(request).await;

    if let Some(pair) = issued {
        append_cookie(
            &mut response,
            access_token_cookie(pair.access_token, state.cookies.access_max_age_secs),
        );
        append_cookie(
            &mut response,
            refresh_token_cookie(pair.refresh_token, state.cookies.refresh_max_age_secs),
        );
    }

    Ok(response)
}

async fn ensure_valid_access_token(
    state: &AppState,
    jar: &CookieJar,
    presented: Option<String>,
    issued: &mut Option<SessionTokens>,
) -> Result<SessionClaims, ApiError> {
    if let Some(token) = presented {
        match state.signer.verify(&token) {
            Ok(claims) if !claims.is_refresh => return Ok(claims),
            Ok(_) => return Err(ApiError::BadRequest("invalid access token")),
            Err(e) => debug!(error = %e, "access token rejected, trying refresh"),
        }
    }

    // Single refresh attempt; a second failure rejects the request.
    let pair = refresh_from_cookie(state, jar).await?;
    let claims = state
        .signer
        .verify(&pair.access_token)
        .map_err(|_| ApiError::Unauthorized)?;
    if claims.is_refresh {
        return Err(ApiError::BadRequest("invalid access token"));
    }

    *issued = Some(pair);
    Ok(claims)
}

async fn refresh_from_cookie(state: &AppState, jar: &CookieJar) -> Result<SessionTokens, ApiError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    state.auth.refresh(&refresh_token).await.map_err(|e| {
        warn!(code = %e.code, "refresh attempt failed");
        ApiError::Unauthorized
    })
}

fn extract_access_token(request: &Request, jar: &CookieJar) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    from_header
        .or_else(|| jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .filter(|t| !t.is_empty())
}

fn set_bearer(request: &mut Request, access_token: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {access_token}")) {
        request.headers_mut().insert(AUTHORIZATION, value);
    }
}

fn append_cookie(response: &mut Response, cookie: Cookie<'static>) {
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}

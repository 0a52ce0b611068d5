use axum::extract::Request;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{auth, mappings, tokenizer};
use crate::middleware::require_auth;
use crate::state::AppState;

/// `/api/v1` route tree. Auth endpoints are public; tokenizer and mapping
/// endpoints sit behind the access-token middleware.
pub fn router(state: AppState) -> Router {
    eprintln!("DEBUG: router() called");
    let auth_routes = Router::new()
        .route("/signUp", post(auth::sign_up))
        .route("/signIn", post(auth::sign_in))
        .route("/refresh", post(auth::refresh));

    let user_routes = Router::new().route("/isAdmin", post(auth::is_admin));

    let tokenizer_routes = Router::new()
        .route("/tokenize", post(tokenizer::tokenize))
        .route("/detokenize", post(tokenizer::detokenize))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let mapping_routes = Router::new()
        .route("/", get(mappings::list_mappings))
        .route(
            "/:id",
            get(mappings::get_mapping)
                .patch(mappings::update_mapping)
                .delete(mappings::delete_mapping),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes)
        .nest("/tokenizer", tokenizer_routes)
        .nest("/mappings", mapping_routes);

    Router::new()
        .nest("/api/v1", api)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

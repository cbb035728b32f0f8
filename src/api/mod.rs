// REST API endpoints for the gateway

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

use crate::auth::{RejectionBody, RequestIdentity, bearer_token, flexible_auth};
use crate::state::AppState;
use crate::supabase::ScopedClient;

/// Build the full router: `/health` is public, everything under `/api` sits
/// behind the flexible auth dispatcher.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/session", get(session))
        .route("/interviews/{id}", get(get_interview))
        .route("/interviews/{id}/share", post(share_interview))
        .layer(from_fn_with_state(state.clone(), flexible_auth))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Echo the verified principal for the current request.
async fn session(identity: RequestIdentity) -> Json<Value> {
    Json(serde_json::json!({
        "success": true,
        "user": identity,
    }))
}

/// Fetch one interview row through the caller's data client.
///
/// Scoped callers already carry a client bound to their token; provider
/// callers get one bound on demand. Either way the data store's row-level
/// policy decides what the caller may see — an out-of-scope interview simply
/// comes back as no rows.
async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    scoped: Option<Extension<ScopedClient>>,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    let client = match scoped {
        Some(Extension(client)) => client,
        None => {
            // The dispatcher already authenticated this request; the header
            // is only re-read for the raw token string.
            let token = bearer_token(&headers).map_err(IntoResponse::into_response)?;
            state.scoped_clients.bind(token)
        }
    };

    let filter = format!("eq.{id}");
    let rows = client
        .select("interviews", "*", &[("id", &filter)])
        .await
        .map_err(|e| {
            error!(error = %e, interview_id = %id, "interview lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(RejectionBody::new("Data store unavailable")),
            )
                .into_response()
        })?;

    match rows.into_iter().next() {
        Some(interview) => Ok(Json(serde_json::json!({
            "success": true,
            "interview": interview,
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(RejectionBody::new("Interview not found")),
        )
            .into_response()),
    }
}

/// Mint a public interview token for sharing.
///
/// Handler-level authorization: scoped callers cannot mint further tokens.
async fn share_interview(
    State(state): State<AppState>,
    identity: RequestIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Response> {
    if identity.is_public_interviewee() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(RejectionBody::new(
                "Public interview tokens cannot mint new tokens",
            )),
        )
            .into_response());
    }

    let token = state.issuer.issue(id).map_err(|e| {
        error!(error = %e, interview_id = %id, "token minting failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RejectionBody::new("Could not mint interview token")),
        )
            .into_response()
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "token": token,
        "expires_in": state.issuer.ttl_seconds(),
    })))
}

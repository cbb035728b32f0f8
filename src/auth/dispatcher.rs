//! The flexible auth middleware: classify → verify → build-context-or-delegate.

use crate::auth::classifier::{TokenClass, bearer_token, classify};
use crate::auth::context::RequestIdentity;
use crate::auth::verifier::verify_scoped;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

/// Authenticate a request that may carry either a provider-issued token or a
/// locally-signed scoped interview token, without the caller saying which.
///
/// Control flows strictly left to right with no backtracking. Every local
/// failure becomes a terminal 401 at the point of detection; delegated
/// failures are returned exactly as the collaborators produced them.
pub async fn flexible_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_owned(),
        Err(e) => return e.into_response(),
    };

    let class = match classify(&token) {
        Ok(class) => class,
        Err(e) => return e.into_response(),
    };

    if class == TokenClass::LocalScoped {
        let claims = match verify_scoped(&token, &state.signing_key) {
            Ok(claims) => claims,
            Err(e) => {
                // Terminal: a token in the local trust domain that fails
                // local verification never falls back to the provider.
                debug!(error = %e, "scoped token verification failed");
                return e.into_response();
            }
        };

        if claims.is_public_interviewee() {
            // Scoped grant: this is the authorization decision for the
            // request. The provider chain never runs.
            let identity = RequestIdentity::from_scoped_claims(&claims);
            let data_client = state.scoped_clients.bind(&token);

            debug!(subject = %identity.id, "scoped interview access granted");
            req.extensions_mut().insert(identity);
            req.extensions_mut().insert(data_client);
            return next.run(req).await;
        }

        // A correctly-signed local token that is not a scoped grant falls
        // through to provider verification instead of being rejected, to
        // keep room for other locally-signed token kinds. Unusual enough to
        // flag every time it happens.
        warn!(
            role = claims.role.as_deref().unwrap_or("<none>"),
            "locally-signed token without scoped-access role, deferring to provider"
        );
    }

    // Delegated path: identity verification, then tier authorization, in
    // that order, short-circuiting on the first failure.
    let identity = match state.identity.verify(&token).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(response) = state.tiers.authorize(&identity, &token).await {
        return response;
    }

    req.extensions_mut().insert(identity);
    next.run(req).await
}

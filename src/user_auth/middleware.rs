use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::{state::AppState, types::ApiError};

/// Resolve the bearer token to an [`crate::account::Account`] and inject it
/// into the request extensions.
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let account = state
        .user_auth
        .authenticate(auth_header)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "Bearer authentication failed"))?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

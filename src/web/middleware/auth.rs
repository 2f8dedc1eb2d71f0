use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use tracing::warn;

use crate::web::AppState;
use crate::web::models::{AuthenticatedUser, Claims};

/// Attaches an [`AuthenticatedUser`] extension when the request carries a
/// valid token. Requests without one pass through unchanged; handlers decide
/// whether they need an identity.
pub async fn identify(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    // Try to get token from Authorization header first, then fall back to cookie
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()));

    if let Some(token) = token {
        match decode_user(&token, &state.config.jwt_secret) {
            Some(user) => {
                req.extensions_mut().insert(user);
            }
            None => warn!("Ignoring invalid session token."),
        }
    }

    next.run(req).await
}

fn decode_user(token: &str, jwt_secret: &str) -> Option<AuthenticatedUser> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding error during auth middleware.");
    })
    .ok()?;

    Some(AuthenticatedUser {
        id: token_data.claims.user_id,
        username: token_data.claims.sub,
    })
}

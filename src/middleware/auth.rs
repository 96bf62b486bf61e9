use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated tenant context extracted from the session credential
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            company_id: claims.company_id,
        }
    }
}

/// Session middleware: validates the signed session cookie and injects the
/// tenant context. Every protected route sees an `AuthSession` or a 401.
pub async fn session_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let claims =
        auth::verify_token(&token).map_err(|_| ApiError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(AuthSession::from(claims));

    Ok(next.run(request).await)
}

/// Pull the session JWT from the session cookie; a Bearer header is
/// accepted as a fallback for non-browser clients.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    session_cookie_value(headers).or_else(|| bearer_token(headers))
}

fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let cookie_name = config::config().security.session_cookie_name.as_str();

    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == cookie_name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::ApiError;
use crate::services::{CompanyService, UserService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/signup - Register a company and its first user
///
/// Creates the company (slug derived from the name) and the account holder
/// in one flow, then issues the session cookie so the editor opens without
/// a separate login.
pub async fn signup(Json(payload): Json<SignupRequest>) -> Result<impl IntoResponse, ApiError> {
    if payload.email.trim().is_empty()
        || payload.password.is_empty()
        || payload.company_name.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            "email, password and companyName are required",
        ));
    }

    let users = UserService::new().await?;
    if users.find_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let company = CompanyService::new().await?.create(&payload.company_name).await?;
    let user = users.create(&payload.email, &password_hash, company.id).await?;

    tracing::info!("Company '{}' signed up as /{}", company.name, company.slug);

    let token = auth::generate_token(auth::Claims::new(user.id, company.id))?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, auth::session_cookie(&token))]),
        Json(json!({ "message": "Signup successful" })),
    ))
}

/// POST /api/auth/login - Authenticate and receive the session cookie
///
/// Unknown email and wrong password are the same 401; nothing here reveals
/// which accounts exist.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let user = UserService::new()
        .await?
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::generate_token(auth::Claims::new(user.id, user.company_id))?;

    Ok((
        AppendHeaders([(SET_COOKIE, auth::session_cookie(&token))]),
        Json(json!({ "message": "Login successful" })),
    ))
}

/// POST /api/auth/logout - Expire the session cookie
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, auth::clear_session_cookie())]),
        Json(json!({ "message": "Logged out" })),
    )
}

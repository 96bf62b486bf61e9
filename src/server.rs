use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::DatabaseManager;
use crate::handlers;
use crate::middleware::session_auth_middleware;

pub fn app() -> Router {
    let config = config::config();

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (session cookie issuance)
        .merge(auth_routes())
        // Jobs listing and seed
        .merge(jobs_routes())
        // Protected editor API
        .merge(section_routes())
        .merge(company_routes())
        // Public careers pages, slug-first so it goes last
        .merge(careers_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
}

/// Cookies only cross origins with credentials, so the CORS policy is an
/// explicit origin list rather than a wildcard.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn auth_routes() -> Router {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

fn jobs_routes() -> Router {
    use handlers::public::jobs;

    Router::new()
        .route("/api/v1/jobs", get(jobs::list))
        .route("/api/v1/jobs/seed", post(jobs::seed))
}

fn section_routes() -> Router {
    use handlers::protected::sections;

    Router::new()
        .route(
            "/api/sections",
            get(sections::list).post(sections::create),
        )
        // Static segment beats the :id pattern below
        .route("/api/sections/reorder", put(sections::reorder))
        .route(
            "/api/sections/:id",
            put(sections::update).delete(sections::delete),
        )
        .route_layer(middleware::from_fn(session_auth_middleware))
}

fn company_routes() -> Router {
    use handlers::protected::company;

    Router::new()
        .route("/api/company/me", get(company::me))
        .route("/api/company/branding", put(company::update_branding))
        .route("/api/company/publish", put(company::publish))
        .route("/api/company/preview", get(company::preview))
        .route_layer(middleware::from_fn(session_auth_middleware))
}

fn careers_routes() -> Router {
    use handlers::public::careers;

    Router::new().route("/:company_slug/careers", get(careers::careers_page))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "CareerBuilder API (Rust)",
        "version": version,
        "description": "Multi-tenant career page builder backend",
        "endpoints": {
            "home": "/ (public)",
            "auth": "/api/auth/signup, /api/auth/login, /api/auth/logout (public)",
            "careers": "/:slug/careers (public)",
            "jobs": "/api/v1/jobs (public)",
            "sections": "/api/sections[/:id], /api/sections/reorder (protected)",
            "company": "/api/company/me|branding|publish|preview (protected)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

pub async fn serve() -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting CareerBuilder API in {:?} mode", config.environment);

    // The server still comes up without a reachable database; /health
    // reports degraded until it appears.
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("Skipping migrations, database not ready: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("CAREERS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("CareerBuilder API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

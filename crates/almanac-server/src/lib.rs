//! Almanac Web Server
//!
//! Axum-based JSON API over the Almanac engine. Callers post a user's
//! transactions and budgets; the server computes totals, budget progress and
//! holiday insights and keeps an insight cache per user.
//!
//! - Request tracing and CORS via tower-http
//! - Sanitized error responses (internal errors are logged, never returned)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use almanac_core::{Engine, HolidayCalendar};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub engine: Engine,
    /// Calendar used when a request carries no holidays of its own
    pub calendar: HolidayCalendar,
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(engine: Engine, calendar: HolidayCalendar, config: ServerConfig) -> Router {
    let cors = build_cors(&config);
    let state = Arc::new(AppState { engine, calendar });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Aggregation
        .route("/stats/transactions", post(handlers::transaction_stats))
        // Budgets
        .route("/budgets/progress", post(handlers::budget_progress))
        // Holidays
        .route("/holidays", get(handlers::list_holidays))
        .route("/insights/holidays", post(handlers::holiday_insights))
        // Cache
        .route("/cache/users/:user_id", delete(handlers::invalidate_user_cache));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        cors
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve(engine: Engine, calendar: HolidayCalendar, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(engine, calendar, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    engine: Engine,
    calendar: HolidayCalendar,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!(
        events = calendar.len(),
        version = %calendar.version(),
        cache = engine.cache().is_enabled(),
        "Holiday calendar ready"
    );

    let app = create_router(engine, calendar, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<almanac_core::Error> for AppError {
    fn from(err: almanac_core::Error) -> Self {
        use almanac_core::Error;

        match err {
            Error::InvalidInput(_) | Error::InvalidBudget { .. } | Error::Config(_) => {
                Self::unprocessable(&err.to_string())
            }
            Error::NotFound(_) => Self::not_found(&err.to_string()),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;

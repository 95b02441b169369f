//! Axum router configuration with middleware.
//!
//! HTML pages live at the root; JSON endpoints are under `/api/v1/`.
//! Middleware: CORS on the API, request tracing everywhere.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/profile/fields", get(handlers::fields::get_profile_fields))
        .layer(cors);

    Router::new()
        .route("/", get(|| async { Redirect::to("/donate") }))
        .route(
            "/profile",
            get(handlers::profile::show_profile).post(handlers::profile::update_profile),
        )
        .route(
            "/donate",
            get(handlers::donation::show_donation_form).post(handlers::donation::submit_donation),
        )
        .route("/login", post(handlers::login::login))
        .route("/logout", post(handlers::login::logout))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database round trip.
async fn health_check(State(state): State<AppState>) -> (StatusCode, axum::Json<serde_json::Value>) {
    let database = sqlx::query("SELECT 1").execute(&state.db_pool.reader).await;
    let (status, db) = match database {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!("health check database error: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        axum::Json(serde_json::json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "database": db,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

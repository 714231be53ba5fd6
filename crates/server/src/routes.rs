use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod categories;
pub mod expenses;
pub mod payment_methods;
pub mod summary;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: static dashboard assets, health, and
/// the JSON API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    let api = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id/contribution", put(users::update_contribution))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/api/payment-methods",
            get(payment_methods::list_payment_methods).post(payment_methods::create_payment_method),
        )
        .route(
            "/api/payment-methods/:id",
            put(payment_methods::update_payment_method)
                .delete(payment_methods::delete_payment_method),
        )
        .route(
            "/api/expenses/fixed",
            get(expenses::list_fixed).post(expenses::create_fixed),
        )
        .route("/api/expenses/fixed/:id", put(expenses::update_fixed))
        .route("/api/expenses", get(expenses::list_monthly))
        .route("/api/expenses/variable", post(expenses::create_variable))
        .route("/api/expenses/variable/:id", put(expenses::update_variable))
        .route("/api/expenses/:id", delete(expenses::delete_expense))
        .route("/api/rollover", post(expenses::rollover))
        .route("/api/summary", get(summary::month_summary));

    Router::new()
        .nest_service("/", static_dir)
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

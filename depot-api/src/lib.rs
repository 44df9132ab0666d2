use axum::{http::Method, routing::get, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod error;
pub mod pack_slips;
pub mod pick_lists;
pub mod shipping_labels;
pub mod state;
pub mod summary_handler;

pub use state::AppState;

/// `?orderId=` on the list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub order_id: Option<Uuid>,
}

/// Body of the collaborator-owned status endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusChange<S> {
    pub status: S,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::USER_AGENT]);

    Router::new()
        .route("/health", get(health))
        .merge(pick_lists::routes())
        .merge(pack_slips::routes())
        .merge(shipping_labels::routes())
        .merge(summary_handler::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use depot_fulfillment::{FulfillmentSummary, SummaryFilter};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub warehouse_id: Option<Uuid>,
    pub status: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/fulfillment/summary", get(get_summary))
}

async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<FulfillmentSummary>, AppError> {
    let filter = SummaryFilter {
        warehouse_id: query.warehouse_id,
        status: query.status.filter(|s| !s.trim().is_empty()),
    };
    Ok(Json(state.registry.summary(&filter).await?))
}

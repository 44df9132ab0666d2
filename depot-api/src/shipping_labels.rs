use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use depot_fulfillment::wire::{CreateShippingLabelRequest, ShippingLabelDto};
use depot_fulfillment::ShippingLabelStatus;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::{OrderQuery, StatusChange};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/shipping-labels", post(create_shipping_label).get(list_shipping_labels))
        .route("/v1/shipping-labels/{id}", get(get_shipping_label))
        .route("/v1/shipping-labels/{id}/status", post(change_status))
}

async fn create_shipping_label(
    State(state): State<AppState>,
    Json(request): Json<CreateShippingLabelRequest>,
) -> Result<(StatusCode, Json<ShippingLabelDto>), AppError> {
    let order = state.order(request.order_id).await?;
    let label = state.registry.create_shipping_label(&order, request).await?;
    Ok((StatusCode::CREATED, Json(ShippingLabelDto::from(&label))))
}

async fn list_shipping_labels(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<ShippingLabelDto>>, AppError> {
    let labels = state.registry.shipping_labels(query.order_id).await?;
    Ok(Json(labels.iter().map(ShippingLabelDto::from).collect()))
}

async fn get_shipping_label(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShippingLabelDto>, AppError> {
    let label = state.registry.shipping_label(id).await?;
    Ok(Json(ShippingLabelDto::from(&label)))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<ShippingLabelStatus>>,
) -> Result<Json<ShippingLabelDto>, AppError> {
    let label = state.registry.transition_shipping_label(id, change.status).await?;
    Ok(Json(ShippingLabelDto::from(&label)))
}

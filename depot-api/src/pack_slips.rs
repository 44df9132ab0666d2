use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use depot_fulfillment::wire::{CreatePackSlipRequest, PackSlipDto};
use depot_fulfillment::PackSlipStatus;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::{OrderQuery, StatusChange};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pack-slips", post(create_pack_slip).get(list_pack_slips))
        .route("/v1/pack-slips/{id}", get(get_pack_slip))
        .route("/v1/pack-slips/{id}/status", post(change_status))
}

async fn create_pack_slip(
    State(state): State<AppState>,
    Json(request): Json<CreatePackSlipRequest>,
) -> Result<(StatusCode, Json<PackSlipDto>), AppError> {
    let order = state.order(request.order_id).await?;
    let pack_slip = state.registry.create_pack_slip(&order, request).await?;
    Ok((StatusCode::CREATED, Json(PackSlipDto::from(&pack_slip))))
}

async fn list_pack_slips(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<PackSlipDto>>, AppError> {
    let slips = state.registry.pack_slips(query.order_id).await?;
    Ok(Json(slips.iter().map(PackSlipDto::from).collect()))
}

async fn get_pack_slip(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PackSlipDto>, AppError> {
    let pack_slip = state.registry.pack_slip(id).await?;
    Ok(Json(PackSlipDto::from(&pack_slip)))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<PackSlipStatus>>,
) -> Result<Json<PackSlipDto>, AppError> {
    let pack_slip = state.registry.transition_pack_slip(id, change.status).await?;
    Ok(Json(PackSlipDto::from(&pack_slip)))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use depot_fulfillment::wire::{CreatePickListRequest, PickListDto};
use depot_fulfillment::PickListStatus;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::{OrderQuery, StatusChange};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_to: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPickRequest {
    pub order_line_id: Uuid,
    pub picked_quantity: u32,
    #[serde(default)]
    pub skipped: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pick-lists", post(create_pick_list).get(list_pick_lists))
        .route("/v1/pick-lists/{id}", get(get_pick_list))
        .route("/v1/pick-lists/{id}/status", post(change_status))
        .route("/v1/pick-lists/{id}/assign", post(assign))
        .route("/v1/pick-lists/{id}/picks", post(record_pick))
}

async fn create_pick_list(
    State(state): State<AppState>,
    Json(request): Json<CreatePickListRequest>,
) -> Result<(StatusCode, Json<PickListDto>), AppError> {
    let order = state.order(request.order_id).await?;
    let pick_list = state.registry.create_pick_list(&order, request).await?;
    Ok((StatusCode::CREATED, Json(PickListDto::from(&pick_list))))
}

async fn list_pick_lists(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<PickListDto>>, AppError> {
    let lists = state.registry.pick_lists(query.order_id).await?;
    Ok(Json(lists.iter().map(PickListDto::from).collect()))
}

async fn get_pick_list(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PickListDto>, AppError> {
    let pick_list = state.registry.pick_list(id).await?;
    Ok(Json(PickListDto::from(&pick_list)))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange<PickListStatus>>,
) -> Result<Json<PickListDto>, AppError> {
    let pick_list = state.registry.transition_pick_list(id, change.status).await?;
    Ok(Json(PickListDto::from(&pick_list)))
}

async fn assign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<PickListDto>, AppError> {
    if request.assigned_to.trim().is_empty() {
        return Err(AppError::ValidationError("assignedTo must not be empty".to_string()));
    }
    let pick_list = state.registry.assign_pick_list(id, request.assigned_to).await?;
    Ok(Json(PickListDto::from(&pick_list)))
}

async fn record_pick(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPickRequest>,
) -> Result<Json<PickListDto>, AppError> {
    let pick_list = state
        .registry
        .record_pick(id, request.order_line_id, request.picked_quantity, request.skipped)
        .await?;
    Ok(Json(PickListDto::from(&pick_list)))
}

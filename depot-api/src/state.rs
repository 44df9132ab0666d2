use depot_core::{Order, OrderSource};
use depot_fulfillment::FulfillmentRegistry;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub registry: FulfillmentRegistry,
    pub orders: Arc<dyn OrderSource>,
}

impl AppState {
    /// The order a create request allocates from.
    pub async fn order(&self, id: Uuid) -> Result<Order, AppError> {
        self.orders
            .get_order(id)
            .await
            .map_err(|e| AppError::InternalServerError(format!("Order source failed: {}", e)))?
            .ok_or_else(|| AppError::NotFoundError(format!("Order {} not found", id)))
    }
}

use depot_core::{Order, OrderSource, Warehouse, WarehouseDirectory};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Read side of the order and warehouse collaborators as the builders see it.
/// A failed fetch is logged and reads as "nothing available".
#[derive(Clone)]
pub struct MasterData {
    orders: Arc<dyn OrderSource>,
    warehouses: Arc<dyn WarehouseDirectory>,
}

impl MasterData {
    pub fn new(orders: Arc<dyn OrderSource>, warehouses: Arc<dyn WarehouseDirectory>) -> Self {
        Self { orders, warehouses }
    }

    pub async fn orders(&self) -> Vec<Order> {
        match self.orders.list_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!("No orders available: {}", e);
                Vec::new()
            }
        }
    }

    /// Orders with at least one line left to fulfill.
    pub async fn pickable_orders(&self) -> Vec<Order> {
        self.orders().await.into_iter().filter(Order::has_remaining).collect()
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        match self.orders.get_order(id).await {
            Ok(order) => order,
            Err(e) => {
                warn!("Order {} unavailable: {}", id, e);
                None
            }
        }
    }

    pub async fn warehouses(&self) -> Vec<Warehouse> {
        match self.warehouses.list_warehouses().await {
            Ok(warehouses) => warehouses,
            Err(e) => {
                warn!("No warehouses available: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn default_warehouse(&self) -> Option<Warehouse> {
        self.warehouses().await.into_iter().find(|w| w.is_default)
    }
}

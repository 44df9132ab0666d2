use async_trait::async_trait;
use uuid::Uuid;

use crate::order::Order;
use crate::warehouse::Warehouse;

/// Read-only access to orders owned by the order-management collaborator.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_order(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Read-only access to warehouse master data.
#[async_trait]
pub trait WarehouseDirectory: Send + Sync {
    async fn list_warehouses(
        &self,
    ) -> Result<Vec<Warehouse>, Box<dyn std::error::Error + Send + Sync>>;
}

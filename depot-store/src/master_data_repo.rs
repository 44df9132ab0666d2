use async_trait::async_trait;
use depot_core::resource::fetch_resource;
use depot_core::{Order, OrderSource, ResourceClient, ResourceError, Warehouse, WarehouseDirectory};
use std::sync::Arc;
use uuid::Uuid;

pub const ORDERS_PATH: &str = "/v1/orders";
pub const WAREHOUSES_PATH: &str = "/v1/warehouses";

/// Orders read from the order-management API.
#[derive(Clone)]
pub struct ApiOrderSource {
    client: Arc<dyn ResourceClient>,
}

impl ApiOrderSource {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderSource for ApiOrderSource {
    async fn list_orders(&self) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(fetch_resource(self.client.as_ref(), ORDERS_PATH).await?)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let path = format!("{}/{}", ORDERS_PATH, id);
        match fetch_resource(self.client.as_ref(), &path).await {
            Ok(order) => Ok(Some(order)),
            Err(ResourceError::Rejected { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Warehouses read from the order-management API.
#[derive(Clone)]
pub struct ApiWarehouseDirectory {
    client: Arc<dyn ResourceClient>,
}

impl ApiWarehouseDirectory {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WarehouseDirectory for ApiWarehouseDirectory {
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(fetch_resource(self.client.as_ref(), WAREHOUSES_PATH).await?)
    }
}

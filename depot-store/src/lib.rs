pub mod app_config;
pub mod events;
pub mod http_client;
pub mod master_data_repo;
pub mod redis_repo;

pub use app_config::Config;
pub use events::{EventProducer, KafkaReconciler};
pub use http_client::HttpResourceClient;
pub use master_data_repo::{ApiOrderSource, ApiWarehouseDirectory};
pub use redis_repo::RedisFulfillmentRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored document is invalid: {0}")]
    Corrupt(#[from] depot_fulfillment::wire::WireError),
}

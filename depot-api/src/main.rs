use anyhow::Context;
use depot_api::{app, AppState};
use depot_fulfillment::{
    FulfillmentRegistry, FulfillmentRepository, InMemoryFulfillmentRepository, LoggingReconciler, Reconciler,
};
use depot_store::{ApiOrderSource, Config, EventProducer, HttpResourceClient, KafkaReconciler, RedisFulfillmentRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "depot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Depot API on port {}", config.server.port);

    let repository: Arc<dyn FulfillmentRepository> = match &config.redis {
        Some(redis) => Arc::new(RedisFulfillmentRepository::new(&redis.url).context("Invalid Redis URL")?),
        None => {
            tracing::warn!("No Redis configured, documents are kept in memory");
            Arc::new(InMemoryFulfillmentRepository::new())
        }
    };

    let reconciler: Arc<dyn Reconciler> = match &config.kafka {
        Some(kafka) => {
            let producer = EventProducer::new(&kafka.brokers).context("Failed to create Kafka producer")?;
            Arc::new(KafkaReconciler::new(producer, kafka.topic.clone()))
        }
        None => Arc::new(LoggingReconciler),
    };

    let upstream = HttpResourceClient::new(config.upstream.base_url.clone(), config.upstream.timeout_seconds)
        .context("Failed to build upstream client")?;

    let state = AppState {
        registry: FulfillmentRegistry::new(repository, reconciler).with_numbering(config.numbering.clone().into()),
        orders: Arc::new(ApiOrderSource::new(Arc::new(upstream))),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

use async_trait::async_trait;
use depot_fulfillment::models::{PackSlip, PickList, ShippingLabel};
use depot_fulfillment::reconcile::{pack_slip_event, pick_list_event, shipping_label_event, Reconciler};
use depot_shared::FulfillmentEvent;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{error, info};

use crate::StoreError;

#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    pub fn new(brokers: &str) -> Result<Self, StoreError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    pub async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), StoreError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                info!(
                    "Sent message to {}/{}: partition {} offset {}",
                    topic, key, delivery.partition, delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", topic, e);
                Err(e.into())
            }
        }
    }
}

/// Hands each created document to whoever owns upstream quantities by
/// publishing a [`FulfillmentEvent`] keyed by order id.
#[derive(Clone)]
pub struct KafkaReconciler {
    producer: EventProducer,
    topic: String,
}

impl KafkaReconciler {
    pub fn new(producer: EventProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }

    async fn emit(&self, event: FulfillmentEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = serde_json::to_string(&event)?;
        let key = event.key().to_string();
        self.producer.publish(&self.topic, &key, &payload).await?;
        info!(event = event.name(), order_id = %key, "Fulfillment event published");
        Ok(())
    }
}

#[async_trait]
impl Reconciler for KafkaReconciler {
    async fn pick_list_created(&self, pick_list: &PickList) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emit(pick_list_event(pick_list)).await
    }

    async fn pack_slip_created(&self, pack_slip: &PackSlip) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emit(pack_slip_event(pack_slip)).await
    }

    async fn shipping_label_created(
        &self,
        label: &ShippingLabel,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emit(shipping_label_event(label)).await
    }
}

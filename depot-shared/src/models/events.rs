use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickListCreatedEvent {
    pub pick_list_id: Uuid,
    pub pick_list_number: String,
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub lines: Vec<LineQuantity>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackSlipCreatedEvent {
    pub pack_slip_id: Uuid,
    pub pack_slip_number: String,
    pub order_id: Uuid,
    pub pick_list_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    pub lines: Vec<LineQuantity>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLabelCreatedEvent {
    pub label_id: Uuid,
    pub label_number: String,
    pub order_id: Uuid,
    pub pack_slip_id: Option<Uuid>,
    pub carrier: String,
    pub tracking_number: Option<String>,
    pub timestamp: i64,
}

/// Quantity allocated against a single order line by a fulfillment document.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineQuantity {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Everything the pipeline announces to downstream reconciliation consumers.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentEvent {
    PickListCreated(PickListCreatedEvent),
    PackSlipCreated(PackSlipCreatedEvent),
    ShippingLabelCreated(ShippingLabelCreatedEvent),
}

impl FulfillmentEvent {
    /// Partition key: events for one order stay ordered.
    pub fn key(&self) -> Uuid {
        match self {
            FulfillmentEvent::PickListCreated(e) => e.order_id,
            FulfillmentEvent::PackSlipCreated(e) => e.order_id,
            FulfillmentEvent::ShippingLabelCreated(e) => e.order_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FulfillmentEvent::PickListCreated(_) => "pick_list.created",
            FulfillmentEvent::PackSlipCreated(_) => "pack_slip.created",
            FulfillmentEvent::ShippingLabelCreated(_) => "shipping_label.created",
        }
    }
}

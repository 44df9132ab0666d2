//! Extension point for writing created documents back upstream.
//!
//! Nothing here adjusts an order's fulfilled quantity or a pick list's
//! remaining quantity. Implementations decide where the news goes.

use async_trait::async_trait;
use depot_shared::models::events::{
    LineQuantity, PackSlipCreatedEvent, PickListCreatedEvent, ShippingLabelCreatedEvent,
};
use depot_shared::FulfillmentEvent;
use tracing::info;

use crate::models::{PackSlip, PickList, ShippingLabel};

type ReconcileResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Called once per document after it has been stored.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn pick_list_created(&self, pick_list: &PickList) -> ReconcileResult;
    async fn pack_slip_created(&self, pack_slip: &PackSlip) -> ReconcileResult;
    async fn shipping_label_created(&self, label: &ShippingLabel) -> ReconcileResult;
}

/// Records that reconciliation was left to someone else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReconciler;

#[async_trait]
impl Reconciler for LoggingReconciler {
    async fn pick_list_created(&self, pick_list: &PickList) -> ReconcileResult {
        log_deferred(&pick_list_event(pick_list));
        Ok(())
    }

    async fn pack_slip_created(&self, pack_slip: &PackSlip) -> ReconcileResult {
        log_deferred(&pack_slip_event(pack_slip));
        Ok(())
    }

    async fn shipping_label_created(&self, label: &ShippingLabel) -> ReconcileResult {
        log_deferred(&shipping_label_event(label));
        Ok(())
    }
}

fn log_deferred(event: &FulfillmentEvent) {
    info!(event = event.name(), order_id = %event.key(), "Upstream reconciliation deferred");
}

pub fn pick_list_event(pick_list: &PickList) -> FulfillmentEvent {
    FulfillmentEvent::PickListCreated(PickListCreatedEvent {
        pick_list_id: pick_list.id,
        pick_list_number: pick_list.pick_list_number.clone(),
        order_id: pick_list.order_id,
        warehouse_id: pick_list.warehouse_id,
        lines: pick_list
            .items
            .iter()
            .map(|item| LineQuantity {
                order_line_id: item.order_line_id,
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
        timestamp: pick_list.created_at.timestamp(),
    })
}

pub fn pack_slip_event(pack_slip: &PackSlip) -> FulfillmentEvent {
    FulfillmentEvent::PackSlipCreated(PackSlipCreatedEvent {
        pack_slip_id: pack_slip.id,
        pack_slip_number: pack_slip.pack_slip_number.clone(),
        order_id: pack_slip.order_id,
        pick_list_id: pack_slip.pick_list_id,
        warehouse_id: pack_slip.warehouse_id,
        lines: pack_slip
            .items
            .iter()
            .map(|item| LineQuantity {
                order_line_id: item.order_line_id,
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
        timestamp: pack_slip.created_at.timestamp(),
    })
}

pub fn shipping_label_event(label: &ShippingLabel) -> FulfillmentEvent {
    FulfillmentEvent::ShippingLabelCreated(ShippingLabelCreatedEvent {
        label_id: label.id,
        label_number: label.label_number.clone(),
        order_id: label.order_id,
        pack_slip_id: label.pack_slip_id,
        carrier: label.carrier.as_str().to_string(),
        tracking_number: label.tracking_number.clone(),
        timestamp: label.created_at.timestamp(),
    })
}

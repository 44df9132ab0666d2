use async_trait::async_trait;
use depot_core::{Order, OrderLine, PostalAddress, ResourceClient, ResourceError, ResourceMethod};
use depot_fulfillment::gateway::{PACK_SLIPS_PATH, PICK_LISTS_PATH, SHIPPING_LABELS_PATH};
use depot_fulfillment::models::{PackSlip, PickList, ShippingLabel};
use depot_fulfillment::wire::{PackSlipDto, PickListDto, ShippingLabelDto};
use depot_fulfillment::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Serves create calls from an in-process registry holding a single order.
struct RegistryClient {
    registry: FulfillmentRegistry,
    order: Order,
}

fn decode<T: serde::de::DeserializeOwned>(body: Option<Value>) -> Result<T, ResourceError> {
    serde_json::from_value(body.unwrap_or(Value::Null)).map_err(|e| ResourceError::Decode(e.to_string()))
}

fn rejected(e: RegistryError) -> ResourceError {
    ResourceError::Rejected {
        status: 400,
        message: Some(e.to_string()),
    }
}

#[async_trait]
impl ResourceClient for RegistryClient {
    async fn send(&self, method: ResourceMethod, path: &str, body: Option<Value>) -> Result<Value, ResourceError> {
        assert_eq!(method, ResourceMethod::Post);
        let value = match path {
            PICK_LISTS_PATH => {
                let list = self.registry.create_pick_list(&self.order, decode(body)?).await.map_err(rejected)?;
                serde_json::to_value(PickListDto::from(&list))
            }
            PACK_SLIPS_PATH => {
                let slip = self.registry.create_pack_slip(&self.order, decode(body)?).await.map_err(rejected)?;
                serde_json::to_value(PackSlipDto::from(&slip))
            }
            SHIPPING_LABELS_PATH => {
                let label = self
                    .registry
                    .create_shipping_label(&self.order, decode(body)?)
                    .await
                    .map_err(rejected)?;
                serde_json::to_value(ShippingLabelDto::from(&label))
            }
            other => panic!("unexpected path {}", other),
        };
        value.map_err(|e| ResourceError::Encode(e.to_string()))
    }
}

/// Fails every call, optionally with a server message.
struct DownClient {
    message: Option<String>,
    calls: Mutex<usize>,
}

#[async_trait]
impl ResourceClient for DownClient {
    async fn send(&self, _method: ResourceMethod, _path: &str, _body: Option<Value>) -> Result<Value, ResourceError> {
        *self.calls.lock().unwrap() += 1;
        Err(ResourceError::Rejected {
            status: 503,
            message: self.message.clone(),
        })
    }
}

/// Reconciler that always fails; creation must still succeed.
struct BrokenReconciler;

#[async_trait]
impl Reconciler for BrokenReconciler {
    async fn pick_list_created(&self, _: &PickList) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("broker unavailable".into())
    }

    async fn pack_slip_created(&self, _: &PackSlip) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("broker unavailable".into())
    }

    async fn shipping_label_created(&self, _: &ShippingLabel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("broker unavailable".into())
    }
}

fn ord_1() -> Order {
    Order::new("ORD-1", Some("Ada Lovelace".to_string()))
        .with_line(OrderLine::new(Uuid::new_v4(), "SKU-1", "Widget", 10, 3).unwrap())
}

fn address(name: &str) -> PostalAddress {
    PostalAddress {
        name: name.to_string(),
        address: "1 Dock Road".to_string(),
        city: "Harbor".to_string(),
        state: None,
        postal_code: "12345".to_string(),
        country: "US".to_string(),
    }
}

fn registry() -> FulfillmentRegistry {
    FulfillmentRegistry::new(Arc::new(InMemoryFulfillmentRepository::new()), Arc::new(LoggingReconciler))
}

fn gateway_for(order: &Order, registry: &FulfillmentRegistry) -> FulfillmentGateway {
    FulfillmentGateway::new(Arc::new(RegistryClient {
        registry: registry.clone(),
        order: order.clone(),
    }))
}

#[tokio::test]
async fn test_pick_list_up_to_remaining_quantity() {
    let order = ord_1();
    let line = order.lines[0].order_line_id;
    let registry = registry();
    let gateway = gateway_for(&order, &registry);

    let mut builder = PickListBuilder::new();
    builder.select_order(&order).unwrap();
    builder.set_warehouse(Some(Uuid::new_v4()));

    assert_eq!(
        builder.set_quantity(line, 8),
        Err(ValidationError::QuantityExceedsMaximum {
            order_line_id: line,
            requested: 8,
            maximum: 7,
        })
    );
    builder.set_quantity(line, 7).unwrap();

    let list = builder.submit(&gateway).await.unwrap();
    assert_eq!(list.pick_list_number, "PL-000001");
    assert_eq!(list.status, PickListStatus::Draft);
    assert_eq!(list.items[0].quantity, 7);
    assert_eq!(list.items[0].picked_quantity, 0);
    assert!(builder.notice().is_none());
}

#[tokio::test]
async fn test_direct_request_over_remaining_is_rejected_server_side() {
    let order = ord_1();
    let line = &order.lines[0];
    let registry = registry();
    let request = wire::CreatePickListRequest {
        order_id: order.id,
        warehouse_id: Uuid::new_v4(),
        items: vec![wire::RequestedLine {
            order_line_id: line.order_line_id,
            product_id: line.product_id,
            quantity: 8,
        }],
        assigned_to: None,
        notes: None,
    };

    let err = registry.create_pick_list(&order, request).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::QuantityExceedsMaximum { maximum: 7, .. })
    ));
    assert!(registry.pick_lists(Some(order.id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pack_slip_from_unpicked_list_offers_requested_quantity() {
    let order = ord_1();
    let line = order.lines[0].order_line_id;
    let registry = registry();
    let gateway = gateway_for(&order, &registry);
    let warehouse = Uuid::new_v4();

    let mut picker = PickListBuilder::new();
    picker.select_order(&order).unwrap();
    picker.set_warehouse(Some(warehouse));
    picker.set_quantity(line, 5).unwrap();
    let list = picker.submit(&gateway).await.unwrap();

    let mut packer = PackSlipBuilder::new();
    packer.select_order(&order, &registry.pick_lists(Some(order.id)).await.unwrap());
    packer.select_pick_list(Some(list.id)).unwrap();
    packer.set_warehouse(Some(warehouse));

    assert_eq!(packer.selection().candidate(&line).map(|c| c.max_quantity), Some(5));
    packer.select_all();
    let slip = packer.submit(&gateway).await.unwrap();
    assert_eq!(slip.pick_list_id, Some(list.id));
    assert_eq!(slip.items[0].quantity, 5);
    assert_eq!(slip.items[0].packed_quantity, 0);
    assert_eq!(slip.package_count, 1);
}

#[tokio::test]
async fn test_pack_slip_bounded_by_recorded_picks() {
    let order = ord_1();
    let line = &order.lines[0];
    let registry = registry();
    let list = registry
        .create_pick_list(
            &order,
            wire::CreatePickListRequest {
                order_id: order.id,
                warehouse_id: Uuid::new_v4(),
                items: vec![wire::RequestedLine {
                    order_line_id: line.order_line_id,
                    product_id: line.product_id,
                    quantity: 5,
                }],
                assigned_to: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    registry.assign_pick_list(list.id, "sam".to_string()).await.unwrap();
    registry.transition_pick_list(list.id, PickListStatus::InProgress).await.unwrap();
    let list = registry.record_pick(list.id, line.order_line_id, 2, false).await.unwrap();
    assert_eq!(list.items[0].status, PickItemStatus::Partial);

    let request = wire::CreatePackSlipRequest {
        order_id: order.id,
        warehouse_id: list.warehouse_id,
        pick_list_id: Some(list.id),
        items: vec![wire::RequestedLine {
            order_line_id: line.order_line_id,
            product_id: line.product_id,
            quantity: 3,
        }],
        package_count: 1,
        weight: None,
        notes: None,
    };
    let err = registry.create_pack_slip(&order, request).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::QuantityExceedsMaximum { maximum: 2, .. })
    ));
}

#[tokio::test]
async fn test_label_without_state_links_pack_slip() {
    let order = ord_1();
    let registry = registry();
    let gateway = gateway_for(&order, &registry);
    let warehouse = Uuid::new_v4();

    let mut packer = PackSlipBuilder::new();
    packer.select_order(&order, &[]);
    packer.set_warehouse(Some(warehouse));
    packer.set_weight(Some(3.5));
    packer.select_all();
    let slip = packer.submit(&gateway).await.unwrap();

    let mut builder = ShippingLabelBuilder::new(None);
    builder.select_order(&order, &[slip.clone()]);
    builder.select_pack_slip(Some(slip.id)).unwrap();
    builder.set_from_address(address("Main Warehouse"));
    let mut to = address("");
    to.name = builder.to_address().name.clone();
    builder.set_to_address(to);
    builder.set_carrier(Carrier::Fedex);
    builder.set_tracking_number(Some("  ".to_string()));

    let label = builder.submit(&gateway).await.unwrap();
    assert_eq!(label.label_number, "SL-000001");
    assert_eq!(label.to_address.name, "Ada Lovelace");
    assert_eq!(label.to_address.state, None);
    assert_eq!(label.weight, Some(3.5));
    assert_eq!(label.tracking_number, None);
    assert_eq!(label.dimensions, None);
    assert_eq!(label.status, ShippingLabelStatus::Draft);
}

#[tokio::test]
async fn test_failed_create_keeps_draft_and_shows_notice() {
    let order = ord_1();
    let line = order.lines[0].order_line_id;
    let client = Arc::new(DownClient {
        message: Some("Warehouse is closed".to_string()),
        calls: Mutex::new(0),
    });
    let gateway = FulfillmentGateway::new(client.clone());

    let mut builder = PickListBuilder::new();
    builder.select_order(&order).unwrap();
    builder.set_warehouse(Some(Uuid::new_v4()));
    builder.set_quantity(line, 4).unwrap();

    assert!(builder.submit(&gateway).await.is_err());
    assert_eq!(builder.notice(), Some("Warehouse is closed"));
    assert_eq!(builder.selection().quantity(&line), 4);
    assert_eq!(*client.calls.lock().unwrap(), 1);

    let silent = FulfillmentGateway::new(Arc::new(DownClient {
        message: None,
        calls: Mutex::new(0),
    }));
    let mut label = ShippingLabelBuilder::new(None);
    label.select_order(&order, &[]);
    label.set_from_address(address("Main"));
    label.set_to_address(address("Grace"));
    assert!(label.submit(&silent).await.is_err());
    assert_eq!(label.notice(), Some("Failed to create shipping label"));
    assert_eq!(label.to_address().name, "Grace");
}

#[tokio::test]
async fn test_validation_failure_makes_no_call() {
    let order = ord_1();
    let client = Arc::new(DownClient {
        message: None,
        calls: Mutex::new(0),
    });
    let gateway = FulfillmentGateway::new(client.clone());

    let mut builder = PackSlipBuilder::new();
    builder.select_order(&order, &[]);
    builder.set_warehouse(Some(Uuid::new_v4()));

    assert!(builder.submit(&gateway).await.is_err());
    assert_eq!(builder.notice(), Some("Please select at least one item"));
    assert_eq!(*client.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_reconciler_failure_does_not_fail_creation() {
    let order = ord_1();
    let line = &order.lines[0];
    let registry = FulfillmentRegistry::new(Arc::new(InMemoryFulfillmentRepository::new()), Arc::new(BrokenReconciler));

    let list = registry
        .create_pick_list(
            &order,
            wire::CreatePickListRequest {
                order_id: order.id,
                warehouse_id: Uuid::new_v4(),
                items: vec![wire::RequestedLine {
                    order_line_id: line.order_line_id,
                    product_id: line.product_id,
                    quantity: 1,
                }],
                assigned_to: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(registry.pick_list(list.id).await.unwrap().id, list.id);
}

#[tokio::test]
async fn test_transitions_and_summary() {
    let order = ord_1();
    let line = &order.lines[0];
    let registry = registry();
    let north = Uuid::new_v4();
    let south = Uuid::new_v4();

    let mut slips = Vec::new();
    for warehouse in [north, south] {
        let slip = registry
            .create_pack_slip(
                &order,
                wire::CreatePackSlipRequest {
                    order_id: order.id,
                    warehouse_id: warehouse,
                    pick_list_id: None,
                    items: vec![wire::RequestedLine {
                        order_line_id: line.order_line_id,
                        product_id: line.product_id,
                        quantity: 1,
                    }],
                    package_count: 1,
                    weight: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        slips.push(slip);
    }
    registry.transition_pack_slip(slips[0].id, PackSlipStatus::Packing).await.unwrap();
    registry.transition_pack_slip(slips[0].id, PackSlipStatus::Packed).await.unwrap();

    let err = registry
        .transition_pack_slip(slips[1].id, PackSlipStatus::Shipped)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid pack slip transition from DRAFT to SHIPPED");

    let label = registry
        .create_shipping_label(
            &order,
            serde_json::from_value(json!({
                "orderId": order.id,
                "packSlipId": slips[0].id,
                "carrier": "UPS",
                "fromAddress": address("Main"),
                "toAddress": address("Ada"),
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    registry.transition_shipping_label(label.id, ShippingLabelStatus::Generated).await.unwrap();
    registry.transition_shipping_label(label.id, ShippingLabelStatus::Printed).await.unwrap();

    let all = registry.summary(&SummaryFilter::default()).await.unwrap();
    assert_eq!(all.pack_slips.total, 2);
    assert_eq!(all.pack_slips.packed, 1);
    assert_eq!(all.shipping_labels.generated, 1);

    let north_only = registry
        .summary(&SummaryFilter {
            warehouse_id: Some(north),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(north_only.pack_slips.total, 1);
    assert_eq!(north_only.shipping_labels.total, 1);

    let south_only = registry
        .summary(&SummaryFilter {
            warehouse_id: Some(south),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(south_only.shipping_labels.total, 0);

    let drafts = registry
        .summary(&SummaryFilter {
            warehouse_id: None,
            status: Some("draft".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(drafts.pack_slips.total, 1);
    assert_eq!(drafts.shipping_labels.total, 0);
}

#[tokio::test]
async fn test_record_pick_requires_list_in_progress() {
    let order = ord_1();
    let line = &order.lines[0];
    let registry = registry();
    let list = registry
        .create_pick_list(
            &order,
            wire::CreatePickListRequest {
                order_id: order.id,
                warehouse_id: Uuid::new_v4(),
                items: vec![wire::RequestedLine {
                    order_line_id: line.order_line_id,
                    product_id: line.product_id,
                    quantity: 2,
                }],
                assigned_to: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let err = registry.record_pick(list.id, line.order_line_id, 1, false).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotPicking(PickListStatus::Draft)));

    registry.assign_pick_list(list.id, "sam".to_string()).await.unwrap();
    registry.transition_pick_list(list.id, PickListStatus::InProgress).await.unwrap();

    let err = registry.record_pick(list.id, line.order_line_id, 3, false).await.unwrap_err();
    assert!(matches!(err, RegistryError::PickRecord(_)));

    let list = registry.record_pick(list.id, line.order_line_id, 2, false).await.unwrap();
    assert_eq!(list.items[0].status, PickItemStatus::Picked);

    let done = registry.transition_pick_list(list.id, PickListStatus::Completed).await.unwrap();
    assert!(done.status.is_terminal());
    assert!(registry
        .transition_pick_list(list.id, PickListStatus::Cancelled)
        .await
        .is_err());
}

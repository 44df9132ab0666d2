use depot_core::Order;
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::{FulfillmentGateway, SubmitError};
use crate::models::PickList;
use crate::selection::{LineCandidate, Selection};
use crate::validation::{check_order, ValidationError};
use crate::wire::{optional_text, CreatePickListRequest, RequestedLine};

const CREATE_FAILED: &str = "Failed to create pick list";

/// Open order lines, each offered up to its remaining quantity.
pub fn pick_candidates(order: &Order) -> Vec<LineCandidate> {
    order
        .open_lines()
        .map(|line| LineCandidate {
            order_line_id: line.order_line_id,
            product_id: line.product_id,
            sku: line.sku.clone(),
            product_name: line.product_name.clone(),
            max_quantity: line.remaining_quantity(),
        })
        .collect()
}

/// Check a create request against the order it allocates from.
pub fn validate_pick_list_request(order: &Order, request: &CreatePickListRequest) -> Result<(), ValidationError> {
    check_order(order, request.order_id)?;
    if request.warehouse_id.is_nil() {
        return Err(ValidationError::MissingWarehouse);
    }
    if request.items.is_empty() {
        return Err(ValidationError::NoItemsSelected);
    }

    let mut seen = HashSet::new();
    for item in &request.items {
        if !seen.insert(item.order_line_id) {
            return Err(ValidationError::DuplicateLine(item.order_line_id));
        }

        let line = order
            .line(&item.order_line_id)
            .ok_or(ValidationError::UnknownLine(item.order_line_id))?;

        if line.product_id != item.product_id {
            return Err(ValidationError::ProductMismatch {
                order_line_id: item.order_line_id,
                product_id: item.product_id,
            });
        }
        if item.quantity == 0 {
            return Err(ValidationError::ZeroQuantity(item.order_line_id));
        }
        if item.quantity > line.remaining_quantity() {
            return Err(ValidationError::QuantityExceedsMaximum {
                order_line_id: item.order_line_id,
                requested: item.quantity,
                maximum: line.remaining_quantity(),
            });
        }
    }

    Ok(())
}

/// Draft state of the pick list creation form.
#[derive(Debug, Clone, Default)]
pub struct PickListBuilder {
    order: Option<Order>,
    warehouse_id: Option<Uuid>,
    assigned_to: Option<String>,
    notes: Option<String>,
    selection: Selection,
    notice: Option<String>,
}

impl PickListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the source order. An order with nothing left to pick is refused
    /// and the current draft is kept.
    pub fn select_order(&mut self, order: &Order) -> Result<(), ValidationError> {
        if !order.has_remaining() {
            return Err(ValidationError::NoEligibleItems(order.order_number.clone()));
        }

        self.selection = Selection::new(pick_candidates(order));
        self.order = Some(order.clone());
        Ok(())
    }

    pub fn set_warehouse(&mut self, warehouse_id: Option<Uuid>) {
        self.warehouse_id = warehouse_id;
    }

    pub fn set_assigned_to(&mut self, assigned_to: Option<String>) {
        self.assigned_to = optional_text(assigned_to);
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = optional_text(notes);
    }

    pub fn set_quantity(&mut self, order_line_id: Uuid, quantity: u32) -> Result<(), ValidationError> {
        self.selection.set_quantity(order_line_id, quantity)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Last user-visible failure, cleared by a successful submit.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn validate(&self) -> Result<CreatePickListRequest, ValidationError> {
        let order = self.order.as_ref().ok_or(ValidationError::MissingOrder)?;
        let warehouse_id = self.warehouse_id.ok_or(ValidationError::MissingWarehouse)?;

        let request = CreatePickListRequest {
            order_id: order.id,
            warehouse_id,
            items: self
                .selection
                .selected()
                .into_iter()
                .map(|(candidate, quantity)| RequestedLine {
                    order_line_id: candidate.order_line_id,
                    product_id: candidate.product_id,
                    quantity,
                })
                .collect(),
            assigned_to: self.assigned_to.clone(),
            notes: self.notes.clone(),
        };

        validate_pick_list_request(order, &request)?;
        Ok(request)
    }

    /// Validate and send one create call. On failure the draft stays as
    /// entered and `notice()` carries the message.
    pub async fn submit(&mut self, gateway: &FulfillmentGateway) -> Result<PickList, SubmitError> {
        let result = match self.validate() {
            Ok(request) => gateway.create_pick_list(&request).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(list) => {
                self.notice = None;
                info!(pick_list = %list.pick_list_number, order_id = %list.order_id, "Pick list created");
            }
            Err(e) => {
                warn!("Pick list submission failed: {}", e);
                self.notice = Some(e.user_message(CREATE_FAILED));
            }
        }
        result
    }
}

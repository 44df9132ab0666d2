use depot_core::Order;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::{FulfillmentGateway, SubmitError};
use crate::models::{PackSlip, PickList};
use crate::pick_list::pick_candidates;
use crate::selection::{LineCandidate, Selection};
use crate::validation::{check_order, check_weight, ValidationError};
use crate::wire::{optional_text, CreatePackSlipRequest, RequestedLine};

const CREATE_FAILED: &str = "Failed to create pack slip";

/// Items of a pick list, each offered up to what was picked (or requested,
/// while nothing has been recorded yet).
pub fn pack_candidates_from_pick_list(order: &Order, pick_list: &PickList) -> Vec<LineCandidate> {
    pick_list
        .items
        .iter()
        .map(|item| {
            let line = order.line(&item.order_line_id);
            LineCandidate {
                order_line_id: item.order_line_id,
                product_id: item.product_id,
                sku: line.map(|l| l.sku.clone()).unwrap_or_default(),
                product_name: line.map(|l| l.product_name.clone()).unwrap_or_default(),
                max_quantity: item.pack_ceiling(),
            }
        })
        .collect()
}

/// Per-line ceilings for a pack request: the pick list when one is given,
/// the order's remaining quantities otherwise.
fn pack_ceilings(order: &Order, pick_list: Option<&PickList>) -> HashMap<Uuid, (Uuid, u32)> {
    match pick_list {
        Some(list) => list
            .items
            .iter()
            .map(|i| (i.order_line_id, (i.product_id, i.pack_ceiling())))
            .collect(),
        None => order
            .lines
            .iter()
            .map(|l| (l.order_line_id, (l.product_id, l.remaining_quantity())))
            .collect(),
    }
}

/// Check a create request against its order and, when referenced, its pick list.
pub fn validate_pack_slip_request(
    order: &Order,
    pick_list: Option<&PickList>,
    request: &CreatePackSlipRequest,
) -> Result<(), ValidationError> {
    check_order(order, request.order_id)?;
    if request.warehouse_id.is_nil() {
        return Err(ValidationError::MissingWarehouse);
    }

    match (request.pick_list_id, pick_list) {
        (None, None) => {}
        (Some(id), Some(list)) if list.id == id => {
            if list.order_id != order.id {
                return Err(ValidationError::PickListOrderMismatch(id));
            }
        }
        (Some(id), _) => return Err(ValidationError::UnknownPickList(id)),
        (None, Some(list)) => return Err(ValidationError::UnknownPickList(list.id)),
    }

    if request.items.is_empty() {
        return Err(ValidationError::NoItemsSelected);
    }
    if request.package_count == 0 {
        return Err(ValidationError::InvalidPackageCount);
    }
    check_weight(request.weight)?;

    let ceilings = pack_ceilings(order, pick_list);
    let mut seen = HashSet::new();
    for item in &request.items {
        if !seen.insert(item.order_line_id) {
            return Err(ValidationError::DuplicateLine(item.order_line_id));
        }

        let (product_id, maximum) = ceilings
            .get(&item.order_line_id)
            .copied()
            .ok_or(ValidationError::UnknownLine(item.order_line_id))?;

        if product_id != item.product_id {
            return Err(ValidationError::ProductMismatch {
                order_line_id: item.order_line_id,
                product_id: item.product_id,
            });
        }
        if item.quantity == 0 {
            return Err(ValidationError::ZeroQuantity(item.order_line_id));
        }
        if item.quantity > maximum {
            return Err(ValidationError::QuantityExceedsMaximum {
                order_line_id: item.order_line_id,
                requested: item.quantity,
                maximum,
            });
        }
    }

    Ok(())
}

/// Draft state of the pack slip creation form.
#[derive(Debug, Clone)]
pub struct PackSlipBuilder {
    order: Option<Order>,
    pick_lists: Vec<PickList>,
    pick_list_id: Option<Uuid>,
    warehouse_id: Option<Uuid>,
    package_count: u32,
    weight: Option<f64>,
    notes: Option<String>,
    selection: Selection,
    notice: Option<String>,
}

impl Default for PackSlipBuilder {
    fn default() -> Self {
        Self {
            order: None,
            pick_lists: Vec::new(),
            pick_list_id: None,
            warehouse_id: None,
            package_count: 1,
            weight: None,
            notes: None,
            selection: Selection::default(),
            notice: None,
        }
    }
}

impl PackSlipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the source order. Only pick lists of that order remain
    /// selectable, and items are sourced directly from its lines until a pick
    /// list is chosen.
    pub fn select_order(&mut self, order: &Order, pick_lists: &[PickList]) {
        self.pick_lists = pick_lists
            .iter()
            .filter(|list| list.order_id == order.id)
            .cloned()
            .collect();
        self.pick_list_id = None;
        self.selection = Selection::new(pick_candidates(order));
        self.order = Some(order.clone());
    }

    /// Switch the item source. Quantities chosen so far are discarded since
    /// the ceilings change.
    pub fn select_pick_list(&mut self, pick_list_id: Option<Uuid>) -> Result<(), ValidationError> {
        let order = self.order.as_ref().ok_or(ValidationError::MissingOrder)?;

        let candidates = match pick_list_id {
            Some(id) => {
                let list = self
                    .pick_lists
                    .iter()
                    .find(|list| list.id == id)
                    .ok_or(ValidationError::UnknownPickList(id))?;
                pack_candidates_from_pick_list(order, list)
            }
            None => pick_candidates(order),
        };

        self.selection = Selection::new(candidates);
        self.pick_list_id = pick_list_id;
        Ok(())
    }

    pub fn available_pick_lists(&self) -> &[PickList] {
        &self.pick_lists
    }

    pub fn set_warehouse(&mut self, warehouse_id: Option<Uuid>) {
        self.warehouse_id = warehouse_id;
    }

    pub fn set_package_count(&mut self, package_count: u32) {
        self.package_count = package_count;
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = optional_text(notes);
    }

    pub fn set_quantity(&mut self, order_line_id: Uuid, quantity: u32) -> Result<(), ValidationError> {
        self.selection.set_quantity(order_line_id, quantity)
    }

    pub fn set_quantity_clamped(&mut self, order_line_id: Uuid, quantity: u32) -> Result<u32, ValidationError> {
        self.selection.set_quantity_clamped(order_line_id, quantity)
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

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn validate(&self) -> Result<CreatePackSlipRequest, ValidationError> {
        let order = self.order.as_ref().ok_or(ValidationError::MissingOrder)?;
        let warehouse_id = self.warehouse_id.ok_or(ValidationError::MissingWarehouse)?;
        let pick_list = self
            .pick_list_id
            .and_then(|id| self.pick_lists.iter().find(|list| list.id == id));

        let request = CreatePackSlipRequest {
            order_id: order.id,
            warehouse_id,
            pick_list_id: self.pick_list_id,
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
            package_count: self.package_count,
            weight: self.weight,
            notes: self.notes.clone(),
        };

        validate_pack_slip_request(order, pick_list, &request)?;
        Ok(request)
    }

    pub async fn submit(&mut self, gateway: &FulfillmentGateway) -> Result<PackSlip, SubmitError> {
        let result = match self.validate() {
            Ok(request) => gateway.create_pack_slip(&request).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(slip) => {
                self.notice = None;
                info!(pack_slip = %slip.pack_slip_number, order_id = %slip.order_id, "Pack slip created");
            }
            Err(e) => {
                warn!("Pack slip submission failed: {}", e);
                self.notice = Some(e.user_message(CREATE_FAILED));
            }
        }
        result
    }
}

use chrono::{DateTime, Utc};
use depot_core::PostalAddress;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{Lifecycle, PackSlipStatus, PickItemStatus, PickListStatus, ShippingLabelStatus, TransitionError};

/// Instructs warehouse staff which order-line quantities to retrieve.
#[derive(Debug, Clone, PartialEq)]
pub struct PickList {
    pub id: Uuid,
    pub pick_list_number: String,
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub status: PickListStatus,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<PickListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PickList {
    pub fn item(&self, order_line_id: &Uuid) -> Option<&PickListItem> {
        self.items.iter().find(|i| i.order_line_id == *order_line_id)
    }

    pub fn transition_to(&mut self, next: PickListStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickListItem {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    /// Requested pick quantity.
    pub quantity: u32,
    pub picked_quantity: u32,
    pub status: PickItemStatus,
}

impl PickListItem {
    pub fn new(order_line_id: Uuid, product_id: Uuid, quantity: u32) -> Self {
        Self {
            order_line_id,
            product_id,
            quantity,
            picked_quantity: 0,
            status: PickItemStatus::Pending,
        }
    }

    /// Most that may be packed from this item. Until actuals are recorded the
    /// requested quantity stands in for the picked one.
    pub fn pack_ceiling(&self) -> u32 {
        if self.picked_quantity > 0 {
            self.picked_quantity
        } else {
            self.quantity
        }
    }

    /// Record the actual picked quantity; never more than requested.
    pub fn record_pick(&mut self, picked_quantity: u32, skipped: bool) -> Result<(), PickRecordError> {
        if picked_quantity > self.quantity {
            return Err(PickRecordError::ExceedsRequested {
                order_line_id: self.order_line_id,
                picked: picked_quantity,
                requested: self.quantity,
            });
        }
        if skipped && picked_quantity > 0 {
            return Err(PickRecordError::SkippedWithQuantity(self.order_line_id));
        }

        self.picked_quantity = picked_quantity;
        self.status = PickItemStatus::from_pick(picked_quantity, self.quantity, skipped);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickRecordError {
    #[error("Picked quantity {picked} exceeds requested quantity {requested} for line {order_line_id}")]
    ExceedsRequested {
        order_line_id: Uuid,
        picked: u32,
        requested: u32,
    },

    #[error("Skipped line {0} cannot carry a picked quantity")]
    SkippedWithQuantity(Uuid),
}

/// Records how picked quantities are boxed for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackSlip {
    pub id: Uuid,
    pub pack_slip_number: String,
    pub order_id: Uuid,
    pub pick_list_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    pub status: PackSlipStatus,
    pub packed_by: Option<String>,
    pub package_count: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub items: Vec<PackSlipItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PackSlip {
    pub fn transition_to(&mut self, next: PackSlipStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackSlipItem {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub packed_quantity: u32,
}

impl PackSlipItem {
    pub fn new(order_line_id: Uuid, product_id: Uuid, quantity: u32) -> Self {
        Self {
            order_line_id,
            product_id,
            quantity,
            packed_quantity: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Carrier {
    Fedex,
    Ups,
    Dhl,
    Usps,
    Other,
}

impl Carrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Fedex => "FEDEX",
            Carrier::Ups => "UPS",
            Carrier::Dhl => "DHL",
            Carrier::Usps => "USPS",
            Carrier::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimensions {
    /// At least one side was given.
    pub fn is_specified(&self) -> bool {
        self.length.is_some() || self.width.is_some() || self.height.is_some()
    }

    pub(crate) fn sides(&self) -> [(&'static str, Option<f64>); 3] {
        [("length", self.length), ("width", self.width), ("height", self.height)]
    }
}

/// Carrier-facing document for a shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingLabel {
    pub id: Uuid,
    pub label_number: String,
    pub order_id: Uuid,
    pub pack_slip_id: Option<Uuid>,
    pub carrier: Carrier,
    pub service_type: Option<String>,
    pub tracking_number: Option<String>,
    pub from_address: PostalAddress,
    pub to_address: PostalAddress,
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub status: ShippingLabelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShippingLabel {
    pub fn transition_to(&mut self, next: ShippingLabelStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

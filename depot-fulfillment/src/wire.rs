//! Wire shapes for the create-resource collaborator and the pure mapping
//! from response payloads into domain entities.
//!
//! Form parsing (blank weight, partially filled dimensions) also lives here so
//! defaulting rules are applied in exactly one place.

use chrono::{DateTime, Utc};
use depot_core::PostalAddress;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Carrier, Dimensions, PackSlip, PackSlipItem, PickList, PickListItem, ShippingLabel};
use crate::status::{PackSlipStatus, PickItemStatus, PickListStatus, ShippingLabelStatus};

// ============================================================================
// Create requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestedLine {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickListRequest {
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub items: Vec<RequestedLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_package_count() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackSlipRequest {
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_list_id: Option<Uuid>,
    pub items: Vec<RequestedLine>,
    #[serde(default = "default_package_count")]
    pub package_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateShippingLabelRequest {
    pub order_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_slip_id: Option<Uuid>,
    pub carrier: Carrier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub from_address: PostalAddress,
    pub to_address: PostalAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickListItemDto {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub picked_quantity: u32,
    #[serde(default)]
    pub status: Option<PickItemStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickListDto {
    pub id: Uuid,
    pub pick_list_number: String,
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub status: PickListStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PickListItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackSlipItemDto {
    pub order_line_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub packed_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackSlipDto {
    pub id: Uuid,
    pub pack_slip_number: String,
    pub order_id: Uuid,
    #[serde(default)]
    pub pick_list_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    pub status: PackSlipStatus,
    #[serde(default)]
    pub packed_by: Option<String>,
    #[serde(default = "default_package_count")]
    pub package_count: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PackSlipItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLabelDto {
    pub id: Uuid,
    pub label_number: String,
    pub order_id: Uuid,
    #[serde(default)]
    pub pack_slip_id: Option<Uuid>,
    pub carrier: Carrier,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub from_address: PostalAddress,
    pub to_address: PostalAddress,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub status: ShippingLabelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    #[error("Invalid {document} payload: {reason}")]
    InvalidPayload {
        document: &'static str,
        reason: String,
    },

    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

// ============================================================================
// Response → domain
// ============================================================================

fn non_negative(document: &'static str, field: &str, value: Option<f64>) -> Result<(), WireError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(WireError::InvalidPayload {
            document,
            reason: format!("{} is {}", field, v),
        }),
        _ => Ok(()),
    }
}

impl TryFrom<PickListDto> for PickList {
    type Error = WireError;

    fn try_from(dto: PickListDto) -> Result<Self, Self::Error> {
        let items = dto
            .items
            .into_iter()
            .map(|item| {
                if item.picked_quantity > item.quantity {
                    return Err(WireError::InvalidPayload {
                        document: "pick list",
                        reason: format!(
                            "picked quantity {} exceeds quantity {} on line {}",
                            item.picked_quantity, item.quantity, item.order_line_id
                        ),
                    });
                }
                let status = item.status.unwrap_or_else(|| {
                    PickItemStatus::from_pick(item.picked_quantity, item.quantity, false)
                });
                Ok(PickListItem {
                    order_line_id: item.order_line_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    picked_quantity: item.picked_quantity,
                    status,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PickList {
            id: dto.id,
            pick_list_number: dto.pick_list_number,
            order_id: dto.order_id,
            warehouse_id: dto.warehouse_id,
            status: dto.status,
            assigned_to: dto.assigned_to,
            notes: dto.notes,
            items,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

impl From<&PickList> for PickListDto {
    fn from(list: &PickList) -> Self {
        Self {
            id: list.id,
            pick_list_number: list.pick_list_number.clone(),
            order_id: list.order_id,
            warehouse_id: list.warehouse_id,
            status: list.status,
            assigned_to: list.assigned_to.clone(),
            notes: list.notes.clone(),
            items: list
                .items
                .iter()
                .map(|i| PickListItemDto {
                    order_line_id: i.order_line_id,
                    product_id: i.product_id,
                    quantity: i.quantity,
                    picked_quantity: i.picked_quantity,
                    status: Some(i.status),
                })
                .collect(),
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

impl TryFrom<PackSlipDto> for PackSlip {
    type Error = WireError;

    fn try_from(dto: PackSlipDto) -> Result<Self, Self::Error> {
        if dto.package_count == 0 {
            return Err(WireError::InvalidPayload {
                document: "pack slip",
                reason: "package count is 0".to_string(),
            });
        }
        non_negative("pack slip", "weight", dto.weight)?;

        Ok(PackSlip {
            id: dto.id,
            pack_slip_number: dto.pack_slip_number,
            order_id: dto.order_id,
            pick_list_id: dto.pick_list_id,
            warehouse_id: dto.warehouse_id,
            status: dto.status,
            packed_by: dto.packed_by,
            package_count: dto.package_count,
            weight: dto.weight,
            notes: dto.notes,
            items: dto
                .items
                .into_iter()
                .map(|i| PackSlipItem {
                    order_line_id: i.order_line_id,
                    product_id: i.product_id,
                    quantity: i.quantity,
                    packed_quantity: i.packed_quantity,
                })
                .collect(),
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

impl From<&PackSlip> for PackSlipDto {
    fn from(slip: &PackSlip) -> Self {
        Self {
            id: slip.id,
            pack_slip_number: slip.pack_slip_number.clone(),
            order_id: slip.order_id,
            pick_list_id: slip.pick_list_id,
            warehouse_id: slip.warehouse_id,
            status: slip.status,
            packed_by: slip.packed_by.clone(),
            package_count: slip.package_count,
            weight: slip.weight,
            notes: slip.notes.clone(),
            items: slip
                .items
                .iter()
                .map(|i| PackSlipItemDto {
                    order_line_id: i.order_line_id,
                    product_id: i.product_id,
                    quantity: i.quantity,
                    packed_quantity: i.packed_quantity,
                })
                .collect(),
            created_at: slip.created_at,
            updated_at: slip.updated_at,
        }
    }
}

impl TryFrom<ShippingLabelDto> for ShippingLabel {
    type Error = WireError;

    fn try_from(dto: ShippingLabelDto) -> Result<Self, Self::Error> {
        non_negative("shipping label", "weight", dto.weight)?;
        if let Some(dimensions) = &dto.dimensions {
            for (side, value) in dimensions.sides() {
                non_negative("shipping label", side, value)?;
            }
        }

        Ok(ShippingLabel {
            id: dto.id,
            label_number: dto.label_number,
            order_id: dto.order_id,
            pack_slip_id: dto.pack_slip_id,
            carrier: dto.carrier,
            service_type: dto.service_type,
            tracking_number: dto.tracking_number,
            from_address: dto.from_address,
            to_address: dto.to_address,
            weight: dto.weight,
            dimensions: dto.dimensions.filter(Dimensions::is_specified),
            status: dto.status,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

impl From<&ShippingLabel> for ShippingLabelDto {
    fn from(label: &ShippingLabel) -> Self {
        Self {
            id: label.id,
            label_number: label.label_number.clone(),
            order_id: label.order_id,
            pack_slip_id: label.pack_slip_id,
            carrier: label.carrier,
            service_type: label.service_type.clone(),
            tracking_number: label.tracking_number.clone(),
            from_address: label.from_address.clone(),
            to_address: label.to_address.clone(),
            weight: label.weight,
            dimensions: label.dimensions,
            status: label.status,
            created_at: label.created_at,
            updated_at: label.updated_at,
        }
    }
}

// ============================================================================
// Form input parsing
// ============================================================================

fn parse_number(field: &'static str, input: &str) -> Result<Option<f64>, WireError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed.parse().map_err(|_| WireError::NotANumber {
        field,
        input: input.to_string(),
    })?;

    if !value.is_finite() {
        return Err(WireError::NotANumber { field, input: input.to_string() });
    }
    if value < 0.0 {
        return Err(WireError::Negative { field });
    }
    Ok(Some(value))
}

/// Blank means "not given".
pub fn parse_weight(input: &str) -> Result<Option<f64>, WireError> {
    parse_number("weight", input)
}

/// The object is omitted entirely when all three inputs are blank.
pub fn parse_dimensions(length: &str, width: &str, height: &str) -> Result<Option<Dimensions>, WireError> {
    let dimensions = Dimensions {
        length: parse_number("length", length)?,
        width: parse_number("width", width)?,
        height: parse_number("height", height)?,
    };

    Ok(Some(dimensions).filter(Dimensions::is_specified))
}

/// Blank package count falls back to a single package.
pub fn parse_package_count(input: &str) -> Result<u32, WireError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default_package_count());
    }
    trimmed.parse().map_err(|_| WireError::NotANumber {
        field: "packageCount",
        input: input.to_string(),
    })
}

/// Blank optional text becomes `None`.
pub fn optional_text(input: Option<String>) -> Option<String> {
    input.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

use depot_core::resource::{create_resource, fetch_resource};
use depot_core::{ResourceClient, ResourceError};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::models::{PackSlip, PickList, ShippingLabel};
use crate::validation::ValidationError;
use crate::wire::{
    CreatePackSlipRequest, CreatePickListRequest, CreateShippingLabelRequest, PackSlipDto, PickListDto,
    ShippingLabelDto, WireError,
};

pub const PICK_LISTS_PATH: &str = "/v1/pick-lists";
pub const PACK_SLIPS_PATH: &str = "/v1/pack-slips";
pub const SHIPPING_LABELS_PATH: &str = "/v1/shipping-labels";

/// Why a builder submission did not produce a document.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl SubmitError {
    /// Text for the user-visible notice: validation text as is, the server's
    /// message when it sent one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SubmitError::Validation(e) => e.to_string(),
            SubmitError::Resource(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            SubmitError::Wire(_) => fallback.to_string(),
        }
    }
}

/// Client side of the create-resource calls for the three documents.
#[derive(Clone)]
pub struct FulfillmentGateway {
    client: Arc<dyn ResourceClient>,
}

impl FulfillmentGateway {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    pub async fn create_pick_list(&self, request: &CreatePickListRequest) -> Result<PickList, SubmitError> {
        let dto: PickListDto = create_resource(self.client.as_ref(), PICK_LISTS_PATH, request).await?;
        Ok(PickList::try_from(dto)?)
    }

    pub async fn create_pack_slip(&self, request: &CreatePackSlipRequest) -> Result<PackSlip, SubmitError> {
        let dto: PackSlipDto = create_resource(self.client.as_ref(), PACK_SLIPS_PATH, request).await?;
        Ok(PackSlip::try_from(dto)?)
    }

    pub async fn create_shipping_label(
        &self,
        request: &CreateShippingLabelRequest,
    ) -> Result<ShippingLabel, SubmitError> {
        let dto: ShippingLabelDto = create_resource(self.client.as_ref(), SHIPPING_LABELS_PATH, request).await?;
        Ok(ShippingLabel::try_from(dto)?)
    }

    /// Pick lists of one order, for the pack slip source picker. Failure
    /// degrades to an empty list.
    pub async fn pick_lists_for_order(&self, order_id: Uuid) -> Vec<PickList> {
        let path = format!("{}?orderId={}", PICK_LISTS_PATH, order_id);
        match fetch_resource::<Vec<PickListDto>>(self.client.as_ref(), &path).await {
            Ok(dtos) => dtos
                .into_iter()
                .filter_map(|dto| PickList::try_from(dto).map_err(|e| warn!("Dropping pick list: {}", e)).ok())
                .filter(|list| list.order_id == order_id)
                .collect(),
            Err(e) => {
                warn!("No pick lists available for order {}: {}", order_id, e);
                Vec::new()
            }
        }
    }

    /// Pack slips of one order, for the shipping label source picker.
    pub async fn pack_slips_for_order(&self, order_id: Uuid) -> Vec<PackSlip> {
        let path = format!("{}?orderId={}", PACK_SLIPS_PATH, order_id);
        match fetch_resource::<Vec<PackSlipDto>>(self.client.as_ref(), &path).await {
            Ok(dtos) => dtos
                .into_iter()
                .filter_map(|dto| PackSlip::try_from(dto).map_err(|e| warn!("Dropping pack slip: {}", e)).ok())
                .filter(|slip| slip.order_id == order_id)
                .collect(),
            Err(e) => {
                warn!("No pack slips available for order {}: {}", order_id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let rejected = SubmitError::Resource(ResourceError::Rejected {
            status: 409,
            message: Some("Order is on hold".to_string()),
        });
        assert_eq!(rejected.user_message("Failed to create pick list"), "Order is on hold");

        let silent = SubmitError::Resource(ResourceError::Rejected { status: 500, message: None });
        assert_eq!(silent.user_message("Failed to create pick list"), "Failed to create pick list");

        let invalid = SubmitError::Validation(ValidationError::MissingWarehouse);
        assert_eq!(invalid.user_message("ignored"), "Please select a warehouse");
    }
}

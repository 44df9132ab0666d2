use depot_core::{Order, PostalAddress, Warehouse};
use depot_shared::Masked;
use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::{FulfillmentGateway, SubmitError};
use crate::models::{Carrier, Dimensions, PackSlip, ShippingLabel};
use crate::validation::{check_order, check_weight, AddressRole, ValidationError};
use crate::wire::{optional_text, CreateShippingLabelRequest};

const CREATE_FAILED: &str = "Failed to create shipping label";

fn check_address(role: AddressRole, address: &PostalAddress) -> Result<(), ValidationError> {
    let missing = address.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::IncompleteAddress { role, missing })
    }
}

fn check_dimensions(dimensions: Option<&Dimensions>) -> Result<(), ValidationError> {
    let Some(dimensions) = dimensions else {
        return Ok(());
    };
    for (side, value) in dimensions.sides() {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(ValidationError::InvalidDimension(side));
            }
        }
    }
    Ok(())
}

/// Check a create request against its order and, when referenced, its pack slip.
pub fn validate_shipping_label_request(
    order: &Order,
    pack_slip: Option<&PackSlip>,
    request: &CreateShippingLabelRequest,
) -> Result<(), ValidationError> {
    check_order(order, request.order_id)?;

    match (request.pack_slip_id, pack_slip) {
        (None, None) => {}
        (Some(id), Some(slip)) if slip.id == id => {
            if slip.order_id != order.id {
                return Err(ValidationError::PackSlipOrderMismatch(id));
            }
        }
        (Some(id), _) => return Err(ValidationError::UnknownPackSlip(id)),
        (None, Some(slip)) => return Err(ValidationError::UnknownPackSlip(slip.id)),
    }

    check_address(AddressRole::From, &request.from_address)?;
    check_address(AddressRole::To, &request.to_address)?;
    check_weight(request.weight)?;
    check_dimensions(request.dimensions.as_ref())
}

/// Draft state of the shipping label creation form.
#[derive(Debug, Clone)]
pub struct ShippingLabelBuilder {
    order: Option<Order>,
    pack_slips: Vec<PackSlip>,
    pack_slip_id: Option<Uuid>,
    carrier: Carrier,
    service_type: Option<String>,
    tracking_number: Option<String>,
    from_address: PostalAddress,
    to_address: PostalAddress,
    weight: Option<f64>,
    dimensions: Dimensions,
    notice: Option<String>,
    // Values last copied in from the order or pack slip. A field still
    // holding its prefill follows the selection; an edited one is kept.
    prefilled_name: Option<String>,
    prefilled_weight: Option<f64>,
}

impl Default for ShippingLabelBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ShippingLabelBuilder {
    /// Start a draft. The ship-from address is prefilled from the default
    /// warehouse when one is known.
    pub fn new(default_warehouse: Option<&Warehouse>) -> Self {
        Self {
            order: None,
            pack_slips: Vec::new(),
            pack_slip_id: None,
            carrier: Carrier::Ups,
            service_type: None,
            tracking_number: None,
            from_address: default_warehouse.map(Warehouse::shipping_origin).unwrap_or_default(),
            to_address: PostalAddress::default(),
            weight: None,
            dimensions: Dimensions::default(),
            notice: None,
            prefilled_name: None,
            prefilled_weight: None,
        }
    }

    /// Choose the order being shipped. Only its pack slips remain selectable.
    /// The recipient name takes the customer's name unless it was typed in,
    /// and a weight copied from the previous order's pack slip is dropped.
    pub fn select_order(&mut self, order: &Order, pack_slips: &[PackSlip]) {
        self.pack_slips = pack_slips
            .iter()
            .filter(|slip| slip.order_id == order.id)
            .cloned()
            .collect();
        self.pack_slip_id = None;
        self.clear_prefilled_weight();

        let name = self.to_address.name.trim();
        if name.is_empty() || self.prefilled_name.as_deref() == Some(name) {
            self.to_address.name = order.customer_name.clone().unwrap_or_default();
        }
        self.prefilled_name = order.customer_name.clone();
        self.order = Some(order.clone());
    }

    /// Link a pack slip. Its weight is copied into the draft when it has one;
    /// otherwise a weight copied from an earlier slip is dropped.
    pub fn select_pack_slip(&mut self, pack_slip_id: Option<Uuid>) -> Result<(), ValidationError> {
        let slip_weight = match pack_slip_id {
            Some(id) => {
                self.pack_slips
                    .iter()
                    .find(|slip| slip.id == id)
                    .ok_or(ValidationError::UnknownPackSlip(id))?
                    .weight
            }
            None => None,
        };

        match slip_weight {
            Some(weight) => {
                self.weight = Some(weight);
                self.prefilled_weight = Some(weight);
            }
            None => self.clear_prefilled_weight(),
        }
        self.pack_slip_id = pack_slip_id;
        Ok(())
    }

    fn clear_prefilled_weight(&mut self) {
        if self.prefilled_weight.is_some() && self.weight == self.prefilled_weight {
            self.weight = None;
        }
        self.prefilled_weight = None;
    }

    pub fn available_pack_slips(&self) -> &[PackSlip] {
        &self.pack_slips
    }

    pub fn set_carrier(&mut self, carrier: Carrier) {
        self.carrier = carrier;
    }

    pub fn set_service_type(&mut self, service_type: Option<String>) {
        self.service_type = optional_text(service_type);
    }

    pub fn set_tracking_number(&mut self, tracking_number: Option<String>) {
        self.tracking_number = optional_text(tracking_number);
    }

    pub fn set_from_address(&mut self, address: PostalAddress) {
        self.from_address = address;
    }

    pub fn set_to_address(&mut self, address: PostalAddress) {
        self.to_address = address;
    }

    pub fn from_address(&self) -> &PostalAddress {
        &self.from_address
    }

    pub fn to_address(&self) -> &PostalAddress {
        &self.to_address
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn set_dimensions(&mut self, dimensions: Option<Dimensions>) {
        self.dimensions = dimensions.unwrap_or_default();
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn validate(&self) -> Result<CreateShippingLabelRequest, ValidationError> {
        let order = self.order.as_ref().ok_or(ValidationError::MissingOrder)?;
        let pack_slip = self
            .pack_slip_id
            .and_then(|id| self.pack_slips.iter().find(|slip| slip.id == id));

        let request = CreateShippingLabelRequest {
            order_id: order.id,
            pack_slip_id: self.pack_slip_id,
            carrier: self.carrier,
            service_type: self.service_type.clone(),
            tracking_number: self.tracking_number.clone(),
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            weight: self.weight,
            dimensions: Some(self.dimensions).filter(Dimensions::is_specified),
        };

        validate_shipping_label_request(order, pack_slip, &request)?;
        Ok(request)
    }

    pub async fn submit(&mut self, gateway: &FulfillmentGateway) -> Result<ShippingLabel, SubmitError> {
        let result = match self.validate() {
            Ok(request) => gateway.create_shipping_label(&request).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(label) => {
                self.notice = None;
                info!(
                    label = %label.label_number,
                    carrier = label.carrier.as_str(),
                    recipient = %Masked(&label.to_address.name),
                    "Shipping label created"
                );
            }
            Err(e) => {
                warn!("Shipping label submission failed: {}", e);
                self.notice = Some(e.user_message(CREATE_FAILED));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PackSlipStatus;
    use chrono::Utc;
    use depot_core::AddressField;

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

    fn warehouse() -> Warehouse {
        Warehouse {
            id: Uuid::new_v4(),
            code: "WH1".to_string(),
            name: "Main".to_string(),
            is_default: true,
            address: Some("9 Depot Way".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            postal_code: Some("62701".to_string()),
            country: Some("US".to_string()),
        }
    }

    fn pack_slip(order: &Order, weight: Option<f64>) -> PackSlip {
        PackSlip {
            id: Uuid::new_v4(),
            pack_slip_number: "PS-1".to_string(),
            order_id: order.id,
            pick_list_id: None,
            warehouse_id: Uuid::new_v4(),
            status: PackSlipStatus::Packed,
            packed_by: None,
            package_count: 1,
            weight,
            notes: None,
            items: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prefills_from_warehouse_customer_and_pack_slip() {
        let order = Order::new("ORD-3", Some("Ada Lovelace".to_string()));
        let slip = pack_slip(&order, Some(4.2));
        let mut builder = ShippingLabelBuilder::new(Some(&warehouse()));
        builder.select_order(&order, &[slip.clone()]);
        builder.select_pack_slip(Some(slip.id)).unwrap();

        assert_eq!(builder.from_address().name, "Main");
        assert_eq!(builder.from_address().state.as_deref(), Some("IL"));
        assert_eq!(builder.to_address().name, "Ada Lovelace");
        assert_eq!(builder.weight(), Some(4.2));
    }

    #[test]
    fn test_switching_order_replaces_prefills() {
        let first = Order::new("ORD-3", Some("Ada Lovelace".to_string()));
        let second = Order::new("ORD-4", Some("Alan Turing".to_string()));
        let slip = pack_slip(&first, Some(4.2));
        let mut builder = ShippingLabelBuilder::new(Some(&warehouse()));
        builder.select_order(&first, &[slip.clone()]);
        builder.select_pack_slip(Some(slip.id)).unwrap();

        builder.select_order(&second, &[slip]);
        assert_eq!(builder.to_address().name, "Alan Turing");
        assert_eq!(builder.weight(), None);
        assert!(builder.available_pack_slips().is_empty());

        builder.select_order(&Order::new("ORD-5", None), &[]);
        assert_eq!(builder.to_address().name, "");
    }

    #[test]
    fn test_edited_values_survive_order_switch() {
        let first = Order::new("ORD-3", Some("Ada Lovelace".to_string()));
        let second = Order::new("ORD-4", Some("Alan Turing".to_string()));
        let slip = pack_slip(&first, Some(4.2));
        let mut builder = ShippingLabelBuilder::new(None);
        builder.select_order(&first, &[slip.clone()]);
        builder.select_pack_slip(Some(slip.id)).unwrap();
        builder.set_to_address(address("Receiving Dock"));
        builder.set_weight(Some(6.0));

        builder.select_order(&second, &[]);
        assert_eq!(builder.to_address().name, "Receiving Dock");
        assert_eq!(builder.weight(), Some(6.0));
    }

    #[test]
    fn test_slip_without_weight_drops_copied_weight() {
        let order = Order::new("ORD-3", None);
        let heavy = pack_slip(&order, Some(4.2));
        let unweighed = pack_slip(&order, None);
        let mut builder = ShippingLabelBuilder::new(None);
        builder.select_order(&order, &[heavy.clone(), unweighed.clone()]);

        builder.select_pack_slip(Some(heavy.id)).unwrap();
        assert_eq!(builder.weight(), Some(4.2));
        builder.select_pack_slip(Some(unweighed.id)).unwrap();
        assert_eq!(builder.weight(), None);
    }

    #[test]
    fn test_missing_state_is_accepted() {
        let order = Order::new("ORD-3", None);
        let mut builder = ShippingLabelBuilder::new(Some(&warehouse()));
        builder.select_order(&order, &[]);
        builder.set_to_address(address("Grace Hopper"));

        let request = builder.validate().unwrap();
        assert_eq!(request.to_address.state, None);
        assert_eq!(request.dimensions, None);
    }

    #[test]
    fn test_incomplete_address_names_the_side() {
        let order = Order::new("ORD-3", None);
        let mut builder = ShippingLabelBuilder::new(None);
        builder.select_order(&order, &[]);
        builder.set_to_address(address("Grace Hopper"));

        let err = builder.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::IncompleteAddress { role: AddressRole::From, .. }
        ));

        let mut to = address("");
        to.country = " ".to_string();
        builder.set_from_address(address("Main"));
        builder.set_to_address(to);
        assert_eq!(
            builder.validate().unwrap_err(),
            ValidationError::IncompleteAddress {
                role: AddressRole::To,
                missing: vec![AddressField::Name, AddressField::Country],
            }
        );
    }

    #[test]
    fn test_dimensions_only_sent_when_given() {
        let order = Order::new("ORD-3", None);
        let mut builder = ShippingLabelBuilder::new(Some(&warehouse()));
        builder.select_order(&order, &[]);
        builder.set_to_address(address("Grace Hopper"));

        builder.set_dimensions(Some(Dimensions::default()));
        assert_eq!(builder.validate().unwrap().dimensions, None);

        builder.set_dimensions(Some(Dimensions {
            length: Some(10.0),
            width: None,
            height: None,
        }));
        let dimensions = builder.validate().unwrap().dimensions.unwrap();
        assert_eq!(dimensions.length, Some(10.0));
        assert_eq!(dimensions.width, None);

        builder.set_dimensions(Some(Dimensions {
            length: None,
            width: Some(-1.0),
            height: None,
        }));
        assert_eq!(builder.validate().unwrap_err(), ValidationError::InvalidDimension("width"));
    }

    #[test]
    fn test_pack_slip_of_other_order_rejected() {
        let order = Order::new("ORD-3", None);
        let other = Order::new("ORD-4", None);
        let foreign = pack_slip(&other, None);
        let request = CreateShippingLabelRequest {
            order_id: order.id,
            pack_slip_id: Some(foreign.id),
            carrier: Carrier::Dhl,
            service_type: None,
            tracking_number: None,
            from_address: address("Main"),
            to_address: address("Grace"),
            weight: None,
            dimensions: None,
        };
        assert_eq!(
            validate_shipping_label_request(&order, Some(&foreign), &request),
            Err(ValidationError::PackSlipOrderMismatch(foreign.id))
        );
    }
}

use depot_core::{AddressField, Order};
use std::fmt;
use uuid::Uuid;

/// Which end of a shipment an address describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    From,
    To,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressRole::From => f.write_str("From address"),
            AddressRole::To => f.write_str("To address"),
        }
    }
}

fn join_fields(fields: &[AddressField]) -> String {
    fields.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ")
}

/// Input problems caught before any create call is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an order")]
    MissingOrder,

    #[error("Request is for order {requested}, not the loaded order {order_id}")]
    OrderMismatch { requested: Uuid, order_id: Uuid },

    #[error("Please select a warehouse")]
    MissingWarehouse,

    #[error("Order {0} has no items left to fulfill")]
    NoEligibleItems(String),

    #[error("Please select at least one item")]
    NoItemsSelected,

    #[error("Order line {0} is not available for selection")]
    UnknownLine(Uuid),

    #[error("Order line {0} appears more than once")]
    DuplicateLine(Uuid),

    #[error("Product {product_id} does not belong to order line {order_line_id}")]
    ProductMismatch { order_line_id: Uuid, product_id: Uuid },

    #[error("Quantity for order line {0} must be at least 1")]
    ZeroQuantity(Uuid),

    #[error("Quantity {requested} for order line {order_line_id} exceeds the maximum of {maximum}")]
    QuantityExceedsMaximum {
        order_line_id: Uuid,
        requested: u32,
        maximum: u32,
    },

    #[error("Pick list {0} was not found")]
    UnknownPickList(Uuid),

    #[error("Pick list {0} belongs to a different order")]
    PickListOrderMismatch(Uuid),

    #[error("Pack slip {0} was not found")]
    UnknownPackSlip(Uuid),

    #[error("Pack slip {0} belongs to a different order")]
    PackSlipOrderMismatch(Uuid),

    #[error("Package count must be a positive integer")]
    InvalidPackageCount,

    #[error("Weight must be a non-negative number")]
    InvalidWeight,

    #[error("Dimension {0} must be a non-negative number")]
    InvalidDimension(&'static str),

    #[error("{role} is incomplete: missing {}", join_fields(.missing))]
    IncompleteAddress {
        role: AddressRole,
        missing: Vec<AddressField>,
    },
}

/// A nil id means nothing was chosen; any other id must be the order at hand.
pub(crate) fn check_order(order: &Order, requested: Uuid) -> Result<(), ValidationError> {
    if requested.is_nil() {
        return Err(ValidationError::MissingOrder);
    }
    if requested != order.id {
        return Err(ValidationError::OrderMismatch {
            requested,
            order_id: order.id,
        });
    }
    Ok(())
}

pub(crate) fn check_weight(weight: Option<f64>) -> Result<(), ValidationError> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(ValidationError::InvalidWeight),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_address_names_the_address() {
        let err = ValidationError::IncompleteAddress {
            role: AddressRole::To,
            missing: vec![AddressField::Name, AddressField::PostalCode],
        };
        assert_eq!(err.to_string(), "To address is incomplete: missing name, postalCode");
    }

    #[test]
    fn test_check_weight() {
        assert!(check_weight(None).is_ok());
        assert!(check_weight(Some(0.0)).is_ok());
        assert_eq!(check_weight(Some(-0.5)), Err(ValidationError::InvalidWeight));
        assert_eq!(check_weight(Some(f64::NAN)), Err(ValidationError::InvalidWeight));
    }

    #[test]
    fn test_check_order_tells_missing_from_mismatched() {
        let order = Order::new("ORD-7", None);
        assert!(check_order(&order, order.id).is_ok());
        assert_eq!(check_order(&order, Uuid::nil()), Err(ValidationError::MissingOrder));

        let other = Uuid::new_v4();
        let err = check_order(&order, other).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OrderMismatch {
                requested: other,
                order_id: order.id
            }
        );
        assert!(err.to_string().contains(&other.to_string()));
    }
}

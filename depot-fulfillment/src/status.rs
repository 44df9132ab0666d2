use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared shape of the document state machines: a linear chain from
/// `initial()` to a terminal state, with cancellation allowed from any
/// non-terminal state.
pub trait Lifecycle: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Document name used in error messages.
    const DOCUMENT: &'static str;

    fn initial() -> Self;

    fn cancelled() -> Self;

    /// Next state on the linear chain, `None` for terminal states.
    fn successor(&self) -> Option<Self>;

    fn is_terminal(&self) -> bool {
        self.successor().is_none()
    }

    fn can_transition_to(&self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::cancelled() || self.successor() == Some(next)
    }

    fn transition(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                document: Self::DOCUMENT,
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {document} transition from {from} to {to}")]
pub struct TransitionError {
    pub document: &'static str,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickListStatus {
    Draft,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl PickListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickListStatus::Draft => "DRAFT",
            PickListStatus::Assigned => "ASSIGNED",
            PickListStatus::InProgress => "IN_PROGRESS",
            PickListStatus::Completed => "COMPLETED",
            PickListStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Lifecycle for PickListStatus {
    const DOCUMENT: &'static str = "pick list";

    fn initial() -> Self {
        PickListStatus::Draft
    }

    fn cancelled() -> Self {
        PickListStatus::Cancelled
    }

    fn successor(&self) -> Option<Self> {
        match self {
            PickListStatus::Draft => Some(PickListStatus::Assigned),
            PickListStatus::Assigned => Some(PickListStatus::InProgress),
            PickListStatus::InProgress => Some(PickListStatus::Completed),
            PickListStatus::Completed | PickListStatus::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackSlipStatus {
    Draft,
    Packing,
    Packed,
    Shipped,
    Cancelled,
}

impl PackSlipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackSlipStatus::Draft => "DRAFT",
            PackSlipStatus::Packing => "PACKING",
            PackSlipStatus::Packed => "PACKED",
            PackSlipStatus::Shipped => "SHIPPED",
            PackSlipStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Lifecycle for PackSlipStatus {
    const DOCUMENT: &'static str = "pack slip";

    fn initial() -> Self {
        PackSlipStatus::Draft
    }

    fn cancelled() -> Self {
        PackSlipStatus::Cancelled
    }

    fn successor(&self) -> Option<Self> {
        match self {
            PackSlipStatus::Draft => Some(PackSlipStatus::Packing),
            PackSlipStatus::Packing => Some(PackSlipStatus::Packed),
            PackSlipStatus::Packed => Some(PackSlipStatus::Shipped),
            PackSlipStatus::Shipped | PackSlipStatus::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingLabelStatus {
    Draft,
    Generated,
    Printed,
    Shipped,
    Cancelled,
}

impl ShippingLabelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingLabelStatus::Draft => "DRAFT",
            ShippingLabelStatus::Generated => "GENERATED",
            ShippingLabelStatus::Printed => "PRINTED",
            ShippingLabelStatus::Shipped => "SHIPPED",
            ShippingLabelStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Lifecycle for ShippingLabelStatus {
    const DOCUMENT: &'static str = "shipping label";

    fn initial() -> Self {
        ShippingLabelStatus::Draft
    }

    fn cancelled() -> Self {
        ShippingLabelStatus::Cancelled
    }

    fn successor(&self) -> Option<Self> {
        match self {
            ShippingLabelStatus::Draft => Some(ShippingLabelStatus::Generated),
            ShippingLabelStatus::Generated => Some(ShippingLabelStatus::Printed),
            ShippingLabelStatus::Printed => Some(ShippingLabelStatus::Shipped),
            ShippingLabelStatus::Shipped | ShippingLabelStatus::Cancelled => None,
        }
    }
}

macro_rules! display_as_str {
    ($($status:ty),*) => {
        $(
            impl fmt::Display for $status {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(PickListStatus, PackSlipStatus, ShippingLabelStatus, PickItemStatus);

/// Per-item picking outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickItemStatus {
    #[default]
    Pending,
    Picked,
    Partial,
    Skipped,
}

impl PickItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickItemStatus::Pending => "PENDING",
            PickItemStatus::Picked => "PICKED",
            PickItemStatus::Partial => "PARTIAL",
            PickItemStatus::Skipped => "SKIPPED",
        }
    }

    /// Status implied by a recorded pick against the requested quantity.
    pub fn from_pick(picked_quantity: u32, quantity: u32, skipped: bool) -> Self {
        if skipped {
            PickItemStatus::Skipped
        } else if picked_quantity == 0 {
            PickItemStatus::Pending
        } else if picked_quantity >= quantity {
            PickItemStatus::Picked
        } else {
            PickItemStatus::Partial
        }
    }
}

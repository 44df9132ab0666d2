use serde::Serialize;

use crate::models::{PackSlip, PickList, ShippingLabel};
use crate::status::{PackSlipStatus, PickListStatus, ShippingLabelStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickListCounts {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackSlipCounts {
    pub total: usize,
    pub packing: usize,
    pub packed: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLabelCounts {
    pub total: usize,
    pub generated: usize,
    pub shipped: usize,
}

/// Dashboard counts by status bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentSummary {
    pub pick_lists: PickListCounts,
    pub pack_slips: PackSlipCounts,
    pub shipping_labels: ShippingLabelCounts,
}

impl FulfillmentSummary {
    pub fn compute(pick_lists: &[PickList], pack_slips: &[PackSlip], labels: &[ShippingLabel]) -> Self {
        let mut summary = Self::default();

        for list in pick_lists {
            summary.pick_lists.total += 1;
            match list.status {
                PickListStatus::Assigned | PickListStatus::InProgress => summary.pick_lists.in_progress += 1,
                PickListStatus::Completed => summary.pick_lists.completed += 1,
                _ => {}
            }
        }

        for slip in pack_slips {
            summary.pack_slips.total += 1;
            match slip.status {
                PackSlipStatus::Packing => summary.pack_slips.packing += 1,
                PackSlipStatus::Packed => summary.pack_slips.packed += 1,
                _ => {}
            }
        }

        for label in labels {
            summary.shipping_labels.total += 1;
            match label.status {
                // "generated" on the dashboard means printed and ready to hand over.
                ShippingLabelStatus::Printed => summary.shipping_labels.generated += 1,
                ShippingLabelStatus::Shipped => summary.shipping_labels.shipped += 1,
                _ => {}
            }
        }

        summary
    }
}

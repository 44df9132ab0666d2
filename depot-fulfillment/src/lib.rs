//! Order fulfillment pipeline: Order → Pick List → Pack Slip → Shipping Label.
//!
//! Builders hold the draft of one document and submit it through a
//! [`FulfillmentGateway`]. The [`FulfillmentRegistry`] is the server side:
//! it revalidates, numbers, stores and reconciles documents, and owns their
//! later status transitions.

pub mod gateway;
pub mod master_data;
pub mod models;
pub mod pack_slip;
pub mod pick_list;
pub mod reconcile;
pub mod registry;
pub mod repository;
pub mod selection;
pub mod shipping_label;
pub mod status;
pub mod summary;
pub mod validation;
pub mod wire;

pub use gateway::{FulfillmentGateway, SubmitError};
pub use master_data::MasterData;
pub use models::{Carrier, Dimensions, PackSlip, PackSlipItem, PickList, PickListItem, ShippingLabel};
pub use pack_slip::{validate_pack_slip_request, PackSlipBuilder};
pub use pick_list::{validate_pick_list_request, PickListBuilder};
pub use reconcile::{LoggingReconciler, Reconciler};
pub use registry::{FulfillmentRegistry, Numbering, RegistryError, SummaryFilter};
pub use repository::{DocumentKind, FulfillmentRepository, InMemoryFulfillmentRepository};
pub use selection::{LineCandidate, Selection};
pub use shipping_label::{validate_shipping_label_request, ShippingLabelBuilder};
pub use status::{
    Lifecycle, PackSlipStatus, PickItemStatus, PickListStatus, ShippingLabelStatus, TransitionError,
};
pub use summary::FulfillmentSummary;
pub use validation::{AddressRole, ValidationError};

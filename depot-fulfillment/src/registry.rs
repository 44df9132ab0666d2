use chrono::Utc;
use depot_core::Order;
use depot_shared::Masked;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{PackSlip, PackSlipItem, PickList, PickListItem, PickRecordError, ShippingLabel};
use crate::pack_slip::validate_pack_slip_request;
use crate::pick_list::validate_pick_list_request;
use crate::reconcile::Reconciler;
use crate::repository::{DocumentKind, FulfillmentRepository};
use crate::shipping_label::validate_shipping_label_request;
use crate::status::{Lifecycle, PackSlipStatus, PickListStatus, ShippingLabelStatus, TransitionError};
use crate::summary::FulfillmentSummary;
use crate::validation::ValidationError;
use crate::wire::{optional_text, CreatePackSlipRequest, CreatePickListRequest, CreateShippingLabelRequest};

/// Prefixes for human-readable document numbers, e.g. `PL-000001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    pub pick_list: String,
    pub pack_slip: String,
    pub shipping_label: String,
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            pick_list: "PL".to_string(),
            pack_slip: "PS".to_string(),
            shipping_label: "SL".to_string(),
        }
    }
}

impl Numbering {
    pub fn format(&self, kind: DocumentKind, sequence: u64) -> String {
        let prefix = match kind {
            DocumentKind::PickList => &self.pick_list,
            DocumentKind::PackSlip => &self.pack_slip,
            DocumentKind::ShippingLabel => &self.shipping_label,
        };
        format!("{}-{:06}", prefix, sequence)
    }
}

/// Pre-filter for the dashboard summary. `status` matches the wire name of
/// any document status, e.g. `PACKED`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub warehouse_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{document} {id} not found")]
    NotFound { document: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    PickRecord(#[from] PickRecordError),

    #[error("Picks can only be recorded while the pick list is IN_PROGRESS (currently {0})")]
    NotPicking(PickListStatus),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for RegistryError {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        RegistryError::Repository(e.to_string())
    }
}

/// All pick lists, pack slips and shipping labels, with the server side of
/// their creation and the collaborator-owned transitions.
///
/// Clones share one set of per-document locks, so read-modify-write changes
/// to the same document are applied one at a time within the process.
#[derive(Clone)]
pub struct FulfillmentRegistry {
    repository: Arc<dyn FulfillmentRepository>,
    reconciler: Arc<dyn Reconciler>,
    numbering: Numbering,
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl FulfillmentRegistry {
    pub fn new(repository: Arc<dyn FulfillmentRepository>, reconciler: Arc<dyn Reconciler>) -> Self {
        Self {
            repository,
            reconciler,
            numbering: Numbering::default(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Held for the whole read-modify-write of one document.
    async fn lock_document(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody else is holding or waiting on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    async fn next_number(&self, kind: DocumentKind) -> Result<String, RegistryError> {
        let sequence = self.repository.next_number(kind).await?;
        Ok(self.numbering.format(kind, sequence))
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    pub async fn create_pick_list(
        &self,
        order: &Order,
        request: CreatePickListRequest,
    ) -> Result<PickList, RegistryError> {
        validate_pick_list_request(order, &request)?;

        let now = Utc::now();
        let pick_list = PickList {
            id: Uuid::new_v4(),
            pick_list_number: self.next_number(DocumentKind::PickList).await?,
            order_id: request.order_id,
            warehouse_id: request.warehouse_id,
            status: PickListStatus::initial(),
            assigned_to: optional_text(request.assigned_to),
            notes: optional_text(request.notes),
            items: request
                .items
                .iter()
                .map(|line| PickListItem::new(line.order_line_id, line.product_id, line.quantity))
                .collect(),
            created_at: now,
            updated_at: now,
        };

        self.repository.save_pick_list(&pick_list).await?;
        info!(pick_list = %pick_list.pick_list_number, order = %order.order_number, items = pick_list.items.len(), "Pick list created");

        if let Err(e) = self.reconciler.pick_list_created(&pick_list).await {
            error!("Reconciliation failed for pick list {}: {}", pick_list.pick_list_number, e);
        }
        Ok(pick_list)
    }

    pub async fn create_pack_slip(
        &self,
        order: &Order,
        request: CreatePackSlipRequest,
    ) -> Result<PackSlip, RegistryError> {
        let pick_list = match request.pick_list_id {
            Some(id) => Some(
                self.repository
                    .get_pick_list(id)
                    .await?
                    .ok_or(ValidationError::UnknownPickList(id))?,
            ),
            None => None,
        };
        validate_pack_slip_request(order, pick_list.as_ref(), &request)?;

        let now = Utc::now();
        let pack_slip = PackSlip {
            id: Uuid::new_v4(),
            pack_slip_number: self.next_number(DocumentKind::PackSlip).await?,
            order_id: request.order_id,
            pick_list_id: request.pick_list_id,
            warehouse_id: request.warehouse_id,
            status: PackSlipStatus::initial(),
            packed_by: None,
            package_count: request.package_count,
            weight: request.weight,
            notes: optional_text(request.notes),
            items: request
                .items
                .iter()
                .map(|line| PackSlipItem::new(line.order_line_id, line.product_id, line.quantity))
                .collect(),
            created_at: now,
            updated_at: now,
        };

        self.repository.save_pack_slip(&pack_slip).await?;
        info!(pack_slip = %pack_slip.pack_slip_number, order = %order.order_number, packages = pack_slip.package_count, "Pack slip created");

        if let Err(e) = self.reconciler.pack_slip_created(&pack_slip).await {
            error!("Reconciliation failed for pack slip {}: {}", pack_slip.pack_slip_number, e);
        }
        Ok(pack_slip)
    }

    pub async fn create_shipping_label(
        &self,
        order: &Order,
        request: CreateShippingLabelRequest,
    ) -> Result<ShippingLabel, RegistryError> {
        let pack_slip = match request.pack_slip_id {
            Some(id) => Some(
                self.repository
                    .get_pack_slip(id)
                    .await?
                    .ok_or(ValidationError::UnknownPackSlip(id))?,
            ),
            None => None,
        };
        validate_shipping_label_request(order, pack_slip.as_ref(), &request)?;

        let now = Utc::now();
        let label = ShippingLabel {
            id: Uuid::new_v4(),
            label_number: self.next_number(DocumentKind::ShippingLabel).await?,
            order_id: request.order_id,
            pack_slip_id: request.pack_slip_id,
            carrier: request.carrier,
            service_type: optional_text(request.service_type),
            tracking_number: optional_text(request.tracking_number),
            from_address: request.from_address,
            to_address: request.to_address,
            weight: request.weight,
            dimensions: request.dimensions.filter(|d| d.is_specified()),
            status: ShippingLabelStatus::initial(),
            created_at: now,
            updated_at: now,
        };

        self.repository.save_shipping_label(&label).await?;
        info!(
            label = %label.label_number,
            carrier = label.carrier.as_str(),
            recipient = %Masked(&label.to_address.name),
            "Shipping label created"
        );

        if let Err(e) = self.reconciler.shipping_label_created(&label).await {
            error!("Reconciliation failed for shipping label {}: {}", label.label_number, e);
        }
        Ok(label)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub async fn pick_list(&self, id: Uuid) -> Result<PickList, RegistryError> {
        self.repository
            .get_pick_list(id)
            .await?
            .ok_or(RegistryError::NotFound { document: "Pick list", id })
    }

    pub async fn pack_slip(&self, id: Uuid) -> Result<PackSlip, RegistryError> {
        self.repository
            .get_pack_slip(id)
            .await?
            .ok_or(RegistryError::NotFound { document: "Pack slip", id })
    }

    pub async fn shipping_label(&self, id: Uuid) -> Result<ShippingLabel, RegistryError> {
        self.repository
            .get_shipping_label(id)
            .await?
            .ok_or(RegistryError::NotFound { document: "Shipping label", id })
    }

    pub async fn pick_lists(&self, order_id: Option<Uuid>) -> Result<Vec<PickList>, RegistryError> {
        Ok(self.repository.list_pick_lists(order_id).await?)
    }

    pub async fn pack_slips(&self, order_id: Option<Uuid>) -> Result<Vec<PackSlip>, RegistryError> {
        Ok(self.repository.list_pack_slips(order_id).await?)
    }

    pub async fn shipping_labels(&self, order_id: Option<Uuid>) -> Result<Vec<ShippingLabel>, RegistryError> {
        Ok(self.repository.list_shipping_labels(order_id).await?)
    }

    // ------------------------------------------------------------------
    // Collaborator-owned transitions
    // ------------------------------------------------------------------

    pub async fn transition_pick_list(&self, id: Uuid, next: PickListStatus) -> Result<PickList, RegistryError> {
        let _guard = self.lock_document(id).await;
        let mut pick_list = self.pick_list(id).await?;
        let from = pick_list.status;
        pick_list.transition_to(next)?;
        self.repository.save_pick_list(&pick_list).await?;
        info!(pick_list = %pick_list.pick_list_number, %from, to = %next, "Pick list status changed");
        Ok(pick_list)
    }

    pub async fn transition_pack_slip(&self, id: Uuid, next: PackSlipStatus) -> Result<PackSlip, RegistryError> {
        let _guard = self.lock_document(id).await;
        let mut pack_slip = self.pack_slip(id).await?;
        let from = pack_slip.status;
        pack_slip.transition_to(next)?;
        self.repository.save_pack_slip(&pack_slip).await?;
        info!(pack_slip = %pack_slip.pack_slip_number, %from, to = %next, "Pack slip status changed");
        Ok(pack_slip)
    }

    pub async fn transition_shipping_label(
        &self,
        id: Uuid,
        next: ShippingLabelStatus,
    ) -> Result<ShippingLabel, RegistryError> {
        let _guard = self.lock_document(id).await;
        let mut label = self.shipping_label(id).await?;
        let from = label.status;
        label.transition_to(next)?;
        self.repository.save_shipping_label(&label).await?;
        info!(label = %label.label_number, %from, to = %next, "Shipping label status changed");
        Ok(label)
    }

    /// Hand a draft pick list to a picker: DRAFT → ASSIGNED.
    pub async fn assign_pick_list(&self, id: Uuid, assigned_to: String) -> Result<PickList, RegistryError> {
        let _guard = self.lock_document(id).await;
        let mut pick_list = self.pick_list(id).await?;
        pick_list.transition_to(PickListStatus::Assigned)?;
        pick_list.assigned_to = optional_text(Some(assigned_to));
        self.repository.save_pick_list(&pick_list).await?;
        info!(pick_list = %pick_list.pick_list_number, "Pick list assigned");
        Ok(pick_list)
    }

    /// Record the actual quantity picked for one line of a list in progress.
    pub async fn record_pick(
        &self,
        id: Uuid,
        order_line_id: Uuid,
        picked_quantity: u32,
        skipped: bool,
    ) -> Result<PickList, RegistryError> {
        let _guard = self.lock_document(id).await;
        let mut pick_list = self.pick_list(id).await?;
        if pick_list.status != PickListStatus::InProgress {
            return Err(RegistryError::NotPicking(pick_list.status));
        }

        let item = pick_list
            .items
            .iter_mut()
            .find(|item| item.order_line_id == order_line_id)
            .ok_or(RegistryError::NotFound {
                document: "Pick list line",
                id: order_line_id,
            })?;
        item.record_pick(picked_quantity, skipped)?;
        let item_status = item.status;

        pick_list.updated_at = Utc::now();
        self.repository.save_pick_list(&pick_list).await?;
        info!(pick_list = %pick_list.pick_list_number, %order_line_id, picked_quantity, status = %item_status, "Pick recorded");
        Ok(pick_list)
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    pub async fn summary(&self, filter: &SummaryFilter) -> Result<FulfillmentSummary, RegistryError> {
        let pick_lists = self.repository.list_pick_lists(None).await?;
        let pack_slips = self.repository.list_pack_slips(None).await?;
        let labels = self.repository.list_shipping_labels(None).await?;

        // A label has no warehouse of its own; it ships from its pack slip's.
        let slip_warehouse: HashMap<Uuid, Uuid> = pack_slips.iter().map(|s| (s.id, s.warehouse_id)).collect();

        let status_matches = |name: &str| filter.status.as_deref().map_or(true, |s| s.eq_ignore_ascii_case(name));
        let warehouse_matches = |warehouse: Option<Uuid>| filter.warehouse_id.map_or(true, |w| warehouse == Some(w));

        let pick_lists: Vec<PickList> = pick_lists
            .into_iter()
            .filter(|l| warehouse_matches(Some(l.warehouse_id)) && status_matches(l.status.as_str()))
            .collect();
        let labels: Vec<ShippingLabel> = labels
            .into_iter()
            .filter(|l| {
                let warehouse = l.pack_slip_id.and_then(|id| slip_warehouse.get(&id).copied());
                warehouse_matches(warehouse) && status_matches(l.status.as_str())
            })
            .collect();
        let pack_slips: Vec<PackSlip> = pack_slips
            .into_iter()
            .filter(|s| warehouse_matches(Some(s.warehouse_id)) && status_matches(s.status.as_str()))
            .collect();

        Ok(FulfillmentSummary::compute(&pick_lists, &pack_slips, &labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::LoggingReconciler;
    use crate::repository::InMemoryFulfillmentRepository;
    use crate::wire::RequestedLine;
    use async_trait::async_trait;
    use depot_core::OrderLine;
    use std::time::Duration;

    type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

    /// Reads a pick list slowly so overlapping writers interleave.
    #[derive(Default)]
    struct SlowReads {
        inner: InMemoryFulfillmentRepository,
    }

    #[async_trait]
    impl FulfillmentRepository for SlowReads {
        async fn next_number(&self, kind: DocumentKind) -> RepoResult<u64> {
            self.inner.next_number(kind).await
        }
        async fn save_pick_list(&self, pick_list: &PickList) -> RepoResult<()> {
            self.inner.save_pick_list(pick_list).await
        }
        async fn get_pick_list(&self, id: Uuid) -> RepoResult<Option<PickList>> {
            let found = self.inner.get_pick_list(id).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            found
        }
        async fn list_pick_lists(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PickList>> {
            self.inner.list_pick_lists(order_id).await
        }
        async fn save_pack_slip(&self, pack_slip: &PackSlip) -> RepoResult<()> {
            self.inner.save_pack_slip(pack_slip).await
        }
        async fn get_pack_slip(&self, id: Uuid) -> RepoResult<Option<PackSlip>> {
            self.inner.get_pack_slip(id).await
        }
        async fn list_pack_slips(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PackSlip>> {
            self.inner.list_pack_slips(order_id).await
        }
        async fn save_shipping_label(&self, label: &ShippingLabel) -> RepoResult<()> {
            self.inner.save_shipping_label(label).await
        }
        async fn get_shipping_label(&self, id: Uuid) -> RepoResult<Option<ShippingLabel>> {
            self.inner.get_shipping_label(id).await
        }
        async fn list_shipping_labels(&self, order_id: Option<Uuid>) -> RepoResult<Vec<ShippingLabel>> {
            self.inner.list_shipping_labels(order_id).await
        }
    }

    fn two_line_order() -> Order {
        Order::new("SO-2001", None)
            .with_line(OrderLine::new(Uuid::new_v4(), "BOLT-8", "Bolt", 5, 0).unwrap())
            .with_line(OrderLine::new(Uuid::new_v4(), "NUT-8", "Nut", 5, 0).unwrap())
    }

    async fn picking_list(registry: &FulfillmentRegistry, order: &Order) -> PickList {
        let request = CreatePickListRequest {
            order_id: order.id,
            warehouse_id: Uuid::new_v4(),
            items: order
                .lines
                .iter()
                .map(|line| RequestedLine {
                    order_line_id: line.order_line_id,
                    product_id: line.product_id,
                    quantity: 5,
                })
                .collect(),
            assigned_to: None,
            notes: None,
        };
        let list = registry.create_pick_list(order, request).await.unwrap();
        registry.assign_pick_list(list.id, "ana".to_string()).await.unwrap();
        registry.transition_pick_list(list.id, PickListStatus::InProgress).await.unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_picks_on_one_list_are_all_kept() {
        let registry = FulfillmentRegistry::new(Arc::new(SlowReads::default()), Arc::new(LoggingReconciler));
        let order = two_line_order();
        let list = picking_list(&registry, &order).await;
        let (first, second) = (order.lines[0].order_line_id, order.lines[1].order_line_id);

        let (a, b) = tokio::join!(
            registry.record_pick(list.id, first, 5, false),
            registry.record_pick(list.id, second, 5, false),
        );
        a.unwrap();
        b.unwrap();

        let stored = registry.pick_list(list.id).await.unwrap();
        let picked: Vec<u32> = stored.items.iter().map(|item| item.picked_quantity).collect();
        assert_eq!(picked, vec![5, 5]);
    }

    #[tokio::test]
    async fn test_racing_terminal_transitions_admit_only_one() {
        let registry = FulfillmentRegistry::new(Arc::new(SlowReads::default()), Arc::new(LoggingReconciler));
        let order = two_line_order();
        let list = picking_list(&registry, &order).await;

        let (complete, cancel) = tokio::join!(
            registry.transition_pick_list(list.id, PickListStatus::Completed),
            registry.transition_pick_list(list.id, PickListStatus::Cancelled),
        );
        assert!(complete.is_ok() != cancel.is_ok());

        let winner = if complete.is_ok() { PickListStatus::Completed } else { PickListStatus::Cancelled };
        assert_eq!(registry.pick_list(list.id).await.unwrap().status, winner);
        assert!(matches!(complete.and(cancel).unwrap_err(), RegistryError::Transition(_)));
    }

    #[test]
    fn test_numbers_are_zero_padded() {
        let numbering = Numbering::default();
        assert_eq!(numbering.format(DocumentKind::PickList, 1), "PL-000001");
        assert_eq!(numbering.format(DocumentKind::ShippingLabel, 1234567), "SL-1234567");

        let custom = Numbering {
            pack_slip: "PACK".to_string(),
            ..Numbering::default()
        };
        assert_eq!(custom.format(DocumentKind::PackSlip, 42), "PACK-000042");
    }
}

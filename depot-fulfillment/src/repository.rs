use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{PackSlip, PickList, ShippingLabel};

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Document families that get their own number sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    PickList,
    PackSlip,
    ShippingLabel,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PickList => "pick_list",
            DocumentKind::PackSlip => "pack_slip",
            DocumentKind::ShippingLabel => "shipping_label",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for fulfillment documents. `save_*` inserts or replaces by id;
/// `list_*` returns documents oldest first, optionally for one order.
#[async_trait]
pub trait FulfillmentRepository: Send + Sync {
    /// Next value of the per-kind sequence, starting at 1.
    async fn next_number(&self, kind: DocumentKind) -> RepoResult<u64>;

    async fn save_pick_list(&self, pick_list: &PickList) -> RepoResult<()>;
    async fn get_pick_list(&self, id: Uuid) -> RepoResult<Option<PickList>>;
    async fn list_pick_lists(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PickList>>;

    async fn save_pack_slip(&self, pack_slip: &PackSlip) -> RepoResult<()>;
    async fn get_pack_slip(&self, id: Uuid) -> RepoResult<Option<PackSlip>>;
    async fn list_pack_slips(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PackSlip>>;

    async fn save_shipping_label(&self, label: &ShippingLabel) -> RepoResult<()>;
    async fn get_shipping_label(&self, id: Uuid) -> RepoResult<Option<ShippingLabel>>;
    async fn list_shipping_labels(&self, order_id: Option<Uuid>) -> RepoResult<Vec<ShippingLabel>>;
}

/// Process-local repository.
#[derive(Default)]
pub struct InMemoryFulfillmentRepository {
    sequences: RwLock<HashMap<DocumentKind, u64>>,
    pick_lists: RwLock<HashMap<Uuid, PickList>>,
    pack_slips: RwLock<HashMap<Uuid, PackSlip>>,
    shipping_labels: RwLock<HashMap<Uuid, ShippingLabel>>,
}

impl InMemoryFulfillmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn for_order<T: Clone>(
    docs: &HashMap<Uuid, T>,
    order_id: Option<Uuid>,
    order_of: impl Fn(&T) -> Uuid,
    created_of: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = docs
        .values()
        .filter(|doc| order_id.map_or(true, |id| order_of(doc) == id))
        .cloned()
        .collect();
    out.sort_by_key(|doc| created_of(doc));
    out
}

#[async_trait]
impl FulfillmentRepository for InMemoryFulfillmentRepository {
    async fn next_number(&self, kind: DocumentKind) -> RepoResult<u64> {
        let mut sequences = self.sequences.write().await;
        let next = sequences.entry(kind).or_insert(0);
        *next += 1;
        Ok(*next)
    }

    async fn save_pick_list(&self, pick_list: &PickList) -> RepoResult<()> {
        self.pick_lists.write().await.insert(pick_list.id, pick_list.clone());
        Ok(())
    }

    async fn get_pick_list(&self, id: Uuid) -> RepoResult<Option<PickList>> {
        Ok(self.pick_lists.read().await.get(&id).cloned())
    }

    async fn list_pick_lists(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PickList>> {
        let docs = self.pick_lists.read().await;
        Ok(for_order(&docs, order_id, |d| d.order_id, |d| d.created_at))
    }

    async fn save_pack_slip(&self, pack_slip: &PackSlip) -> RepoResult<()> {
        self.pack_slips.write().await.insert(pack_slip.id, pack_slip.clone());
        Ok(())
    }

    async fn get_pack_slip(&self, id: Uuid) -> RepoResult<Option<PackSlip>> {
        Ok(self.pack_slips.read().await.get(&id).cloned())
    }

    async fn list_pack_slips(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PackSlip>> {
        let docs = self.pack_slips.read().await;
        Ok(for_order(&docs, order_id, |d| d.order_id, |d| d.created_at))
    }

    async fn save_shipping_label(&self, label: &ShippingLabel) -> RepoResult<()> {
        self.shipping_labels.write().await.insert(label.id, label.clone());
        Ok(())
    }

    async fn get_shipping_label(&self, id: Uuid) -> RepoResult<Option<ShippingLabel>> {
        Ok(self.shipping_labels.read().await.get(&id).cloned())
    }

    async fn list_shipping_labels(&self, order_id: Option<Uuid>) -> RepoResult<Vec<ShippingLabel>> {
        let docs = self.shipping_labels.read().await;
        Ok(for_order(&docs, order_id, |d| d.order_id, |d| d.created_at))
    }
}

use async_trait::async_trait;
use depot_fulfillment::models::{PackSlip, PickList, ShippingLabel};
use depot_fulfillment::repository::{DocumentKind, FulfillmentRepository};
use depot_fulfillment::wire::{PackSlipDto, PickListDto, ShippingLabelDto};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::StoreError;

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const NAMESPACE: &str = "depot";

fn doc_key(kind: DocumentKind, id: Uuid) -> String {
    format!("{}:{}:{}", NAMESPACE, kind, id)
}

/// Set of document ids, for all orders or one.
fn index_key(kind: DocumentKind, order_id: Option<Uuid>) -> String {
    match order_id {
        Some(order_id) => format!("{}:{}:order:{}", NAMESPACE, kind, order_id),
        None => format!("{}:{}:all", NAMESPACE, kind),
    }
}

fn sequence_key(kind: DocumentKind) -> String {
    format!("{}:{}:seq", NAMESPACE, kind)
}

/// Documents stored as their wire JSON, one string key each, with set
/// indexes per order.
#[derive(Clone)]
pub struct RedisFulfillmentRepository {
    client: redis::Client,
}

impl RedisFulfillmentRepository {
    pub fn new(connection_string: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    async fn save_doc<D: Serialize>(
        &self,
        kind: DocumentKind,
        id: Uuid,
        order_id: Uuid,
        dto: &D,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(dto)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::pipe()
            .atomic()
            .set(doc_key(kind, id), payload)
            .ignore()
            .sadd(index_key(kind, None), id.to_string())
            .ignore()
            .sadd(index_key(kind, Some(order_id)), id.to_string())
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        debug!("Stored {} {}", kind, id);
        Ok(())
    }

    async fn load_doc<D: DeserializeOwned>(&self, kind: DocumentKind, id: Uuid) -> Result<Option<D>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(doc_key(kind, id)).await?;
        payload.map(|p| serde_json::from_str(&p)).transpose().map_err(Into::into)
    }

    async fn load_docs<D: DeserializeOwned>(
        &self,
        kind: DocumentKind,
        order_id: Option<Uuid>,
    ) -> Result<Vec<D>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let ids: Vec<String> = conn.smembers(index_key(kind, order_id)).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .map(|id| doc_key(kind, id))
            .collect();
        let payloads: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        payloads
            .into_iter()
            .flatten()
            .map(|p| serde_json::from_str(&p).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl FulfillmentRepository for RedisFulfillmentRepository {
    async fn next_number(&self, kind: DocumentKind) -> RepoResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let next: u64 = conn.incr(sequence_key(kind), 1u64).await?;
        Ok(next)
    }

    async fn save_pick_list(&self, pick_list: &PickList) -> RepoResult<()> {
        let dto = PickListDto::from(pick_list);
        Ok(self
            .save_doc(DocumentKind::PickList, pick_list.id, pick_list.order_id, &dto)
            .await?)
    }

    async fn get_pick_list(&self, id: Uuid) -> RepoResult<Option<PickList>> {
        let dto: Option<PickListDto> = self.load_doc(DocumentKind::PickList, id).await?;
        Ok(dto.map(PickList::try_from).transpose().map_err(StoreError::from)?)
    }

    async fn list_pick_lists(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PickList>> {
        let dtos: Vec<PickListDto> = self.load_docs(DocumentKind::PickList, order_id).await?;
        let mut docs = dtos
            .into_iter()
            .map(PickList::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;
        docs.sort_by_key(|d| d.created_at);
        Ok(docs)
    }

    async fn save_pack_slip(&self, pack_slip: &PackSlip) -> RepoResult<()> {
        let dto = PackSlipDto::from(pack_slip);
        Ok(self
            .save_doc(DocumentKind::PackSlip, pack_slip.id, pack_slip.order_id, &dto)
            .await?)
    }

    async fn get_pack_slip(&self, id: Uuid) -> RepoResult<Option<PackSlip>> {
        let dto: Option<PackSlipDto> = self.load_doc(DocumentKind::PackSlip, id).await?;
        Ok(dto.map(PackSlip::try_from).transpose().map_err(StoreError::from)?)
    }

    async fn list_pack_slips(&self, order_id: Option<Uuid>) -> RepoResult<Vec<PackSlip>> {
        let dtos: Vec<PackSlipDto> = self.load_docs(DocumentKind::PackSlip, order_id).await?;
        let mut docs = dtos
            .into_iter()
            .map(PackSlip::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;
        docs.sort_by_key(|d| d.created_at);
        Ok(docs)
    }

    async fn save_shipping_label(&self, label: &ShippingLabel) -> RepoResult<()> {
        let dto = ShippingLabelDto::from(label);
        Ok(self
            .save_doc(DocumentKind::ShippingLabel, label.id, label.order_id, &dto)
            .await?)
    }

    async fn get_shipping_label(&self, id: Uuid) -> RepoResult<Option<ShippingLabel>> {
        let dto: Option<ShippingLabelDto> = self.load_doc(DocumentKind::ShippingLabel, id).await?;
        Ok(dto.map(ShippingLabel::try_from).transpose().map_err(StoreError::from)?)
    }

    async fn list_shipping_labels(&self, order_id: Option<Uuid>) -> RepoResult<Vec<ShippingLabel>> {
        let dtos: Vec<ShippingLabelDto> = self.load_docs(DocumentKind::ShippingLabel, order_id).await?;
        let mut docs = dtos
            .into_iter()
            .map(ShippingLabel::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;
        docs.sort_by_key(|d| d.created_at);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced_by_kind() {
        let id = Uuid::nil();
        assert_eq!(
            doc_key(DocumentKind::PackSlip, id),
            "depot:pack_slip:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(index_key(DocumentKind::PickList, None), "depot:pick_list:all");
        assert_eq!(
            index_key(DocumentKind::ShippingLabel, Some(id)),
            "depot:shipping_label:order:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(sequence_key(DocumentKind::PickList), "depot:pick_list:seq");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(RedisFulfillmentRepository::new("not a url").is_err());
    }
}

use crate::domain::error::WfDocsResult;
use crate::domain::item::{Collection, Item, ItemList, UpdateItemRequest};
use async_trait::async_trait;

/// Largest page the items endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Operations against one configured collection
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// Fetch a single page of items
    async fn list_items(&self, limit: u32, offset: u32) -> WfDocsResult<ItemList>;

    /// Fetch one item by id
    async fn get_item(&self, item_id: &str) -> WfDocsResult<Item>;

    /// Replace an item's content; returns the item as stored
    async fn update_item(&self, item_id: &str, request: &UpdateItemRequest) -> WfDocsResult<Item>;

    /// Collections of the configured site
    async fn list_collections(&self) -> WfDocsResult<Vec<Collection>>;
}

use crate::domain::message::Message;
use crate::error::StorageResult;
use async_trait::async_trait;

pub mod dynamodb;
pub mod memory;
pub mod records;

pub use dynamodb::DynamoMessageStore;
pub use memory::MemoryMessageStore;

/// Direction of a range read over a room's sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanOrder {
    #[default]
    Ascending,
    Descending,
}

/// Ordered key-value store of messages, partitioned by room and sorted by `msg_id`.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Reads up to `limit` messages of one room in `msg_id` order.
    async fn query(&self, room_id: &str, order: ScanOrder, limit: u32) -> StorageResult<Vec<Message>>;

    /// Stores `message` unless its `(room_id, msg_id)` already exists.
    async fn put_if_absent(&self, message: &Message) -> StorageResult<()>;

    /// Removes `(room_id, msg_id)`, failing with a condition error if it does not exist.
    async fn delete_if_exists(&self, room_id: &str, msg_id: &str) -> StorageResult<()>;
}

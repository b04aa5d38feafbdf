use crate::adapters::storage::{MessageStore, ScanOrder};
use crate::domain::message::Message;
use crate::error::{StorageError, StorageErrorKind, StorageResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

const CONDITION_FAILED: &str = "The conditional request failed";

type Rooms = HashMap<String, BTreeMap<String, Message>>;

/// Process-local store with the same conditional semantics as the table.
///
/// Rows are lost on restart; intended for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    rooms: RwLock<Rooms>,
}

impl MemoryMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::new(StorageErrorKind::Unavailable, "in-memory store lock poisoned")
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn query(&self, room_id: &str, order: ScanOrder, limit: u32) -> StorageResult<Vec<Message>> {
        let rooms = self.rooms.read().map_err(poisoned)?;
        let Some(room) = rooms.get(room_id) else {
            return Ok(Vec::new());
        };

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let messages = match order {
            ScanOrder::Ascending => room.values().take(limit).cloned().collect(),
            ScanOrder::Descending => room.values().rev().take(limit).cloned().collect(),
        };
        Ok(messages)
    }

    async fn put_if_absent(&self, message: &Message) -> StorageResult<()> {
        let mut rooms = self.rooms.write().map_err(poisoned)?;
        let room = rooms.entry(message.room_id.clone()).or_default();
        if room.contains_key(&message.msg_id) {
            return Err(StorageError::new(StorageErrorKind::ConditionFailed, CONDITION_FAILED));
        }
        room.insert(message.msg_id.clone(), message.clone());
        Ok(())
    }

    async fn delete_if_exists(&self, room_id: &str, msg_id: &str) -> StorageResult<()> {
        let mut rooms = self.rooms.write().map_err(poisoned)?;
        let removed = rooms.get_mut(room_id).and_then(|room| room.remove(msg_id));
        if removed.is_none() {
            return Err(StorageError::new(StorageErrorKind::ConditionFailed, CONDITION_FAILED));
        }
        if rooms.get(room_id).is_some_and(BTreeMap::is_empty) {
            rooms.remove(room_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(room: &str, id: &str) -> Message {
        Message { room_id: room.into(), msg_id: id.into(), ts: 0, user: "anonymous".into(), text: id.into() }
    }

    #[tokio::test]
    async fn test_query_orders_by_msg_id_and_honors_limit() {
        let store = MemoryMessageStore::new();
        for id in ["03", "01", "02"] {
            store.put_if_absent(&message("lobby", id)).await.unwrap();
        }

        let asc: Vec<_> = store.query("lobby", ScanOrder::Ascending, 50).await.unwrap();
        assert_eq!(asc.iter().map(|m| m.msg_id.as_str()).collect::<Vec<_>>(), ["01", "02", "03"]);

        let desc = store.query("lobby", ScanOrder::Descending, 2).await.unwrap();
        assert_eq!(desc.iter().map(|m| m.msg_id.as_str()).collect::<Vec<_>>(), ["03", "02"]);
    }

    #[tokio::test]
    async fn test_unknown_room_is_empty() {
        let store = MemoryMessageStore::new();
        assert!(store.query("nowhere", ScanOrder::Ascending, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_rejects_existing_key() {
        let store = MemoryMessageStore::new();
        store.put_if_absent(&message("lobby", "01")).await.unwrap();

        let err = store.put_if_absent(&message("lobby", "01")).await.unwrap_err();
        assert!(err.is_condition_failed());

        // Same id in another room is a different key.
        store.put_if_absent(&message("kitchen", "01")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_succeeds_once() {
        let store = MemoryMessageStore::new();
        store.put_if_absent(&message("lobby", "01")).await.unwrap();

        store.delete_if_exists("lobby", "01").await.unwrap();
        let err = store.delete_if_exists("lobby", "01").await.unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::ConditionFailed);
        assert_eq!(err.message, CONDITION_FAILED);
    }
}

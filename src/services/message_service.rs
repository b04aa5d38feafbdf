use crate::adapters::storage::{MessageStore, ScanOrder};
use crate::domain::message::{Message, NewMessage};
use crate::error::{AppError, Result};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::sync::Arc;
use time::OffsetDateTime;

pub const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) created_total: Counter<u64>,
    pub(crate) deleted_total: Counter<u64>,
    pub(crate) listed: Histogram<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("talkboard-server");
        Self {
            created_total: meter
                .u64_counter("talkboard_messages_created_total")
                .with_description("Total message create attempts")
                .build(),
            deleted_total: meter
                .u64_counter("talkboard_messages_deleted_total")
                .with_description("Total message delete attempts")
                .build(),
            listed: meter
                .u64_histogram("talkboard_messages_listed")
                .with_description("Number of messages returned by a single list request")
                .build(),
        }
    }
}

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    metrics: Metrics,
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService").finish_non_exhaustive()
    }
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store, metrics: Metrics::new() }
    }

    /// Lists a room's messages, oldest first.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the backend query fails.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(room_id = %room_id))]
    pub async fn list(&self, room_id: &str, limit: u32) -> Result<Vec<Message>> {
        let messages = self.store.query(room_id, ScanOrder::Ascending, limit).await?;
        self.metrics.listed.record(messages.len() as u64, &[]);
        Ok(messages)
    }

    /// Stores a new message in `room_id` and returns it as stored.
    ///
    /// A condition failure here means the freshly generated id already existed; it is
    /// reported like any other backend failure and never retried.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the normalized text is empty.
    /// Returns `AppError::Storage` if the conditional put fails.
    #[tracing::instrument(err(level = "warn"), skip(self, new), fields(room_id = %room_id))]
    pub async fn create(&self, room_id: String, new: NewMessage) -> Result<Message> {
        if !new.has_text() {
            return Err(AppError::BadRequest("text is required".to_string()));
        }

        let message = new.into_message(room_id, OffsetDateTime::now_utc());

        match self.store.put_if_absent(&message).await {
            Ok(()) => {
                tracing::debug!(msg_id = %message.msg_id, "Message stored");
                self.metrics.created_total.add(1, &[KeyValue::new("status", "success")]);
                Ok(message)
            }
            Err(e) => {
                if e.is_condition_failed() {
                    tracing::error!(msg_id = %message.msg_id, "Generated message id collided with an existing row");
                }
                self.metrics.created_total.add(1, &[KeyValue::new("status", "failure")]);
                Err(e.into())
            }
        }
    }

    /// Deletes one message.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the message does not exist.
    /// Returns `AppError::Storage` for any other backend failure.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(room_id = %room_id, msg_id = %msg_id))]
    pub async fn delete(&self, room_id: &str, msg_id: &str) -> Result<()> {
        match self.store.delete_if_exists(room_id, msg_id).await {
            Ok(()) => {
                self.metrics.deleted_total.add(1, &[KeyValue::new("status", "success")]);
                Ok(())
            }
            Err(e) if e.is_condition_failed() => {
                self.metrics.deleted_total.add(1, &[KeyValue::new("status", "not_found")]);
                Err(AppError::NotFound("message not found".to_string()))
            }
            Err(e) => {
                self.metrics.deleted_total.add(1, &[KeyValue::new("status", "failure")]);
                Err(e.into())
            }
        }
    }
}

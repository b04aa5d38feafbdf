use crate::adapters::storage::records::{self, MSG_ID, ROOM_ID};
use crate::adapters::storage::{MessageStore, ScanOrder};
use crate::domain::message::Message;
use crate::error::{StorageError, StorageErrorKind, StorageResult};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;

#[derive(Clone, Debug)]
pub struct DynamoMessageStore {
    client: Client,
    table: String,
}

impl DynamoMessageStore {
    #[must_use]
    pub const fn new(client: Client, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl MessageStore for DynamoMessageStore {
    async fn query(&self, room_id: &str, order: ScanOrder, limit: u32) -> StorageResult<Vec<Message>> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("room_id = :room_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .scan_index_forward(order == ScanOrder::Ascending)
            .limit(i32::try_from(limit).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(|e| {
                let err = classify(&e);
                tracing::warn!(error = %DisplayErrorContext(&e), room_id = %room_id, "DynamoDB query failed");
                err
            })?;

        output.items.unwrap_or_default().iter().map(records::from_item).collect()
    }

    async fn put_if_absent(&self, message: &Message) -> StorageResult<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(records::to_item(message)))
            .condition_expression("attribute_not_exists(msg_id)")
            .send()
            .await
            .map_err(|e| {
                let err = classify(&e);
                tracing::warn!(
                    error = %DisplayErrorContext(&e),
                    room_id = %message.room_id,
                    msg_id = %message.msg_id,
                    "DynamoDB put failed"
                );
                err
            })?;

        Ok(())
    }

    async fn delete_if_exists(&self, room_id: &str, msg_id: &str) -> StorageResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key(ROOM_ID, AttributeValue::S(room_id.to_string()))
            .key(MSG_ID, AttributeValue::S(msg_id.to_string()))
            .condition_expression("attribute_exists(msg_id)")
            .send()
            .await
            .map_err(|e| {
                let err = classify(&e);
                if !err.is_condition_failed() {
                    tracing::warn!(error = %DisplayErrorContext(&e), room_id = %room_id, msg_id = %msg_id, "DynamoDB delete failed");
                }
                err
            })?;

        Ok(())
    }
}

/// Reduces an SDK failure to a [`StorageError`], keeping the service's own message text.
fn classify<E, R>(err: &SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_err) = err.as_service_error() {
        let kind = kind_for_code(service_err.code());
        let message = service_err
            .message()
            .or_else(|| service_err.code())
            .map_or_else(|| DisplayErrorContext(service_err).to_string(), ToString::to_string);
        return StorageError::new(kind, message);
    }

    let kind = match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => StorageErrorKind::Unavailable,
        _ => StorageErrorKind::Unknown,
    };
    StorageError::new(kind, DisplayErrorContext(err).to_string())
}

fn kind_for_code(code: Option<&str>) -> StorageErrorKind {
    match code {
        Some("ConditionalCheckFailedException") => StorageErrorKind::ConditionFailed,
        Some("ProvisionedThroughputExceededException" | "ThrottlingException" | "RequestLimitExceeded") => {
            StorageErrorKind::Throttled
        }
        Some("InternalServerError" | "ServiceUnavailable") => StorageErrorKind::Unavailable,
        _ => StorageErrorKind::Unknown,
    }
}

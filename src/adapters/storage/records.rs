use crate::domain::message::Message;
use crate::error::{StorageError, StorageErrorKind, StorageResult};
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

pub const ROOM_ID: &str = "room_id";
pub const MSG_ID: &str = "msg_id";
pub const TS: &str = "ts";
pub const USER: &str = "user";
pub const TEXT: &str = "text";

pub type Item = HashMap<String, AttributeValue>;

#[must_use]
pub fn to_item(message: &Message) -> Item {
    HashMap::from([
        (ROOM_ID.to_string(), AttributeValue::S(message.room_id.clone())),
        (MSG_ID.to_string(), AttributeValue::S(message.msg_id.clone())),
        (TS.to_string(), AttributeValue::N(message.ts.to_string())),
        (USER.to_string(), AttributeValue::S(message.user.clone())),
        (TEXT.to_string(), AttributeValue::S(message.text.clone())),
    ])
}

/// Converts a table row back into a [`Message`].
///
/// # Errors
/// Returns a `StorageErrorKind::Unknown` error naming the first attribute that is missing or mistyped.
pub fn from_item(item: &Item) -> StorageResult<Message> {
    let ts = number(item, TS)?;
    let ts = ts.parse::<i64>().map_err(|_| malformed(TS))?;

    Ok(Message {
        room_id: string(item, ROOM_ID)?,
        msg_id: string(item, MSG_ID)?,
        ts,
        user: string(item, USER)?,
        text: string(item, TEXT)?,
    })
}

fn string(item: &Item, name: &str) -> StorageResult<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned().ok_or_else(|| malformed(name))
}

fn number<'a>(item: &'a Item, name: &str) -> StorageResult<&'a String> {
    item.get(name).and_then(|v| v.as_n().ok()).ok_or_else(|| malformed(name))
}

fn malformed(name: &str) -> StorageError {
    StorageError::new(StorageErrorKind::Unknown, format!("stored item has a missing or malformed '{name}' attribute"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        Message {
            room_id: "lobby".into(),
            msg_id: "01HZX3Y4Z5A6B7C8D9E0F1G2H3".into(),
            ts: 1_717_000_000_123,
            user: "alice".into(),
            text: "hi".into(),
        }
    }

    #[test]
    fn test_item_layout() {
        let item = to_item(&sample());
        assert_eq!(item.len(), 5);
        assert_eq!(item[ROOM_ID], AttributeValue::S("lobby".into()));
        assert_eq!(item[TS], AttributeValue::N("1717000000123".into()));
    }

    #[test]
    fn test_from_item_restores_message() {
        assert_eq!(from_item(&to_item(&sample())).unwrap(), sample());
    }

    #[test]
    fn test_from_item_rejects_missing_attribute() {
        let mut item = to_item(&sample());
        item.remove(TEXT);
        let err = from_item(&item).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::Unknown);
        assert!(err.message.contains("'text'"));
    }

    #[test]
    fn test_from_item_rejects_mistyped_timestamp() {
        let mut item = to_item(&sample());
        item.insert(TS.to_string(), AttributeValue::S("yesterday".into()));
        let err = from_item(&item).unwrap_err();
        assert!(err.message.contains("'ts'"));
    }
}

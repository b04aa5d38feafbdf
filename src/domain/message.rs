use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use time::OffsetDateTime;
use ulid::Ulid;

pub const MAX_USER_CHARS: usize = 64;
pub const MAX_TEXT_CHARS: usize = 4096;
pub const DEFAULT_USER: &str = "anonymous";

/// A stored message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub room_id: String,
    /// ULID; ascending order within a room is ascending creation time.
    pub msg_id: String,
    /// Milliseconds since the Unix epoch, the same instant encoded in `msg_id`.
    pub ts: i64,
    pub user: String,
    pub text: String,
}

/// Client input after defaults and truncation have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub user: String,
    pub text: String,
}

impl NewMessage {
    #[must_use]
    pub fn normalize(user: Option<String>, text: Option<String>) -> Self {
        let user = user.unwrap_or_else(|| DEFAULT_USER.to_string());
        let text = text.unwrap_or_default();
        Self { user: truncate_chars(user, MAX_USER_CHARS), text: truncate_chars(text, MAX_TEXT_CHARS) }
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Assigns the id and timestamp, both derived from `now`.
    #[must_use]
    pub fn into_message(self, room_id: String, now: OffsetDateTime) -> Message {
        let ts = i64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX);
        let msg_id = Ulid::from_datetime(SystemTime::from(now)).to_string();

        Message { room_id, msg_id, ts, user: self.user, text: self.text }
    }
}

fn truncate_chars(mut value: String, max: usize) -> String {
    let cut = value.char_indices().nth(max).map(|(idx, _)| idx);
    if let Some(idx) = cut {
        value.truncate(idx);
    }
    value
}

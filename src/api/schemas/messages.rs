use crate::domain::message::NewMessage;
use crate::error::AppError;
use crate::services::message_service::DEFAULT_LIST_LIMIT;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct ListMessagesParams {
    pub limit: Option<String>,
}

impl ListMessagesParams {
    /// Picks the first `limit` from the query; later repeats are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs.into_iter().find(|(key, _)| key == "limit").map(|(_, value)| value);
        Self { limit }
    }

    /// Resolves the page size, defaulting to [`DEFAULT_LIST_LIMIT`].
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` unless `limit` is a positive integer that fits in an `i32`.
    pub fn limit(&self) -> Result<u32, AppError> {
        let Some(raw) = self.limit.as_deref() else {
            return Ok(DEFAULT_LIST_LIMIT);
        };

        raw.trim()
            .parse::<i32>()
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| AppError::BadRequest("limit must be a positive integer".to_string()))
    }
}

/// Create body as sent by clients. Fields stay loosely typed so that
/// non-string values are coerced rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
}

impl CreateMessageRequest {
    /// Parses a raw body. Anything that is not a JSON object counts as `{}`.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(req: CreateMessageRequest) -> Self {
        Self::normalize(req.user.and_then(coerce), req.text.and_then(coerce))
    }
}

fn coerce(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(body: &str) -> NewMessage {
        CreateMessageRequest::from_body(body.as_bytes()).into()
    }

    #[test]
    fn test_limit_defaults_to_fifty() {
        assert_eq!(ListMessagesParams::default().limit().unwrap(), 50);
    }

    #[test]
    fn test_first_limit_wins() {
        let pairs = vec![
            ("room".to_string(), "x".to_string()),
            ("limit".to_string(), "1".to_string()),
            ("limit".to_string(), "2".to_string()),
        ];
        assert_eq!(ListMessagesParams::from_pairs(pairs).limit().unwrap(), 1);
        assert_eq!(ListMessagesParams::from_pairs(Vec::new()).limit().unwrap(), 50);
    }

    #[test]
    fn test_limit_parsing() {
        let params = |s: &str| ListMessagesParams { limit: Some(s.to_string()) };
        assert_eq!(params("10").limit().unwrap(), 10);
        assert_eq!(params(" 7 ").limit().unwrap(), 7);
        assert!(params("0").limit().is_err());
        assert!(params("-3").limit().is_err());
        assert!(params("ten").limit().is_err());
        assert!(params("99999999999").limit().is_err());
    }

    #[test]
    fn test_body_fields_pass_through() {
        let new = normalized(r#"{"user":"alice","text":"hi"}"#);
        assert_eq!(new.user, "alice");
        assert_eq!(new.text, "hi");
    }

    #[test]
    fn test_unusable_bodies_count_as_empty_object() {
        for body in ["", "not json", "[1,2,3]", r#"["bob","hi"]"#, "\"hello\"", "null"] {
            let new = normalized(body);
            assert_eq!(new.user, "anonymous", "body {body:?}");
            assert!(!new.has_text(), "body {body:?}");
        }
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let new = normalized(r#"{"user":42,"text":true}"#);
        assert_eq!(new.user, "42");
        assert_eq!(new.text, "true");
    }

    #[test]
    fn test_null_text_counts_as_missing() {
        let new = normalized(r#"{"user":"alice","text":null}"#);
        assert!(!new.has_text());
    }

    #[test]
    fn test_null_user_defaults_to_anonymous() {
        let new = normalized(r#"{"user":null,"text":"x"}"#);
        assert_eq!(new.user, "anonymous");
    }
}

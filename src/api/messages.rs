use crate::api::AppState;
use crate::api::extract::{ApiPath, QueryPairs};
use crate::api::schemas::messages::{CreateMessageRequest, ListMessagesParams};
use crate::domain::message::Message;
use crate::error::{AppError, Result};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

/// Lists a room's messages in ascending id order. Only the first `limit` in the query counts.
///
/// # Errors
/// Returns `AppError::BadRequest` if `limit` is not a positive integer.
/// Returns `AppError::Storage` if the backend query fails.
pub async fn list_messages(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<String>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Vec<Message>>> {
    let limit = ListMessagesParams::from_pairs(pairs).limit()?;
    let messages = state.message_service.list(&room_id, limit).await?;
    Ok(Json(messages))
}

/// Creates a message. The body is read as JSON whatever its content type.
///
/// # Errors
/// Returns `AppError::BadRequest` if the text is empty after normalization.
/// Returns `AppError::Storage` if the conditional put fails.
pub async fn create_message(
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request = CreateMessageRequest::from_body(&body);
    let message = state.message_service.create(room_id, request.into()).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Deletes a message.
///
/// # Errors
/// Returns `AppError::NotFound` if the message does not exist.
/// Returns `AppError::Storage` for any other backend failure.
pub async fn delete_message(
    State(state): State<AppState>,
    ApiPath((room_id, msg_id)): ApiPath<(String, String)>,
) -> Result<StatusCode> {
    state.message_service.delete(&room_id, &msg_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unmatched routes, keeping the JSON error shape.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

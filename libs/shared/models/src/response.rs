use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Uniform success body: `{"success": true, "data": ..., "count": ..., "message": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, AppError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            success: true,
            message: None,
            data: Some(items),
            count: Some(count),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }
}

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::data(data)))
}

pub fn ok_list<T>(items: Vec<T>) -> ApiResult<Vec<T>> {
    Ok(Json(Envelope::list(items)))
}

pub fn ok_message<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(Envelope::with_message(message, data)))
}

pub fn ok_deleted(message: impl Into<String>) -> ApiResult<()> {
    Ok(Json(Envelope::message(message)))
}

pub fn created<T>(message: impl Into<String>, data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(Envelope::with_message(message, data))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_envelope_carries_count() {
        let body = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2, 3], "count": 3}));
    }

    #[test]
    fn message_envelope_omits_data() {
        let body = serde_json::to_value(Envelope::message("Booking deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "Booking deleted successfully"})
        );
    }
}

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::model::category::Category;

/// Response envelope shared by every endpoint.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub is_success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Success with a payload, or the backend's message verbatim.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiEnvelope {
                is_success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiEnvelope { message, .. } => Err(ApiError::Rejected(
                message.unwrap_or_else(|| "unknown server response".to_string()),
            )),
        }
    }

    /// For endpoints whose success carries no payload.
    pub fn into_unit_result(self) -> Result<(), ApiError> {
        if self.is_success {
            Ok(())
        } else {
            Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "unknown server response".to_string()),
            ))
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
}

/// One category's hours for today, as the insert endpoint takes it. The
/// backend stamps the date itself; only the current day can be recorded.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InsertLogRequest {
    pub category: String,
    pub hour: u32,
    pub minutes: u32,
}

impl InsertLogRequest {
    pub fn new(category: Category, hour: u32, minutes: u32) -> Self {
        Self {
            category: category.wire_name().to_string(),
            hour,
            minutes,
        }
    }
}

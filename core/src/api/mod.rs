pub mod client;
pub mod dto;
pub mod error;

pub use client::{summarize_batch, ApiClient, BatchOutcome};
pub use dto::{ApiEnvelope, InsertLogRequest, LoginData, LoginRequest, RegisterRequest};
pub use error::{ApiError, ApiResult, MSG_DUPLICATE_DAY, MSG_DUPLICATE_EMAIL};

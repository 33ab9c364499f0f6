pub mod api;
pub mod config;
pub mod input;
pub mod model;
pub mod service;
pub mod session;

pub use api::{summarize_batch, ApiClient, ApiError, ApiResult, BatchOutcome, InsertLogRequest};
pub use config::ClientConfig;
pub use input::{parse_hours, parse_log_args, parse_year_month, HoursMinutes};
pub use model::{AuthSession, Category, ChartKind, TimeLogEntry};
pub use session::{AuthContext, FileSessionStore, SessionStore};

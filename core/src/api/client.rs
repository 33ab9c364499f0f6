use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::dto::{ApiEnvelope, InsertLogRequest, LoginData, LoginRequest, RegisterRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::config::ClientConfig;
use crate::model::entry::TimeLogEntry;

/// Thin wrappers over the schedule service. One attempt per call, no retry,
/// no timeout beyond what the transport reports; callers decide what a
/// failure means.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        debug!(email = %req.email, "register");
        let resp = self
            .http
            .post(self.url("/api/v1/auth/join"))
            .json(req)
            .send()
            .await?;
        read_envelope::<serde_json::Value>(resp).await?.into_unit_result()
    }

    /// Returns the bearer token on success. A failed login returns an error
    /// and the caller must leave the session untouched.
    pub async fn login(&self, req: &LoginRequest) -> ApiResult<String> {
        debug!(email = %req.email, "login");
        let resp = self
            .http
            .post(self.url("/api/v1/auth/login"))
            .json(req)
            .send()
            .await?;
        let data: LoginData = read_envelope(resp).await?.into_result()?;
        Ok(data.access_token)
    }

    /// One month of entries. `month` is 1-12 and zero-padded on the wire.
    pub async fn fetch_month(
        &self,
        token: &str,
        year: i32,
        month: u32,
    ) -> ApiResult<Vec<TimeLogEntry>> {
        debug!(year, month, "fetch month");
        let resp = self
            .http
            .get(self.url("/api/v1/schedule"))
            .query(&[("year", year.to_string()), ("month", format!("{month:02}"))])
            .bearer_auth(token)
            .send()
            .await?;
        read_envelope(resp).await?.into_result()
    }

    pub async fn insert_log(&self, token: &str, req: &InsertLogRequest) -> ApiResult<()> {
        debug!(category = %req.category, hour = req.hour, minutes = req.minutes, "insert log");
        let resp = self
            .http
            .post(self.url("/api/v1/schedule"))
            .json(req)
            .bearer_auth(token)
            .send()
            .await?;
        read_envelope::<serde_json::Value>(resp).await?.into_unit_result()
    }

    /// Fires one insert per request, all spawned together, and waits for
    /// every one to settle. Results come back in submission order, not
    /// completion order. Nothing is cancelled; a caller that moved on just
    /// ignores what arrives.
    pub async fn insert_batch(
        &self,
        token: &str,
        requests: Vec<InsertLogRequest>,
    ) -> Vec<ApiResult<()>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|req| {
                let client = self.clone();
                let token = token.to_string();
                tokio::spawn(async move { client.insert_log(&token, &req).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(res) => res,
                Err(err) => Err(ApiError::Internal(err.to_string())),
            });
        }
        results
    }
}

/// Decodes the response envelope. A non-2xx response that still carries an
/// envelope keeps its message; anything else is a bare status failure.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<ApiEnvelope<T>> {
    let status = resp.status();
    match resp.json::<ApiEnvelope<T>>().await {
        Ok(envelope) => Ok(envelope),
        Err(err) if status.is_success() => Err(ApiError::Http(err)),
        Err(_) => Err(ApiError::Status(status)),
    }
}

/// Outcome of a multi-category submission. Success requires every insert to
/// succeed; partial failure reports the first failure's message.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Saved { count: usize },
    Failed { message: String, duplicate_day: bool },
}

pub fn summarize_batch(results: &[ApiResult<()>]) -> BatchOutcome {
    for result in results {
        if let Err(err) = result {
            return BatchOutcome::Failed {
                message: err.to_string(),
                duplicate_day: err.is_duplicate_day(),
            };
        }
    }
    BatchOutcome::Saved {
        count: results.len(),
    }
}

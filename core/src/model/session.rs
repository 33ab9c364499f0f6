use serde::{Deserialize, Serialize};

/// Persisted session credentials: the logged-in flag and the opaque bearer
/// token. Login sets both, logout clears both; there is no refresh.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    pub is_logged_in: bool,
    pub access_token: Option<String>,
}

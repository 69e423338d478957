//! Request and response types for the auth and glucose endpoints

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub token: String,
}

/// Body returned by both the login and refresh-token endpoints.
///
/// Not every deployment rotates the refresh token on refresh, so it is
/// optional here; callers fall back to the token they already hold.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// The credential pair a virtual user carries between iterations.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

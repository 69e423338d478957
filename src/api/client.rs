//! HTTP client for the GlucoCare API

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::types::{AuthResponse, LoginRequest, RefreshTokenRequest, TokenPair};
use super::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate with email/password and return the issued token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(self.url("/api/members/login"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                endpoint: "login",
                status,
            });
        }

        let body: AuthResponse =
            response
                .json()
                .await
                .map_err(|source| ApiError::Decode {
                    endpoint: "login",
                    source,
                })?;
        let refresh_token = body.refresh_token.ok_or(ApiError::IncompleteTokenPair)?;

        Ok(TokenPair {
            access_token: body.access_token,
            refresh_token,
        })
    }

    /// Exchange the held refresh token for a new token pair.
    ///
    /// When the response carries no new refresh token, the current one is
    /// kept so the caller always ends up with a complete pair.
    pub async fn refresh(&self, current: &TokenPair) -> Result<TokenPair, ApiError> {
        let request = RefreshTokenRequest {
            token: current.refresh_token.clone(),
        };

        let response = self
            .http
            .post(self.url("/api/members/refresh-token"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                endpoint: "refresh-token",
                status,
            });
        }

        let body: AuthResponse =
            response
                .json()
                .await
                .map_err(|source| ApiError::Decode {
                    endpoint: "refresh-token",
                    source,
                })?;

        Ok(TokenPair {
            access_token: body.access_token,
            refresh_token: body
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
        })
    }

    /// Fetch a patient's glucose histories with a bearer token.
    ///
    /// Returns the response status; the caller decides whether a non-200
    /// status means "refresh and retry" or "check failed".
    pub async fn fetch_glucose_histories(
        &self,
        patient_id: u64,
        access_token: &str,
    ) -> Result<StatusCode, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/patients/{patient_id}/glucose-histories")))
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(response.status())
    }
}

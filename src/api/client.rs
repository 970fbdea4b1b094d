//! Authenticated HTTP client for the reservation API
//!
//! Wraps reqwest::Client with bearer token injection, a bounded request
//! lifetime, and structured error extraction from failure payloads.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::error::ApiError;
use crate::config::Config;
use crate::models::{Absence, Desk, Reservation, Slot, Stats, User};

/// Upper bound on any single request, including connect and body read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token plus the authenticated user, as returned by the login endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub user: User,
}

/// Client bound to one server with an optional session token.
pub struct DeskClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl DeskClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from_reqwest)?;
        Ok(Self {
            http,
            base: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let resp = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        check_response(resp).await
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let resp = self
            .authorize(self.http.request(method, &url))
            .json(body)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        check_response(resp).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path)
            .await?
            .json()
            .await
            .map_err(ApiError::from_reqwest)
    }

    // -- Session --

    pub async fn request_otp(&self, email: &str) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/auth/request-otp",
            &json!({ "email": email }),
        )
        .await?;
        Ok(())
    }

    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthToken, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/auth/verify-otp",
            &json!({ "email": email, "code": code }),
        )
        .await?
        .json()
        .await
        .map_err(ApiError::from_reqwest)
    }

    pub async fn login_name(&self, name: &str) -> Result<AuthToken, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/auth/login",
            &json!({ "name": name }),
        )
        .await?
        .json()
        .await
        .map_err(ApiError::from_reqwest)
    }

    /// Best-effort server-side session invalidation; the caller clears the
    /// local token regardless of the outcome.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::POST, "/api/auth/logout", &json!({}))
            .await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/api/me").await
    }

    // -- Read collections --

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/api/users").await
    }

    pub async fn desks(&self) -> Result<Vec<Desk>, ApiError> {
        self.get_json("/api/desks").await
    }

    /// Reservations inside the inclusive `[start, end]` window.
    pub async fn reservations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Reservation>, ApiError> {
        let path = format!("/api/reservations?start_date={}&end_date={}", start, end);
        self.get_json(&path).await
    }

    // -- Mutations --

    pub async fn create_reservation(
        &self,
        desk_id: &str,
        date: NaiveDate,
        slot: Slot,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/reservations",
            &json!({
                "desk_id": desk_id,
                "date": date.to_string(),
                "slot": slot.as_str(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_reservation(&self, reservation_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/reservations/{}", reservation_id));
        tracing::debug!("DELETE {}", url);
        let resp = self
            .authorize(self.http.delete(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        check_response(resp).await?;
        Ok(())
    }

    pub async fn upsert_absence(&self, absence: &Absence) -> Result<(), ApiError> {
        let body = serde_json::to_value(absence).map_err(|e| ApiError::Transport(e.to_string()))?;
        self.send_json(reqwest::Method::PUT, "/api/named-desk/absences", &body)
            .await?;
        Ok(())
    }

    // -- Admin --

    pub async fn admin_upsert_user(
        &self,
        identity: &str,
        enabled: bool,
        is_admin: bool,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/admin/users",
            &json!({
                "email": identity,
                "enabled": enabled,
                "is_admin": is_admin,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn admin_upsert_desk(
        &self,
        desk_id: Option<&str>,
        label: &str,
        enabled: bool,
        owner_user_id: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/admin/desks",
            &json!({
                "desk_id": desk_id,
                "label": label,
                "enabled": enabled,
                "owner_user_id": owner_user_id,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn admin_stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/api/admin/stats").await
    }
}

/// Check HTTP response status and map failures into the error taxonomy.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::from_response(status.as_u16(), &body))
}

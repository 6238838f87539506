//! REST client for the dashboard backend.
//!
//! Uses reqwest with optional Bearer token auth. Every call either returns
//! parsed JSON or fails with a [`DashboardError`] whose service variant
//! carries the backend's `{message, resolution}` body. There is no retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{DashboardError, ServiceError};
use crate::health;
use crate::types::{AdminNotificationCount, DashboardPayload, Notification};

pub const DASHBOARD_ENDPOINT: &str = "menu/dashboard";
pub const USER_NOTIFICATIONS_ENDPOINT: &str = "notification/user_notifications";
pub const COUNT_NOTIFICATIONS_ENDPOINT: &str = "notification/count_notifications";
pub const RESOLVE_NOTIFICATION_ENDPOINT: &str = "notification/resolve_notification";

/// Backend operations the dashboard depends on.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, DashboardError>;

    async fn fetch_user_notifications(&self) -> Result<Vec<Notification>, DashboardError>;

    async fn fetch_admin_notification_count(&self) -> Result<AdminNotificationCount, DashboardError>;

    /// Mark a notification resolved. Returns the backend's confirmation message.
    async fn resolve_notification(&self, id: i64) -> Result<String, DashboardError>;
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        access_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, DashboardError> {
        // Url::join drops the last path segment unless it ends with '/'
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DashboardError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            timeout_secs,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        Self::new(
            &config.api_base_url,
            config.access_token.clone(),
            config.request_timeout_secs,
        )
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, DashboardError> {
        Ok(self.base_url.join(endpoint)?)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        endpoint: &str,
        fallback_message: &str,
    ) -> Result<T, DashboardError> {
        let started = Instant::now();
        let result = self.send(method, url, fallback_message).await;
        if let Err(e) = &result {
            log::warn!("{} failed: {}", endpoint, e);
        }
        health::record(endpoint, started.elapsed(), &result);
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        fallback_message: &str,
    ) -> Result<T, DashboardError> {
        let mut req = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(failure_from_response(status, &body, fallback_message));
        }

        serde_json::from_str(&body).map_err(|e| DashboardError::Parse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::Timeout(self.timeout_secs)
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

/// Map a non-2xx response to an error, preferring the backend's own message.
fn failure_from_response(status: StatusCode, body: &str, fallback_message: &str) -> DashboardError {
    if status == StatusCode::UNAUTHORIZED {
        return DashboardError::Unauthorized;
    }

    #[derive(Deserialize)]
    struct FailureBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        resolution: Option<String>,
    }

    let parsed: Option<FailureBody> = serde_json::from_str(body).ok();
    let (message, resolution) = match parsed {
        Some(b) => (b.message.filter(|m| !m.is_empty()), b.resolution),
        None => (None, None),
    };

    DashboardError::Service {
        status: status.as_u16(),
        error: ServiceError {
            message: message.unwrap_or_else(|| fallback_message.to_string()),
            resolution,
        },
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, DashboardError> {
        let url = self.endpoint_url(DASHBOARD_ENDPOINT)?;
        self.request(Method::GET, url, DASHBOARD_ENDPOINT, "Failed to fetch dashboard data")
            .await
    }

    async fn fetch_user_notifications(&self) -> Result<Vec<Notification>, DashboardError> {
        let url = self.endpoint_url(USER_NOTIFICATIONS_ENDPOINT)?;
        let list: Option<Vec<Notification>> = self
            .request(
                Method::GET,
                url,
                USER_NOTIFICATIONS_ENDPOINT,
                "Failed to fetch notifications",
            )
            .await?;
        Ok(list.unwrap_or_default())
    }

    async fn fetch_admin_notification_count(&self) -> Result<AdminNotificationCount, DashboardError> {
        let url = self.endpoint_url(COUNT_NOTIFICATIONS_ENDPOINT)?;
        self.request(
            Method::GET,
            url,
            COUNT_NOTIFICATIONS_ENDPOINT,
            "Failed to fetch notifications",
        )
        .await
    }

    async fn resolve_notification(&self, id: i64) -> Result<String, DashboardError> {
        #[derive(Deserialize)]
        struct ResolveResponse {
            #[serde(default)]
            message: String,
        }

        let mut url = self.endpoint_url(RESOLVE_NOTIFICATION_ENDPOINT)?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        let resp: ResolveResponse = self
            .request(
                Method::POST,
                url,
                RESOLVE_NOTIFICATION_ENDPOINT,
                "Failed to resolve notification",
            )
            .await?;
        Ok(resp.message)
    }
}

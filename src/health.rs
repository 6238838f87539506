//! Fetch health for the run report.
//!
//! Counts calls and failures per backend endpoint, and how often the
//! dashboard fetch ran past its budget. Nothing is persisted.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{const_mutex, Mutex};
use serde::Serialize;

use crate::client::DASHBOARD_ENDPOINT;
use crate::error::DashboardError;

/// Slower dashboard fetches are counted as over budget.
pub const DASHBOARD_FETCH_BUDGET: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHealth {
    pub calls: u64,
    pub failures: u64,
    /// Failures a later refetch may clear (transport, timeout, 5xx).
    pub retryable_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchHealth {
    pub endpoints: BTreeMap<String, EndpointHealth>,
    pub dashboard_over_budget: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slowest_dashboard_ms: Option<u64>,
}

impl Default for FetchHealth {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchHealth {
    pub const fn new() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            dashboard_over_budget: 0,
            slowest_dashboard_ms: None,
        }
    }

    /// Fold one finished request into the counters.
    pub fn record<T>(&mut self, endpoint: &str, elapsed: Duration, result: &Result<T, DashboardError>) {
        let entry = self.endpoints.entry(endpoint.to_string()).or_default();
        entry.calls += 1;

        match result {
            Ok(_) if endpoint == DASHBOARD_ENDPOINT => {
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                let slowest = self.slowest_dashboard_ms.map_or(elapsed_ms, |m| m.max(elapsed_ms));
                self.slowest_dashboard_ms = Some(slowest);
                if elapsed > DASHBOARD_FETCH_BUDGET {
                    self.dashboard_over_budget += 1;
                    log::warn!(
                        "{} took {}ms (budget {}ms)",
                        endpoint,
                        elapsed_ms,
                        DASHBOARD_FETCH_BUDGET.as_millis()
                    );
                }
            }
            Ok(_) => {}
            Err(e) => {
                entry.failures += 1;
                if e.is_retryable() {
                    entry.retryable_failures += 1;
                }
                entry.last_error = Some(e.to_string());
                entry.last_failure_at = Some(Utc::now());
            }
        }
    }

    pub fn endpoint(&self, endpoint: &str) -> Option<&EndpointHealth> {
        self.endpoints.get(endpoint)
    }
}

static HEALTH: Mutex<FetchHealth> = const_mutex(FetchHealth::new());

/// Record a request against the process-wide counters.
pub fn record<T>(endpoint: &str, elapsed: Duration, result: &Result<T, DashboardError>) {
    HEALTH.lock().record(endpoint, elapsed, result);
}

pub fn snapshot() -> FetchHealth {
    HEALTH.lock().clone()
}

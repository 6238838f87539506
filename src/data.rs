//! Dashboard data store: `{data, loading, error}` plus `refetch`.
//!
//! Each refetch bumps a generation counter. A response is applied only if it
//! still belongs to the latest generation and the store has not been
//! detached, so late responses after teardown are dropped. On failure the
//! error is kept and the data falls back to an empty payload so the view
//! renders placeholders instead of stale charts.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::DashboardApi;
use crate::error::ServiceError;
use crate::types::DashboardPayload;

/// Point-in-time view of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub data: Option<DashboardPayload>,
    pub loading: bool,
    pub error: Option<ServiceError>,
}

impl DataSnapshot {
    /// Data that may be normalized: loaded, error-free, and present.
    pub fn ready(&self) -> Option<&DashboardPayload> {
        if self.loading || self.error.is_some() {
            return None;
        }
        self.data.as_ref()
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    snapshot: DataSnapshot,
    generation: u64,
    detached: bool,
}

#[derive(Clone)]
pub struct DashboardDataStore {
    api: Arc<dyn DashboardApi>,
    inner: Arc<Mutex<StoreInner>>,
}

impl DashboardDataStore {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(StoreInner::default())),
        }
    }

    pub fn snapshot(&self) -> DataSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Fetch the payload and store the outcome. Returns whether the outcome
    /// was applied (false when superseded or detached).
    pub async fn refetch(&self) -> bool {
        let generation = {
            let mut inner = self.inner.lock();
            if inner.detached {
                return false;
            }
            inner.generation += 1;
            inner.snapshot.loading = true;
            inner.generation
        };

        let result = self.api.fetch_dashboard().await;

        let mut inner = self.inner.lock();
        if inner.detached || inner.generation != generation {
            log::debug!("Dropping dashboard response for generation {}", generation);
            return false;
        }

        inner.snapshot = match result {
            Ok(payload) => DataSnapshot {
                data: Some(payload),
                loading: false,
                error: None,
            },
            Err(e) => {
                log::warn!("Dashboard fetch failed: {}", e);
                DataSnapshot {
                    data: Some(DashboardPayload::default()),
                    loading: false,
                    error: Some(e.to_service_error()),
                }
            }
        };
        true
    }

    /// Stop accepting responses. In-flight fetches finish but are discarded.
    pub fn detach(&self) {
        self.inner.lock().detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.inner.lock().detached
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::types::{AdminNotificationCount, Notification};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted backend shared by store, notification and view tests.
    #[derive(Default)]
    pub(crate) struct StubApi {
        pub payload: Mutex<Option<DashboardPayload>>,
        pub notifications: Mutex<Vec<Notification>>,
        pub admin_count: Mutex<Option<i64>>,
        pub fail_resolve: Mutex<bool>,
        pub delay: Mutex<Duration>,
        pub dashboard_calls: AtomicUsize,
        pub resolved: Mutex<Vec<i64>>,
    }

    impl StubApi {
        pub fn with_payload(payload: DashboardPayload) -> Self {
            let stub = Self::default();
            *stub.payload.lock() = Some(payload);
            stub
        }
    }

    #[async_trait]
    impl DashboardApi for StubApi {
        async fn fetch_dashboard(&self) -> Result<DashboardPayload, DashboardError> {
            self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.payload.lock().clone().ok_or_else(|| DashboardError::Service {
                status: 500,
                error: ServiceError {
                    message: "Dashboard unavailable".to_string(),
                    resolution: Some("Try again later".to_string()),
                },
            })
        }

        async fn fetch_user_notifications(&self) -> Result<Vec<Notification>, DashboardError> {
            Ok(self.notifications.lock().clone())
        }

        async fn fetch_admin_notification_count(
            &self,
        ) -> Result<AdminNotificationCount, DashboardError> {
            match *self.admin_count.lock() {
                Some(count) => Ok(AdminNotificationCount { count }),
                None => Err(DashboardError::Network("connection refused".to_string())),
            }
        }

        async fn resolve_notification(&self, id: i64) -> Result<String, DashboardError> {
            if *self.fail_resolve.lock() {
                return Err(DashboardError::Service {
                    status: 400,
                    error: ServiceError::new("Failed to resolve notification"),
                });
            }
            self.resolved.lock().push(id);
            Ok("Notification resolved successfully.".to_string())
        }
    }

    fn sample_payload() -> DashboardPayload {
        serde_json::from_value(serde_json::json!({
            "stock": {"number_of_items_in_stock": {"CGCEL": 10}}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_not_ready() {
        let store = DashboardDataStore::new(Arc::new(StubApi::default()));
        let snap = store.snapshot();
        assert!(snap.data.is_none());
        assert!(snap.ready().is_none());
    }

    #[tokio::test]
    async fn test_refetch_success() {
        let store = DashboardDataStore::new(Arc::new(StubApi::with_payload(sample_payload())));
        assert!(store.refetch().await);
        let snap = store.snapshot();
        assert!(!snap.loading);
        assert!(snap.error.is_none());
        assert_eq!(snap.ready(), Some(&sample_payload()));
    }

    #[tokio::test]
    async fn test_refetch_failure_stores_error_and_empty_payload() {
        let store = DashboardDataStore::new(Arc::new(StubApi::default()));
        assert!(store.refetch().await);
        let snap = store.snapshot();
        assert_eq!(snap.data, Some(DashboardPayload::default()));
        assert_eq!(snap.error.as_ref().unwrap().message, "Dashboard unavailable");
        assert!(snap.ready().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_in_flight() {
        let stub = Arc::new(StubApi::with_payload(sample_payload()));
        *stub.delay.lock() = Duration::from_millis(100);
        let store = DashboardDataStore::new(stub);

        let background = store.clone();
        let task = tokio::spawn(async move { background.refetch().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(store.snapshot().loading);

        assert!(task.await.unwrap());
        assert!(!store.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_after_detach_is_dropped() {
        let stub = Arc::new(StubApi::with_payload(sample_payload()));
        *stub.delay.lock() = Duration::from_millis(100);
        let store = DashboardDataStore::new(stub.clone());

        let background = store.clone();
        let task = tokio::spawn(async move { background.refetch().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.detach();

        assert!(!task.await.unwrap());
        assert!(store.snapshot().data.is_none());
        assert!(!store.refetch().await);
        assert_eq!(stub.dashboard_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_response_is_dropped() {
        let stub = Arc::new(StubApi::with_payload(sample_payload()));
        *stub.delay.lock() = Duration::from_millis(100);
        let store = DashboardDataStore::new(stub.clone());

        let first = store.clone();
        let first_task = tokio::spawn(async move { first.refetch().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        *stub.delay.lock() = Duration::from_millis(5);
        assert!(store.refetch().await);
        assert!(!first_task.await.unwrap());
        assert!(store.snapshot().ready().is_some());
    }
}

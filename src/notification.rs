//! Notification bell.
//!
//! Users see their unresolved notifications and can resolve them one at a
//! time; admins see the unresolved count; technicians get no bell data.

use serde::Serialize;

use crate::client::DashboardApi;
use crate::error::ServiceError;
use crate::types::{Notification, Role};

/// Bell state for a `USER`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBell {
    notifications: Vec<Notification>,
    open: bool,
    selected: Option<i64>,
    resolving: bool,
}

impl NotificationBell {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Badge count, hidden when there is nothing to show.
    pub fn badge(&self) -> Option<usize> {
        match self.notifications.len() {
            0 => None,
            n => Some(n),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    /// Click outside the bell.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Reveal the resolve button for `id`, or hide it when already shown.
    pub fn select(&mut self, id: i64) {
        self.selected = if self.selected == Some(id) { None } else { Some(id) };
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    /// Mark a resolve as in flight. Refused while another one is running or
    /// when `id` is not in the list.
    pub fn begin_resolve(&mut self, id: i64) -> bool {
        if self.resolving || !self.notifications.iter().any(|n| n.id == id) {
            return false;
        }
        self.resolving = true;
        true
    }

    /// Apply the outcome of a resolve. Only a success removes the item.
    pub fn finish_resolve(&mut self, id: i64, resolved: bool) {
        if resolved {
            self.notifications.retain(|n| n.id != id);
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        self.resolving = false;
    }

    pub async fn resolve_with(&mut self, api: &dyn DashboardApi, id: i64) -> Result<(), ServiceError> {
        if !self.begin_resolve(id) {
            return Err(ServiceError::new("Another notification is being resolved"));
        }
        match api.resolve_notification(id).await {
            Ok(_) => {
                log::info!("Resolved notification {}", id);
                self.finish_resolve(id, true);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to resolve notification {}: {}", id, e);
                self.finish_resolve(id, false);
                Err(e.to_service_error())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BellState {
    User(NotificationBell),
    Admin { count: i64 },
    Hidden,
}

/// Fetch whatever the bell needs for `role`. Fetch failures degrade to an
/// empty list or a zero count.
pub async fn load_bell(api: &dyn DashboardApi, role: Role) -> BellState {
    match role {
        Role::User => {
            let list = api.fetch_user_notifications().await.unwrap_or_else(|e| {
                log::warn!("Failed to fetch user notifications: {}", e);
                Vec::new()
            });
            BellState::User(NotificationBell::new(list))
        }
        Role::Admin => {
            let count = match api.fetch_admin_notification_count().await {
                Ok(c) => c.count,
                Err(e) => {
                    log::warn!("Failed to fetch notification count: {}", e);
                    0
                }
            };
            BellState::Admin { count }
        }
        Role::Technician => BellState::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::StubApi;

    fn notes(ids: &[i64]) -> Vec<Notification> {
        ids.iter()
            .map(|&id| Notification {
                id,
                details: format!("Task {}", id),
            })
            .collect()
    }

    #[test]
    fn test_badge_and_toggle() {
        let mut bell = NotificationBell::new(notes(&[1, 2]));
        assert_eq!(bell.badge(), Some(2));
        assert_eq!(NotificationBell::new(vec![]).badge(), None);

        bell.toggle_open();
        assert!(bell.is_open());
        bell.close();
        assert!(!bell.is_open());

        bell.select(2);
        assert_eq!(bell.selected(), Some(2));
        bell.select(2);
        assert_eq!(bell.selected(), None);
    }

    #[test]
    fn test_one_resolve_at_a_time() {
        let mut bell = NotificationBell::new(notes(&[1, 2]));
        assert!(bell.begin_resolve(1));
        assert!(!bell.begin_resolve(2));
        bell.finish_resolve(1, false);
        assert!(!bell.is_resolving());
        assert_eq!(bell.notifications().len(), 2);
        assert!(!bell.begin_resolve(99));
    }

    #[tokio::test]
    async fn test_resolve_removes_on_success() {
        let api = StubApi::default();
        let mut bell = NotificationBell::new(notes(&[1, 2, 3]));
        bell.select(2);
        bell.resolve_with(&api, 2).await.unwrap();

        let ids: Vec<i64> = bell.notifications().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(bell.selected(), None);
        assert_eq!(*api.resolved.lock(), vec![2]);
    }

    #[tokio::test]
    async fn test_resolve_failure_keeps_item() {
        let api = StubApi::default();
        *api.fail_resolve.lock() = true;
        let mut bell = NotificationBell::new(notes(&[7]));
        bell.select(7);

        let err = bell.resolve_with(&api, 7).await.unwrap_err();
        assert_eq!(err.message, "Failed to resolve notification");
        assert_eq!(bell.notifications().len(), 1);
        assert_eq!(bell.selected(), Some(7));
        assert!(!bell.is_resolving());
    }

    #[tokio::test]
    async fn test_load_bell_by_role() {
        let api = StubApi::default();
        *api.notifications.lock() = notes(&[5]);

        match load_bell(&api, Role::User).await {
            BellState::User(bell) => assert_eq!(bell.badge(), Some(1)),
            other => panic!("unexpected {:?}", other),
        }

        // count endpoint unreachable
        assert_eq!(load_bell(&api, Role::Admin).await, BellState::Admin { count: 0 });
        *api.admin_count.lock() = Some(4);
        assert_eq!(load_bell(&api, Role::Admin).await, BellState::Admin { count: 4 });

        assert_eq!(load_bell(&api, Role::Technician).await, BellState::Hidden);
    }
}

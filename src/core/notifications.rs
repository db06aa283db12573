//! User-facing notification and error state shared across services.
//!
//! Services surface non-fatal outcomes (toasts, inline errors) through a
//! cloneable [`Notifier`] handle instead of returning presentation concerns
//! to their callers. The UI layer drains this state however it renders.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A completed action, e.g. "product added to cart"
    Success,
    /// A failed action the shopper should retry
    Error,
    /// Something degraded but not failed
    Warning,
    /// Neutral information, e.g. an order status change
    Info,
}

/// A single toast-style message.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Monotonically increasing id, unique within the process
    pub id: u64,
    /// Message severity
    pub kind: NotificationKind,
    /// Short title
    pub title: String,
    /// Longer body text
    pub message: String,
    /// When the notification was raised
    pub timestamp: DateTime<Utc>,
    /// Whether the shopper has seen it
    pub read: bool,
}

#[derive(Debug, Default)]
struct AppState {
    next_id: u64,
    errors: Vec<String>,
    notifications: Vec<Notification>,
}

/// Cloneable handle services use to surface toasts and inline errors.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    state: Arc<Mutex<AppState>>,
}

impl Notifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raises a toast-style notification.
    pub fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        let mut state = self.lock();
        state.next_id += 1;
        let notification = Notification {
            id: state.next_id,
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            read: false,
        };
        state.notifications.push(notification);
    }

    /// Records an inline error message.
    pub fn add_error(&self, message: &str) {
        self.lock().errors.push(message.to_string());
    }

    /// Removes a previously recorded inline error.
    pub fn remove_error(&self, message: &str) {
        self.lock().errors.retain(|e| e != message);
    }

    /// Clears all inline errors.
    pub fn clear_errors(&self) {
        self.lock().errors.clear();
    }

    /// Marks the notification with `id` as read.
    pub fn mark_read(&self, id: u64) {
        if let Some(notification) = self.lock().notifications.iter_mut().find(|n| n.id == id) {
            notification.read = true;
        }
    }

    /// Removes the notification with `id`.
    pub fn remove_notification(&self, id: u64) {
        self.lock().notifications.retain(|n| n.id != id);
    }

    /// Clears all notifications.
    pub fn clear_notifications(&self) {
        self.lock().notifications.clear();
    }

    /// Snapshot of the current notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Snapshot of the current inline errors.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.lock().errors.clone()
    }

    /// Number of unread notifications.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.lock().notifications.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_notifications_get_unique_ids_and_start_unread() {
        let notifier = Notifier::new();
        notifier.notify(NotificationKind::Success, "Cart", "Product added to cart");
        notifier.notify(NotificationKind::Info, "Orders", "Status updated");

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 2);
        assert_ne!(notifications[0].id, notifications[1].id);
        assert_eq!(notifier.unread_count(), 2);

        notifier.mark_read(notifications[0].id);
        assert_eq!(notifier.unread_count(), 1);

        notifier.remove_notification(notifications[1].id);
        assert_eq!(notifier.notifications().len(), 1);

        notifier.clear_notifications();
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_error_list() {
        let notifier = Notifier::new();
        notifier.add_error("Failed to load coupons");
        notifier.add_error("Failed to load order history");
        assert_eq!(notifier.errors().len(), 2);

        notifier.remove_error("Failed to load coupons");
        assert_eq!(notifier.errors(), vec!["Failed to load order history"]);

        notifier.clear_errors();
        assert!(notifier.errors().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let notifier = Notifier::new();
        let clone = notifier.clone();
        clone.notify(NotificationKind::Warning, "Store", "Low stock");
        assert_eq!(notifier.notifications().len(), 1);
    }
}

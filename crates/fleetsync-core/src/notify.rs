//! Toast Notifications
//!
//! Transient user-facing messages with auto-dismiss. Every notification owns
//! its own timer task; dismissing early aborts the timer so nothing leaks.
//! A rendering host subscribes to [`NotificationEvent`]s and paints the
//! toasts; this module only owns their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::NotificationSettings;

/// Event channel capacity; a slow host drops the oldest events
const EVENT_CAPACITY: usize = 64;

/// Severity/styling class of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral informational message
    Info,
    /// Action completed
    Success,
    /// Something needs attention but nothing failed
    Warning,
    /// Action failed
    Error,
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id, also used for dismissal
    pub id: Uuid,
    /// Message text shown in the toast
    pub message: String,
    /// Severity/styling class
    pub kind: NotificationKind,
    /// When the notification was raised
    pub created_at: DateTime<Utc>,
}

/// Handle for dismissing a notification before it expires
#[derive(Debug, Clone)]
pub struct NotificationHandle {
    id: Uuid,
}

impl NotificationHandle {
    /// Id of the notification this handle refers to
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Lifecycle events for a rendering host
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// A notification became visible
    Shown(Notification),
    /// A notification was dismissed (auto-expiry or explicit)
    Dismissed(Uuid),
}

struct ActiveToast {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    active: HashMap<Uuid, ActiveToast>,
    unread: u32,
}

/// Queues and displays transient messages with auto-dismiss
///
/// Cheap to clone; clones share the same toast state and event stream.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<NotificationEvent>,
    settings: NotificationSettings,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationSettings::default())
    }
}

impl NotificationCenter {
    /// Create a notification center
    pub fn new(settings: NotificationSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                active: HashMap::new(),
                unread: 0,
            })),
            events,
            settings,
        }
    }

    /// Show a notification
    ///
    /// Displayed immediately; auto-dismissed after the configured timeout
    /// unless [`dismiss`](Self::dismiss)ed earlier. Must be called from
    /// within a tokio runtime (the auto-dismiss timer is a spawned task).
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationHandle {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };
        let id = notification.id;

        if let Ok(mut inner) = self.inner.lock() {
            inner.unread = (inner.unread + 1).min(self.settings.max_badge_count);
            inner.active.insert(
                id,
                ActiveToast {
                    notification: notification.clone(),
                    timer: None,
                },
            );
        }

        let timer = {
            let inner = Arc::clone(&self.inner);
            let events = self.events.clone();
            let timeout = Duration::from_millis(self.settings.auto_dismiss_ms);
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                let expired = inner
                    .lock()
                    .map(|mut inner| inner.active.remove(&id).is_some())
                    .unwrap_or(false);
                if expired {
                    let _ = events.send(NotificationEvent::Dismissed(id));
                }
            })
        };

        // if the toast was dismissed between insert and here, cancel the timer
        if let Ok(mut inner) = self.inner.lock() {
            match inner.active.get_mut(&id) {
                Some(toast) => toast.timer = Some(timer),
                None => timer.abort(),
            }
        }

        let _ = self.events.send(NotificationEvent::Shown(notification));
        NotificationHandle { id }
    }

    /// Dismiss a notification before it expires
    ///
    /// Releases the auto-dismiss timer. Idempotent: dismissing an already
    /// expired or dismissed notification is a no-op.
    pub fn dismiss(&self, handle: &NotificationHandle) {
        let removed = self
            .inner
            .lock()
            .ok()
            .and_then(|mut inner| inner.active.remove(&handle.id));
        if let Some(toast) = removed {
            if let Some(timer) = toast.timer {
                timer.abort();
            }
            let _ = self.events.send(NotificationEvent::Dismissed(handle.id));
        }
    }

    /// Subscribe to show/dismiss events
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the currently displayed notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut toasts: Vec<Notification> = self
            .inner
            .lock()
            .map(|inner| {
                inner
                    .active
                    .values()
                    .map(|t| t.notification.clone())
                    .collect()
            })
            .unwrap_or_default();
        toasts.sort_by_key(|n| n.created_at);
        toasts
    }

    /// Number of currently displayed notifications
    pub fn active_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.active.len()).unwrap_or(0)
    }

    /// Unread badge count, saturating at the configured cap
    pub fn unread_count(&self) -> u32 {
        self.inner.lock().map(|inner| inner.unread).unwrap_or(0)
    }

    /// Clear the unread badge
    pub fn mark_read(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.unread = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn toast_auto_dismisses_after_timeout() {
        let center = NotificationCenter::default();
        center.notify("Data synced successfully!", NotificationKind::Success);
        assert_eq!(center.active_count(), 1);

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(center.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn early_dismiss_releases_timer() {
        let center = NotificationCenter::default();
        let handle = center.notify("Opening fuel logging form...", NotificationKind::Info);

        center.dismiss(&handle);
        assert_eq!(center.active_count(), 0);

        // dismissing again is a no-op
        center.dismiss(&handle);
        assert_eq!(center.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_toasts_stack_and_expire_independently() {
        let center = NotificationCenter::default();
        center.notify("first", NotificationKind::Info);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        center.notify("second", NotificationKind::Warning);
        assert_eq!(center.active_count(), 2);

        // first expires at 4000, second at 6000
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "second");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(center.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn events_reach_subscribers() {
        let center = NotificationCenter::default();
        let mut events = center.subscribe();

        let handle = center.notify("Login successful!", NotificationKind::Success);
        match events.recv().await.expect("shown event") {
            NotificationEvent::Shown(n) => {
                assert_eq!(n.message, "Login successful!");
                assert_eq!(n.kind, NotificationKind::Success);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        center.dismiss(&handle);
        match events.recv().await.expect("dismissed event") {
            NotificationEvent::Dismissed(id) => assert_eq!(id, handle.id()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unread_badge_saturates_and_clears() {
        let center = NotificationCenter::default();
        for _ in 0..8 {
            center.notify("ping", NotificationKind::Info);
        }
        assert_eq!(center.unread_count(), 5);

        center.mark_read();
        assert_eq!(center.unread_count(), 0);
    }
}

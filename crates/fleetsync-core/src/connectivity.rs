//! Connectivity status
//!
//! The host environment raises binary online/offline transitions; the
//! monitor tracks the current status, publishes it on a watch channel for
//! the connection-status indicator, and raises a toast on every change.
//! Transitions are edge-triggered: repeating the current status is a no-op.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::notify::{NotificationCenter, NotificationKind};

/// Binary connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Host reports connectivity
    Online,
    /// Host reports no connectivity; data syncs when it returns
    Offline,
}

/// Tracks online/offline transitions raised by the host
pub struct ConnectivityMonitor {
    status: watch::Sender<ConnectionStatus>,
    notifications: NotificationCenter,
}

impl ConnectivityMonitor {
    /// Create a monitor with an initial status
    pub fn new(notifications: NotificationCenter, initial: ConnectionStatus) -> Self {
        let (status, _) = watch::channel(initial);
        Self {
            status,
            notifications,
        }
    }

    /// Current status
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Subscribe to status changes (for the indicator)
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Apply a host-raised online/offline signal
    pub fn set_online(&self, online: bool) {
        let next = if online {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Offline
        };
        if *self.status.borrow() == next {
            return;
        }
        self.status.send_replace(next);

        match next {
            ConnectionStatus::Online => {
                tracing::info!("connection restored");
                self.notifications
                    .notify("Back online. Syncing data...", NotificationKind::Success);
            }
            ConnectionStatus::Offline => {
                tracing::warn!("connection lost");
                self.notifications.notify(
                    "You are offline. Data will sync when connection returns.",
                    NotificationKind::Warning,
                );
            }
        }
    }
}

//! Dashboard page controller

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::notify::{NotificationCenter, NotificationKind};
use crate::session::{Session, SharedSessionStore};
use crate::sim::{MetricSimulator, MetricState, SimHandle};
use crate::trip::Trip;

use super::{Navigator, PageKind, TaskSet};

/// ETA shown on the dashboard is a fixed offset from now
const ETA_OFFSET_MIN: i64 = 30;

/// Quick actions on the dashboard home card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    /// Jump to the trips page
    StartTrip,
    /// Open the fuel logging form
    LogFuel,
    /// Jump to the vehicle page
    ReportIssue,
    /// Open the live map view
    LiveMap,
}

/// Drives the home dashboard: live stats, the current trip card, and the
/// quick-action row
pub struct DashboardController {
    session: SharedSessionStore,
    notifications: NotificationCenter,
    navigator: Arc<dyn Navigator>,
    telemetry: SimHandle,
    metrics: watch::Receiver<MetricState>,
    current_trip: Arc<Mutex<Trip>>,
    last_sync: Arc<Mutex<DateTime<Utc>>>,
    sync_status: watch::Receiver<String>,
    trip_start_delay: Duration,
    sync_delay: Duration,
    tasks: TaskSet,
}

impl DashboardController {
    /// Start the dashboard: spawns its own telemetry simulator at the
    /// dashboard cadence
    pub fn start(
        session: SharedSessionStore,
        notifications: NotificationCenter,
        navigator: Arc<dyn Navigator>,
        config: &AppConfig,
    ) -> Self {
        let sim = MetricSimulator::new(config.sim.clone());
        let telemetry = sim.spawn(Duration::from_millis(config.refresh.dashboard_interval_ms));
        let metrics = telemetry.subscribe();

        let last_sync = Arc::new(Mutex::new(Utc::now()));
        let mut tasks = TaskSet::new();

        // the sync-status line refreshes on its own slower cadence
        let (status_tx, sync_status) = watch::channel("Just now".to_string());
        {
            let last_sync = Arc::clone(&last_sync);
            let interval = Duration::from_millis(config.refresh.sync_status_interval_ms);
            tasks.spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let last = last_sync.lock().map(|l| *l).unwrap_or_else(|_| Utc::now());
                    status_tx.send_replace(sync_label(last, Utc::now()));
                }
            });
        }

        Self {
            session,
            notifications,
            navigator,
            telemetry,
            metrics,
            current_trip: Arc::new(Mutex::new(Trip::scheduled(102))),
            last_sync,
            sync_status,
            trip_start_delay: Duration::from_millis(config.actions.transition_delay_ms),
            sync_delay: Duration::from_millis(config.actions.feedback_delay_ms),
            tasks,
        }
    }

    /// The logged-in driver shown in the sidebar
    pub fn driver(&self) -> Option<Session> {
        self.session
            .lock()
            .ok()
            .and_then(|store| store.current().cloned())
    }

    /// Latest live-stats snapshot
    pub fn live_stats(&self) -> MetricState {
        self.metrics.borrow().clone()
    }

    /// Snapshot of the current trip card
    pub fn current_trip(&self) -> Trip {
        self.current_trip
            .lock()
            .map(|trip| trip.clone())
            .unwrap_or_else(|_| Trip::scheduled(0))
    }

    /// Start navigation on the current trip
    ///
    /// Confirms immediately with a toast; the trip card flips to in-progress
    /// after a short transition delay.
    pub fn start_trip(&mut self) {
        self.notifications.notify(
            "Starting navigation to destination...",
            NotificationKind::Success,
        );

        let trip = Arc::clone(&self.current_trip);
        let delay = self.trip_start_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut trip) = trip.lock() {
                trip.start(Utc::now());
            }
        });
    }

    /// Trigger a manual data sync
    ///
    /// After the simulated round-trip the last-sync marker resets and a
    /// success toast fires.
    pub fn sync_now(&mut self) {
        let notifications = self.notifications.clone();
        let last_sync = Arc::clone(&self.last_sync);
        let delay = self.sync_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut last) = last_sync.lock() {
                *last = Utc::now();
            }
            notifications.notify("Data synced successfully!", NotificationKind::Success);
        });
    }

    /// Handle a quick-action tap
    pub fn quick_action(&mut self, action: QuickAction) {
        match action {
            QuickAction::StartTrip => self.navigator.navigate(PageKind::Trips),
            QuickAction::LogFuel => {
                self.notifications
                    .notify("Opening fuel logging form...", NotificationKind::Info);
            }
            QuickAction::ReportIssue => self.navigator.navigate(PageKind::Vehicle),
            QuickAction::LiveMap => {
                self.notifications
                    .notify("Opening live map view...", NotificationKind::Info);
            }
        }
    }

    /// Estimated arrival time shown on the location card
    pub fn eta(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + ChronoDuration::minutes(ETA_OFFSET_MIN)
    }

    /// Human label for the last successful sync
    pub fn last_sync_label(&self, now: DateTime<Utc>) -> String {
        let last = self.last_sync.lock().map(|l| *l).unwrap_or(now);
        sync_label(last, now)
    }

    /// Subscribe to the periodically refreshed sync-status line
    pub fn subscribe_sync_status(&self) -> watch::Receiver<String> {
        self.sync_status.clone()
    }

    /// Tear the dashboard down, cancelling its simulator and pending actions
    pub fn stop(&mut self) {
        self.tasks.stop();
        self.telemetry.stop();
    }
}

fn sync_label(last: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(last).num_minutes();
    if minutes <= 0 {
        "Just now".to_string()
    } else {
        format!("{} min ago", minutes)
    }
}

//! Trips page controller

use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::AppConfig;
use crate::notify::{NotificationCenter, NotificationKind};
use crate::trip::{Trip, TripStatus};

use super::TaskSet;

/// Drives the trip list: status checks against the wall clock, starting the
/// next assignment, and route selection
pub struct TripsController {
    notifications: NotificationCenter,
    trips: Arc<Mutex<Vec<Trip>>>,
    prepare_delay: Duration,
    tasks: TaskSet,
}

impl TripsController {
    /// Start the trips page with an initial trip list
    ///
    /// Spawns the status-check loop at the configured cadence; every
    /// in-progress trip is polled against elapsed wall-clock time.
    pub fn start(
        notifications: NotificationCenter,
        trips: Vec<Trip>,
        config: &AppConfig,
    ) -> Self {
        let trips = Arc::new(Mutex::new(trips));
        let mut tasks = TaskSet::new();

        let shared = Arc::clone(&trips);
        let interval = Duration::from_millis(config.refresh.trip_status_interval_ms);
        tasks.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = Utc::now();
                if let Ok(mut trips) = shared.lock() {
                    for trip in trips.iter_mut() {
                        trip.poll(now);
                    }
                }
            }
        });

        Self {
            notifications,
            trips,
            prepare_delay: Duration::from_millis(config.actions.prepare_delay_ms),
            tasks,
        }
    }

    /// Snapshot of the trip list
    pub fn trips(&self) -> Vec<Trip> {
        self.trips.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Start the next scheduled trip
    ///
    /// Opens route selection immediately; the trip itself starts once the
    /// preparation delay has passed.
    pub fn start_next_trip(&mut self) {
        self.notifications.notify(
            "Starting new trip... Opening route selection",
            NotificationKind::Info,
        );

        let trips = Arc::clone(&self.trips);
        let delay = self.prepare_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut trips) = trips.lock() {
                if let Some(next) = trips
                    .iter_mut()
                    .find(|trip| trip.status == TripStatus::Scheduled)
                {
                    next.start(Utc::now());
                }
            }
        });
    }

    /// Select a route for the upcoming trip
    pub fn select_route(&self, name: &str) {
        self.notifications.notify(
            format!("Selected route: {}", name),
            NotificationKind::Success,
        );
    }

    /// Preview a route without selecting it
    pub fn preview_route(&self, name: &str) {
        self.notifications
            .notify(format!("Previewing {}...", name), NotificationKind::Info);
    }

    /// Open the detail view for a trip
    pub fn open_trip(&self, id: &str) {
        self.notifications.notify(
            format!("Opening details for {}", id),
            NotificationKind::Info,
        );
    }

    /// Tear the page down, cancelling the status-check loop
    pub fn stop(&mut self) {
        self.tasks.stop();
    }
}

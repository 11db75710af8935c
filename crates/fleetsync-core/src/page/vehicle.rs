//! Vehicle page controller

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::notify::{NotificationCenter, NotificationKind};
use crate::sim::{MetricSimulator, MetricState, SimHandle};

use super::TaskSet;

/// Maintenance state of a single service item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    /// Service window approaching
    DueSoon,
    /// Service window missed
    Overdue,
    /// Booked with the workshop
    Scheduled,
}

/// A service item on the maintenance card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceItem {
    /// Item name, e.g. "Oil Change"
    pub name: String,
    /// Current maintenance state
    pub status: MaintenanceStatus,
}

impl MaintenanceItem {
    /// Create a maintenance item
    pub fn new(name: impl Into<String>, status: MaintenanceStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// An accepted fuel log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLogEntry {
    /// Litres added
    pub liters: f64,
    /// Cost in DZD
    pub cost: f64,
    /// Station name
    pub station: String,
}

/// Errors from the fuel logging form
#[derive(Error, Debug)]
pub enum FuelLogError {
    /// One or more form fields were left empty. Recoverable: the form stays
    /// open with a notification.
    #[error("All fuel log fields are required")]
    MissingFields,
}

/// Drives the vehicle page: diagnostics, fuel logging, issue reporting, and
/// maintenance scheduling
pub struct VehicleController {
    notifications: NotificationCenter,
    telemetry: SimHandle,
    metrics: watch::Receiver<MetricState>,
    maintenance: Arc<Mutex<Vec<MaintenanceItem>>>,
    fuel_logs: Arc<Mutex<Vec<FuelLogEntry>>>,
    today_usage_l: Arc<Mutex<f64>>,
    low_fuel_threshold: f64,
    feedback_delay: Duration,
    tasks: TaskSet,
}

impl VehicleController {
    /// Start the vehicle page: spawns its own telemetry simulator at the
    /// diagnostics cadence
    pub fn start(
        notifications: NotificationCenter,
        maintenance: Vec<MaintenanceItem>,
        config: &AppConfig,
    ) -> Self {
        let sim = MetricSimulator::new(config.sim.clone());
        let telemetry = sim.spawn(Duration::from_millis(config.refresh.vehicle_interval_ms));
        let metrics = telemetry.subscribe();

        Self {
            notifications,
            telemetry,
            metrics,
            maintenance: Arc::new(Mutex::new(maintenance)),
            fuel_logs: Arc::new(Mutex::new(Vec::new())),
            today_usage_l: Arc::new(Mutex::new(0.0)),
            low_fuel_threshold: config.sim.fuel_floor_percent,
            feedback_delay: Duration::from_millis(config.actions.feedback_delay_ms),
            tasks: TaskSet::new(),
        }
    }

    /// Latest diagnostics snapshot
    pub fn diagnostics(&self) -> MetricState {
        self.metrics.borrow().clone()
    }

    /// Whether the fuel gauge should show the low-fuel warning
    pub fn low_fuel(&self) -> bool {
        self.metrics.borrow().fuel_percent < self.low_fuel_threshold
    }

    /// Submit the fuel logging form
    ///
    /// All three fields are required; an incomplete form raises an error
    /// toast and leaves everything unchanged. A complete entry is saved
    /// after the simulated round-trip and added to today's usage.
    pub fn log_fuel(
        &mut self,
        liters: Option<f64>,
        cost: Option<f64>,
        station: &str,
    ) -> Result<(), FuelLogError> {
        let (Some(liters), Some(cost)) = (liters, cost) else {
            self.notifications
                .notify("Please fill all fuel log fields", NotificationKind::Error);
            return Err(FuelLogError::MissingFields);
        };
        if station.trim().is_empty() {
            self.notifications
                .notify("Please fill all fuel log fields", NotificationKind::Error);
            return Err(FuelLogError::MissingFields);
        }

        let entry = FuelLogEntry {
            liters,
            cost,
            station: station.trim().to_string(),
        };
        let notifications = self.notifications.clone();
        let fuel_logs = Arc::clone(&self.fuel_logs);
        let today = Arc::clone(&self.today_usage_l);
        let delay = self.feedback_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let message = format!(
                "Fuel log saved: {}L at {} for {} DZD",
                entry.liters, entry.station, entry.cost
            );
            if let Ok(mut usage) = today.lock() {
                *usage += entry.liters;
            }
            if let Ok(mut logs) = fuel_logs.lock() {
                logs.push(entry);
            }
            notifications.notify(message, NotificationKind::Success);
        });

        Ok(())
    }

    /// Accepted fuel log entries
    pub fn fuel_logs(&self) -> Vec<FuelLogEntry> {
        self.fuel_logs.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Litres logged today
    pub fn today_fuel_usage(&self) -> f64 {
        self.today_usage_l.lock().map(|u| *u).unwrap_or(0.0)
    }

    /// Report a vehicle issue in the given category
    pub fn report_issue(&mut self, category: &str) {
        self.notifications.notify(
            format!("Reporting {}... Opening form", category),
            NotificationKind::Info,
        );

        let notifications = self.notifications.clone();
        let category = category.to_string();
        let delay = self.feedback_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            notifications.notify(
                format!("Issue report for {} submitted to fleet manager", category),
                NotificationKind::Success,
            );
        });
    }

    /// Schedule a maintenance item
    ///
    /// Returns `false` for an unknown item. A known item flips to
    /// `Scheduled` once the booking round-trip completes.
    pub fn schedule_maintenance(&mut self, name: &str) -> bool {
        let known = self
            .maintenance
            .lock()
            .map(|items| items.iter().any(|item| item.name == name))
            .unwrap_or(false);
        if !known {
            return false;
        }

        self.notifications.notify(
            format!("Scheduling {}...", name),
            NotificationKind::Info,
        );

        let notifications = self.notifications.clone();
        let maintenance = Arc::clone(&self.maintenance);
        let name = name.to_string();
        let delay = self.feedback_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut items) = maintenance.lock() {
                if let Some(item) = items.iter_mut().find(|item| item.name == name) {
                    item.status = MaintenanceStatus::Scheduled;
                }
            }
            notifications.notify(
                format!("{} scheduled for next week", name),
                NotificationKind::Success,
            );
        });

        true
    }

    /// Snapshot of the maintenance card
    pub fn maintenance(&self) -> Vec<MaintenanceItem> {
        self.maintenance
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Place an emergency call to the fleet manager
    ///
    /// The host confirms before calling; this only raises the status toast.
    pub fn emergency_call(&self) {
        self.notifications
            .notify("Calling fleet manager...", NotificationKind::Info);
    }

    /// Tear the page down, cancelling its simulator and pending actions
    pub fn stop(&mut self) {
        self.tasks.stop();
        self.telemetry.stop();
    }
}

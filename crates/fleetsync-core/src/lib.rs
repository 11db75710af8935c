//! # FleetSync Driver Core
//!
//! Core functionality for the FleetSync driver companion app.
//!
//! This library provides:
//! - Driver session management with remember-me persistence
//! - Simulated live vehicle telemetry (speed, fuel, engine, battery, trip)
//! - Transient toast notifications with auto-dismiss timers
//! - Per-page controllers that compose the above and own their timers
//! - Connectivity status tracking and background sync worker registration
//!
//! The library is the state half of the app: it holds sessions, trips,
//! metrics, and notifications, and publishes changes over channels. Page
//! markup and rendering belong to the embedding host, which subscribes to
//! state snapshots and implements the [`page::Navigator`] seam.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fleetsync_core::prelude::*;
//! use std::sync::Arc;
//!
//! let config = AppConfig::default();
//! let notifications = NotificationCenter::new(config.notifications.clone());
//! let session = SessionStore::new(Box::new(FileBackend::open(
//!     FileBackend::default_path()?,
//! )?))
//! .into_shared();
//!
//! let mut dashboard = DashboardController::start(
//!     Arc::clone(&session),
//!     notifications.clone(),
//!     navigator,
//!     &config,
//! );
//! let stats = dashboard.live_stats();
//! dashboard.stop();
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod connectivity;
pub mod notify;
pub mod page;
pub mod session;
pub mod sim;
pub mod sync;
pub mod trip;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        ActionSettings, AppConfig, NotificationSettings, RefreshSettings, SessionSettings,
        SimulatorSettings,
    };
    pub use crate::connectivity::{ConnectionStatus, ConnectivityMonitor};
    pub use crate::notify::{
        Notification, NotificationCenter, NotificationEvent, NotificationHandle, NotificationKind,
    };
    pub use crate::page::{
        AccountAction, DashboardController, LoginController, Navigator, PageKind,
        ProfileController, QuickAction, TaskSet, TripsController, VehicleController,
    };
    pub use crate::session::{
        AuthError, FileBackend, MemoryBackend, Session, SessionBackend, SessionStore, StoreError,
    };
    pub use crate::sim::{MetricSimulator, MetricState, SimHandle};
    pub use crate::sync::{register_sync_worker, SyncWorker};
    pub use crate::trip::{Trip, TripStatus};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

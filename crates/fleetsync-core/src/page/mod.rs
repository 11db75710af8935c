//! Page Controllers
//!
//! One controller per logical page of the driver app. Each composes the
//! session store (read access), its own telemetry simulator at the page's
//! cadence, and the shared notification center, and owns every timer it
//! registers: `stop()` aborts them all so no callback fires against a
//! torn-down view.
//!
//! The page markup itself belongs to the host, which reads state snapshots
//! off the controllers and receives navigation requests through
//! [`Navigator`].

mod dashboard;
mod login;
mod profile;
mod trips;
mod vehicle;

pub use dashboard::{DashboardController, QuickAction};
pub use login::{LoginController, DEMO_DRIVER_ID, DEMO_PASSWORD};
pub use profile::{AccountAction, ProfileController};
pub use trips::TripsController;
pub use vehicle::{
    FuelLogEntry, FuelLogError, MaintenanceItem, MaintenanceStatus, VehicleController,
};

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::task::JoinHandle;

/// Logical pages of the driver app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Splash/login screen
    Login,
    /// Home dashboard with live stats
    Dashboard,
    /// Trip list and route selection
    Trips,
    /// Vehicle diagnostics and maintenance
    Vehicle,
    /// Driver profile and settings
    Profile,
}

/// Host-side navigation seam
///
/// Controllers request page changes; the host owns the actual views and
/// decides how to present them.
pub trait Navigator: Send + Sync {
    /// Switch the visible page
    fn navigate(&self, page: PageKind);
}

/// Owned set of background task handles
///
/// Everything spawned through a `TaskSet` is aborted when the set is
/// stopped or dropped, which is what guarantees a stopped controller has
/// no timers left.
#[derive(Default)]
pub struct TaskSet {
    handles: Vec<JoinHandle<()>>,
}

impl TaskSet {
    /// Create an empty task set
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by this set
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.push(tokio::spawn(future));
    }

    /// Abort every owned task
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of tasks spawned and not yet stopped
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the set holds no tasks
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Navigator, PageKind};
    use std::sync::Mutex;

    /// Records navigation requests for assertions
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub visited: Mutex<Vec<PageKind>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, page: PageKind) {
            if let Ok(mut visited) = self.visited.lock() {
                visited.push(page);
            }
        }
    }

    impl RecordingNavigator {
        pub fn last(&self) -> Option<PageKind> {
            self.visited.lock().ok().and_then(|v| v.last().copied())
        }
    }
}

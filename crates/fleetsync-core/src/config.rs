//! App configuration
//!
//! Every cadence, delay, bound, and step size the core uses lives here, with
//! the demo defaults baked into the `Default` impls. The config round-trips
//! through a settings.json file so a host can override any of it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Top-level configuration for the driver app core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Login flow timing
    pub session: SessionSettings,
    /// Per-page refresh cadences
    pub refresh: RefreshSettings,
    /// Toast display behavior
    pub notifications: NotificationSettings,
    /// Simulated telemetry bounds and step sizes
    pub sim: SimulatorSettings,
    /// Delays applied to user actions before their effect lands
    pub actions: ActionSettings,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid settings.json: {}", e)))
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }
}

/// Login flow timing
///
/// Both delays model perceived network latency; neither is business logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Simulated authentication round-trip before a login resolves
    pub auth_delay_ms: u64,
    /// Delay between a successful login and the dashboard redirect
    pub redirect_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auth_delay_ms: 1500,
            redirect_delay_ms: 1500,
        }
    }
}

/// Per-page refresh cadences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Dashboard live-stats tick interval
    pub dashboard_interval_ms: u64,
    /// Vehicle diagnostics tick interval
    pub vehicle_interval_ms: u64,
    /// Trip status-check interval
    pub trip_status_interval_ms: u64,
    /// Background sync-status refresh interval
    pub sync_status_interval_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 5000,
            vehicle_interval_ms: 8000,
            trip_status_interval_ms: 10_000,
            sync_status_interval_ms: 30_000,
        }
    }
}

/// Toast display behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// How long a toast stays up before it dismisses itself
    pub auto_dismiss_ms: u64,
    /// Unread badge saturates at this count
    pub max_badge_count: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: 4000,
            max_badge_count: 5,
        }
    }
}

/// Delays applied to user actions before their effect lands
///
/// Action feedback is staggered to feel like server work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSettings {
    /// Save/submit style actions (fuel log, sync, issue report, maintenance)
    pub feedback_delay_ms: u64,
    /// Longer preparation actions (starting a trip, generating a report)
    pub prepare_delay_ms: u64,
    /// Short state transitions (trip chip flips, sign-out redirect)
    pub transition_delay_ms: u64,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 1500,
            prepare_delay_ms: 2000,
            transition_delay_ms: 1000,
        }
    }
}

/// Simulated telemetry bounds and step sizes
///
/// The tick cadence and step sizes are configuration, not semantics; the
/// clamps are the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Lower speed clamp (km/h)
    pub speed_min_kmh: f64,
    /// Upper speed clamp (km/h)
    pub speed_max_kmh: f64,
    /// Random-walk step for speed (km/h per tick)
    pub speed_step_kmh: f64,
    /// Fuel drain per tick (percentage points)
    pub fuel_step_percent: f64,
    /// Fuel stops draining at this level
    pub fuel_floor_percent: f64,
    /// Range estimate per fuel percentage point (km)
    pub range_km_per_percent: f64,
    /// Lower engine temperature clamp (°C)
    pub engine_temp_min_c: f64,
    /// Upper engine temperature clamp (°C)
    pub engine_temp_max_c: f64,
    /// Random-walk step for engine temperature (°C per tick)
    pub engine_temp_step_c: f64,
    /// Center of the RPM jitter band
    pub engine_rpm_base: f64,
    /// RPM jitter half-width, drawn uniformly each tick
    pub engine_rpm_jitter: f64,
    /// Battery drain per tick (percentage points)
    pub battery_step_percent: f64,
    /// Battery charge is held at this level
    pub battery_floor_percent: f64,
    /// Trip progress gain per tick (percentage points)
    pub trip_progress_step_percent: f64,
    /// Trip distance gain per tick (km)
    pub trip_distance_step_km: f64,
    /// Total distance of the current trip (km)
    pub trip_total_distance_km: f64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            speed_min_kmh: 60.0,
            speed_max_kmh: 75.0,
            speed_step_kmh: 1.0,
            fuel_step_percent: 0.1,
            fuel_floor_percent: 20.0,
            range_km_per_percent: 3.57,
            engine_temp_min_c: 85.0,
            engine_temp_max_c: 95.0,
            engine_temp_step_c: 1.0,
            engine_rpm_base: 2850.0,
            engine_rpm_jitter: 100.0,
            battery_step_percent: 0.1,
            battery_floor_percent: 60.0,
            trip_progress_step_percent: 0.5,
            trip_distance_step_km: 0.3,
            trip_total_distance_km: 42.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_demo_constants() {
        let config = AppConfig::default();
        assert_eq!(config.refresh.dashboard_interval_ms, 5000);
        assert_eq!(config.refresh.vehicle_interval_ms, 8000);
        assert_eq!(config.refresh.trip_status_interval_ms, 10_000);
        assert_eq!(config.notifications.auto_dismiss_ms, 4000);
        assert_eq!(config.sim.speed_min_kmh, 60.0);
        assert_eq!(config.sim.speed_max_kmh, 75.0);
        assert_eq!(config.sim.trip_total_distance_km, 42.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"refresh": {"dashboard_interval_ms": 1000}}"#)
                .expect("partial config should parse");
        assert_eq!(config.refresh.dashboard_interval_ms, 1000);
        // untouched fields keep their defaults
        assert_eq!(config.refresh.vehicle_interval_ms, 8000);
        assert_eq!(config.session.auth_delay_ms, 1500);
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");

        let mut config = AppConfig::default();
        config.sim.trip_total_distance_km = 120.0;
        config.save(&path).expect("save");

        let loaded = AppConfig::load(&path).expect("load");
        assert_eq!(loaded.sim.trip_total_distance_km, 120.0);
        assert_eq!(loaded.refresh.dashboard_interval_ms, 5000);
    }
}

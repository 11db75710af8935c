//! Simulated Telemetry - bounded random-walk vehicle metrics
//!
//! Generates the "live" numbers the driver app animates: speed, fuel, engine
//! temperature and RPM, battery charge, and trip progress. There is no real
//! sensor behind any of this; each tick nudges every metric independently
//! inside hard bounds.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SimulatorSettings;

/// One snapshot of every simulated metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    /// Current speed (km/h), random walk inside the configured band
    pub speed_kmh: f64,
    /// Fuel level (%), drains until the floor, rises only on refuel
    pub fuel_percent: f64,
    /// Estimated remaining range (km), derived from fuel
    pub range_km: f64,
    /// Engine temperature (°C), random walk inside the configured band
    pub engine_temp_c: f64,
    /// Engine speed (RPM), independent jitter around a base value
    pub engine_rpm: f64,
    /// Battery charge (%), drains until held at the floor
    pub battery_percent: f64,
    /// Battery voltage (V), derived from charge
    pub battery_voltage: f64,
    /// Progress through the current trip (%), non-decreasing
    pub trip_progress_percent: f64,
    /// Distance covered on the current trip (km), capped at the trip total
    pub trip_distance_km: f64,
}

impl Default for MetricState {
    fn default() -> Self {
        Self {
            speed_kmh: 68.0,
            fuel_percent: 78.5,
            range_km: 280.0,
            engine_temp_c: 90.0,
            engine_rpm: 2850.0,
            battery_percent: 85.0,
            battery_voltage: 12.99,
            trip_progress_percent: 65.0,
            trip_distance_km: 27.3,
        }
    }
}

/// Driver-side telemetry simulator
///
/// Ticks are independent across metrics; there is no cross-metric coupling.
/// The random source is seedable so tests are deterministic.
pub struct MetricSimulator {
    state: MetricState,
    settings: SimulatorSettings,
    rng: StdRng,
}

impl Default for MetricSimulator {
    fn default() -> Self {
        Self::new(SimulatorSettings::default())
    }
}

impl MetricSimulator {
    /// Create a simulator with an entropy-seeded random source
    pub fn new(settings: SimulatorSettings) -> Self {
        Self {
            state: MetricState::default(),
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a simulator with a fixed seed for deterministic tests
    pub fn with_seed(settings: SimulatorSettings, seed: u64) -> Self {
        Self {
            state: MetricState::default(),
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the current metric snapshot (e.g. to resume a trip mid-way)
    pub fn set_state(&mut self, state: MetricState) {
        self.state = state;
    }

    /// The current metric snapshot
    pub fn state(&self) -> &MetricState {
        &self.state
    }

    /// Advance every metric by one step and return the new snapshot
    pub fn tick(&mut self) -> MetricState {
        let cfg = &self.settings;
        let s = &mut self.state;

        // Speed: ±step, hard clamp
        let dir = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        s.speed_kmh =
            (s.speed_kmh + dir * cfg.speed_step_kmh).clamp(cfg.speed_min_kmh, cfg.speed_max_kmh);

        // Fuel: drains until the floor, one decimal of precision
        if s.fuel_percent > cfg.fuel_floor_percent {
            s.fuel_percent = round1(s.fuel_percent - cfg.fuel_step_percent).max(0.0);
        }
        s.range_km = (s.fuel_percent * cfg.range_km_per_percent).floor();

        // Engine: temperature walks, RPM is an independent draw each tick
        let dir = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        s.engine_temp_c = (s.engine_temp_c + dir * cfg.engine_temp_step_c)
            .clamp(cfg.engine_temp_min_c, cfg.engine_temp_max_c);
        s.engine_rpm = cfg.engine_rpm_base
            + self
                .rng
                .gen_range(-cfg.engine_rpm_jitter..=cfg.engine_rpm_jitter);

        // Battery: drains until held at the floor, voltage follows charge
        if s.battery_percent > cfg.battery_floor_percent {
            s.battery_percent = round1(s.battery_percent - cfg.battery_step_percent).max(0.0);
        }
        s.battery_voltage = 11.8 + (s.battery_percent / 100.0) * 1.4;

        // Trip: progress and distance only ever grow, up to their caps
        s.trip_progress_percent =
            (s.trip_progress_percent + cfg.trip_progress_step_percent).min(100.0);
        s.trip_distance_km =
            (s.trip_distance_km + cfg.trip_distance_step_km).min(cfg.trip_total_distance_km);

        s.clone()
    }

    /// Refuel to `percent`, the only way fuel ever increases
    pub fn refuel(&mut self, percent: f64) {
        self.state.fuel_percent = round1(percent.clamp(0.0, 100.0));
        self.state.range_km =
            (self.state.fuel_percent * self.settings.range_km_per_percent).floor();
    }

    /// Run the simulator on a fixed interval, publishing every snapshot
    ///
    /// The returned handle owns the timer task: dropping or stopping it
    /// cancels the loop, so no tick fires against a torn-down page.
    pub fn spawn(mut self, interval: Duration) -> SimHandle {
        let (tx, rx) = watch::channel(self.state.clone());
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first interval tick completes immediately; the loop should
            // wait a full period before the first update
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let state = self.tick();
                if tx.send(state).is_err() {
                    break;
                }
            }
        });
        SimHandle { task, rx }
    }
}

/// Handle to a running simulator loop
pub struct SimHandle {
    task: JoinHandle<()>,
    rx: watch::Receiver<MetricState>,
}

impl SimHandle {
    /// Subscribe to metric snapshots
    pub fn subscribe(&self) -> watch::Receiver<MetricState> {
        self.rx.clone()
    }

    /// The most recently published snapshot
    pub fn latest(&self) -> MetricState {
        self.rx.borrow().clone()
    }

    /// Stop the simulator loop
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MetricSimulator {
        MetricSimulator::with_seed(SimulatorSettings::default(), 7)
    }

    #[test]
    fn metrics_stay_inside_bounds() {
        let mut sim = seeded();
        for _ in 0..2000 {
            let s = sim.tick();
            assert!(s.speed_kmh >= 60.0 && s.speed_kmh <= 75.0, "speed {}", s.speed_kmh);
            assert!(s.engine_temp_c >= 85.0 && s.engine_temp_c <= 95.0);
            assert!(s.engine_rpm >= 2750.0 && s.engine_rpm <= 2950.0);
            assert!(s.fuel_percent >= 0.0 && s.fuel_percent <= 100.0);
            assert!(s.battery_percent >= 0.0 && s.battery_percent <= 100.0);
            assert!(s.trip_progress_percent <= 100.0);
        }
    }

    #[test]
    fn fuel_and_battery_never_increase() {
        let mut sim = seeded();
        let mut last_fuel = sim.state().fuel_percent;
        let mut last_battery = sim.state().battery_percent;
        for _ in 0..500 {
            let s = sim.tick();
            assert!(s.fuel_percent <= last_fuel);
            assert!(s.battery_percent <= last_battery);
            last_fuel = s.fuel_percent;
            last_battery = s.battery_percent;
        }
    }

    #[test]
    fn trip_progress_is_monotone_and_capped() {
        let mut sim = seeded();
        let mut last = sim.state().trip_progress_percent;
        for _ in 0..200 {
            let s = sim.tick();
            assert!(s.trip_progress_percent >= last);
            last = s.trip_progress_percent;
        }
        // 65% + 200 * 0.5 overshoots, so the cap must have engaged
        assert_eq!(last, 100.0);
        assert_eq!(sim.state().trip_distance_km, 42.0);
    }

    #[test]
    fn fuel_floors_at_twenty_after_800_ticks() {
        let mut sim = seeded();
        let mut state = sim.state().clone();
        state.fuel_percent = 100.0;
        sim.set_state(state);

        for _ in 0..800 {
            sim.tick();
        }
        assert_eq!(sim.state().fuel_percent, 20.0);

        // floor reached: further ticks change nothing
        for _ in 0..50 {
            sim.tick();
        }
        assert_eq!(sim.state().fuel_percent, 20.0);
    }

    #[test]
    fn refuel_raises_fuel_and_range() {
        let mut sim = seeded();
        for _ in 0..100 {
            sim.tick();
        }
        sim.refuel(100.0);
        assert_eq!(sim.state().fuel_percent, 100.0);
        assert_eq!(sim.state().range_km, 357.0);
    }

    #[test]
    fn battery_holds_at_floor_and_voltage_tracks_charge() {
        let mut sim = seeded();
        // 85% start, 0.1 per tick: 250 ticks reaches the 60% hold
        for _ in 0..300 {
            sim.tick();
        }
        let s = sim.state();
        assert_eq!(s.battery_percent, 60.0);
        assert!((s.battery_voltage - (11.8 + 0.6 * 1.4)).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_publishes_and_stops() {
        let sim = MetricSimulator::with_seed(SimulatorSettings::default(), 3);
        let handle = sim.spawn(Duration::from_secs(5));
        let initial = handle.latest();

        tokio::time::sleep(Duration::from_secs(16)).await;
        let after = handle.latest();
        // three ticks: +1.5% trip progress
        assert!(after.trip_progress_percent > initial.trip_progress_percent);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;
        let frozen = handle.latest();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(frozen, handle.latest());
        assert!(!handle.is_running());
    }
}

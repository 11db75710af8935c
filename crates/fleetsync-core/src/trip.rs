//! Trip lifecycle
//!
//! A trip is a scheduled driving assignment. Status moves strictly forward:
//! `scheduled` → `in_progress` (driver starts) → `completed` (elapsed time
//! reaches the planned duration). Completion is evaluated against wall-clock
//! time on each status-check tick, never on a countdown timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a trip. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// Assigned but not yet started
    Scheduled,
    /// Driver is on the road
    InProgress,
    /// Planned duration elapsed
    Completed,
}

/// A scheduled driving assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip identifier, e.g. `TRP-7f3a9c2e`
    pub id: String,
    /// Current lifecycle status
    pub status: TripStatus,
    /// When the driver started the trip, if started
    pub start_time: Option<DateTime<Utc>>,
    /// Planned duration in minutes
    pub duration_min: i64,
    /// Baseline driving score the live score oscillates around
    pub base_score: f64,
}

impl Trip {
    /// Create a scheduled trip with a generated id
    pub fn scheduled(duration_min: i64) -> Self {
        let short = Uuid::new_v4().as_simple().to_string();
        Self::with_id(format!("TRP-{}", &short[..8]), duration_min)
    }

    /// Create a scheduled trip with an explicit id
    pub fn with_id(id: impl Into<String>, duration_min: i64) -> Self {
        Self {
            id: id.into(),
            status: TripStatus::Scheduled,
            start_time: None,
            duration_min,
            base_score: 92.0,
        }
    }

    /// Start the trip
    ///
    /// Returns `false` (and changes nothing) unless the trip is still
    /// scheduled; there is no way back from `in_progress` or `completed`.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != TripStatus::Scheduled {
            return false;
        }
        self.status = TripStatus::InProgress;
        self.start_time = Some(now);
        tracing::debug!(trip = %self.id, "trip started");
        true
    }

    /// Evaluate the status against wall-clock time
    ///
    /// An in-progress trip completes once elapsed time reaches the planned
    /// duration; the boundary is inclusive (elapsed ≥ duration).
    pub fn poll(&mut self, now: DateTime<Utc>) -> TripStatus {
        if self.status == TripStatus::InProgress {
            if let Some(elapsed) = self.elapsed_min(now) {
                if elapsed >= self.duration_min {
                    self.status = TripStatus::Completed;
                    tracing::debug!(trip = %self.id, "trip completed");
                }
            }
        }
        self.status
    }

    /// Whole minutes elapsed since the trip started
    pub fn elapsed_min(&self, now: DateTime<Utc>) -> Option<i64> {
        self.start_time
            .map(|start| now.signed_duration_since(start).num_minutes())
    }

    /// Whole minutes left of the planned duration, floored at zero
    pub fn remaining_min(&self, now: DateTime<Utc>) -> Option<i64> {
        self.elapsed_min(now)
            .map(|elapsed| (self.duration_min - elapsed).max(0))
    }

    /// Planned end time, once started
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .map(|start| start + Duration::minutes(self.duration_min))
    }

    /// Live driving score while the trip is in progress
    ///
    /// Oscillates around the baseline: `round(base + 3·sin(elapsed/10))`.
    pub fn live_score(&self, now: DateTime<Utc>) -> Option<u32> {
        if self.status != TripStatus::InProgress {
            return None;
        }
        let elapsed = self.elapsed_min(now)? as f64;
        Some((self.base_score + (elapsed / 10.0).sin() * 3.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, h, m, 0).unwrap()
    }

    #[test]
    fn completes_exactly_at_duration() {
        // the sample scenario: start 11:30, 1h42m planned
        let mut trip = Trip::with_id("TRP-4821", 102);
        trip.start(at(11, 30));

        assert_eq!(trip.poll(at(13, 11)), TripStatus::InProgress); // 101 min
        assert_eq!(trip.poll(at(13, 12)), TripStatus::Completed); // 102 min
    }

    #[test]
    fn status_only_moves_forward() {
        let mut trip = Trip::scheduled(60);
        assert_eq!(trip.status, TripStatus::Scheduled);
        assert_eq!(trip.poll(at(12, 0)), TripStatus::Scheduled);

        assert!(trip.start(at(12, 0)));
        assert!(!trip.start(at(12, 5)), "restart must be rejected");

        assert_eq!(trip.poll(at(13, 0)), TripStatus::Completed);
        assert!(!trip.start(at(13, 5)), "completed is terminal");
        assert_eq!(trip.poll(at(14, 0)), TripStatus::Completed);
    }

    #[test]
    fn elapsed_and_remaining_track_the_clock() {
        let mut trip = Trip::scheduled(102);
        assert_eq!(trip.elapsed_min(at(12, 0)), None);

        trip.start(at(11, 30));
        assert_eq!(trip.elapsed_min(at(12, 0)), Some(30));
        assert_eq!(trip.remaining_min(at(12, 0)), Some(72));
        assert_eq!(trip.end_time(), Some(at(13, 12)));

        // past the planned end, remaining floors at zero
        assert_eq!(trip.remaining_min(at(14, 0)), Some(0));
    }

    #[test]
    fn live_score_oscillates_around_baseline() {
        let mut trip = Trip::scheduled(102);
        assert_eq!(trip.live_score(at(12, 0)), None, "not started yet");

        trip.start(at(11, 30));
        for minutes in [0, 10, 30, 60, 101] {
            let now = at(11, 30) + Duration::minutes(minutes);
            let score = trip.live_score(now).expect("in progress");
            assert!((89..=95).contains(&score), "score {} out of band", score);
        }

        trip.poll(at(13, 12));
        assert_eq!(trip.live_score(at(13, 12)), None, "no live score after completion");
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TripStatus::InProgress).expect("serialize");
        assert_eq!(json, r#""in_progress""#);
    }
}

use std::time::{Duration, SystemTime};

use serde_with::serde_as;
use serde_with::TimestampSeconds;

/// Start/end timestamps of a play session. A session that has not started
/// yet (Picture-Recall during its preview) has no start time.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    #[serde_as(as = "Option<TimestampSeconds>")]
    pub started_timestamp: Option<SystemTime>,
    #[serde_as(as = "Option<TimestampSeconds>")]
    pub ended_timestamp: Option<SystemTime>,
}

impl TimerState {
    pub fn started(now: SystemTime) -> TimerState {
        TimerState {
            started_timestamp: Some(now),
            ended_timestamp: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_timestamp.is_some() && self.ended_timestamp.is_none()
    }

    pub fn has_ended(&self) -> bool {
        self.ended_timestamp.is_some()
    }

    /// Time played as of `now`, frozen once the timer has ended.
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        let Some(started) = self.started_timestamp else {
            return Duration::default();
        };
        self.ended_timestamp
            .unwrap_or(now)
            .duration_since(started)
            .unwrap_or(Duration::default())
    }

    /// Whole seconds between start and end; `None` until the timer has ended.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        let ended = self.ended_timestamp?;
        Some(self.elapsed(ended).as_secs())
    }

    pub fn ended(&self, now: SystemTime) -> TimerState {
        let mut new_state = self.clone();
        new_state.ended_timestamp = Some(now);
        new_state
    }
}

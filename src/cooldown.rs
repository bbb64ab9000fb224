//! Cooldown state machine
//!
//! A single slot remembers the most recently fired cooldown-gated gesture and
//! when it fired. A gated gesture is suppressed only while it repeats the
//! remembered gesture inside that gesture's window; firing a different gated
//! gesture overwrites the slot, so switching always restores eligibility.

use crate::config::GestureConfig;
use crate::types::GestureKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Verdict for a recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Perform the side effect
    Fire,
    /// Recognized but held back by the cooldown
    Suppress,
}

/// State carried across frames. `last_fired_at == None` stands for "never".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CooldownState {
    pub last_gesture: GestureKind,
    pub last_fired_at: Option<DateTime<Utc>>,
}

impl CooldownState {
    /// Startup state: nothing has fired
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `kind` may fire at `now`.
    ///
    /// Ungated gestures always fire and never consult the slot.
    pub fn gate(&self, kind: GestureKind, now: DateTime<Utc>, config: &GestureConfig) -> Gate {
        let Some(window) = config.cooldown_for(kind) else {
            return Gate::Fire;
        };

        if self.last_gesture != kind {
            return Gate::Fire;
        }

        match self.last_fired_at {
            None => Gate::Fire,
            Some(last) if now.signed_duration_since(last) > seconds(window) => Gate::Fire,
            Some(_) => Gate::Suppress,
        }
    }

    /// Check and, when the gesture fires, record it. Both steps use the same
    /// `now`, read once per frame. Ungated gestures leave the state untouched.
    pub fn check_and_fire(
        self,
        kind: GestureKind,
        now: DateTime<Utc>,
        config: &GestureConfig,
    ) -> (Gate, CooldownState) {
        let gate = self.gate(kind, now, config);
        let next = match gate {
            Gate::Fire if kind.is_cooldown_gated() => CooldownState {
                last_gesture: kind,
                last_fired_at: Some(now),
            },
            _ => self,
        };
        (gate, next)
    }

    /// Load state from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize state to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Whole microseconds, so window comparisons do not drift with float error
fn seconds(secs: f64) -> Duration {
    Duration::microseconds((secs * 1_000_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_first_gated_gesture_fires() {
        let config = GestureConfig::default();
        let (gate, state) =
            CooldownState::new().check_and_fire(GestureKind::Screenshot, at(0), &config);

        assert_eq!(gate, Gate::Fire);
        assert_eq!(state.last_gesture, GestureKind::Screenshot);
        assert_eq!(state.last_fired_at, Some(at(0)));
    }

    #[test]
    fn test_repeat_within_window_is_suppressed() {
        let config = GestureConfig::default();
        let (_, state) =
            CooldownState::new().check_and_fire(GestureKind::DoubleClick, at(0), &config);

        let (gate, after) = state.check_and_fire(GestureKind::DoubleClick, at(300), &config);
        assert_eq!(gate, Gate::Suppress);
        assert_eq!(after, state);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let config = GestureConfig::default();
        let (_, state) =
            CooldownState::new().check_and_fire(GestureKind::DoubleClick, at(0), &config);

        assert_eq!(
            state.gate(GestureKind::DoubleClick, at(500), &config),
            Gate::Suppress
        );
        assert_eq!(
            state.gate(GestureKind::DoubleClick, at(501), &config),
            Gate::Fire
        );
    }

    #[test]
    fn test_switching_gesture_resets_eligibility() {
        let config = GestureConfig::default();
        let state = CooldownState::new();

        let (gate, state) = state.check_and_fire(GestureKind::DoubleClick, at(0), &config);
        assert_eq!(gate, Gate::Fire);
        let (gate, state) = state.check_and_fire(GestureKind::Screenshot, at(300), &config);
        assert_eq!(gate, Gate::Fire);
        let (gate, state) = state.check_and_fire(GestureKind::DoubleClick, at(400), &config);
        assert_eq!(gate, Gate::Fire);
        assert_eq!(state.last_gesture, GestureKind::DoubleClick);
        assert_eq!(state.last_fired_at, Some(at(400)));
    }

    #[test]
    fn test_ungated_gestures_do_not_touch_state() {
        let config = GestureConfig::default();
        let (_, state) =
            CooldownState::new().check_and_fire(GestureKind::Screenshot, at(0), &config);

        for kind in [
            GestureKind::None,
            GestureKind::Move,
            GestureKind::LeftClick,
            GestureKind::RightClick,
        ] {
            let (gate, after) = state.check_and_fire(kind, at(100), &config);
            assert_eq!(gate, Gate::Fire);
            assert_eq!(after, state);
        }

        // A click in between does not reset the screenshot window
        let (gate, _) = state.check_and_fire(GestureKind::Screenshot, at(200), &config);
        assert_eq!(gate, Gate::Suppress);
    }

    #[test]
    fn test_zero_cooldown_fires_on_later_frames() {
        let mut config = GestureConfig::default();
        config.cooldowns.screenshot_secs = 0.0;
        let (_, state) =
            CooldownState::new().check_and_fire(GestureKind::Screenshot, at(0), &config);
        assert_eq!(state.gate(GestureKind::Screenshot, at(0), &config), Gate::Suppress);
        assert_eq!(state.gate(GestureKind::Screenshot, at(1), &config), Gate::Fire);
    }

    #[test]
    fn test_state_serialization() {
        let config = GestureConfig::default();
        let (_, state) =
            CooldownState::new().check_and_fire(GestureKind::DoubleClick, at(250), &config);
        let loaded = CooldownState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(loaded, state);
    }
}

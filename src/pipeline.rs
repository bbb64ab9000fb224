//! Pipeline orchestration
//!
//! This module provides the public API for Gesture Flux. Each frame flows
//! through measurement → classification → cooldown gate → action mapping.
//! Cooldown state is threaded explicitly rather than held in globals.

use crate::actions::action_for;
use crate::actuator::Actuator;
use crate::classifier::Classifier;
use crate::config::GestureConfig;
use crate::cooldown::{CooldownState, Gate};
use crate::encoder::{DecisionEncoder, DecisionRecord};
use crate::error::GestureError;
use crate::frames::FrameEvent;
use crate::types::{Decision, GestureKind, LandmarkFrame};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Classify one frame and apply the cooldown gate.
///
/// Pure with respect to `state`: the updated state is returned alongside the
/// decision. `now` is read once by the caller and used for both the check and
/// the update.
///
/// # Example
/// ```
/// use gesture_flux::{classify_and_debounce, CooldownState, GestureConfig, GestureKind};
/// use gesture_flux::types::LandmarkFrame;
///
/// let config = GestureConfig::default();
/// let frame = LandmarkFrame::empty();
/// let now = chrono::Utc::now();
/// let (decision, state) = classify_and_debounce(&frame, CooldownState::new(), now, &config);
/// assert_eq!(decision.gesture, GestureKind::None);
/// assert_eq!(state, CooldownState::new());
/// ```
pub fn classify_and_debounce(
    frame: &LandmarkFrame,
    state: CooldownState,
    now: DateTime<Utc>,
    config: &GestureConfig,
) -> (Decision, CooldownState) {
    decide(&Classifier::new(config), frame, state, now, config)
}

fn decide(
    classifier: &Classifier,
    frame: &LandmarkFrame,
    state: CooldownState,
    now: DateTime<Utc>,
    config: &GestureConfig,
) -> (Decision, CooldownState) {
    let gesture = classifier.classify(frame);
    if gesture == GestureKind::None {
        return (Decision::none(), state);
    }

    let (gate, next) = state.check_and_fire(gesture, now, config);
    let decision = match gate {
        Gate::Fire => Decision {
            gesture,
            action: action_for(gesture, frame, now, &config.screen),
            suppressed: false,
        },
        Gate::Suppress => Decision {
            gesture,
            action: None,
            suppressed: true,
        },
    };

    if gesture.is_cooldown_gated() {
        debug!(
            gesture = gesture.as_str(),
            suppressed = decision.suppressed,
            "cooldown-gated gesture"
        );
    }

    (decision, next)
}

/// Stateful engine for frame-at-a-time processing.
///
/// Owns a validated configuration and the cooldown slot carried between frames.
pub struct GestureEngine {
    config: GestureConfig,
    classifier: Classifier,
    state: CooldownState,
    encoder: DecisionEncoder,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::from_valid(GestureConfig::default())
    }
}

impl GestureEngine {
    /// Create an engine, rejecting invalid configurations up front
    pub fn new(config: GestureConfig) -> Result<Self, GestureError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: GestureConfig) -> Self {
        Self {
            classifier: Classifier::new(&config),
            config,
            state: CooldownState::new(),
            encoder: DecisionEncoder::new(),
        }
    }

    /// Use a fixed instance id on emitted records
    pub fn with_instance_id(mut self, instance_id: String) -> Self {
        self.encoder = DecisionEncoder::with_instance_id(instance_id);
        self
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> CooldownState {
        self.state
    }

    /// Process one frame captured at `now`
    pub fn process(&mut self, frame: &LandmarkFrame, now: DateTime<Utc>) -> Decision {
        let (decision, next) = decide(&self.classifier, frame, self.state, now, &self.config);
        self.state = next;
        decision
    }

    /// Process one frame and hand any fired action to `actuator`
    pub fn process_with(
        &mut self,
        frame: &LandmarkFrame,
        now: DateTime<Utc>,
        actuator: &mut dyn Actuator,
    ) -> Result<Decision, GestureError> {
        let decision = self.process(frame, now);
        if let Some(action) = &decision.action {
            actuator.perform(action)?;
        }
        Ok(decision)
    }

    /// Process a timestamped frame event
    pub fn process_event(&mut self, event: &FrameEvent) -> Decision {
        self.process(&event.frame(), event.timestamp)
    }

    /// Process a frame event and encode the decision
    pub fn process_event_to_record(&mut self, event: &FrameEvent) -> DecisionRecord {
        let decision = self.process_event(event);
        self.encoder.encode(&decision, event.timestamp)
    }

    /// Process a frame event and encode the decision as JSON
    pub fn process_event_to_json(&mut self, event: &FrameEvent) -> Result<String, GestureError> {
        let decision = self.process_event(event);
        self.encoder.encode_to_json(&decision, event.timestamp)
    }

    /// Save cooldown state to JSON
    pub fn save_state(&self) -> Result<String, GestureError> {
        self.state
            .to_json()
            .map_err(|e| GestureError::EncodingError(e.to_string()))
    }

    /// Load cooldown state from JSON
    pub fn load_state(&mut self, json: &str) -> Result<(), GestureError> {
        self.state =
            CooldownState::from_json(json).map_err(|e| GestureError::ParseError(e.to_string()))?;
        Ok(())
    }

    /// Return to the startup state
    pub fn reset(&mut self) {
        self.state = CooldownState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::RecordingActuator;
    use crate::synthetic::HandPose;
    use crate::types::Action;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    fn pose(kind: GestureKind) -> LandmarkFrame {
        HandPose::for_gesture(kind).frame()
    }

    #[test]
    fn test_no_hand_yields_none_and_keeps_state() {
        let config = GestureConfig::default();
        let state = CooldownState {
            last_gesture: GestureKind::Screenshot,
            last_fired_at: Some(at(0)),
        };
        let (decision, next) =
            classify_and_debounce(&LandmarkFrame::empty(), state, at(10), &config);
        assert_eq!(decision, Decision::none());
        assert_eq!(next, state);
    }

    #[test]
    fn test_move_produces_cursor_action() {
        let mut engine = GestureEngine::default();
        let decision = engine.process(&pose(GestureKind::Move), at(0));

        assert_eq!(decision.gesture, GestureKind::Move);
        assert!(matches!(decision.action, Some(Action::MoveCursorTo { .. })));
        assert_eq!(engine.state(), CooldownState::new());
    }

    #[test]
    fn test_screenshot_suppressed_then_fires_again() {
        let mut engine = GestureEngine::default();
        let frame = pose(GestureKind::Screenshot);

        assert!(engine.process(&frame, at(0)).fired());
        let held = engine.process(&frame, at(1000));
        assert!(held.suppressed);
        assert_eq!(held.label().as_deref(), Some("Screenshot (Cooldown)"));
        assert!(engine.process(&frame, at(2100)).fired());
    }

    #[test]
    fn test_screenshot_action_names_file_from_timestamp() {
        let mut engine = GestureEngine::default();
        let decision = engine.process(&pose(GestureKind::Screenshot), at(0));
        assert_eq!(
            decision.action,
            Some(Action::TriggerScreenshot {
                file_name: "screenshot_20240115-140000.png".to_string()
            })
        );
    }

    #[test]
    fn test_clicks_are_not_gated() {
        let mut engine = GestureEngine::default();
        let mut actuator = RecordingActuator::new();
        let frame = pose(GestureKind::LeftClick);

        for i in 0..5 {
            engine.process_with(&frame, at(i * 10), &mut actuator).unwrap();
        }
        assert_eq!(actuator.count(|a| *a == Action::ClickLeft), 5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GestureConfig::default();
        config.cooldowns.screenshot_secs = -1.0;
        assert!(matches!(
            GestureEngine::new(config),
            Err(GestureError::Config(_))
        ));
    }

    #[test]
    fn test_state_persistence() {
        let mut engine = GestureEngine::default();
        let frame = pose(GestureKind::DoubleClick);
        engine.process(&frame, at(0));
        let saved = engine.save_state().unwrap();

        let mut restored = GestureEngine::default();
        restored.load_state(&saved).unwrap();
        assert!(restored.process(&frame, at(200)).suppressed);

        restored.reset();
        assert!(restored.process(&frame, at(300)).fired());
    }

    #[test]
    fn test_load_state_rejects_garbage() {
        let mut engine = GestureEngine::default();
        assert!(matches!(
            engine.load_state("{"),
            Err(GestureError::ParseError(_))
        ));
    }

    #[test]
    fn test_event_to_json() {
        let mut engine = GestureEngine::default().with_instance_id("engine-1".to_string());
        let event = FrameEvent::new(at(0), &pose(GestureKind::RightClick));
        let json = engine.process_event_to_json(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["gesture"], "right_click");
        assert_eq!(value["producer"]["instance_id"], "engine-1");
    }
}

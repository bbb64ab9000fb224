//! Decision encoding
//!
//! Encodes per-frame decisions into JSON records for downstream consumers
//! (overlays, actuator bridges, logs).

use crate::error::GestureError;
use crate::types::{Action, Decision, GestureKind};
use crate::{FLUX_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Producer metadata attached to every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One frame's decision, as emitted on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub producer: Producer,
    pub timestamp: String,
    pub gesture: GestureKind,
    pub fired: bool,
    pub suppressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Encoder stamping records with a stable instance id
#[derive(Debug, Clone)]
pub struct DecisionEncoder {
    instance_id: String,
}

impl Default for DecisionEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(&self, decision: &Decision, timestamp: DateTime<Utc>) -> DecisionRecord {
        DecisionRecord {
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: FLUX_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            timestamp: timestamp.to_rfc3339(),
            gesture: decision.gesture,
            fired: decision.fired(),
            suppressed: decision.suppressed,
            action: decision.action.clone(),
            label: decision.label(),
        }
    }

    /// Encode to a single-line JSON string
    pub fn encode_to_json(
        &self,
        decision: &Decision,
        timestamp: DateTime<Utc>,
    ) -> Result<String, GestureError> {
        let record = self.encode(decision, timestamp);
        serde_json::to_string(&record).map_err(|e| GestureError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_fired_decision() {
        let encoder = DecisionEncoder::with_instance_id("test-instance".to_string());
        let decision = Decision {
            gesture: GestureKind::RightClick,
            action: Some(Action::ClickRight),
            suppressed: false,
        };
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();

        let json = encoder.encode_to_json(&decision, ts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["producer"]["name"], PRODUCER_NAME);
        assert_eq!(value["producer"]["instance_id"], "test-instance");
        assert_eq!(value["gesture"], "right_click");
        assert_eq!(value["fired"], true);
        assert_eq!(value["action"]["type"], "click_right");
        assert_eq!(value["label"], "Right Click");
        assert_eq!(value["timestamp"], "2024-01-15T14:00:00+00:00");
    }

    #[test]
    fn test_encode_suppressed_decision_omits_action() {
        let encoder = DecisionEncoder::new();
        let decision = Decision {
            gesture: GestureKind::DoubleClick,
            action: None,
            suppressed: true,
        };
        let record = encoder.encode(&decision, Utc::now());
        assert!(!record.fired);
        assert!(record.suppressed);
        assert_eq!(record.label.as_deref(), Some("Double Click (Cooldown)"));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("action").is_none());
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(
            DecisionEncoder::new().instance_id(),
            DecisionEncoder::new().instance_id()
        );
    }
}

//! Frame input schema
//!
//! Landmark frames arrive as JSON records, one per captured video frame:
//!
//! ```json
//! { "timestamp": "2024-01-15T14:00:00.100Z", "landmarks": [{ "x": 0.5, "y": 0.6 }, ...] }
//! ```
//!
//! `landmarks` is `null` (or absent) when the detector found no hand.

use crate::error::GestureError;
use crate::types::{Landmark, LandmarkFrame, LANDMARK_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detector output with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl FrameEvent {
    pub fn new(timestamp: DateTime<Utc>, frame: &LandmarkFrame) -> Self {
        let landmarks = (!frame.is_empty()).then(|| frame.points().to_vec());
        Self {
            timestamp,
            landmarks,
        }
    }

    /// Frame with no hand detected
    pub fn no_hand(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            landmarks: None,
        }
    }

    pub fn frame(&self) -> LandmarkFrame {
        self.landmarks
            .as_ref()
            .map(|points| LandmarkFrame::new(points.clone()))
            .unwrap_or_default()
    }

    /// Check the frame against the detector contract.
    ///
    /// Validation is advisory: the engine still processes frames that fail it.
    pub fn validate(&self) -> Result<(), FrameValidationError> {
        let Some(points) = &self.landmarks else {
            return Ok(());
        };

        if !points.is_empty() && points.len() < LANDMARK_COUNT {
            return Err(FrameValidationError::IncompleteSkeleton {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        if let Some(index) = points.iter().position(|p| !p.is_normalized()) {
            return Err(FrameValidationError::OutOfRange {
                index,
                x: points[index].x,
                y: points[index].y,
            });
        }

        Ok(())
    }
}

/// Validation errors for frame events
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameValidationError {
    #[error("Incomplete skeleton: expected {expected} landmarks, got {actual}")]
    IncompleteSkeleton { expected: usize, actual: usize },

    #[error("Landmark {index} outside the unit square: ({x}, {y})")]
    OutOfRange { index: usize, x: f64, y: f64 },
}

/// Result of validating one frame in a batch
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub error: FrameValidationError,
}

/// Parse a JSON array of frame events
pub fn parse_array(json: &str) -> Result<Vec<FrameEvent>, GestureError> {
    let events: Vec<FrameEvent> = serde_json::from_str(json)?;
    Ok(events)
}

/// Parse NDJSON (one frame event per line), skipping blank lines
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameEvent>, GestureError> {
    let mut events = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = serde_json::from_str::<FrameEvent>(trimmed).map_err(|e| {
            GestureError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Validate a batch, returning only the frames that failed
pub fn validate_events(events: &[FrameEvent]) -> Vec<ValidationResult> {
    events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| {
            event.validate().err().map(|error| ValidationResult {
                index,
                timestamp: event.timestamp,
                error,
            })
        })
        .collect()
}

//! Tunable thresholds
//!
//! Every angle, distance, margin, scale and cooldown the classifier uses lives
//! here. Configurations are validated once when loaded; classification assumes
//! a valid configuration.

use crate::error::{ConfigError, GestureError};
use crate::types::GestureKind;
use serde::{Deserialize, Serialize};

/// Default reference grid that normalized coordinates are scaled onto
pub const DEFAULT_DISTANCE_SCALE: f64 = 1000.0;

/// Move: index extended, thumb tucked near the index knuckle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveThresholds {
    /// Thumb tip to index MCP must be closer than this (scaled units)
    pub thumb_index_mcp_max: f64,
    /// Index PIP angle must exceed this (degrees)
    pub index_extended_min: f64,
}

impl Default for MoveThresholds {
    fn default() -> Self {
        Self {
            thumb_index_mcp_max: 50.0,
            index_extended_min: 90.0,
        }
    }
}

/// Left click: index bent, middle straight, thumb away from index tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeftClickThresholds {
    pub index_bent_max: f64,
    pub middle_extended_min: f64,
    pub thumb_index_min: f64,
}

impl Default for LeftClickThresholds {
    fn default() -> Self {
        Self {
            index_bent_max: 50.0,
            middle_extended_min: 90.0,
            thumb_index_min: 50.0,
        }
    }
}

/// Right click: middle bent, index straight, thumb away from index tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RightClickThresholds {
    pub middle_bent_max: f64,
    pub index_extended_min: f64,
    pub thumb_index_min: f64,
}

impl Default for RightClickThresholds {
    fn default() -> Self {
        Self {
            middle_bent_max: 50.0,
            index_extended_min: 90.0,
            thumb_index_min: 50.0,
        }
    }
}

/// Double click: index and middle bent, ring straight, thumb away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleClickThresholds {
    /// Both index and middle must be below this (degrees)
    pub bent_max: f64,
    pub ring_extended_min: f64,
    pub thumb_index_min: f64,
}

impl Default for DoubleClickThresholds {
    fn default() -> Self {
        Self {
            bent_max: 70.0,
            ring_extended_min: 100.0,
            thumb_index_min: 50.0,
        }
    }
}

/// Screenshot: index, middle and ring bent, pinky extended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotThresholds {
    /// A finger below this angle counts as bent (degrees)
    pub bent_max: f64,
    pub pinky_extended_min: f64,
    /// Relative detection: pinky must exceed each other finger by more than this
    pub relative_margin: f64,
}

impl Default for ScreenshotThresholds {
    fn default() -> Self {
        Self {
            bent_max: 90.0,
            pinky_extended_min: 90.0,
            relative_margin: 20.0,
        }
    }
}

/// Minimum seconds between repeated firings of a cooldown-gated gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cooldowns {
    pub double_click_secs: f64,
    pub screenshot_secs: f64,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            double_click_secs: 0.5,
            screenshot_secs: 2.0,
        }
    }
}

/// Target screen used to map the index tip onto cursor pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    /// Map the tip's y through `y / 2`, which restricts the cursor to the top
    /// half of the screen
    pub halve_cursor_y: bool,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            halve_cursor_y: true,
        }
    }
}

/// Complete classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub move_gesture: MoveThresholds,
    pub left_click: LeftClickThresholds,
    pub right_click: RightClickThresholds,
    pub double_click: DoubleClickThresholds,
    pub screenshot: ScreenshotThresholds,
    /// Scale applied to normalized coordinates before measuring distances
    pub distance_scale: f64,
    pub cooldowns: Cooldowns,
    pub screen: ScreenGeometry,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_gesture: MoveThresholds::default(),
            left_click: LeftClickThresholds::default(),
            right_click: RightClickThresholds::default(),
            double_click: DoubleClickThresholds::default(),
            screenshot: ScreenshotThresholds::default(),
            distance_scale: DEFAULT_DISTANCE_SCALE,
            cooldowns: Cooldowns::default(),
            screen: ScreenGeometry::default(),
        }
    }
}

impl GestureConfig {
    /// Load a configuration from JSON. Missing fields take their defaults; the
    /// result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, GestureError> {
        let config: GestureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, GestureError> {
        serde_json::to_string_pretty(self).map_err(GestureError::JsonError)
    }

    /// Cooldown window for a gated gesture, `None` for ungated ones
    pub fn cooldown_for(&self, kind: GestureKind) -> Option<f64> {
        match kind {
            GestureKind::DoubleClick => Some(self.cooldowns.double_click_secs),
            GestureKind::Screenshot => Some(self.cooldowns.screenshot_secs),
            _ => None,
        }
    }

    /// Check every tunable against its domain
    pub fn validate(&self) -> Result<(), ConfigError> {
        let angles = [
            ("move_gesture.index_extended_min", self.move_gesture.index_extended_min),
            ("left_click.index_bent_max", self.left_click.index_bent_max),
            ("left_click.middle_extended_min", self.left_click.middle_extended_min),
            ("right_click.middle_bent_max", self.right_click.middle_bent_max),
            ("right_click.index_extended_min", self.right_click.index_extended_min),
            ("double_click.bent_max", self.double_click.bent_max),
            ("double_click.ring_extended_min", self.double_click.ring_extended_min),
            ("screenshot.bent_max", self.screenshot.bent_max),
            ("screenshot.pinky_extended_min", self.screenshot.pinky_extended_min),
        ];
        for (field, value) in angles {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { field, value });
            }
        }

        let margin = self.screenshot.relative_margin;
        if !(0.0..=180.0).contains(&margin) {
            return Err(ConfigError::InvalidMargin {
                field: "screenshot.relative_margin",
                value: margin,
            });
        }

        let distances = [
            ("move_gesture.thumb_index_mcp_max", self.move_gesture.thumb_index_mcp_max),
            ("left_click.thumb_index_min", self.left_click.thumb_index_min),
            ("right_click.thumb_index_min", self.right_click.thumb_index_min),
            ("double_click.thumb_index_min", self.double_click.thumb_index_min),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }

        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.distance_scale));
        }

        let cooldowns = [
            ("cooldowns.double_click_secs", self.cooldowns.double_click_secs),
            ("cooldowns.screenshot_secs", self.cooldowns.screenshot_secs),
        ];
        for (field, value) in cooldowns {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCooldown { field, value });
            }
        }

        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::InvalidScreen {
                width: self.screen.width,
                height: self.screen.height,
            });
        }

        Ok(())
    }
}

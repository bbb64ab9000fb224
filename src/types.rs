//! Core types for the Gesture Flux pipeline
//!
//! This module defines the data that flows through each stage: landmark
//! frames in, gesture labels and actuator requests out.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete hand skeleton
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// A normalized 2D keypoint, both coordinates nominally in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite and inside the unit square
    pub fn is_normalized(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (0.0..=1.0).contains(&self.x)
            && (0.0..=1.0).contains(&self.y)
    }
}

impl From<(f64, f64)> for Landmark {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One frame of detector output: the ordered skeleton, or empty when no hand
/// was detected
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Frame for "no hand present"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Classification only proceeds on frames carrying the full skeleton
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    /// Landmark at `index`, if the detector produced it
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }
}

impl From<Vec<Landmark>> for LandmarkFrame {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// The four non-thumb fingers, each measured by the angle at its PIP joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// (MCP, PIP, tip) landmark indices; the joint angle is taken at the PIP
    pub fn joints(&self) -> (usize, usize, usize) {
        match self {
            Finger::Index => (INDEX_MCP, INDEX_PIP, INDEX_TIP),
            Finger::Middle => (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP),
            Finger::Ring => (RING_MCP, RING_PIP, RING_TIP),
            Finger::Pinky => (PINKY_MCP, PINKY_PIP, PINKY_TIP),
        }
    }

    pub fn tip(&self) -> usize {
        self.joints().2
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

/// Gesture label emitted for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    #[default]
    None,
    Move,
    LeftClick,
    RightClick,
    DoubleClick,
    Screenshot,
}

impl GestureKind {
    pub const ALL: [GestureKind; 6] = [
        GestureKind::None,
        GestureKind::Move,
        GestureKind::LeftClick,
        GestureKind::RightClick,
        GestureKind::DoubleClick,
        GestureKind::Screenshot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::None => "none",
            GestureKind::Move => "move",
            GestureKind::LeftClick => "left_click",
            GestureKind::RightClick => "right_click",
            GestureKind::DoubleClick => "double_click",
            GestureKind::Screenshot => "screenshot",
        }
    }

    /// Parse the snake_case name used on the command line and in JSON
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Human-readable title used for overlay feedback
    pub fn title(&self) -> &'static str {
        match self {
            GestureKind::None => "",
            GestureKind::Move => "Move",
            GestureKind::LeftClick => "Left Click",
            GestureKind::RightClick => "Right Click",
            GestureKind::DoubleClick => "Double Click",
            GestureKind::Screenshot => "Screenshot",
        }
    }

    /// How to perform the gesture
    pub fn description(&self) -> &'static str {
        match self {
            GestureKind::None => "No hand, or no recognized pose",
            GestureKind::Move => "Index finger straight, thumb tucked against the palm",
            GestureKind::LeftClick => "Bend index finger, keep middle finger straight",
            GestureKind::RightClick => "Bend middle finger, keep index finger straight",
            GestureKind::DoubleClick => {
                "Bend both index and middle fingers, keep ring finger straight"
            }
            GestureKind::Screenshot => "Bend index, middle, and ring fingers, extend pinky finger",
        }
    }

    /// Gestures whose side effects are rate-limited by the cooldown slot
    pub fn is_cooldown_gated(&self) -> bool {
        matches!(self, GestureKind::DoubleClick | GestureKind::Screenshot)
    }
}

/// Request handed to the actuation collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Move the cursor to absolute screen pixels
    MoveCursorTo { x: i32, y: i32 },
    ClickLeft,
    ClickRight,
    DoubleClick,
    /// Capture the screen into `file_name`
    TriggerScreenshot { file_name: String },
}

/// Outcome of processing one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// Gesture chosen by the classifier
    pub gesture: GestureKind,
    /// Side effect to perform, if the gesture fired
    pub action: Option<Action>,
    /// True when a cooldown-gated gesture was recognized but held back
    pub suppressed: bool,
}

impl Decision {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fired(&self) -> bool {
        self.action.is_some()
    }

    /// On-screen feedback text; `None` when there is nothing to show
    pub fn label(&self) -> Option<String> {
        match self.gesture {
            GestureKind::None => None,
            kind if self.suppressed => Some(format!("{} (Cooldown)", kind.title())),
            kind => Some(kind.title().to_string()),
        }
    }

    /// Fingertips the overlay highlights for this gesture
    pub fn highlight_tips(&self) -> &'static [usize] {
        match self.gesture {
            GestureKind::DoubleClick => &[INDEX_TIP, MIDDLE_TIP],
            GestureKind::Screenshot => &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frame_completeness() {
        assert!(!LandmarkFrame::empty().is_complete());
        let short = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5); 20]);
        assert!(!short.is_complete());
        let full = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT]);
        assert!(full.is_complete());
    }

    #[test]
    fn test_finger_joints() {
        assert_eq!(Finger::Index.joints(), (5, 6, 8));
        assert_eq!(Finger::Middle.joints(), (9, 10, 12));
        assert_eq!(Finger::Ring.joints(), (13, 14, 16));
        assert_eq!(Finger::Pinky.joints(), (17, 18, 20));
    }

    #[test]
    fn test_gesture_names_round_trip_through_from_name() {
        for kind in GestureKind::ALL {
            assert_eq!(GestureKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(GestureKind::from_name("wave"), None);
    }

    #[test]
    fn test_decision_labels() {
        let fired = Decision {
            gesture: GestureKind::LeftClick,
            action: Some(Action::ClickLeft),
            suppressed: false,
        };
        assert_eq!(fired.label().as_deref(), Some("Left Click"));

        let held = Decision {
            gesture: GestureKind::Screenshot,
            action: None,
            suppressed: true,
        };
        assert_eq!(held.label().as_deref(), Some("Screenshot (Cooldown)"));
        assert_eq!(held.highlight_tips(), &[8, 12, 16, 20]);

        assert_eq!(Decision::none().label(), None);
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_value(Action::MoveCursorTo { x: 10, y: 20 }).unwrap();
        assert_eq!(json["type"], "move_cursor_to");
        assert_eq!(json["x"], 10);

        let json = serde_json::to_value(Action::ClickRight).unwrap();
        assert_eq!(json["type"], "click_right");
    }
}

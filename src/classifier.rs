//! Gesture classification
//!
//! Resolves the (possibly several) matching predicates of a frame into a
//! single gesture label using a fixed priority order.

use crate::config::GestureConfig;
use crate::predicates::rule_for;
use crate::rules::{FrameMeasures, Rule};
use crate::types::{GestureKind, LandmarkFrame};
use tracing::trace;

/// Evaluation order; the first matching gesture wins
pub const PRIORITY: [GestureKind; 5] = [
    GestureKind::Move,
    GestureKind::LeftClick,
    GestureKind::RightClick,
    GestureKind::DoubleClick,
    GestureKind::Screenshot,
];

/// Rules compiled from a configuration, held in priority order
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(GestureKind, Rule)>,
    distance_scale: f64,
}

impl Classifier {
    pub fn new(config: &GestureConfig) -> Self {
        let rules = PRIORITY
            .iter()
            .filter_map(|kind| rule_for(*kind, config).map(|rule| (*kind, rule)))
            .collect();

        Self {
            rules,
            distance_scale: config.distance_scale,
        }
    }

    /// Measure a frame; `None` when no full skeleton is present
    pub fn measure(&self, frame: &LandmarkFrame) -> Option<FrameMeasures> {
        FrameMeasures::measure(frame, self.distance_scale)
    }

    /// Label for the frame: the highest-priority matching gesture, or `None`
    pub fn classify(&self, frame: &LandmarkFrame) -> GestureKind {
        match self.measure(frame) {
            Some(m) => self.classify_measures(&m),
            None => GestureKind::None,
        }
    }

    pub fn classify_measures(&self, m: &FrameMeasures) -> GestureKind {
        trace!(
            index = m.index,
            middle = m.middle,
            ring = m.ring,
            pinky = m.pinky,
            thumb_index_tip = m.thumb_index_tip,
            thumb_index_mcp = m.thumb_index_mcp,
            "frame measures"
        );

        self.rules
            .iter()
            .find(|(_, rule)| rule.matches(m))
            .map(|(kind, _)| *kind)
            .unwrap_or(GestureKind::None)
    }

    /// Every gesture whose rule matches the frame, in priority order
    pub fn matching(&self, frame: &LandmarkFrame) -> Vec<GestureKind> {
        let Some(m) = self.measure(frame) else {
            return Vec::new();
        };
        self.rules
            .iter()
            .filter(|(_, rule)| rule.matches(&m))
            .map(|(kind, _)| *kind)
            .collect()
    }
}

/// One-shot classification with a given configuration
pub fn classify(frame: &LandmarkFrame, config: &GestureConfig) -> GestureKind {
    Classifier::new(config).classify(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{HandPose, Thumb};
    use crate::types::Landmark;
    use pretty_assertions::assert_eq;

    fn classify_pose(pose: HandPose) -> GestureKind {
        classify(&pose.frame(), &GestureConfig::default())
    }

    #[test]
    fn test_single_match_is_emitted() {
        for kind in GestureKind::ALL {
            assert_eq!(classify_pose(HandPose::for_gesture(kind)), kind);
        }
    }

    #[test]
    fn test_move_beats_right_click() {
        let pose = HandPose::new()
            .fingers(170.0, 30.0, 170.0, 170.0)
            .thumb(Thumb::Tucked);
        let classifier = Classifier::new(&GestureConfig::default());
        assert_eq!(
            classifier.matching(&pose.frame()),
            vec![GestureKind::Move, GestureKind::RightClick]
        );
        assert_eq!(classifier.classify(&pose.frame()), GestureKind::Move);
    }

    #[test]
    fn test_left_click_beats_screenshot() {
        let pose = HandPose::new().fingers(30.0, 100.0, 60.0, 150.0);
        let classifier = Classifier::new(&GestureConfig::default());
        assert_eq!(
            classifier.matching(&pose.frame()),
            vec![GestureKind::LeftClick, GestureKind::Screenshot]
        );
        assert_eq!(classifier.classify(&pose.frame()), GestureKind::LeftClick);
    }

    #[test]
    fn test_right_click_beats_screenshot() {
        let pose = HandPose::new().fingers(100.0, 30.0, 60.0, 150.0);
        assert_eq!(classify_pose(pose), GestureKind::RightClick);
    }

    #[test]
    fn test_double_click_beats_screenshot() {
        let pose = HandPose::new().fingers(40.0, 40.0, 110.0, 150.0);
        let classifier = Classifier::new(&GestureConfig::default());
        assert_eq!(
            classifier.matching(&pose.frame()),
            vec![GestureKind::DoubleClick, GestureKind::Screenshot]
        );
        assert_eq!(classifier.classify(&pose.frame()), GestureKind::DoubleClick);
    }

    #[test]
    fn test_no_hand_is_none() {
        assert_eq!(
            classify(&LandmarkFrame::empty(), &GestureConfig::default()),
            GestureKind::None
        );
    }

    #[test]
    fn test_degenerate_frame_is_none() {
        let frame = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5); 21]);
        assert_eq!(classify(&frame, &GestureConfig::default()), GestureKind::None);
    }
}

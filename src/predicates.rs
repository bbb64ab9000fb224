//! Gesture predicates
//!
//! One rule per gesture kind, built from the configured thresholds, plus a
//! pure predicate function for each. Predicates are not mutually exclusive;
//! the classifier decides between them.

use crate::config::GestureConfig;
use crate::rules::{Clause, Comparator, FrameMeasures, Rule, Span};
use crate::types::{Finger, GestureKind, LandmarkFrame};

use Comparator::{Above, Below};

/// Index extended and thumb tucked near the index knuckle
pub fn move_rule(config: &GestureConfig) -> Rule {
    let t = &config.move_gesture;
    Rule::all(vec![
        Clause::span(Span::ThumbIndexMcp, Below, t.thumb_index_mcp_max),
        Clause::angle(Finger::Index, Above, t.index_extended_min),
    ])
}

/// Index bent, middle straight, thumb away from the index tip
pub fn left_click_rule(config: &GestureConfig) -> Rule {
    let t = &config.left_click;
    Rule::all(vec![
        Clause::angle(Finger::Index, Below, t.index_bent_max),
        Clause::angle(Finger::Middle, Above, t.middle_extended_min),
        Clause::span(Span::ThumbIndexTip, Above, t.thumb_index_min),
    ])
}

/// Middle bent, index straight, thumb away from the index tip
pub fn right_click_rule(config: &GestureConfig) -> Rule {
    let t = &config.right_click;
    Rule::all(vec![
        Clause::angle(Finger::Middle, Below, t.middle_bent_max),
        Clause::angle(Finger::Index, Above, t.index_extended_min),
        Clause::span(Span::ThumbIndexTip, Above, t.thumb_index_min),
    ])
}

/// Index and middle bent, ring straight, thumb away
pub fn double_click_rule(config: &GestureConfig) -> Rule {
    let t = &config.double_click;
    Rule::all(vec![
        Clause::angle(Finger::Index, Below, t.bent_max),
        Clause::angle(Finger::Middle, Below, t.bent_max),
        Clause::angle(Finger::Ring, Above, t.ring_extended_min),
        Clause::span(Span::ThumbIndexTip, Above, t.thumb_index_min),
    ])
}

/// Three bent fingers with an extended pinky.
///
/// Two alternatives: absolute thresholds on every finger, or a relative test
/// where the pinky is straighter than each other finger by a margin and at
/// least one of them is bent. The relative form tolerates hands whose
/// absolute angles drift with proportions and camera distance.
pub fn screenshot_rule(config: &GestureConfig) -> Rule {
    let t = &config.screenshot;
    let others = vec![Finger::Index, Finger::Middle, Finger::Ring];

    let absolute = vec![
        Clause::angle(Finger::Index, Below, t.bent_max),
        Clause::angle(Finger::Middle, Below, t.bent_max),
        Clause::angle(Finger::Ring, Below, t.bent_max),
        Clause::angle(Finger::Pinky, Above, t.pinky_extended_min),
    ];
    let relative = vec![
        Clause::Exceeds {
            finger: Finger::Pinky,
            others: others.clone(),
            margin: t.relative_margin,
        },
        Clause::AnyBelow {
            fingers: others,
            degrees: t.bent_max,
        },
    ];

    Rule::any_of(vec![absolute, relative])
}

/// Rule for a gesture kind; `None` has no rule
pub fn rule_for(kind: GestureKind, config: &GestureConfig) -> Option<Rule> {
    match kind {
        GestureKind::None => None,
        GestureKind::Move => Some(move_rule(config)),
        GestureKind::LeftClick => Some(left_click_rule(config)),
        GestureKind::RightClick => Some(right_click_rule(config)),
        GestureKind::DoubleClick => Some(double_click_rule(config)),
        GestureKind::Screenshot => Some(screenshot_rule(config)),
    }
}

fn check(
    frame: &LandmarkFrame,
    thumb_index_distance: f64,
    config: &GestureConfig,
    rule: Rule,
) -> bool {
    FrameMeasures::from_frame(frame, thumb_index_distance, config.distance_scale)
        .is_some_and(|m| rule.matches(&m))
}

pub fn is_move(frame: &LandmarkFrame, thumb_index_distance: f64, config: &GestureConfig) -> bool {
    check(frame, thumb_index_distance, config, move_rule(config))
}

pub fn is_left_click(
    frame: &LandmarkFrame,
    thumb_index_distance: f64,
    config: &GestureConfig,
) -> bool {
    check(frame, thumb_index_distance, config, left_click_rule(config))
}

pub fn is_right_click(
    frame: &LandmarkFrame,
    thumb_index_distance: f64,
    config: &GestureConfig,
) -> bool {
    check(frame, thumb_index_distance, config, right_click_rule(config))
}

pub fn is_double_click(
    frame: &LandmarkFrame,
    thumb_index_distance: f64,
    config: &GestureConfig,
) -> bool {
    check(frame, thumb_index_distance, config, double_click_rule(config))
}

/// The thumb-index distance does not take part in this gesture
pub fn is_screenshot(
    frame: &LandmarkFrame,
    thumb_index_distance: f64,
    config: &GestureConfig,
) -> bool {
    check(frame, thumb_index_distance, config, screenshot_rule(config))
}

//! Structured gesture rules
//!
//! A gesture is described as a small list of clauses over per-frame
//! measurements (finger angles and thumb spans) instead of hand-written
//! boolean expressions. A `Rule` holds one or more alternative clause lists;
//! it matches when every clause of any alternative holds.

use crate::geometry::{angle, distance};
use crate::types::{Finger, LandmarkFrame, INDEX_MCP, INDEX_TIP, THUMB_TIP};
use serde::Serialize;

/// Strict comparison against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Below,
    Above,
}

impl Comparator {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Below => value < threshold,
            Comparator::Above => value > threshold,
        }
    }
}

/// Distances between the thumb tip and a point on the index finger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// Thumb tip to index tip, the "pinch" signal
    ThumbIndexTip,
    /// Thumb tip to index knuckle (MCP)
    ThumbIndexMcp,
}

/// Quantities measured once per frame that every clause reads from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameMeasures {
    pub index: f64,
    pub middle: f64,
    pub ring: f64,
    pub pinky: f64,
    pub thumb_index_tip: f64,
    pub thumb_index_mcp: f64,
}

impl FrameMeasures {
    /// Measure a frame. Returns `None` for frames without the full skeleton.
    ///
    /// `thumb_index_distance` is the precomputed thumb-tip to index-tip span.
    pub fn from_frame(
        frame: &LandmarkFrame,
        thumb_index_distance: f64,
        scale: f64,
    ) -> Option<Self> {
        if !frame.is_complete() {
            return None;
        }

        let finger_angle = |finger: Finger| -> Option<f64> {
            let (mcp, pip, tip) = finger.joints();
            Some(angle(frame.get(mcp)?, frame.get(pip)?, frame.get(tip)?))
        };

        Some(Self {
            index: finger_angle(Finger::Index)?,
            middle: finger_angle(Finger::Middle)?,
            ring: finger_angle(Finger::Ring)?,
            pinky: finger_angle(Finger::Pinky)?,
            thumb_index_tip: thumb_index_distance,
            thumb_index_mcp: distance([frame.get(THUMB_TIP)?, frame.get(INDEX_MCP)?], scale),
        })
    }

    /// Measure a frame, computing the thumb-index span as well
    pub fn measure(frame: &LandmarkFrame, scale: f64) -> Option<Self> {
        let span = thumb_index_distance(frame, scale)?;
        Self::from_frame(frame, span, scale)
    }

    pub fn angle(&self, finger: Finger) -> f64 {
        match finger {
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn span(&self, span: Span) -> f64 {
        match span {
            Span::ThumbIndexTip => self.thumb_index_tip,
            Span::ThumbIndexMcp => self.thumb_index_mcp,
        }
    }
}

/// Thumb-tip to index-tip distance on the scaled reference grid
pub fn thumb_index_distance(frame: &LandmarkFrame, scale: f64) -> Option<f64> {
    Some(distance([frame.get(THUMB_TIP)?, frame.get(INDEX_TIP)?], scale))
}

/// A single condition over frame measurements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "clause", rename_all = "snake_case")]
pub enum Clause {
    /// A finger's PIP angle compared against a threshold in degrees
    Angle {
        finger: Finger,
        cmp: Comparator,
        degrees: f64,
    },
    /// A thumb span compared against a threshold in scaled units
    Span { span: Span, cmp: Comparator, units: f64 },
    /// `finger` is straighter than each of `others` by more than `margin` degrees
    Exceeds {
        finger: Finger,
        others: Vec<Finger>,
        margin: f64,
    },
    /// At least one of `fingers` is bent below `degrees`
    AnyBelow { fingers: Vec<Finger>, degrees: f64 },
}

impl Clause {
    pub fn angle(finger: Finger, cmp: Comparator, degrees: f64) -> Self {
        Clause::Angle {
            finger,
            cmp,
            degrees,
        }
    }

    pub fn span(span: Span, cmp: Comparator, units: f64) -> Self {
        Clause::Span { span, cmp, units }
    }

    pub fn holds(&self, m: &FrameMeasures) -> bool {
        match self {
            Clause::Angle {
                finger,
                cmp,
                degrees,
            } => cmp.holds(m.angle(*finger), *degrees),
            Clause::Span { span, cmp, units } => cmp.holds(m.span(*span), *units),
            Clause::Exceeds {
                finger,
                others,
                margin,
            } => {
                let value = m.angle(*finger);
                others.iter().all(|other| value > m.angle(*other) + margin)
            }
            Clause::AnyBelow { fingers, degrees } => {
                fingers.iter().any(|finger| m.angle(*finger) < *degrees)
            }
        }
    }
}

/// Disjunction of clause conjunctions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    alternatives: Vec<Vec<Clause>>,
}

impl Rule {
    /// Rule that matches when every clause holds
    pub fn all(clauses: Vec<Clause>) -> Self {
        Self {
            alternatives: vec![clauses],
        }
    }

    /// Rule that matches when any of the clause lists fully holds
    pub fn any_of(alternatives: Vec<Vec<Clause>>) -> Self {
        Self { alternatives }
    }

    pub fn alternatives(&self) -> &[Vec<Clause>] {
        &self.alternatives
    }

    pub fn matches(&self, m: &FrameMeasures) -> bool {
        self.alternatives
            .iter()
            .any(|clauses| clauses.iter().all(|clause| clause.holds(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{HandPose, Thumb};
    use Comparator::{Above, Below};

    fn measures(index: f64, middle: f64, ring: f64, pinky: f64) -> FrameMeasures {
        FrameMeasures {
            index,
            middle,
            ring,
            pinky,
            thumb_index_tip: 120.0,
            thumb_index_mcp: 200.0,
        }
    }

    #[test]
    fn test_comparators_are_strict() {
        assert!(Below.holds(49.9, 50.0));
        assert!(!Below.holds(50.0, 50.0));
        assert!(Above.holds(90.1, 90.0));
        assert!(!Above.holds(90.0, 90.0));
    }

    #[test]
    fn test_all_clauses_must_hold() {
        let rule = Rule::all(vec![
            Clause::angle(Finger::Index, Below, 50.0),
            Clause::angle(Finger::Middle, Above, 90.0),
            Clause::span(Span::ThumbIndexTip, Above, 50.0),
        ]);

        assert!(rule.matches(&measures(30.0, 170.0, 170.0, 170.0)));
        assert!(!rule.matches(&measures(30.0, 80.0, 170.0, 170.0)));

        let mut pinched = measures(30.0, 170.0, 170.0, 170.0);
        pinched.thumb_index_tip = 10.0;
        assert!(!rule.matches(&pinched));
    }

    #[test]
    fn test_any_alternative_suffices() {
        let rule = Rule::any_of(vec![
            vec![Clause::angle(Finger::Ring, Above, 100.0)],
            vec![Clause::angle(Finger::Pinky, Above, 150.0)],
        ]);
        assert!(rule.matches(&measures(0.0, 0.0, 120.0, 0.0)));
        assert!(rule.matches(&measures(0.0, 0.0, 0.0, 160.0)));
        assert!(!rule.matches(&measures(0.0, 0.0, 90.0, 140.0)));
    }

    #[test]
    fn test_exceeds_and_any_below() {
        let exceeds = Clause::Exceeds {
            finger: Finger::Pinky,
            others: vec![Finger::Index, Finger::Middle, Finger::Ring],
            margin: 20.0,
        };
        assert!(exceeds.holds(&measures(100.0, 100.0, 80.0, 150.0)));
        assert!(!exceeds.holds(&measures(130.0, 100.0, 80.0, 150.0)));

        let any_bent = Clause::AnyBelow {
            fingers: vec![Finger::Index, Finger::Middle, Finger::Ring],
            degrees: 90.0,
        };
        assert!(any_bent.holds(&measures(100.0, 100.0, 80.0, 150.0)));
        assert!(!any_bent.holds(&measures(100.0, 100.0, 95.0, 150.0)));
    }

    #[test]
    fn test_measure_reads_pose_angles() {
        let frame = HandPose::new()
            .finger(Finger::Index, 40.0)
            .finger(Finger::Middle, 120.0)
            .finger(Finger::Ring, 160.0)
            .finger(Finger::Pinky, 75.0)
            .thumb(Thumb::Away)
            .frame();

        let m = FrameMeasures::measure(&frame, 1000.0).unwrap();
        assert!((m.index - 40.0).abs() < 1e-6);
        assert!((m.middle - 120.0).abs() < 1e-6);
        assert!((m.ring - 160.0).abs() < 1e-6);
        assert!((m.pinky - 75.0).abs() < 1e-6);
        assert!(m.thumb_index_tip > 50.0);
        assert!(m.thumb_index_mcp > 50.0);
    }

    #[test]
    fn test_measure_skips_incomplete_frames() {
        assert!(FrameMeasures::measure(&LandmarkFrame::empty(), 1000.0).is_none());
        let mut points = HandPose::new().frame().points().to_vec();
        points.truncate(20);
        assert!(FrameMeasures::measure(&LandmarkFrame::new(points), 1000.0).is_none());
    }
}

//! Synthetic hand poses
//!
//! Builds 21-point frames from per-finger joint angles so that gestures can be
//! exercised without a camera or landmark detector.

use crate::types::{Finger, GestureKind, Landmark, LandmarkFrame, INDEX_MCP, LANDMARK_COUNT};

/// Length of each finger segment (MCP→PIP and PIP→tip), normalized units
const SEGMENT: f64 = 0.07;

const WRIST_POS: Landmark = Landmark::new(0.50, 0.85);
const THUMB_CMC_POS: Landmark = Landmark::new(0.40, 0.80);

/// Thumb tip placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Thumb {
    /// Tucked against the index knuckle
    Tucked,
    /// Spread away from the index finger
    Away,
    /// Explicit tip position
    At(Landmark),
}

/// Builder for a synthetic right-hand pose, palm facing the camera
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    index: f64,
    middle: f64,
    ring: f64,
    pinky: f64,
    thumb: Thumb,
}

impl Default for HandPose {
    fn default() -> Self {
        Self::new()
    }
}

impl HandPose {
    /// Open hand: every finger straight, thumb spread
    pub fn new() -> Self {
        Self {
            index: 180.0,
            middle: 180.0,
            ring: 180.0,
            pinky: 180.0,
            thumb: Thumb::Away,
        }
    }

    /// A representative pose for each gesture under the default thresholds
    pub fn for_gesture(kind: GestureKind) -> Self {
        let pose = Self::new();
        match kind {
            GestureKind::None => pose,
            GestureKind::Move => pose
                .fingers(170.0, 170.0, 170.0, 170.0)
                .thumb(Thumb::Tucked),
            GestureKind::LeftClick => pose.fingers(30.0, 170.0, 170.0, 170.0),
            GestureKind::RightClick => pose.fingers(170.0, 30.0, 170.0, 170.0),
            GestureKind::DoubleClick => pose.fingers(40.0, 40.0, 170.0, 170.0),
            GestureKind::Screenshot => pose.fingers(40.0, 40.0, 40.0, 170.0),
        }
    }

    /// Set the PIP angle of one finger, in degrees (180 = straight)
    pub fn finger(mut self, finger: Finger, degrees: f64) -> Self {
        match finger {
            Finger::Index => self.index = degrees,
            Finger::Middle => self.middle = degrees,
            Finger::Ring => self.ring = degrees,
            Finger::Pinky => self.pinky = degrees,
        }
        self
    }

    /// Set all four PIP angles at once
    pub fn fingers(self, index: f64, middle: f64, ring: f64, pinky: f64) -> Self {
        self.finger(Finger::Index, index)
            .finger(Finger::Middle, middle)
            .finger(Finger::Ring, ring)
            .finger(Finger::Pinky, pinky)
    }

    pub fn thumb(mut self, thumb: Thumb) -> Self {
        self.thumb = thumb;
        self
    }

    /// Lay out the 21 landmarks
    pub fn frame(&self) -> LandmarkFrame {
        let mut points = vec![Landmark::default(); LANDMARK_COUNT];
        points[0] = WRIST_POS;

        for finger in Finger::ALL {
            let (mcp, pip, tip) = finger.joints();
            let base = knuckle(finger);
            let joint = Landmark::new(base.x, base.y - SEGMENT);
            let bend = self.angle_of(finger).to_radians();
            let end = Landmark::new(
                joint.x + SEGMENT * bend.sin(),
                joint.y + SEGMENT * bend.cos(),
            );

            points[mcp] = base;
            points[pip] = joint;
            points[pip + 1] = lerp(joint, end, 0.5);
            points[tip] = end;
        }

        let thumb_tip = match self.thumb {
            Thumb::Tucked => {
                let knuckle = points[INDEX_MCP];
                Landmark::new(knuckle.x - 0.02, knuckle.y + 0.01)
            }
            Thumb::Away => Landmark::new(0.24, 0.56),
            Thumb::At(tip) => tip,
        };
        points[1] = THUMB_CMC_POS;
        points[2] = lerp(THUMB_CMC_POS, thumb_tip, 0.4);
        points[3] = lerp(THUMB_CMC_POS, thumb_tip, 0.7);
        points[4] = thumb_tip;

        LandmarkFrame::new(points)
    }

    fn angle_of(&self, finger: Finger) -> f64 {
        match finger {
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }
}

fn knuckle(finger: Finger) -> Landmark {
    match finger {
        Finger::Index => Landmark::new(0.44, 0.62),
        Finger::Middle => Landmark::new(0.50, 0.60),
        Finger::Ring => Landmark::new(0.56, 0.61),
        Finger::Pinky => Landmark::new(0.61, 0.64),
    }
}

fn lerp(a: Landmark, b: Landmark, t: f64) -> Landmark {
    Landmark::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angle;

    #[test]
    fn test_frame_is_complete_and_normalized() {
        for kind in GestureKind::ALL {
            let frame = HandPose::for_gesture(kind).frame();
            assert_eq!(frame.len(), LANDMARK_COUNT);
            assert!(frame.points().iter().all(Landmark::is_normalized));
        }
    }

    #[test]
    fn test_finger_angles_are_reproduced() {
        let frame = HandPose::new().fingers(25.0, 65.0, 110.0, 175.0).frame();
        let expected = [25.0, 65.0, 110.0, 175.0];

        for (finger, want) in Finger::ALL.into_iter().zip(expected) {
            let (mcp, pip, tip) = finger.joints();
            let got = angle(
                frame.get(mcp).unwrap(),
                frame.get(pip).unwrap(),
                frame.get(tip).unwrap(),
            );
            assert!((got - want).abs() < 1e-6, "{finger:?}: {got} != {want}");
        }
    }
}

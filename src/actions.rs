//! Gesture to action mapping
//!
//! Turns a fired gesture into the request handed to the actuator: cursor
//! coordinates for Move, a file name for Screenshot, plain clicks otherwise.

use crate::config::ScreenGeometry;
use crate::types::{Action, GestureKind, LandmarkFrame, INDEX_TIP};
use chrono::{DateTime, Utc};

/// Screenshot file name pattern, formatted from the frame timestamp
pub const SCREENSHOT_FILE_FORMAT: &str = "screenshot_%Y%m%d-%H%M%S.png";

/// Action for a gesture that fired on `frame` at `now`
pub fn action_for(
    kind: GestureKind,
    frame: &LandmarkFrame,
    now: DateTime<Utc>,
    screen: &ScreenGeometry,
) -> Option<Action> {
    match kind {
        GestureKind::None => None,
        GestureKind::Move => {
            let (x, y) = cursor_position(frame, screen)?;
            Some(Action::MoveCursorTo { x, y })
        }
        GestureKind::LeftClick => Some(Action::ClickLeft),
        GestureKind::RightClick => Some(Action::ClickRight),
        GestureKind::DoubleClick => Some(Action::DoubleClick),
        GestureKind::Screenshot => Some(Action::TriggerScreenshot {
            file_name: screenshot_file_name(now),
        }),
    }
}

/// Map the index fingertip onto screen pixels.
///
/// With `halve_cursor_y` the tip's y is halved before scaling, so the cursor
/// only reaches the top half of the screen.
pub fn cursor_position(frame: &LandmarkFrame, screen: &ScreenGeometry) -> Option<(i32, i32)> {
    let tip = frame.get(INDEX_TIP)?;
    let y = if screen.halve_cursor_y { tip.y / 2.0 } else { tip.y };

    let x = (tip.x * f64::from(screen.width)) as i32;
    let y = (y * f64::from(screen.height)) as i32;
    Some((x, y))
}

pub fn screenshot_file_name(now: DateTime<Utc>) -> String {
    now.format(SCREENSHOT_FILE_FORMAT).to_string()
}

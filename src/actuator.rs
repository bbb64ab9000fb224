//! Actuation seam
//!
//! The engine decides; an `Actuator` carries out the side effect (OS mouse
//! control, screen capture). Platform bindings live outside this crate.

use crate::error::GestureError;
use crate::types::Action;
use tracing::{debug, info};

/// Receiver of fired actions
pub trait Actuator {
    /// Perform one action
    fn perform(&mut self, action: &Action) -> Result<(), GestureError>;
}

/// Actuator that keeps every action it receives, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingActuator {
    actions: Vec<Action>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of recorded actions matching `pred`
    pub fn count(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl Actuator for RecordingActuator {
    fn perform(&mut self, action: &Action) -> Result<(), GestureError> {
        self.actions.push(action.clone());
        Ok(())
    }
}

/// Actuator that only logs; useful for dry runs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActuator;

impl Actuator for TracingActuator {
    fn perform(&mut self, action: &Action) -> Result<(), GestureError> {
        match action {
            Action::MoveCursorTo { x, y } => debug!(x, y, "move cursor"),
            Action::ClickLeft => info!("left click"),
            Action::ClickRight => info!("right click"),
            Action::DoubleClick => info!("double click"),
            Action::TriggerScreenshot { file_name } => info!(%file_name, "screenshot"),
        }
        Ok(())
    }
}

//! Gesture Flux - Hand-landmark gesture classification and debounce engine
//!
//! Gesture Flux turns a stream of 21-point hand skeletons into discrete UI
//! actions through a deterministic per-frame pipeline: measurement →
//! rule-based predicates → priority classification → cooldown gate → action.
//!
//! Landmark detection, video capture, overlay drawing and OS-level actuation
//! are external collaborators; this crate only decides.

pub mod actions;
pub mod actuator;
pub mod classifier;
pub mod config;
pub mod cooldown;
pub mod encoder;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod pipeline;
pub mod predicates;
pub mod rules;
pub mod synthetic;
pub mod types;

pub use actuator::{Actuator, RecordingActuator, TracingActuator};
pub use classifier::{classify, Classifier};
pub use config::GestureConfig;
pub use cooldown::{CooldownState, Gate};
pub use error::{ConfigError, GestureError};
pub use frames::FrameEvent;
pub use pipeline::{classify_and_debounce, GestureEngine};
pub use types::{Action, Decision, GestureKind, Landmark, LandmarkFrame};

/// Crate version embedded in all decision records
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for decision records
pub const PRODUCER_NAME: &str = "gesture-flux";

//! Replay a scripted sequence of synthetic poses through the engine

use chrono::{Duration, TimeZone, Utc};
use gesture_flux::synthetic::HandPose;
use gesture_flux::{GestureEngine, GestureKind, TracingActuator};

fn main() {
    let script = [
        (GestureKind::None, 5),
        (GestureKind::Move, 10),
        (GestureKind::LeftClick, 3),
        (GestureKind::DoubleClick, 8),
        (GestureKind::Screenshot, 25),
    ];

    let mut engine = GestureEngine::default();
    let mut actuator = TracingActuator;
    let mut now = match Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).single() {
        Some(start) => start,
        None => return,
    };

    for (kind, frames) in script {
        let frame = HandPose::for_gesture(kind).frame();
        for _ in 0..frames {
            match engine.process_with(&frame, now, &mut actuator) {
                Ok(decision) => {
                    if let Some(label) = decision.label() {
                        println!("{}  {}", now.format("%H:%M:%S%.3f"), label);
                    }
                }
                Err(e) => eprintln!("Error: {e:?}"),
            }
            now += Duration::milliseconds(100);
        }
    }
}

//! Pinball Sim - headless runner
//!
//! Loads a table (JSON path as the first argument, or `PINBALL_TABLE`, or
//! the built-in classic table), plays a scripted input sequence through the
//! fixed-timestep loop and prints the final snapshot as JSON. Set
//! `RUST_LOG=debug` to watch every hit.

#[cfg(not(target_arch = "wasm32"))]
use pinball_sim::TableConfig;
#[cfg(not(target_arch = "wasm32"))]
use pinball_sim::sim::{ControlEvent, FixedTimestep, GameEvent, GamePhase, GameSession, NudgeDirection};

/// Frames to run per ball (60 fps)
#[cfg(not(target_arch = "wasm32"))]
const FRAMES_PER_BALL: u32 = 60 * 30;

#[cfg(not(target_arch = "wasm32"))]
fn load_table() -> Result<TableConfig, Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PINBALL_TABLE").ok());
    match path {
        Some(path) => {
            log::info!("Loading table from {}", path);
            let text = std::fs::read_to_string(&path)?;
            Ok(TableConfig::from_json(&text)?)
        }
        None => {
            log::info!("Using built-in classic table");
            Ok(TableConfig::classic())
        }
    }
}

/// Scripted input for a frame: plunge when waiting, flip on a fixed rhythm,
/// and an occasional nudge
#[cfg(not(target_arch = "wasm32"))]
fn script(frame: u32, phase: GamePhase) -> Vec<ControlEvent> {
    if phase == GamePhase::AwaitingLaunch {
        let pull = 0.6 + 0.1 * ((frame / 60) % 4) as f32;
        return vec![ControlEvent::Plunge(pull)];
    }
    let mut events = Vec::new();
    match frame % 45 {
        0 => events.push(ControlEvent::FlipLeft(true)),
        8 => events.push(ControlEvent::FlipLeft(false)),
        20 => events.push(ControlEvent::FlipRight(true)),
        28 => events.push(ControlEvent::FlipRight(false)),
        _ => {}
    }
    if frame % 900 == 450 {
        events.push(ControlEvent::Nudge(NudgeDirection::Up));
    }
    events
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Pinball Sim (headless) starting...");

    let table = load_table()?;
    let mut session = GameSession::new(&table)?;
    let mut stepper = FixedTimestep::new(table.tick_ms / 1000.0);
    let frame_dt = 1.0 / 60.0;

    let max_frames = FRAMES_PER_BALL * table.balls_per_game.max(1);
    let mut frame = 0;
    while frame < max_frames && session.phase != GamePhase::GameOver {
        for event in script(frame, session.phase) {
            session.apply_control(event);
        }
        stepper.advance(&mut session, frame_dt);

        for event in session.drain_events() {
            match event {
                GameEvent::BodyHit { .. } | GameEvent::LanePointLit { .. } => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
        frame += 1;
    }

    log::info!(
        "Stopped after {} frames ({} ticks), score {}",
        frame,
        session.time_ticks,
        session.score
    );
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library; there is no browser entry point
}

//! Plate Guard headless runner
//!
//! Drives a session at a fixed frame rate with a simple autoplayer, logs the
//! notifications it produces and prints the score submission at the end.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use plate_guard::sim::{GameEvent, GameMode, Mission, Session, handle_tap, tick};
use plate_guard::{PlayerProgress, ScoreSubmission, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Autoplay a session and print its score submission.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// classic, time-attack, survival or challenge
    #[arg(long, default_value = "classic")]
    mode: String,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Upper bound on simulated seconds
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Start at this player level instead of a stored progression
    #[arg(long)]
    level: Option<u32>,
    /// Tuning file (JSON); the shipped balance is used otherwise
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Stored progression (JSON)
    #[arg(long)]
    progress: Option<PathBuf>,
    /// Mission id from the catalog (challenge mode)
    #[arg(long)]
    mission: Option<String>,
    /// Autoplayer tap rate
    #[arg(long, default_value_t = 8.0)]
    taps_per_second: f32,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("invalid tuning in {}", path.display()))
}

fn load_progress(path: Option<&PathBuf>) -> Result<PlayerProgress> {
    let Some(path) = path else {
        return Ok(PlayerProgress::new());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading progression {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid progression in {}", path.display()))
}

/// Tap the drop closest to the plate
fn autoplay_tap(state: &mut Session) {
    let target = state
        .drops
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|d| d.pos);
    if let Some(pos) = target {
        let result = handle_tap(state, pos);
        log::trace!("Tap at ({:.0}, {:.0}): {:?}", pos.x, pos.y, result);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mode: GameMode = args.mode.parse()?;
    let tuning = load_tuning(args.tuning.as_ref())?;
    let mut progress = load_progress(args.progress.as_ref())?;
    if let Some(level) = args.level {
        progress.level = level.max(1);
    }
    let mission = match args.mission.as_deref() {
        Some(id) => Some(Mission::from_catalog(id).with_context(|| format!("unknown mission {}", id))?),
        None => None,
    };

    let mut state = Session::new(mode, progress, mission, tuning, args.seed);
    let tap_interval = 1.0 / args.taps_per_second.max(0.1);
    let mut tap_timer = 0.0;
    let frames = (args.seconds / FRAME_DT).ceil() as u32;

    for _ in 0..frames {
        if state.is_over() {
            break;
        }
        tap_timer += FRAME_DT;
        while tap_timer >= tap_interval {
            tap_timer -= tap_interval;
            autoplay_tap(&mut state);
        }
        tick(&mut state, FRAME_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::Cue(cue) => log::debug!("Cue {:?}", cue),
                other => log::info!("{:?}", other),
            }
        }
    }

    let submission = ScoreSubmission::from_session(&state);
    println!("{}", submission.to_json()?);
    Ok(())
}

//! Vortexion headless runner
//!
//! Pumps the simulation at its fixed frame rate without a window: one
//! `update` then one `draw` per frame, driven by a scripted agent.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use vortexion::agent::{Agent, IdleAgent, RandomAgent};
use vortexion::audio::AudioManager;
use vortexion::input::InputState;
use vortexion::renderer::{DrawList, SpriteInstance};
use vortexion::sim::{Game, GameScreen, StageEvent};
use vortexion::{HighScores, Settings};

#[derive(Parser, Debug)]
#[command(name = "vortexion")]
#[command(about = "Headless frame pump for the Vortexion shoot-'em-up")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the game for a fixed number of frames
    Run {
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// Overrides the seed from the settings file
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = CliAgent::Random)]
        agent: CliAgent,
        /// Write a JSON run summary here
        #[arg(long)]
        summary: Option<PathBuf>,
        /// High-score table to load and update
        #[arg(long)]
        highscores: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliAgent {
    Random,
    Idle,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    frames: u64,
    seed: u64,
    screen: GameScreen,
    score: u32,
    hi_score: u32,
    stage: u8,
    lives: u8,
    /// Largest draw list seen, in GPU sprite instances
    peak_instances: usize,
    /// Size of the largest instance buffer upload
    peak_upload_bytes: usize,
    events: BTreeMap<String, usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            frames,
            seed,
            settings,
            agent,
            summary,
            highscores,
        } => {
            let mut settings = match settings.as_deref() {
                Some(path) => Settings::load(path)
                    .with_context(|| format!("failed to load settings from {}", path.display()))?,
                None => Settings::default(),
            };
            if let Some(seed) = seed {
                settings.seed = seed;
            }

            let mut agent: Box<dyn Agent> = match agent {
                CliAgent::Random => Box::new(RandomAgent::new(settings.seed)),
                CliAgent::Idle => Box::new(IdleAgent),
            };

            let scores = highscores.as_deref().map(HighScores::load).unwrap_or_default();
            let (run_summary, scores) = run(&settings, agent.as_mut(), scores, frames);

            if let Some(path) = highscores.as_deref() {
                scores
                    .save(path)
                    .with_context(|| format!("failed to save high scores to {}", path.display()))?;
            }
            if let Some(path) = summary.as_deref() {
                write_summary(path, &run_summary)?;
            }
            println!("{}", serde_json::to_string_pretty(&run_summary)?);
        }
    }
    Ok(())
}

fn run(settings: &Settings, agent: &mut dyn Agent, scores: HighScores, frames: u64) -> (RunSummary, HighScores) {
    let mut game = Game::new(settings, AudioManager::default(), scores);
    let mut input = InputState::default();
    let mut out = DrawList::new();
    let mut events: BTreeMap<String, usize> = BTreeMap::new();
    let mut instances: Vec<SpriteInstance> = Vec::new();
    let mut peak_instances = 0;
    let mut peak_upload_bytes = 0;

    for frame in 0..frames {
        input = input.next(agent.act(frame));
        game.update(&input);

        out.clear();
        game.draw(&mut out);
        instances.clear();
        instances.extend(out.cmds().iter().filter_map(SpriteInstance::from_cmd));
        peak_instances = peak_instances.max(instances.len());
        peak_upload_bytes = peak_upload_bytes.max(SpriteInstance::as_bytes(&instances).len());

        for event in game.drain_events() {
            log_event(&event);
            *events.entry(event_name(&event)).or_default() += 1;
        }
    }

    let summary = RunSummary {
        frames,
        seed: settings.seed,
        screen: game.screen(),
        score: game.vars.score,
        hi_score: game.vars.hi_score,
        stage: game.vars.stage_num,
        lives: game.vars.lives,
        peak_instances,
        peak_upload_bytes,
        events,
    };
    (summary, game.high_scores().clone())
}

/// The serde tag of an event, e.g. `enemy_destroyed`
fn event_name(event: &StageEvent) -> String {
    serde_json::to_value(event)
        .ok()
        .and_then(|v| v.get("event").and_then(|t| t.as_str()).map(str::to_owned))
        .unwrap_or_else(|| "unknown".to_owned())
}

fn log_event(event: &StageEvent) {
    match event {
        StageEvent::StageCleared { .. } | StageEvent::GameOver { .. } | StageEvent::ScreenChanged { .. } => {
            log::info!("{event:?}")
        }
        _ => log::trace!("{event:?}"),
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("failed to write summary to {}", path.display()))?;
    Ok(())
}

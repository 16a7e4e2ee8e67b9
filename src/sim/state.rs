//! Phase and event types shared by the stage and game controllers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy_kinds::EnemyType;
use super::powerup::PowerupKind;

/// Frames the player flies in from the left before control is handed over
pub const PLAYER_SPAWN_IN_FRAMES: u32 = 30;
/// Minimum frames spent on the stage-clear screen
pub const STAGE_CLEAR_FRAMES: u32 = 180;
/// Delay before the vortex banner appears on the stage-clear screen
pub const STAGE_CLEAR_BANNER_FRAMES: u32 = 60;

/// Stage finite-state machine value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StagePhase {
    /// Player flying in, invincible
    #[default]
    PlayerSpawned,
    /// Active gameplay
    Play,
    /// Waiting for the death explosions to finish
    PlayerDead,
    /// Full simulation freeze
    Paused,
    /// No lives left; restarts on the next update
    GameOver,
    /// Boss down (or vortex finished); waiting for the jingle
    StageClear,
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameScreen {
    Titles,
    Stage,
    Complete,
}

/// Notable things that happened during a frame, for telemetry and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StageEvent {
    PhaseChanged {
        from: StagePhase,
        to: StagePhase,
    },
    EnemySpawned {
        enemy: EnemyType,
        pos: Vec2,
    },
    EnemyDestroyed {
        enemy: EnemyType,
        score: u32,
    },
    PlayerKilled {
        lives_left: u8,
    },
    PowerupCollected {
        kind: PowerupKind,
    },
    BombTriggered,
    StageCleared {
        stage: u8,
    },
    GameOver {
        score: u32,
    },
    ScreenChanged {
        to: GameScreen,
    },
}

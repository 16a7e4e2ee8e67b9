//! Vortexion - a side-scrolling arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, stage and game state machines)
//! - `audio`: Music and sound-effect contract with channel priority arbitration
//! - `input`: Logical button façade read once per frame
//! - `renderer`: Draw lists produced by the draw pass
//! - `ui`: HUD, title and completion screens
//! - `agent`: Input sources for headless runs

pub mod agent;
pub mod audio;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const APP_WIDTH: f32 = 256.0;
    pub const APP_HEIGHT: f32 = 192.0;
    /// Fixed frame rate the simulation is tuned for
    pub const APP_FPS: u32 = 60;

    /// HUD strips at the top and bottom of the screen
    pub const HUD_HEIGHT: f32 = 16.0;
    /// Playfield vertical band (top inclusive, bottom exclusive)
    pub const PLAYFIELD_TOP: f32 = HUD_HEIGHT;
    pub const PLAYFIELD_BOTTOM: f32 = APP_HEIGHT - HUD_HEIGHT;

    /// Score display is six digits wide
    pub const MAX_SCORE: u32 = 999_999;
    pub const ENEMY_SCORE_NORMAL: u32 = 100;
    pub const ENEMY_SCORE_BOSS: u32 = 5000;

    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 9;

    pub const MAX_WEAPONS: usize = 3;
    pub const MAX_WEAPON_LEVEL: u8 = 5;
    pub const WEAPON_NAMES: [&str; MAX_WEAPONS] = ["A", "B", "C"];

    pub const FIRST_STAGE: u8 = 1;
    pub const FINAL_STAGE: u8 = 5;
}

/// Sine of an angle given in degrees
#[inline]
pub fn sin_deg(deg: f32) -> f32 {
    deg.to_radians().sin()
}

/// Cosine of an angle given in degrees
#[inline]
pub fn cos_deg(deg: f32) -> f32 {
    deg.to_radians().cos()
}

/// Angle of the vector (x, y) in degrees, screen coordinates (y down)
#[inline]
pub fn atan2_deg(y: f32, x: f32) -> f32 {
    y.atan2(x).to_degrees()
}

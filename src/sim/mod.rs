//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one `update` per frame)
//! - Seeded RNG only
//! - Stable iteration order (list insertion order)
//! - No rendering or platform dependencies; `draw` only fills a draw list

pub mod background;
pub mod collision;
pub mod context;
pub mod enemy;
pub mod enemy_kinds;
pub mod enemy_shot;
pub mod explosion;
pub mod game;
pub mod game_vars;
pub mod player;
pub mod player_shot;
pub mod powerup;
pub mod sprite;
pub mod stage;
pub mod state;

pub use background::{Background, StageLayout};
pub use context::{StageCtx, StageEnv};
pub use enemy::Enemy;
pub use enemy_kinds::{EnemyKind, EnemyType};
pub use game::Game;
pub use game_vars::GameVars;
pub use powerup::PowerupKind;
pub use sprite::{Contact, Entity, EntityType, Sprite};
pub use stage::{Stage, StageRequest, World};
pub use state::{GameScreen, StageEvent, StagePhase};

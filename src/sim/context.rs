//! Stage callback context
//!
//! Entities live in lists owned by the stage, so they cannot hold a
//! reference back to it. Instead every `update`/`collided_with` call gets a
//! [`StageCtx`]: a bundle of borrows of everything an entity may touch
//! besides itself. Spawns are queued and moved into their lists by the
//! stage once the current pass is over.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::background::Background;
use super::enemy::Enemy;
use super::enemy_shot::EnemyShot;
use super::explosion::Explosion;
use super::game_vars::GameVars;
use super::player_shot::PlayerShot;
use super::powerup::{Powerup, PowerupCycle, PowerupKind};
use super::state::StageEvent;
use crate::audio::{AudioManager, SoundType};
use crate::input::InputState;

/// Read-only facts about the world, snapshotted before each pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldInfo {
    pub player_pos: Vec2,
    /// Live regular enemies (bosses excluded)
    pub num_enemies: usize,
    /// Live player shots
    pub player_shots: usize,
}

/// Entities and requests produced during a pass
#[derive(Debug, Default)]
pub struct Spawns {
    pub player_shots: Vec<PlayerShot>,
    pub enemy_shots: Vec<EnemyShot>,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<Powerup>,
    /// A boss died or a vortex ended
    pub check_stage_clear: bool,
    /// A bomb was collected
    pub bomb: bool,
}

/// Stage-owned state lent to entities through [`StageCtx`]
#[derive(Debug)]
pub struct StageEnv {
    pub background: Background,
    pub audio: AudioManager,
    pub rng: Pcg32,
    pub spawns: Spawns,
    pub events: Vec<StageEvent>,
    pub powerup_cycle: PowerupCycle,
    /// Frames since the stage started; drives flicker and blinking
    pub frame: u64,
}

impl StageEnv {
    pub fn new(background: Background, audio: AudioManager, seed: u64) -> Self {
        Self {
            background,
            audio,
            rng: Pcg32::seed_from_u64(seed),
            spawns: Spawns::default(),
            events: Vec::new(),
            powerup_cycle: PowerupCycle::default(),
            frame: 0,
        }
    }

    pub fn ctx<'a>(
        &'a mut self,
        vars: &'a mut GameVars,
        input: &'a InputState,
        world: WorldInfo,
    ) -> StageCtx<'a> {
        StageCtx {
            vars,
            input,
            audio: &mut self.audio,
            rng: &mut self.rng,
            background: &self.background,
            spawns: &mut self.spawns,
            events: &mut self.events,
            powerup_cycle: &mut self.powerup_cycle,
            frame: self.frame,
            world,
        }
    }
}

/// Everything an entity may touch besides itself
pub struct StageCtx<'a> {
    pub vars: &'a mut GameVars,
    pub input: &'a InputState,
    pub audio: &'a mut AudioManager,
    pub rng: &'a mut Pcg32,
    pub background: &'a Background,
    pub spawns: &'a mut Spawns,
    pub events: &'a mut Vec<StageEvent>,
    pub powerup_cycle: &'a mut PowerupCycle,
    pub frame: u64,
    pub world: WorldInfo,
}

impl StageCtx<'_> {
    pub fn scroll_x_speed(&self) -> f32 {
        self.background.scroll_x_speed()
    }

    pub fn add_player_shot(&mut self, shot: PlayerShot) {
        self.spawns.player_shots.push(shot);
    }

    pub fn add_enemy_shot(&mut self, shot: EnemyShot) {
        self.spawns.enemy_shots.push(shot);
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.spawns.enemies.push(enemy);
    }

    pub fn add_boss(&mut self, boss: Enemy) {
        self.spawns.bosses.push(boss);
    }

    /// Queue an explosion; an undelayed one sounds immediately
    pub fn add_explosion(&mut self, pos: Vec2, delay: u32) {
        if delay == 0 {
            self.play_sound(SoundType::ExplodeSmall);
        }
        self.spawns.explosions.push(Explosion::new(pos, delay));
    }

    pub fn add_powerup(&mut self, powerup: Powerup) {
        self.spawns.powerups.push(powerup);
    }

    pub fn add_score(&mut self, amount: u32) {
        self.vars.add_score(amount);
    }

    pub fn raise_stage_clear(&mut self) {
        self.spawns.check_stage_clear = true;
    }

    pub fn trigger_bomb(&mut self) {
        self.spawns.bomb = true;
    }

    pub fn play_sound(&mut self, sound: SoundType) {
        self.audio.play_sound(sound, false, false);
    }

    pub fn push_event(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Random integer in `[lo, hi]`, as a coordinate offset
    pub fn rnd(&mut self, lo: i32, hi: i32) -> f32 {
        self.rng.random_range(lo..=hi) as f32
    }

    /// Live plus queued player shots
    pub fn player_shot_count(&self) -> usize {
        self.world.player_shots + self.spawns.player_shots.len()
    }

    /// Count a kill towards the drop cycle, dropping an item at `pos` when due
    pub fn register_kill(&mut self, pos: Vec2) {
        if let Some(kind) = self.powerup_cycle.register_kill() {
            log::debug!("Dropping {kind:?} at {pos}");
            self.add_powerup(Powerup::new(kind, pos));
        }
    }

    /// Apply a collected powerup
    pub fn collect_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Weapon(w) => {
                if self.vars.current_weapon == w {
                    self.vars.increase_weapon_level(w);
                } else {
                    self.vars.change_weapon(w);
                }
                self.play_sound(SoundType::WeaponPowerup);
            }
            PowerupKind::Life => {
                self.vars.add_life();
                self.play_sound(SoundType::LifePowerup);
            }
            PowerupKind::Bomb => {
                self.trigger_bomb();
                self.play_sound(SoundType::BombPowerup);
            }
        }
        self.push_event(StageEvent::PowerupCollected { kind });
    }
}

//! The player ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::player_shot;
use super::sprite::{Contact, Entity, EntityType, Sprite};
use super::state::StageEvent;
use crate::consts::*;
use crate::input::Button;
use crate::renderer::DrawList;

pub const MOVE_SPEED: f32 = 2.0;
pub const MOVE_SPEED_DIAGONAL: f32 = MOVE_SPEED * 0.707;
/// Frames between volleys
pub const SHOT_DELAY: u32 = 10;
pub const INVINCIBILITY_FRAMES: u32 = 120;
pub const PLAYER_SPAWN_POS: Vec2 = Vec2::new(0.0, 92.0);
pub const PLAYER_HEIGHT: f32 = 8.0;
/// Explosions in the death burst
const DEATH_EXPLOSIONS: u32 = 12;
/// Weapon levels lost on death
const DEATH_WEAPON_PENALTY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub sprite: Sprite,
    pub shot_delay: u32,
    pub invincibility_frames: u32,
    /// Debug toggle; keeps the ship invincible indefinitely
    pub forced_invincible: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        let mut sprite = Sprite::new(PLAYER_SPAWN_POS, Vec2::new(16.0, PLAYER_HEIGHT));
        sprite.u = 0;
        sprite.v = 4;
        Self {
            sprite,
            shot_delay: 0,
            invincibility_frames: INVINCIBILITY_FRAMES,
            forced_invincible: false,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_frames > 0 || self.forced_invincible
    }

    pub fn toggle_invincibility(&mut self) {
        self.forced_invincible = !self.forced_invincible;
        self.invincibility_frames = if self.forced_invincible {
            INVINCIBILITY_FRAMES
        } else {
            0
        };
        log::debug!("Forced invincibility {}", self.forced_invincible);
    }

    /// Fly in from the left while the stage introduces the ship
    pub fn update_spawned(&mut self) {
        self.sprite.pos.x += MOVE_SPEED;
    }

    /// Blow up: lose a life, two weapon levels and the current weapon
    pub fn kill(&mut self, ctx: &mut StageCtx<'_>) {
        self.sprite.removed = true;
        for i in 0..DEATH_EXPLOSIONS {
            let offset = Vec2::new(ctx.rnd(-12, 12), -4.0 + ctx.rnd(-6, 6));
            ctx.add_explosion(self.sprite.pos + offset, i * 8);
        }
        ctx.vars.subtract_life();
        ctx.vars.decrease_all_weapon_levels(DEATH_WEAPON_PENALTY);
        ctx.vars.change_weapon(0);
        ctx.push_event(StageEvent::PlayerKilled {
            lives_left: ctx.vars.lives,
        });
    }

    fn movement(ctx: &StageCtx<'_>) -> Vec2 {
        let x = if ctx.input.is_pressing(Button::Left) {
            -1.0
        } else if ctx.input.is_pressing(Button::Right) {
            1.0
        } else {
            0.0
        };
        let y = if ctx.input.is_pressing(Button::Up) {
            -1.0
        } else if ctx.input.is_pressing(Button::Down) {
            1.0
        } else {
            0.0
        };
        let speed = if x != 0.0 && y != 0.0 {
            MOVE_SPEED_DIAGONAL
        } else {
            MOVE_SPEED
        };
        Vec2::new(x, y) * speed
    }

    fn do_move(&mut self, ctx: &StageCtx<'_>) {
        let delta = Self::movement(ctx);
        let s = &mut self.sprite;
        if delta.x != 0.0 {
            s.pos.x = (s.pos.x + delta.x).clamp(0.0, APP_WIDTH - s.w());
        }
        if delta.y != 0.0 {
            s.pos.y = (s.pos.y + delta.y).clamp(PLAYFIELD_TOP, PLAYFIELD_BOTTOM - s.h());
        }
    }

    /// Single-pixel terrain test near the nose of the ship
    fn collide_background(&mut self, ctx: &mut StageCtx<'_>) -> bool {
        let point = self.sprite.pos + Vec2::new(8.0, 4.0);
        if ctx.background.is_point_colliding(point.x, point.y) {
            self.collided_with(&Contact::background(), ctx);
            return true;
        }
        false
    }

    fn shoot(&mut self, ctx: &mut StageCtx<'_>) {
        let weapon = ctx.vars.current_weapon;
        let level = ctx.vars.current_weapon_level();
        if player_shot::create(ctx, self.sprite.pos, weapon, level) {
            self.shot_delay = SHOT_DELAY;
        }
    }
}

impl Entity for Player {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::Player
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        self.do_move(ctx);

        if self.invincibility_frames > 0 {
            self.invincibility_frames -= 1;
        }

        if !self.is_invincible() && self.collide_background(ctx) {
            return;
        }

        if self.shot_delay > 0 {
            self.shot_delay -= 1;
        } else if ctx.input.is_pressing(Button::Fire) {
            self.shoot(ctx);
        }
    }

    fn draw(&self, frame: u64, out: &mut DrawList) {
        if self.is_invincible() && frame % 2 == 0 {
            return;
        }
        self.sprite.blit(out, None);
    }

    fn collided_with(&mut self, other: &Contact, ctx: &mut StageCtx<'_>) {
        let lethal = matches!(
            other.kind,
            EntityType::Enemy(_) | EntityType::EnemyShot | EntityType::Background
        );
        if lethal && !self.is_invincible() && !self.sprite.removed {
            self.kill(ctx);
        }
    }

    fn contact(&self) -> Contact {
        Contact {
            kind: EntityType::Player,
            damage: 0,
            invincible: self.is_invincible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Buttons, InputState};
    use crate::sim::context::test_support::Harness;

    fn vulnerable() -> Player {
        let mut p = Player::new();
        p.invincibility_frames = 0;
        p
    }

    #[test]
    fn test_enemy_contact_kills() {
        let mut h = Harness::new();
        h.vars.weapon_levels = [3, 1, 5];
        h.vars.current_weapon = 2;
        let mut p = vulnerable();

        p.collided_with(&Contact::new(EntityType::Enemy(crate::sim::EnemyType::A)), &mut h.ctx());

        assert!(p.sprite.removed);
        assert_eq!(h.vars.lives, 2);
        assert_eq!(h.vars.weapon_levels, [1, 0, 3]);
        assert_eq!(h.vars.current_weapon, 0);
        assert_eq!(h.env.spawns.explosions.len(), 12);
        assert_eq!(h.env.spawns.explosions[3].delay, 24);
    }

    #[test]
    fn test_invincible_player_survives() {
        let mut h = Harness::new();
        let mut p = Player::new();
        p.collided_with(&Contact::new(EntityType::EnemyShot), &mut h.ctx());
        assert!(!p.sprite.removed);

        let mut p = vulnerable();
        p.toggle_invincibility();
        assert!(p.is_invincible());
        p.collided_with(&Contact::background(), &mut h.ctx());
        assert!(!p.sprite.removed);
        assert_eq!(h.vars.lives, 3);

        p.toggle_invincibility();
        assert!(!p.is_invincible());
    }

    #[test]
    fn test_diagonal_movement_and_clamp() {
        let mut h = Harness::new();
        h.input = InputState::new(Buttons::from_slice(&[Button::Right, Button::Down]), Buttons::NONE);
        let mut p = vulnerable();
        p.update(&mut h.ctx());
        assert!((p.sprite.pos.x - MOVE_SPEED_DIAGONAL).abs() < 1e-6);
        assert!((p.sprite.pos.y - (92.0 + MOVE_SPEED_DIAGONAL)).abs() < 1e-6);

        h.input = InputState::new(Buttons::from_slice(&[Button::Left, Button::Right, Button::Up]), Buttons::NONE);
        for _ in 0..100 {
            p.update(&mut h.ctx());
        }
        assert_eq!(p.sprite.pos.x, 0.0);
        assert_eq!(p.sprite.pos.y, PLAYFIELD_TOP);
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut h = Harness::new();
        h.input = InputState::new(Buttons::NONE.with(Button::Fire), Buttons::NONE);
        let mut p = vulnerable();
        p.update(&mut h.ctx());
        assert_eq!(h.env.spawns.player_shots.len(), 2);
        assert_eq!(p.shot_delay, SHOT_DELAY);

        h.env.spawns.player_shots.clear();
        for _ in 0..SHOT_DELAY {
            p.update(&mut h.ctx());
        }
        assert!(h.env.spawns.player_shots.is_empty());
        p.update(&mut h.ctx());
        assert_eq!(h.env.spawns.player_shots.len(), 2);
    }

    #[test]
    fn test_terrain_kills_vulnerable_player() {
        let mut layout = crate::sim::background::StageLayout::empty(40);
        layout.rows[10] = "#".repeat(40);
        let mut h = Harness::with_layout(layout);
        let mut p = vulnerable();
        p.update(&mut h.ctx());
        assert!(p.sprite.removed);
        assert_eq!(h.vars.lives, 2);
    }

    #[test]
    fn test_blinks_while_invincible() {
        let p = Player::new();
        let mut out = DrawList::new();
        p.draw(0, &mut out);
        assert!(out.is_empty());
        p.draw(1, &mut out);
        assert_eq!(out.len(), 1);
    }
}

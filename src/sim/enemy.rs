//! Enemy base: hit points, hit flash, scoring and shooting helpers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::enemy_kinds::{EnemyKind, EnemyType};
use super::enemy_shot::EnemyShot;
use super::sprite::{COLOUR_WHITE, Contact, Entity, EntityType, Sprite};
use super::state::StageEvent;
use crate::audio::SoundType;
use crate::renderer::{DrawList, PalSwap};
use crate::{atan2_deg, cos_deg, sin_deg};

/// Frames of white flash after a non-lethal hit
pub const HIT_FRAMES: u32 = 5;
/// Collisions are ignored this many frames after spawning
pub const INVINCIBLE_START_FRAMES: u32 = 15;
pub const ENEMY_DAMAGE: u32 = 1;
/// Damage dealt to every enemy by a bomb pickup
pub const BOMB_DAMAGE: u32 = 2;
/// Row of the sprite bank holding enemy tiles
const ENEMY_SPRITE_V: u16 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub sprite: Sprite,
    pub enemy_type: EnemyType,
    pub kind: EnemyKind,
    pub hp: u32,
    pub hit_frames: u32,
    pub score: u32,
    pub lifetime: u32,
    pub damage: u32,
}

impl Enemy {
    pub fn new(enemy_type: EnemyType, pos: Vec2) -> Self {
        let size = enemy_type.size();
        let mut pos = pos;
        let kind = EnemyKind::spawn(enemy_type, &mut pos, size);

        let mut sprite = Sprite::new(pos, size);
        sprite.colour = enemy_type.colour();
        sprite.u = enemy_type.index() as u16 * 16;
        sprite.v = ENEMY_SPRITE_V;
        sprite.flip_y = enemy_type == EnemyType::C && pos.y < crate::consts::APP_HEIGHT / 2.0;

        Self {
            sprite,
            enemy_type,
            kind,
            hp: enemy_type.hp(),
            hit_frames: 0,
            score: enemy_type.score(),
            lifetime: 0,
            damage: ENEMY_DAMAGE,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.enemy_type.is_boss()
    }

    /// Still inside the post-spawn grace window
    pub fn is_spawning(&self) -> bool {
        self.lifetime < INVINCIBLE_START_FRAMES
    }

    /// Apply damage; destroys the enemy when hp runs out
    pub fn hit(&mut self, dmg: u32, ctx: &mut StageCtx<'_>) {
        self.hp = self.hp.saturating_sub(dmg);
        if self.hp == 0 {
            self.destroy(ctx);
        } else {
            self.hit_frames = HIT_FRAMES;
            ctx.play_sound(SoundType::Blip);
        }
    }

    pub fn hit_with_bomb(&mut self, ctx: &mut StageCtx<'_>) {
        self.hit(BOMB_DAMAGE, ctx);
    }

    /// Award score, explode and roll for a powerup. Safe to call twice.
    pub fn destroy(&mut self, ctx: &mut StageCtx<'_>) {
        if self.sprite.removed {
            return;
        }
        self.sprite.removed = true;
        ctx.add_score(self.score);
        self.explode(ctx);
        ctx.register_kill(self.sprite.pos);
        ctx.push_event(StageEvent::EnemyDestroyed {
            enemy: self.enemy_type,
            score: self.score,
        });
        if self.is_boss() {
            ctx.raise_stage_clear();
        }
    }

    fn explode(&self, ctx: &mut StageCtx<'_>) {
        if !self.is_boss() {
            ctx.add_explosion(self.sprite.pos, 0);
            return;
        }
        for i in 0..self.enemy_type.explosion_count() {
            let offset = Vec2::new(8.0 + ctx.rnd(-12, 12), 8.0 + ctx.rnd(-6, 6));
            ctx.add_explosion(self.sprite.pos + offset, i as u32 * 5);
        }
    }

    /// Four 16x16 blits of the one tile, mirrored into a 32x32 body
    fn draw_composite(&self, out: &mut DrawList) {
        let s = &self.sprite;
        let [top_right, bottom_left, bottom_right] = self.enemy_type.quadrant_colours();
        let hit = self.hit_frames > 0;
        let pal = |to: u8| Some(PalSwap::new(s.colour, if hit { COLOUR_WHITE } else { to }));
        let base = if hit { pal(COLOUR_WHITE) } else { None };

        out.blit(s.x(), s.y(), s.u, s.v, 16.0, 16.0, Some(0), base);
        out.blit(s.x() + 16.0, s.y(), s.u, s.v, -16.0, 16.0, Some(0), pal(top_right));
        out.blit(s.x(), s.y() + 16.0, s.u, s.v, 16.0, -16.0, Some(0), pal(bottom_left));
        out.blit(s.x() + 16.0, s.y() + 16.0, s.u, s.v, -16.0, -16.0, Some(0), pal(bottom_right));
    }
}

impl Entity for Enemy {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::Enemy(self.enemy_type)
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        self.lifetime += 1;
        if self.hit_frames > 0 {
            self.hit_frames -= 1;
        }
        self.step(ctx);
    }

    fn draw(&self, _frame: u64, out: &mut DrawList) {
        if self.is_boss() {
            self.draw_composite(out);
        } else if self.hit_frames > 0 {
            self.sprite
                .blit(out, Some(PalSwap::new(self.sprite.colour, COLOUR_WHITE)));
        } else {
            self.sprite.blit(out, None);
        }
    }

    fn collided_with(&mut self, other: &Contact, ctx: &mut StageCtx<'_>) {
        if self.is_spawning() {
            return;
        }
        if other.kind == EntityType::PlayerShot {
            self.hit(other.damage, ctx);
        }
    }

    fn contact(&self) -> Contact {
        Contact {
            kind: self.kind(),
            damage: self.damage,
            invincible: self.is_spawning(),
        }
    }
}

/// Fire from the sprite's centre at `degrees` (0 = right, 90 = down)
pub fn shoot_at_angle(sprite: &Sprite, ctx: &mut StageCtx<'_>, speed: f32, degrees: f32, delay: u32) {
    let vel = Vec2::new(cos_deg(degrees), sin_deg(degrees)) * speed;
    ctx.add_enemy_shot(EnemyShot::new(sprite.centre(), vel, delay));
}

/// Angle from the sprite's centre to the middle of the player ship
pub fn angle_to_player(sprite: &Sprite, ctx: &StageCtx<'_>) -> f32 {
    let target = ctx.world.player_pos + Vec2::new(8.0, 4.0);
    let d = target - sprite.centre();
    atan2_deg(d.y, d.x)
}

pub fn shoot_at_player(sprite: &Sprite, ctx: &mut StageCtx<'_>, speed: f32, delay: u32) {
    let a = angle_to_player(sprite, ctx);
    shoot_at_angle(sprite, ctx, speed, a, delay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCmd;
    use crate::sim::context::test_support::Harness;

    fn aged(enemy_type: EnemyType) -> Enemy {
        let mut e = Enemy::new(enemy_type, Vec2::new(100.0, 80.0));
        e.lifetime = INVINCIBLE_START_FRAMES;
        e
    }

    fn shot_contact(damage: u32) -> Contact {
        Contact {
            kind: EntityType::PlayerShot,
            damage,
            invincible: false,
        }
    }

    #[test]
    fn test_two_hits_destroy_once() {
        let mut h = Harness::new();
        let mut e = aged(EnemyType::A);
        e.hp = 2;

        e.collided_with(&shot_contact(1), &mut h.ctx());
        assert_eq!(e.hp, 1);
        assert_eq!(e.hit_frames, HIT_FRAMES);
        assert!(!e.sprite.removed);

        // No hit-frame gate between hits
        e.collided_with(&shot_contact(1), &mut h.ctx());
        assert_eq!(e.hp, 0);
        assert!(e.sprite.removed);
        assert_eq!(h.vars.score, 100);
        assert_eq!(h.env.spawns.explosions.len(), 1);

        e.destroy(&mut h.ctx());
        assert_eq!(h.vars.score, 100);
        assert_eq!(h.env.spawns.explosions.len(), 1);
        assert_eq!(h.env.powerup_cycle.kills(), 1);
    }

    #[test]
    fn test_boss_destroy_scores_and_raises_stage_clear() {
        let mut h = Harness::new();
        let mut boss = aged(EnemyType::K);
        assert_eq!(boss.hp, 200);
        boss.hit(500, &mut h.ctx());
        assert!(boss.sprite.removed);
        assert_eq!(h.vars.score, 5000);
        assert!(h.env.spawns.check_stage_clear);
        assert_eq!(h.env.spawns.explosions.len(), 12);
        // Staggered, five frames apart
        assert_eq!(h.env.spawns.explosions[11].delay, 55);
    }

    #[test]
    fn test_spawn_grace_ignores_shots() {
        let mut h = Harness::new();
        let mut e = Enemy::new(EnemyType::A, Vec2::new(100.0, 80.0));
        e.collided_with(&shot_contact(5), &mut h.ctx());
        assert_eq!(e.hp, 1);
        assert!(e.contact().invincible);
    }

    #[test]
    fn test_bomb_damage() {
        let mut h = Harness::new();
        let mut e = aged(EnemyType::P);
        e.hit_with_bomb(&mut h.ctx());
        assert_eq!(e.hp, 3);
        assert_eq!(h.env.audio.last_sound_played(), Some(SoundType::Blip));
    }

    #[test]
    fn test_hp_never_underflows() {
        let mut h = Harness::new();
        let mut e = aged(EnemyType::G);
        e.hit(u32::MAX, &mut h.ctx());
        assert_eq!(e.hp, 0);
        assert!(e.sprite.removed);
    }

    #[test]
    fn test_boss_composite_draw() {
        let mut boss = aged(EnemyType::M);
        let mut out = DrawList::new();
        boss.draw(0, &mut out);
        let pals: Vec<_> = out
            .cmds()
            .iter()
            .map(|c| match c {
                DrawCmd::Blit { pal, .. } => pal.map(|p| p.to),
                _ => None,
            })
            .collect();
        assert_eq!(pals, vec![None, Some(6), Some(8), Some(13)]);

        boss.hit_frames = 2;
        out.clear();
        boss.draw(0, &mut out);
        assert!(out.cmds().iter().all(|c| matches!(
            c,
            DrawCmd::Blit { pal: Some(PalSwap { to: 15, .. }), .. }
        )));
    }

    #[test]
    fn test_aimed_shot_points_at_player() {
        let mut h = Harness::new();
        h.world.player_pos = Vec2::new(0.0, 84.0);
        let e = aged(EnemyType::A);
        shoot_at_player(&e.sprite, &mut h.ctx(), 2.0, 0);
        let shot = &h.env.spawns.enemy_shots[0];
        assert!(shot.vel.x < -1.99);
        assert!(shot.vel.y.abs() < 1e-3);
    }
}

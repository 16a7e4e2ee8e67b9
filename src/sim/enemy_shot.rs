//! Enemy bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::sprite::{COLOUR_WHITE, Contact, Entity, EntityType, Sprite};
use crate::consts::*;
use crate::renderer::{DrawList, PalSwap};

pub const ENEMY_SHOT_SIZE: f32 = 4.0;
const COLOUR_A: u8 = 11;
const COLOUR_B: u8 = 6;
/// Frames between colour flickers
const FLICKER_FRAMES: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyShot {
    pub sprite: Sprite,
    pub vel: Vec2,
    /// Frames before the shot appears; dormant shots neither move nor collide
    pub delay: u32,
}

impl EnemyShot {
    pub fn new(pos: Vec2, vel: Vec2, delay: u32) -> Self {
        let mut sprite = Sprite::new(pos, Vec2::splat(ENEMY_SHOT_SIZE));
        sprite.colour = COLOUR_A;
        sprite.u = 6;
        sprite.v = 102;
        Self { sprite, vel, delay }
    }

    pub fn is_dormant(&self) -> bool {
        self.delay > 0
    }
}

/// Shot has left the playfield band or the screen sides
pub(super) fn out_of_bounds(s: &Sprite) -> bool {
    s.x() > APP_WIDTH || s.x() + s.w() < 0.0 || s.y() < PLAYFIELD_TOP || s.y() + s.h() >= PLAYFIELD_BOTTOM
}

impl Entity for EnemyShot {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::EnemyShot
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        if self.delay > 0 {
            self.delay -= 1;
            return;
        }

        self.sprite.pos += self.vel;

        let point = self.sprite.pos + Vec2::splat(ENEMY_SHOT_SIZE / 2.0);
        if ctx.background.is_point_colliding(point.x, point.y) {
            self.collided_with(&Contact::background(), ctx);
            return;
        }

        if out_of_bounds(&self.sprite) {
            self.sprite.removed = true;
            return;
        }

        if ctx.frame % FLICKER_FRAMES == 0 {
            self.sprite.colour = if self.sprite.colour == COLOUR_B {
                COLOUR_A
            } else {
                COLOUR_B
            };
        }
    }

    fn draw(&self, _frame: u64, out: &mut DrawList) {
        if self.is_dormant() {
            return;
        }
        self.sprite
            .blit(out, Some(PalSwap::new(COLOUR_WHITE, self.sprite.colour)));
    }

    fn collided_with(&mut self, other: &Contact, _ctx: &mut StageCtx<'_>) {
        if self.is_dormant() {
            return;
        }
        match other.kind {
            EntityType::Background => self.sprite.removed = true,
            EntityType::Player if !other.invincible => self.sprite.removed = true,
            _ => {}
        }
    }

    fn contact(&self) -> Contact {
        Contact {
            kind: EntityType::EnemyShot,
            damage: 1,
            invincible: false,
        }
    }

    fn is_collidable(&self) -> bool {
        !self.is_dormant()
    }
}

//! Timed explosion animation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::sprite::{Contact, Entity, EntityType, Sprite};
use crate::audio::SoundType;
use crate::renderer::DrawList;

/// Texture offsets of the animation frames
const FRAMES: [(u16, u16); 3] = [(0, 64), (16, 64), (32, 64)];
pub const FRAME_DELAY: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub sprite: Sprite,
    /// Frames before the explosion appears
    pub delay: u32,
    pub frame: usize,
    frame_delay: u32,
}

impl Explosion {
    /// Create an explosion. The caller plays the sound for `delay == 0`;
    /// see [`StageCtx::add_explosion`].
    pub fn new(pos: Vec2, delay: u32) -> Self {
        let mut sprite = Sprite::new(pos, Vec2::splat(16.0));
        (sprite.u, sprite.v) = FRAMES[0];
        Self {
            sprite,
            delay,
            frame: 0,
            frame_delay: FRAME_DELAY,
        }
    }
}

impl Entity for Explosion {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::Explosion
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        if self.delay > 0 {
            self.delay -= 1;
            if self.delay == 0 {
                ctx.play_sound(SoundType::ExplodeSmall);
            }
            return;
        }

        self.frame_delay -= 1;
        if self.frame_delay == 0 {
            self.frame += 1;
            if self.frame == FRAMES.len() {
                self.sprite.removed = true;
                return;
            }
            self.frame_delay = FRAME_DELAY;
            (self.sprite.u, self.sprite.v) = FRAMES[self.frame];
        }
    }

    fn draw(&self, _frame: u64, out: &mut DrawList) {
        if self.delay > 0 {
            return;
        }
        self.sprite.blit(out, None);
    }

    fn collided_with(&mut self, _other: &Contact, _ctx: &mut StageCtx<'_>) {}

    fn is_collidable(&self) -> bool {
        false
    }
}

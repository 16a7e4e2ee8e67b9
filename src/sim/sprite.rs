//! Shared sprite attributes and the entity contract
//!
//! Every simulated object carries a [`Sprite`] and implements [`Entity`].
//! Entities never see their container: they only get a [`Contact`]
//! describing what they touched and a [`StageCtx`] for callbacks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::enemy_kinds::EnemyType;
use crate::renderer::{DrawList, PalSwap};

/// Default sprite size in pixels
pub const SPRITE_SIZE: f32 = 16.0;
/// Palette index treated as transparent for every blit
pub const COLKEY: u8 = 0;
/// White; used for hit flashes
pub const COLOUR_WHITE: u8 = 15;

/// Discriminates what an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Player,
    PlayerShot,
    Enemy(EnemyType),
    EnemyShot,
    Powerup,
    Background,
    Explosion,
}

/// Snapshot of the other side of a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub kind: EntityType,
    /// Damage dealt on contact (shots and enemies)
    pub damage: u32,
    /// Whether the entity is currently ignoring hits
    pub invincible: bool,
}

impl Contact {
    pub const fn new(kind: EntityType) -> Self {
        Self {
            kind,
            damage: 0,
            invincible: false,
        }
    }

    /// Terrain hit reported by a background point test
    pub const fn background() -> Self {
        Self::new(EntityType::Background)
    }
}

/// Position, size, lifecycle flag and visual attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub size: Vec2,
    /// Marked for removal; swept at the end of the frame
    pub removed: bool,
    pub colour: u8,
    /// Texture offset in the sprite bank
    pub u: u16,
    pub v: u16,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Sprite {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            removed: false,
            colour: COLOUR_WHITE,
            u: 0,
            v: 0,
            flip_x: false,
            flip_y: false,
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::splat(SPRITE_SIZE))
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.size.y
    }

    pub fn centre(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Bounding boxes overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Sprite) -> bool {
        super::collision::rect_overlap(self.pos, self.size, other.pos, other.size)
    }

    /// Fully off the left edge of the screen
    pub fn is_off_left(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }

    /// Blit the sprite's texture region, honouring flips
    pub fn blit(&self, out: &mut DrawList, pal: Option<PalSwap>) {
        let w = if self.flip_x { -self.w() } else { self.w() };
        let h = if self.flip_y { -self.h() } else { self.h() };
        out.blit(self.x(), self.y(), self.u, self.v, w, h, Some(COLKEY), pal);
    }
}

/// Behaviour shared by every simulated object
pub trait Entity {
    fn sprite(&self) -> &Sprite;
    fn sprite_mut(&mut self) -> &mut Sprite;
    fn kind(&self) -> EntityType;

    /// Advance one frame. May spawn through `ctx` but never touches other entities.
    fn update(&mut self, ctx: &mut StageCtx<'_>);

    /// Append draw commands. Never mutates.
    fn draw(&self, frame: u64, out: &mut DrawList);

    /// React to an overlap with `other`
    fn collided_with(&mut self, other: &Contact, ctx: &mut StageCtx<'_>);

    /// What this entity looks like to whatever it hits
    fn contact(&self) -> Contact {
        Contact::new(self.kind())
    }

    fn is_removed(&self) -> bool {
        self.sprite().removed
    }

    /// Takes part in collision passes this frame
    fn is_collidable(&self) -> bool {
        true
    }
}

/// Update every entity not already marked for removal
pub fn update_list<E: Entity>(list: &mut [E], ctx: &mut StageCtx<'_>) {
    for e in list.iter_mut() {
        if !e.is_removed() {
            e.update(ctx);
        }
    }
}

pub fn draw_list<E: Entity>(list: &[E], frame: u64, out: &mut DrawList) {
    for e in list.iter().filter(|e| !e.is_removed()) {
        e.draw(frame, out);
    }
}

/// Drop every entity marked for removal, keeping the order of the rest
pub fn purge<E: Entity>(list: &mut Vec<E>) {
    list.retain(|e| !e.is_removed());
}

pub fn live_count<E: Entity>(list: &[E]) -> usize {
    list.iter().filter(|e| !e.is_removed()).count()
}

//! Player bullets and the weapon volley table

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::enemy_shot::out_of_bounds;
use super::sprite::{Contact, Entity, EntityType, Sprite};
use crate::consts::MAX_WEAPONS;
use crate::renderer::DrawList;

pub const PLAYER_SHOT_SIZE: f32 = 14.0;
/// No new volley while this many shots are live
pub const MAX_SHOTS: usize = 4;
const WEAPON_LEVELS: usize = 6;

/// Shot speed by weapon level
pub const SPEED_LEVELS: [f32; WEAPON_LEVELS] = [10.0, 10.0, 11.0, 11.0, 12.0, 12.0];
/// Damage by weapon type, then level
pub const DAMAGE_LEVELS: [[u32; WEAPON_LEVELS]; MAX_WEAPONS] = [
    [1, 1, 1, 1, 1, 2],
    [1, 1, 1, 2, 2, 3],
    [1, 1, 2, 2, 3, 3],
];

const DIAGONAL_X: f32 = 0.894;
const DIAGONAL_Y: f32 = 0.447;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShot {
    pub sprite: Sprite,
    pub vel: Vec2,
    pub damage: u32,
}

impl PlayerShot {
    pub fn new(pos: Vec2, weapon: usize, level: u8, vel: Vec2) -> Self {
        let weapon = weapon.min(MAX_WEAPONS - 1);
        let level = usize::from(level).min(WEAPON_LEVELS - 1);
        let mut sprite = Sprite::new(pos, Vec2::splat(PLAYER_SHOT_SIZE));
        sprite.u = level as u16 * 16 + 1;
        sprite.v = 16 + weapon as u16 * 16 + 1;
        Self {
            sprite,
            vel,
            damage: DAMAGE_LEVELS[weapon][level],
        }
    }
}

/// Fire a two-shot volley for `weapon` at `level` from the ship at
/// `player_pos`. Returns false when too many shots are already live.
pub fn create(ctx: &mut StageCtx<'_>, player_pos: Vec2, weapon: usize, level: u8) -> bool {
    if ctx.player_shot_count() >= MAX_SHOTS {
        return false;
    }

    let speed = SPEED_LEVELS[usize::from(level).min(WEAPON_LEVELS - 1)];
    let (x, y) = (player_pos.x, player_pos.y);
    let volley = match weapon {
        // Forward pair
        0 => [
            (Vec2::new(x + 12.0, y - 10.0), Vec2::new(speed, 0.0)),
            (Vec2::new(x + 12.0, y + 4.0), Vec2::new(speed, 0.0)),
        ],
        // Diagonal spread
        1 => [
            (
                Vec2::new(x + 12.0, y - 10.0),
                Vec2::new(speed * DIAGONAL_X, -speed * DIAGONAL_Y),
            ),
            (
                Vec2::new(x + 12.0, y + 4.0),
                Vec2::new(speed * DIAGONAL_X, speed * DIAGONAL_Y),
            ),
        ],
        // Forward and back
        _ => [
            (Vec2::new(x + 12.0, y - 3.0), Vec2::new(speed, 0.0)),
            (Vec2::new(x - 10.0, y - 3.0), Vec2::new(-speed, 0.0)),
        ],
    };

    for (pos, vel) in volley {
        ctx.add_player_shot(PlayerShot::new(pos, weapon, level, vel));
    }
    true
}

impl Entity for PlayerShot {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::PlayerShot
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        self.sprite.pos += self.vel;

        let point = self.sprite.pos + Vec2::splat(7.0);
        if ctx.background.is_point_colliding(point.x, point.y) {
            self.collided_with(&Contact::background(), ctx);
            return;
        }

        if out_of_bounds(&self.sprite) {
            self.sprite.removed = true;
        }
    }

    fn draw(&self, _frame: u64, out: &mut DrawList) {
        self.sprite.blit(out, None);
    }

    /// Any contact at all uses the shot up
    fn collided_with(&mut self, _other: &Contact, _ctx: &mut StageCtx<'_>) {
        self.sprite.removed = true;
    }

    fn contact(&self) -> Contact {
        Contact {
            kind: EntityType::PlayerShot,
            damage: self.damage,
            invincible: false,
        }
    }
}

//! Powerup drops and the drop cycle
//!
//! Every [`POWERUP_DROP_INTERVAL`]th kill drops the next item of a fixed
//! cycle, so drops are predictable and independent of the RNG.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::sprite::{Contact, Entity, EntityType, Sprite};
use crate::renderer::DrawList;

pub const POWERUP_DROP_INTERVAL: u32 = 8;
/// Minimum leftward drift, so drops still leave once scrolling stops
const MIN_DRIFT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Switch to (or level up) a weapon
    Weapon(usize),
    /// Clear enemy bullets and damage every enemy
    Bomb,
    Life,
}

pub const POWERUP_CYCLE: [PowerupKind; 5] = [
    PowerupKind::Weapon(0),
    PowerupKind::Weapon(1),
    PowerupKind::Weapon(2),
    PowerupKind::Bomb,
    PowerupKind::Life,
];

impl PowerupKind {
    fn uv(self) -> (u16, u16) {
        match self {
            PowerupKind::Weapon(w) => (w as u16 * 16, 32),
            PowerupKind::Bomb => (48, 32),
            PowerupKind::Life => (64, 32),
        }
    }
}

/// Per-stage drop counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupCycle {
    kills: u32,
    next: usize,
}

impl PowerupCycle {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Count a kill; returns the item to drop, if any
    pub fn register_kill(&mut self) -> Option<PowerupKind> {
        self.kills += 1;
        if self.kills % POWERUP_DROP_INTERVAL != 0 {
            return None;
        }
        let kind = POWERUP_CYCLE[self.next];
        self.next = (self.next + 1) % POWERUP_CYCLE.len();
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub sprite: Sprite,
    pub kind: PowerupKind,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        let mut sprite = Sprite::new(pos, Vec2::splat(16.0));
        (sprite.u, sprite.v) = kind.uv();
        Self { sprite, kind }
    }
}

impl Entity for Powerup {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn kind(&self) -> EntityType {
        EntityType::Powerup
    }

    fn update(&mut self, ctx: &mut StageCtx<'_>) {
        self.sprite.pos.x -= ctx.scroll_x_speed().max(MIN_DRIFT);
        if self.sprite.is_off_left() {
            self.sprite.removed = true;
        }
    }

    fn draw(&self, frame: u64, out: &mut DrawList) {
        // Slow blink so drops stand out from enemies
        if frame % 16 < 2 {
            return;
        }
        self.sprite.blit(out, None);
    }

    fn collided_with(&mut self, other: &Contact, ctx: &mut StageCtx<'_>) {
        if other.kind != EntityType::Player {
            return;
        }
        self.sprite.removed = true;
        ctx.collect_powerup(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundType;
    use crate::sim::context::test_support::Harness;

    #[test]
    fn test_cycle_drops_every_interval() {
        let mut cycle = PowerupCycle::default();
        let drops: Vec<_> = (0..POWERUP_DROP_INTERVAL * 6)
            .filter_map(|_| cycle.register_kill())
            .collect();
        assert_eq!(drops.len(), 6);
        assert_eq!(drops[..5], POWERUP_CYCLE);
        assert_eq!(drops[5], PowerupKind::Weapon(0));

        cycle.reset();
        assert_eq!(cycle.kills(), 0);
    }

    #[test]
    fn test_collect_weapon() {
        let mut h = Harness::new();
        let player = Contact::new(EntityType::Player);

        // Different weapon: switch
        let mut p = Powerup::new(PowerupKind::Weapon(2), Vec2::ZERO);
        p.collided_with(&player, &mut h.ctx());
        assert!(p.sprite.removed);
        assert_eq!(h.vars.current_weapon, 2);
        assert_eq!(h.vars.weapon_levels, [0, 0, 0]);
        assert_eq!(h.env.audio.last_sound_played(), Some(SoundType::WeaponPowerup));

        // Same weapon: level up
        let mut p = Powerup::new(PowerupKind::Weapon(2), Vec2::ZERO);
        p.collided_with(&player, &mut h.ctx());
        assert_eq!(h.vars.weapon_levels, [0, 0, 1]);
    }

    #[test]
    fn test_collect_life_and_bomb() {
        let mut h = Harness::new();
        let player = Contact::new(EntityType::Player);

        Powerup::new(PowerupKind::Life, Vec2::ZERO).collided_with(&player, &mut h.ctx());
        assert_eq!(h.vars.lives, 4);

        Powerup::new(PowerupKind::Bomb, Vec2::ZERO).collided_with(&player, &mut h.ctx());
        assert!(h.env.spawns.bomb);
    }

    #[test]
    fn test_ignores_non_player_contact() {
        let mut h = Harness::new();
        let mut p = Powerup::new(PowerupKind::Life, Vec2::ZERO);
        p.collided_with(&Contact::new(EntityType::PlayerShot), &mut h.ctx());
        assert!(!p.sprite.removed);
    }
}

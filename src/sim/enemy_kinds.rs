//! Enemy subtypes A to P
//!
//! Each subtype is a variant of [`EnemyKind`] carrying only the state its
//! movement needs. Firing is keyed off the shared `lifetime` counter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StageCtx;
use super::enemy::{Enemy, angle_to_player, shoot_at_angle, shoot_at_player};
use crate::consts::*;
use crate::sin_deg;

/// Subtype tag; also the marker character in stage layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyType {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    /// Circle boss
    K,
    /// Leaf boss
    L,
    /// Eye boss
    M,
    N,
    O,
    P,
}

impl EnemyType {
    pub const ALL: [EnemyType; 16] = [
        EnemyType::A,
        EnemyType::B,
        EnemyType::C,
        EnemyType::D,
        EnemyType::E,
        EnemyType::F,
        EnemyType::G,
        EnemyType::H,
        EnemyType::I,
        EnemyType::J,
        EnemyType::K,
        EnemyType::L,
        EnemyType::M,
        EnemyType::N,
        EnemyType::O,
        EnemyType::P,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn marker(self) -> char {
        (b'A' + self as u8) as char
    }

    pub fn from_marker(c: char) -> Option<Self> {
        let idx = (c as u32).checked_sub('A' as u32)?;
        Self::ALL.get(idx as usize).copied()
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyType::K | EnemyType::L | EnemyType::M)
    }

    /// Palette index the sprite is drawn in
    pub fn colour(self) -> u8 {
        match self {
            EnemyType::A => 8,
            EnemyType::B => 3,
            EnemyType::C => 13,
            EnemyType::D => 12,
            EnemyType::E => 10,
            EnemyType::F => 9,
            EnemyType::G => 4,
            EnemyType::H => 6,
            EnemyType::I => 7,
            EnemyType::J => 5,
            EnemyType::K => 11,
            EnemyType::L => 12,
            EnemyType::M => 9,
            EnemyType::N => 14,
            EnemyType::O => 2,
            EnemyType::P => 10,
        }
    }

    pub fn hp(self) -> u32 {
        match self {
            EnemyType::G | EnemyType::J => 2,
            EnemyType::P => 5,
            EnemyType::K => 200,
            EnemyType::L => 250,
            EnemyType::M => 300,
            _ => 1,
        }
    }

    pub fn size(self) -> Vec2 {
        if self.is_boss() {
            Vec2::splat(32.0)
        } else {
            Vec2::splat(16.0)
        }
    }

    pub fn score(self) -> u32 {
        if self.is_boss() {
            ENEMY_SCORE_BOSS
        } else {
            ENEMY_SCORE_NORMAL
        }
    }

    /// Explosions spawned on death
    pub fn explosion_count(self) -> usize {
        match self {
            EnemyType::K => 12,
            EnemyType::L => 9,
            EnemyType::M => 6,
            _ => 1,
        }
    }

    /// Palette substitutes for the top-right, bottom-left and bottom-right
    /// quadrants of a boss
    pub fn quadrant_colours(self) -> [u8; 3] {
        match self {
            EnemyType::M => [6, 8, 13],
            EnemyType::L => [3, 4, 13],
            _ => [6, 9, 13],
        }
    }
}

/// Per-subtype movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Straight line, one aimed shot
    A,
    /// Fast with a wobble
    B,
    /// Scrolls with terrain; mounted on ceiling or floor
    C,
    /// Bounces between the HUD strips
    D { speed_y: f32 },
    /// Enters from behind the player
    E,
    /// Sine wave around its spawn height
    F { base_y: f32 },
    /// Homes on the player's height
    G,
    /// Flies in, stops, bursts, leaves
    H { speed_x: f32 },
    /// Crosses the screen vertically
    I { speed_y: f32 },
    /// Ground turret
    J,
    K { speed_y: f32 },
    L { base_y: f32 },
    M,
    /// Fast, drifts away from the middle
    N { speed_y: f32 },
    /// Zigzag
    O { speed_y: f32 },
    /// Slow, fires rings
    P,
}

const SCREEN_MIDDLE: f32 = APP_HEIGHT / 2.0;
/// Boss fire interval with and without escorts on screen
const BOSS_FIRE_ALONE: u32 = 60;
const BOSS_FIRE_ESCORTED: u32 = 200;

impl EnemyKind {
    /// Initial state for a subtype spawned at `pos`. May adjust `pos`.
    pub fn spawn(enemy: EnemyType, pos: &mut Vec2, size: Vec2) -> Self {
        let upper_half = pos.y < SCREEN_MIDDLE;
        match enemy {
            EnemyType::A => EnemyKind::A,
            EnemyType::B => EnemyKind::B,
            EnemyType::C => EnemyKind::C,
            EnemyType::D => EnemyKind::D { speed_y: 1.0 },
            EnemyType::E => {
                pos.x -= APP_WIDTH + 16.0;
                EnemyKind::E
            }
            EnemyType::F => EnemyKind::F { base_y: pos.y },
            EnemyType::G => EnemyKind::G,
            EnemyType::H => EnemyKind::H { speed_x: 2.0 },
            EnemyType::I => {
                if upper_half {
                    pos.y = PLAYFIELD_TOP - size.y;
                    EnemyKind::I { speed_y: 1.0 }
                } else {
                    pos.y = PLAYFIELD_BOTTOM;
                    EnemyKind::I { speed_y: -1.0 }
                }
            }
            EnemyType::J => EnemyKind::J,
            EnemyType::K => EnemyKind::K { speed_y: 0.5 },
            EnemyType::L => EnemyKind::L { base_y: pos.y },
            EnemyType::M => EnemyKind::M,
            EnemyType::N => EnemyKind::N {
                speed_y: if upper_half { 0.5 } else { -0.5 },
            },
            EnemyType::O => EnemyKind::O { speed_y: 1.0 },
            EnemyType::P => EnemyKind::P,
        }
    }
}

impl Enemy {
    /// Subtype movement and firing for one frame
    pub(super) fn step(&mut self, ctx: &mut StageCtx<'_>) {
        let scroll = ctx.scroll_x_speed();
        let lifetime = self.lifetime;
        let s = &mut self.sprite;

        match &mut self.kind {
            EnemyKind::E => {
                s.pos.x += 1.0;
                if s.pos.x > APP_WIDTH - 1.0 {
                    s.removed = true;
                    return;
                }
            }
            EnemyKind::M => s.pos.x -= scroll,
            EnemyKind::I { speed_y } => {
                s.pos.x -= scroll;
                s.pos.y += *speed_y;
                let gone = if *speed_y > 0.0 {
                    s.pos.y > PLAYFIELD_BOTTOM
                } else {
                    s.pos.y + s.h() < PLAYFIELD_TOP
                };
                if gone || s.is_off_left() {
                    s.removed = true;
                    return;
                }
            }
            kind => {
                let dx = match kind {
                    EnemyKind::A => 1.0,
                    EnemyKind::B => 1.5,
                    EnemyKind::D { .. } => scroll + 0.5,
                    EnemyKind::F { .. } => 1.25,
                    EnemyKind::G => 2.0,
                    EnemyKind::H { speed_x } => *speed_x,
                    EnemyKind::N { .. } => 4.0,
                    EnemyKind::O { .. } => 1.5,
                    EnemyKind::P => 0.75,
                    _ => scroll,
                };
                s.pos.x -= dx;
                if s.is_off_left() {
                    s.removed = true;
                    return;
                }
            }
        }

        let s = &mut self.sprite;
        match &mut self.kind {
            EnemyKind::A => {
                if lifetime == 30 {
                    shoot_at_player(s, ctx, 2.0, 0);
                }
            }
            EnemyKind::B => {
                s.pos.y += sin_deg(lifetime as f32 * std::f32::consts::PI);
                if lifetime == 20 {
                    shoot_at_player(s, ctx, 2.0, 0);
                }
            }
            EnemyKind::C => {
                if lifetime == 25 || lifetime == 50 {
                    shoot_at_player(s, ctx, 2.0, 0);
                }
            }
            EnemyKind::D { speed_y } => {
                s.pos.y += *speed_y;
                if s.pos.y <= PLAYFIELD_TOP || s.pos.y + s.h() >= PLAYFIELD_BOTTOM {
                    *speed_y = -*speed_y;
                }
                if lifetime % 90 == 45 {
                    let a = angle_to_player(s, ctx);
                    for spread in [-15.0, 0.0, 15.0] {
                        shoot_at_angle(s, ctx, 2.0, a + spread, 0);
                    }
                }
            }
            EnemyKind::E => {
                if lifetime == 200 {
                    shoot_at_angle(s, ctx, 2.0, 180.0, 0);
                }
            }
            EnemyKind::F { base_y } => {
                s.pos.y = *base_y + sin_deg(lifetime as f32 * 4.0) * 24.0;
                if lifetime == 40 {
                    for deg in [150.0, 180.0, 210.0] {
                        shoot_at_angle(s, ctx, 2.0, deg, 0);
                    }
                }
            }
            EnemyKind::G => {
                let target_y = ctx.world.player_pos.y - 4.0;
                let dy = target_y - s.pos.y;
                s.pos.y += dy.clamp(-0.75, 0.75);
            }
            EnemyKind::H { speed_x } => {
                match lifetime {
                    40 => *speed_x = 0.0,
                    60 => {
                        for delay in [0, 5, 10] {
                            shoot_at_player(s, ctx, 2.5, delay);
                        }
                    }
                    100 => *speed_x = 3.0,
                    _ => {}
                }
            }
            EnemyKind::I { .. } => {
                if lifetime == 30 {
                    shoot_at_player(s, ctx, 2.0, 0);
                }
            }
            EnemyKind::J => {
                if lifetime % 60 == 30 {
                    let angles = if s.pos.y >= SCREEN_MIDDLE {
                        [240.0, 270.0, 300.0]
                    } else {
                        [60.0, 90.0, 120.0]
                    };
                    for deg in angles {
                        shoot_at_angle(s, ctx, 1.5, deg, 0);
                    }
                }
            }
            EnemyKind::K { speed_y } => {
                s.pos.y += *speed_y;
                if (*speed_y > 0.0 && s.pos.y >= 120.0) || (*speed_y < 0.0 && s.pos.y <= 40.0) {
                    *speed_y = -*speed_y;
                }
                if boss_should_fire(lifetime, ctx) {
                    for delay in [0, 5, 10] {
                        shoot_at_player(s, ctx, 2.5, delay);
                    }
                }
            }
            EnemyKind::L { base_y } => {
                let y = *base_y + sin_deg(lifetime as f32 * 2.0) * 32.0;
                s.pos.y = y.clamp(PLAYFIELD_TOP, PLAYFIELD_BOTTOM - s.h());
                if boss_should_fire(lifetime, ctx) {
                    let a = angle_to_player(s, ctx);
                    for spread in [-40.0, -20.0, 0.0, 20.0, 40.0] {
                        shoot_at_angle(s, ctx, 2.0, a + spread, 0);
                    }
                }
            }
            EnemyKind::M => {
                if boss_should_fire(lifetime, ctx) {
                    for delay in [0, 5, 25, 30] {
                        shoot_at_player(s, ctx, 1.5, delay);
                    }
                }
            }
            EnemyKind::N { speed_y } => s.pos.y += *speed_y,
            EnemyKind::O { speed_y } => {
                s.pos.y += *speed_y;
                if lifetime % 30 == 0 {
                    *speed_y = -*speed_y;
                }
                if lifetime == 45 {
                    shoot_at_player(s, ctx, 2.0, 0);
                }
            }
            EnemyKind::P => {
                if lifetime % 120 == 60 {
                    for i in 0..8 {
                        shoot_at_angle(s, ctx, 1.5, i as f32 * 45.0, 0);
                    }
                }
            }
        }
    }
}

/// Bosses fire faster once their escorts are gone
fn boss_should_fire(lifetime: u32, ctx: &StageCtx<'_>) -> bool {
    let interval = if ctx.world.num_enemies == 0 {
        BOSS_FIRE_ALONE
    } else {
        BOSS_FIRE_ESCORTED
    };
    lifetime % interval == 0
}

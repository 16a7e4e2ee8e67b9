//! Scrolling tile background
//!
//! A stage layout is a grid of 8px tiles, [`MAP_ROWS`] tall, covering the
//! playfield band. `#` is solid terrain, `.` is empty and `A`..`P` mark
//! where an enemy of that type enters. Markers spawn once their column
//! scrolls onto the right edge of the screen.

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy_kinds::EnemyType;
use crate::consts::*;
use crate::renderer::DrawList;

pub const TILE_SIZE: f32 = 8.0;
/// Rows covering the playfield (160px / 8)
pub const MAP_ROWS: usize = 20;

const TILE_EMPTY: char = '.';
const TILE_SOLID: char = '#';
const TERRAIN_COLOUR: u8 = 3;
const TERRAIN_EDGE_COLOUR: u8 = 11;

/// Serializable stage description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub name: String,
    /// Pixels scrolled per frame
    pub scroll_speed: f32,
    #[serde(default)]
    pub vortex: bool,
    pub rows: Vec<String>,
}

impl StageLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json).context("Failed to parse stage layout")?;
        if layout.rows.len() != MAP_ROWS {
            anyhow::bail!(
                "Stage layout '{}' has {} rows, expected {}",
                layout.name,
                layout.rows.len(),
                MAP_ROWS
            );
        }
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize stage layout")
    }

    /// Empty, scrolling layout `width` tiles wide
    pub fn empty(width: usize) -> Self {
        Self {
            name: "empty".to_string(),
            scroll_speed: 1.0,
            vortex: false,
            rows: vec![TILE_EMPTY.to_string().repeat(width); MAP_ROWS],
        }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    /// Place an enemy marker (used by tests and layout tooling)
    pub fn set_marker(&mut self, col: usize, row: usize, enemy: EnemyType) {
        if let Some(r) = self.rows.get_mut(row) {
            let mut chars: Vec<char> = r.chars().collect();
            if col >= chars.len() {
                chars.resize(col + 1, TILE_EMPTY);
            }
            chars[col] = enemy.marker();
            *r = chars.into_iter().collect();
        }
    }

    /// Built-in layout for a stage number.
    ///
    /// Normal stages have rolling ceiling and floor terrain and end with a
    /// boss. Vortex stages are open and end when the scroll runs out.
    pub fn builtin(stage_num: u8) -> Self {
        let vortex = stage_num % 2 == 0;
        let width = if vortex { 80 } else { 112 };
        let mut grid = vec![vec![TILE_EMPTY; width]; MAP_ROWS];

        if !vortex {
            for col in 0..width {
                let seed = col + usize::from(stage_num) * 3;
                let ceiling = 1 + (seed / 7) % 3;
                let floor = 1 + ((seed + 4) / 5) % 3;
                for row in grid.iter_mut().take(ceiling) {
                    row[col] = TILE_SOLID;
                }
                for row in grid.iter_mut().skip(MAP_ROWS - floor) {
                    row[col] = TILE_SOLID;
                }
            }
        }

        let roster = stage_roster(stage_num);
        let last_wave_col = if vortex { width - 4 } else { width - 16 };
        let mut col = 36;
        let mut i = 0;
        while col <= last_wave_col && !roster.is_empty() {
            let (enemy, row) = roster[i % roster.len()];
            grid[row][col] = enemy.marker();
            col += 10;
            i += 1;
        }

        if let Some(boss) = stage_boss(stage_num) {
            grid[6][width - 6] = boss.marker();
        }

        Self {
            name: format!("stage_{stage_num}"),
            scroll_speed: if vortex { 1.0 } else { 0.5 },
            vortex,
            rows: grid.into_iter().map(|r| r.into_iter().collect()).collect(),
        }
    }
}

fn stage_roster(stage_num: u8) -> &'static [(EnemyType, usize)] {
    use EnemyType::*;
    match stage_num {
        1 => &[(A, 6), (B, 10), (C, 4), (D, 8), (A, 13), (F, 9), (G, 7), (B, 12)],
        2 => &[(N, 4), (O, 10), (E, 8), (N, 14), (I, 2), (O, 6)],
        3 => &[(D, 8), (F, 10), (H, 6), (J, 15), (G, 11), (C, 14), (P, 9)],
        4 => &[(N, 12), (E, 6), (O, 8), (I, 16), (H, 10), (N, 5)],
        _ => &[(B, 6), (G, 12), (H, 8), (J, 15), (P, 10), (F, 9), (D, 7), (O, 11)],
    }
}

fn stage_boss(stage_num: u8) -> Option<EnemyType> {
    match stage_num {
        1 => Some(EnemyType::K),
        3 => Some(EnemyType::L),
        n if n >= FINAL_STAGE => Some(EnemyType::M),
        _ => None,
    }
}

/// Enemy entering the screen this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub enemy: EnemyType,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundUpdate {
    pub spawns: Vec<SpawnRequest>,
    /// Scroll has run out on a vortex stage
    pub reached_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Marker {
    col: usize,
    row: usize,
    enemy: EnemyType,
}

#[derive(Debug, Clone)]
pub struct Background {
    width: usize,
    solid: Vec<bool>,
    markers: Vec<Marker>,
    next_marker: usize,
    scroll_x: f32,
    scroll_x_speed: f32,
    max_scroll: f32,
    vortex: bool,
}

impl Background {
    pub fn new(layout: &StageLayout) -> Self {
        let width = layout.width();
        let mut solid = vec![false; width * MAP_ROWS];
        let mut markers = Vec::new();

        for (row, line) in layout.rows.iter().take(MAP_ROWS).enumerate() {
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    TILE_SOLID => solid[row * width + col] = true,
                    TILE_EMPTY => {}
                    other => match EnemyType::from_marker(other) {
                        Some(enemy) => markers.push(Marker { col, row, enemy }),
                        None => log::warn!("Unknown tile '{other}' at {col},{row} in {}", layout.name),
                    },
                }
            }
        }
        markers.sort_by_key(|m| (m.col, m.row));

        Self {
            width,
            solid,
            markers,
            next_marker: 0,
            scroll_x: 0.0,
            scroll_x_speed: layout.scroll_speed,
            max_scroll: (width as f32 * TILE_SIZE - APP_WIDTH).max(0.0),
            vortex: layout.vortex,
        }
    }

    /// Current scroll speed; zero once the end of the map is reached
    pub fn scroll_x_speed(&self) -> f32 {
        self.scroll_x_speed
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    /// Layout is a vortex stage; fixed for the life of the stage
    pub fn is_vortex(&self) -> bool {
        self.vortex
    }

    /// Terrain test for a single pixel in screen space
    pub fn is_point_colliding(&self, x: f32, y: f32) -> bool {
        if !(PLAYFIELD_TOP..PLAYFIELD_BOTTOM).contains(&y) {
            return false;
        }
        let map_x = x + self.scroll_x;
        if map_x < 0.0 {
            return false;
        }
        let col = (map_x / TILE_SIZE) as usize;
        let row = ((y - PLAYFIELD_TOP) / TILE_SIZE) as usize;
        col < self.width && row < MAP_ROWS && self.solid[row * self.width + col]
    }

    /// Scroll one frame and report enemies whose marker came into view
    pub fn update(&mut self) -> BackgroundUpdate {
        let mut result = BackgroundUpdate::default();

        if self.scroll_x < self.max_scroll {
            self.scroll_x = (self.scroll_x + self.scroll_x_speed).min(self.max_scroll);
        } else {
            self.scroll_x_speed = 0.0;
            result.reached_end = self.vortex;
        }

        while let Some(marker) = self.markers.get(self.next_marker) {
            let screen_x = marker.col as f32 * TILE_SIZE - self.scroll_x;
            if screen_x >= APP_WIDTH {
                break;
            }
            result.spawns.push(SpawnRequest {
                enemy: marker.enemy,
                pos: Vec2::new(screen_x, PLAYFIELD_TOP + marker.row as f32 * TILE_SIZE),
            });
            self.next_marker += 1;
        }

        result
    }

    pub fn draw(&self, out: &mut DrawList) {
        let first_col = (self.scroll_x / TILE_SIZE) as usize;
        let last_col = (((self.scroll_x + APP_WIDTH) / TILE_SIZE) as usize + 1).min(self.width);
        for row in 0..MAP_ROWS {
            for col in first_col..last_col {
                if !self.solid[row * self.width + col] {
                    continue;
                }
                let open_above = row == 0 || !self.solid[(row - 1) * self.width + col];
                let open_below = row + 1 == MAP_ROWS || !self.solid[(row + 1) * self.width + col];
                let colour = if open_above || open_below {
                    TERRAIN_EDGE_COLOUR
                } else {
                    TERRAIN_COLOUR
                };
                out.rect(
                    col as f32 * TILE_SIZE - self.scroll_x,
                    PLAYFIELD_TOP + row as f32 * TILE_SIZE,
                    TILE_SIZE,
                    TILE_SIZE,
                    colour,
                );
            }
        }
    }
}

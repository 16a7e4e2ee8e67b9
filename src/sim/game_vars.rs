//! Playthrough-scoped state: score, lives, stage and weapons
//!
//! Survives stage transitions, reset by a new game.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVars {
    pub score: u32,
    pub hi_score: u32,
    pub lives: u8,
    pub stage_num: u8,
    pub current_weapon: usize,
    pub weapon_levels: [u8; MAX_WEAPONS],
}

impl Default for GameVars {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameVars {
    pub fn new(hi_score: u32) -> Self {
        Self {
            score: 0,
            hi_score,
            lives: STARTING_LIVES,
            stage_num: FIRST_STAGE,
            current_weapon: 0,
            weapon_levels: [0; MAX_WEAPONS],
        }
    }

    /// Fresh playthrough from the first stage
    pub fn new_game(&mut self) {
        self.continue_game();
        self.stage_num = FIRST_STAGE;
    }

    /// Restart on the current stage with a fresh score, lives and weapons
    pub fn continue_game(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.current_weapon = 0;
        self.weapon_levels = [0; MAX_WEAPONS];
    }

    /// Add points, capped at the six-digit display limit
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount).min(MAX_SCORE);
        self.hi_score = self.hi_score.max(self.score);
    }

    pub fn subtract_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn add_life(&mut self) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    pub fn decrease_all_weapon_levels(&mut self, amount: u8) {
        for lvl in self.weapon_levels.iter_mut() {
            *lvl = lvl.saturating_sub(amount);
        }
    }

    pub fn increase_weapon_level(&mut self, weapon: usize) {
        if let Some(lvl) = self.weapon_levels.get_mut(weapon) {
            *lvl = (*lvl + 1).min(MAX_WEAPON_LEVEL);
        }
    }

    pub fn change_weapon(&mut self, weapon: usize) {
        if weapon < MAX_WEAPONS {
            self.current_weapon = weapon;
        }
    }

    pub fn current_weapon_level(&self) -> u8 {
        self.weapon_levels[self.current_weapon]
    }

    /// Advance the stage counter. Returns false once the final stage is done.
    pub fn go_to_next_stage(&mut self) -> bool {
        if self.stage_num >= FINAL_STAGE {
            return false;
        }
        self.stage_num += 1;
        true
    }

    /// Even stages are vortex stages
    pub fn is_vortex_stage(&self) -> bool {
        self.stage_num % 2 == 0
    }
}

//! Input sources for headless runs
//!
//! An agent is asked once per frame for the set of held buttons; taps are
//! derived from that by [`InputState::next`](crate::input::InputState::next).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::{Button, Buttons};

pub trait Agent {
    /// Buttons held during `frame`
    fn act(&mut self, frame: u64) -> Buttons;
}

/// Presses nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleAgent;

impl Agent for IdleAgent {
    fn act(&mut self, _frame: u64) -> Buttons {
        Buttons::NONE
    }
}

/// Chance per frame of dropping the current movement early
const REROLL_CHANCE: f64 = 0.2;
/// Chance per frame of holding fire
const FIRE_CHANCE: f64 = 0.9;
const MIN_HOLD_FRAMES: u32 = 5;
const MAX_HOLD_FRAMES: u32 = 15;

/// Eight directions plus standing still
const MOVES: [&[Button]; 9] = [
    &[],
    &[Button::Up],
    &[Button::Down],
    &[Button::Left],
    &[Button::Right],
    &[Button::Up, Button::Left],
    &[Button::Up, Button::Right],
    &[Button::Down, Button::Left],
    &[Button::Down, Button::Right],
];

/// Wanders with persistent movement and fires most frames
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: Pcg32,
    movement: Buttons,
    held_for: u32,
    hold_frames: u32,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            movement: Buttons::NONE,
            held_for: 0,
            hold_frames: 0,
        }
    }

    fn reroll(&mut self) {
        let idx = self.rng.random_range(0..MOVES.len());
        self.movement = Buttons::from_slice(MOVES[idx]);
        self.hold_frames = self.rng.random_range(MIN_HOLD_FRAMES..=MAX_HOLD_FRAMES);
        self.held_for = 0;
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _frame: u64) -> Buttons {
        if self.held_for >= self.hold_frames || self.rng.random_bool(REROLL_CHANCE) {
            self.reroll();
        } else {
            self.held_for += 1;
        }

        let mut held = self.movement;
        if self.rng.random_bool(FIRE_CHANCE) {
            held.insert(Button::Fire);
        }
        held
    }
}

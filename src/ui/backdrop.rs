//! Scrolling star backdrop shared by the menu screens

use crate::consts::{APP_WIDTH, PLAYFIELD_TOP};
use crate::renderer::DrawList;

const STAR_COLOUR: u8 = 5;
const STARS_PER_SCREEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    scroll_x: f32,
    speed: f32,
}

impl Backdrop {
    pub fn new(speed: f32) -> Self {
        Self {
            scroll_x: 0.0,
            speed,
        }
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    /// Scroll left, wrapping every screen width
    pub fn update(&mut self) {
        self.scroll_x -= self.speed;
        if self.scroll_x <= -APP_WIDTH {
            self.scroll_x += APP_WIDTH;
        }
    }

    pub fn draw(&self, out: &mut DrawList) {
        for copy in [0.0, APP_WIDTH] {
            for i in 0..STARS_PER_SCREEN {
                let x = self.scroll_x + copy + i as f32 * 16.0 + (i * 7 % 11) as f32;
                let y = PLAYFIELD_TOP + ((i * 37) % 160) as f32;
                out.rect(x, y, 1.0, 1.0, STAR_COLOUR);
            }
        }
    }
}

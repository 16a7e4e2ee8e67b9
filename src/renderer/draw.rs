//! Draw commands in 16-colour palette space

use serde::{Deserialize, Serialize};

/// Image bank holding sprites, fonts and tiles
pub const SPRITE_BANK: u8 = 0;

/// Replace one palette index with another for a single blit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalSwap {
    pub from: u8,
    pub to: u8,
}

impl PalSwap {
    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }
}

/// A single draw command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    /// Copy a region of the sprite bank. Negative `w`/`h` mirror the source.
    Blit {
        x: f32,
        y: f32,
        u: u16,
        v: u16,
        w: f32,
        h: f32,
        /// Palette index treated as transparent
        colkey: Option<u8>,
        pal: Option<PalSwap>,
    },
    /// Filled rectangle
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        colour: u8,
    },
    /// Text in the built-in 4x6 font
    Text {
        x: f32,
        y: f32,
        text: String,
        colour: u8,
    },
}

/// Ordered list of commands for one frame (later commands draw on top)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        x: f32,
        y: f32,
        u: u16,
        v: u16,
        w: f32,
        h: f32,
        colkey: Option<u8>,
        pal: Option<PalSwap>,
    ) {
        self.cmds.push(DrawCmd::Blit {
            x,
            y,
            u,
            v,
            w,
            h,
            colkey,
            pal,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, colour: u8) {
        self.cmds.push(DrawCmd::Rect { x, y, w, h, colour });
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, colour: u8) {
        self.cmds.push(DrawCmd::Text {
            x,
            y,
            text: text.into(),
            colour,
        });
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// All text strings in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

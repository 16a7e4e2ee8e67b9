//! Game-complete screen

use super::{Backdrop, TEXT_COLOUR};
use crate::audio::{AudioManager, MusicTrack, STAGE_MUSIC_CHANNELS};
use crate::input::{Button, InputState};
use crate::renderer::DrawList;
use crate::sim::GameVars;

const BG_SCROLL_SPEED: f32 = 4.0;

#[derive(Debug)]
pub struct Complete {
    audio: AudioManager,
    backdrop: Backdrop,
}

impl Complete {
    pub fn new(mut audio: AudioManager) -> Self {
        let music = audio.load_music(MusicTrack::GameComplete);
        audio.play_music(music, false, STAGE_MUSIC_CHANNELS, None);
        Self {
            audio,
            backdrop: Backdrop::new(BG_SCROLL_SPEED),
        }
    }

    /// True once the player asks to return to the titles
    pub fn update(&mut self, input: &InputState) -> bool {
        self.audio.tick();
        self.backdrop.update();
        input.has_tapped(Button::Fire) || input.has_tapped(Button::Secondary)
    }

    pub fn draw(&self, vars: &GameVars, out: &mut DrawList) {
        self.backdrop.draw(out);
        out.text(56.0, 72.0, "THANKS FOR PLAYING", TEXT_COLOUR);
        out.text(88.0, 96.0, "FINAL SCORE", TEXT_COLOUR);
        out.text(104.0, 112.0, format!("{:06}", vars.score), TEXT_COLOUR);
    }

    pub fn exit(&mut self) -> AudioManager {
        self.audio.stop_music(STAGE_MUSIC_CHANNELS);
        std::mem::take(&mut self.audio)
    }
}

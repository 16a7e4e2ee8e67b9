//! Title screen with the GAME START / CONTINUE menu

use super::{Backdrop, TEXT_COLOUR, hud};
use crate::audio::{AudioManager, MusicTrack, NUM_CHANNELS};
use crate::input::{Button, InputState};
use crate::renderer::DrawList;
use crate::sim::GameVars;

const BG_SCROLL_SPEED: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleChoice {
    NewGame,
    Continue,
}

struct MenuItem {
    x: f32,
    y: f32,
    label: &'static str,
    choice: TitleChoice,
}

const MENU: [MenuItem; 2] = [
    MenuItem {
        x: 96.0,
        y: 112.0,
        label: "GAME START",
        choice: TitleChoice::NewGame,
    },
    MenuItem {
        x: 96.0,
        y: 128.0,
        label: "CONTINUE",
        choice: TitleChoice::Continue,
    },
];

#[derive(Debug)]
pub struct Titles {
    audio: AudioManager,
    backdrop: Backdrop,
    selected: usize,
}

impl Titles {
    pub fn new(mut audio: AudioManager) -> Self {
        let music = audio.load_music(MusicTrack::Title);
        audio.play_music(music, true, NUM_CHANNELS, None);
        Self {
            audio,
            backdrop: Backdrop::new(BG_SCROLL_SPEED),
            selected: 0,
        }
    }

    pub fn selected(&self) -> TitleChoice {
        MENU[self.selected].choice
    }

    /// Returns the chosen menu entry once Fire or Secondary is tapped
    pub fn update(&mut self, input: &InputState) -> Option<TitleChoice> {
        self.audio.tick();

        self.backdrop.update();

        if input.has_tapped(Button::Up) || input.has_tapped(Button::Down) {
            self.selected = 1 - self.selected;
        }

        if input.has_tapped(Button::Fire) || input.has_tapped(Button::Secondary) {
            return Some(self.selected());
        }
        None
    }

    pub fn draw(&self, vars: &GameVars, out: &mut DrawList) {
        self.backdrop.draw(out);

        out.text(88.0, 64.0, "VORTEXION", TEXT_COLOUR);

        for (i, item) in MENU.iter().enumerate() {
            if i == self.selected {
                out.blit(item.x - 16.0, item.y - 4.0, 0, 0, 16.0, 16.0, Some(0), None);
            }
            out.text(item.x, item.y, item.label, TEXT_COLOUR);
        }

        hud::draw(vars, out);
    }

    /// Stop the title music and hand the audio manager back
    pub fn exit(&mut self) -> AudioManager {
        self.audio.stop_music(NUM_CHANNELS);
        std::mem::take(&mut self.audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_toggle_and_select() {
        let mut titles = Titles::new(AudioManager::default());
        assert_eq!(titles.update(&InputState::default()), None);
        assert_eq!(titles.selected(), TitleChoice::NewGame);

        titles.update(&InputState::tap(Button::Down));
        assert_eq!(titles.selected(), TitleChoice::Continue);
        titles.update(&InputState::tap(Button::Up));
        assert_eq!(titles.selected(), TitleChoice::NewGame);
        titles.update(&InputState::tap(Button::Down));

        assert_eq!(
            titles.update(&InputState::tap(Button::Secondary)),
            Some(TitleChoice::Continue)
        );
    }

    #[test]
    fn test_title_music_loops_until_exit() {
        let mut titles = Titles::new(AudioManager::default());
        for _ in 0..3000 {
            titles.update(&InputState::default());
        }
        assert!(titles.audio.is_music_playing());
        let audio = titles.exit();
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_draw_menu() {
        let titles = Titles::new(AudioManager::default());
        let mut out = DrawList::new();
        titles.draw(&GameVars::default(), &mut out);
        assert!(out.contains_text("GAME START"));
        assert!(out.contains_text("CONTINUE"));
    }
}

//! Top-level game controller
//!
//! Switches between the title screen, stages and the completion screen.
//! A transition requested during a frame is stored in `next_state` and
//! carried out at the start of the next `update`, after the outgoing
//! screen has stopped its music and handed the audio manager back.

use super::game_vars::GameVars;
use super::stage::{Stage, StageRequest};
use super::state::{GameScreen, StageEvent};
use crate::audio::AudioManager;
use crate::highscores::HighScores;
use crate::input::{Button, InputState};
use crate::renderer::DrawList;
use crate::settings::Settings;
use crate::ui::{Complete, TitleChoice, Titles};

#[derive(Debug)]
enum ActiveState {
    Titles(Titles),
    Stage(Box<Stage>),
    Complete(Complete),
}

impl ActiveState {
    fn screen(&self) -> GameScreen {
        match self {
            ActiveState::Titles(_) => GameScreen::Titles,
            ActiveState::Stage(_) => GameScreen::Stage,
            ActiveState::Complete(_) => GameScreen::Complete,
        }
    }

    /// Stop the screen's music and take its audio manager
    fn exit(&mut self) -> AudioManager {
        match self {
            ActiveState::Titles(titles) => titles.exit(),
            ActiveState::Stage(stage) => stage.exit(),
            ActiveState::Complete(complete) => complete.exit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    NewGame,
    Continue,
    NextStage,
    RestartGame,
    Titles,
}

#[derive(Debug)]
pub struct Game {
    pub vars: GameVars,
    state: ActiveState,
    next_state: Option<GameScreen>,
    seed: u64,
    /// Stages entered so far; offsets the seed so each stage rolls differently
    stages_started: u64,
    allow_invincibility_toggle: bool,
    data_collection: bool,
    high_scores: HighScores,
    events: Vec<StageEvent>,
    frame: u64,
}

impl Game {
    pub fn new(settings: &Settings, mut audio: AudioManager, high_scores: HighScores) -> Self {
        audio.set_music_volume(settings.music_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let mut vars = GameVars::new(high_scores.top_score().unwrap_or(0));
        let mut stages_started = 0;
        let state = if settings.skip_titles {
            vars.new_game();
            stages_started += 1;
            ActiveState::Stage(Box::new(Stage::new(&vars, audio, settings.seed)))
        } else {
            ActiveState::Titles(Titles::new(audio))
        };
        log::info!("Starting on {:?}", state.screen());

        Self {
            vars,
            state,
            next_state: None,
            seed: settings.seed,
            stages_started,
            allow_invincibility_toggle: settings.allow_invincibility_toggle,
            data_collection: false,
            high_scores,
            events: Vec::new(),
            frame: 0,
        }
    }

    pub fn screen(&self) -> GameScreen {
        self.state.screen()
    }

    pub fn stage(&self) -> Option<&Stage> {
        match &self.state {
            ActiveState::Stage(stage) => Some(stage.as_ref()),
            _ => None,
        }
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn is_collecting_data(&self) -> bool {
        self.data_collection
    }

    /// Events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame
    pub fn update(&mut self, input: &InputState) {
        self.frame += 1;

        if let Some(next) = self.next_state.take() {
            self.switch_state(next);
        }

        if input.has_tapped(Button::DataCollectToggle) {
            self.data_collection = !self.data_collection;
            log::info!("Data collection {}", if self.data_collection { "on" } else { "off" });
        }

        let input = self.filter_input(input);
        let transition = match &mut self.state {
            ActiveState::Titles(titles) => titles.update(&input).map(|choice| match choice {
                TitleChoice::NewGame => Transition::NewGame,
                TitleChoice::Continue => Transition::Continue,
            }),
            ActiveState::Stage(stage) => {
                let request = stage.update(&mut self.vars, &input);
                self.events.extend(stage.drain_events());
                request.map(|r| match r {
                    StageRequest::RestartGame => Transition::RestartGame,
                    StageRequest::NextStage => Transition::NextStage,
                })
            }
            ActiveState::Complete(complete) => complete.update(&input).then_some(Transition::Titles),
        };

        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    pub fn draw(&self, out: &mut DrawList) {
        match &self.state {
            ActiveState::Titles(titles) => titles.draw(&self.vars, out),
            ActiveState::Stage(stage) => stage.draw(&self.vars, out),
            ActiveState::Complete(complete) => complete.draw(&self.vars, out),
        }
    }

    fn filter_input(&self, input: &InputState) -> InputState {
        if self.allow_invincibility_toggle {
            *input
        } else {
            input.without(Button::InvincibilityToggle)
        }
    }

    fn apply(&mut self, transition: Transition) {
        log::debug!("Transition {transition:?}");
        let next = match transition {
            Transition::NewGame => {
                self.vars.new_game();
                GameScreen::Stage
            }
            Transition::Continue => {
                self.vars.continue_game();
                GameScreen::Stage
            }
            Transition::NextStage => {
                if self.vars.go_to_next_stage() {
                    GameScreen::Stage
                } else {
                    self.record_high_score();
                    GameScreen::Complete
                }
            }
            Transition::RestartGame => {
                self.record_high_score();
                self.vars.new_game();
                GameScreen::Stage
            }
            Transition::Titles => GameScreen::Titles,
        };
        self.next_state = Some(next);
    }

    fn record_high_score(&mut self) {
        self.high_scores
            .record(self.vars.score, self.vars.stage_num, self.frame);
    }

    fn switch_state(&mut self, screen: GameScreen) {
        let audio = self.state.exit();
        self.state = match screen {
            GameScreen::Titles => ActiveState::Titles(Titles::new(audio)),
            GameScreen::Stage => {
                let seed = self.seed.wrapping_add(self.stages_started);
                self.stages_started += 1;
                ActiveState::Stage(Box::new(Stage::new(&self.vars, audio, seed)))
            }
            GameScreen::Complete => ActiveState::Complete(Complete::new(audio)),
        };
        log::info!("Switched to {screen:?} (stage {})", self.vars.stage_num);
        self.events.push(StageEvent::ScreenChanged { to: screen });
    }
}

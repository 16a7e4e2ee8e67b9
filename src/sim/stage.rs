//! Stage controller
//!
//! Owns every entity list and the stage phase machine. One `update` call
//! advances exactly one frame:
//! 1. phase-specific logic (pause, death, respawn, stage clear)
//! 2. background scroll and enemy entry
//! 3. list updates: powerups, player shots, enemies, bosses, enemy shots
//! 4. stage-clear check
//! 5. collision passes
//! 6. explosions
//! 7. purge of everything marked for removal
//!
//! Paused and GameOver stop before step 2.

use std::mem;

use super::background::{Background, SpawnRequest, StageLayout};
use super::collision::{collide_list, lists_collide};
use super::context::{StageCtx, StageEnv, WorldInfo};
use super::enemy::Enemy;
use super::enemy_shot::EnemyShot;
use super::explosion::Explosion;
use super::game_vars::GameVars;
use super::player::Player;
use super::player_shot::PlayerShot;
use super::powerup::Powerup;
use super::sprite::{Entity, draw_list, live_count, purge, update_list};
use super::state::{
    PLAYER_SPAWN_IN_FRAMES, STAGE_CLEAR_BANNER_FRAMES, STAGE_CLEAR_FRAMES, StageEvent, StagePhase,
};
use crate::audio::{AudioManager, MusicTrack, STAGE_MUSIC_CHANNELS};
use crate::consts::FINAL_STAGE;
use crate::input::{Button, InputState};
use crate::renderer::DrawList;
use crate::ui::hud;

/// Frame at which the stage-clear jingle is joined
const STAGE_CLEAR_MUSIC_START: u32 = 620;

/// What the stage asks the game controller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRequest {
    RestartGame,
    NextStage,
}

/// All entities on the stage
#[derive(Debug, Default)]
pub struct World {
    pub player: Player,
    pub player_shots: Vec<PlayerShot>,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Enemy>,
    pub enemy_shots: Vec<EnemyShot>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<Powerup>,
}

impl World {
    fn info(&self) -> WorldInfo {
        WorldInfo {
            player_pos: self.player.sprite.pos,
            num_enemies: live_count(&self.enemies),
            player_shots: live_count(&self.player_shots),
        }
    }

    fn purge(&mut self) {
        purge(&mut self.player_shots);
        purge(&mut self.enemies);
        purge(&mut self.bosses);
        purge(&mut self.enemy_shots);
        purge(&mut self.explosions);
        purge(&mut self.powerups);
    }

    /// Number of entities still marked for removal (zero after a frame)
    pub fn removed_count(&self) -> usize {
        fn removed<E: Entity>(list: &[E]) -> usize {
            list.iter().filter(|e| e.is_removed()).count()
        }
        removed(&self.player_shots)
            + removed(&self.enemies)
            + removed(&self.bosses)
            + removed(&self.enemy_shots)
            + removed(&self.explosions)
            + removed(&self.powerups)
    }
}

#[derive(Debug)]
pub struct Stage {
    pub phase: StagePhase,
    /// Frames since the last phase change
    pub state_time: u32,
    /// Set by boss deaths and vortex ends; consumed every frame
    pub check_stage_clear: bool,
    pub world: World,
    pub env: StageEnv,
    stage_num: u8,
    /// A request has already been handed to the game controller
    exit_requested: bool,
}

impl Stage {
    /// Enter the built-in stage for `vars.stage_num`
    pub fn new(vars: &GameVars, audio: AudioManager, seed: u64) -> Self {
        Self::with_layout(vars, &StageLayout::builtin(vars.stage_num), audio, seed)
    }

    pub fn with_layout(vars: &GameVars, layout: &StageLayout, audio: AudioManager, seed: u64) -> Self {
        let stage_num = vars.stage_num;
        let mut env = StageEnv::new(Background::new(layout), audio, seed);
        env.powerup_cycle.reset();

        let music = env.audio.load_music(MusicTrack::for_stage(stage_num));
        env.audio.play_music(music, true, STAGE_MUSIC_CHANNELS, None);
        log::info!("Entering stage {stage_num} ({})", layout.name);

        Self {
            phase: StagePhase::PlayerSpawned,
            state_time: 0,
            check_stage_clear: false,
            world: World::default(),
            env,
            stage_num,
            exit_requested: false,
        }
    }

    pub fn stage_num(&self) -> u8 {
        self.stage_num
    }

    /// Stop the music and hand the audio manager back
    pub fn exit(&mut self) -> AudioManager {
        self.env.audio.stop_music(crate::audio::NUM_CHANNELS);
        mem::take(&mut self.env.audio)
    }

    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        mem::take(&mut self.env.events)
    }

    fn switch_phase(&mut self, to: StagePhase) {
        log::debug!("Stage phase {:?} -> {:?}", self.phase, to);
        self.env.events.push(StageEvent::PhaseChanged {
            from: self.phase,
            to,
        });
        self.phase = to;
        self.state_time = 0;
    }

    fn request(&mut self, request: StageRequest) -> Option<StageRequest> {
        if mem::replace(&mut self.exit_requested, true) {
            return None;
        }
        Some(request)
    }

    /// Run `f` with a callback context, then move queued spawns into the lists
    fn with_ctx<R>(
        &mut self,
        vars: &mut GameVars,
        input: &InputState,
        f: impl FnOnce(&mut World, &mut StageCtx<'_>) -> R,
    ) -> R {
        let info = self.world.info();
        let result = {
            let mut ctx = self.env.ctx(vars, input, info);
            f(&mut self.world, &mut ctx)
        };
        self.absorb_spawns();
        result
    }

    fn absorb_spawns(&mut self) {
        let spawns = &mut self.env.spawns;
        let w = &mut self.world;
        w.player_shots.append(&mut spawns.player_shots);
        w.enemy_shots.append(&mut spawns.enemy_shots);
        w.enemies.append(&mut spawns.enemies);
        w.bosses.append(&mut spawns.bosses);
        w.explosions.append(&mut spawns.explosions);
        w.powerups.append(&mut spawns.powerups);
        if mem::take(&mut spawns.check_stage_clear) {
            self.check_stage_clear = true;
        }
    }

    /// Advance one frame. Returns a request for the game controller at most
    /// once per stage.
    pub fn update(&mut self, vars: &mut GameVars, input: &InputState) -> Option<StageRequest> {
        self.env.audio.tick();
        self.env.frame += 1;
        self.state_time += 1;

        let mut request = None;
        match self.phase {
            StagePhase::PlayerSpawned => {
                self.world.player.update_spawned();
                if self.state_time == PLAYER_SPAWN_IN_FRAMES {
                    self.switch_phase(StagePhase::Play);
                }
            }
            StagePhase::Play => {
                if input.has_tapped(Button::Secondary) {
                    self.switch_phase(StagePhase::Paused);
                    return None;
                }
                self.update_play(vars, input);
            }
            StagePhase::PlayerDead => self.update_player_dead(vars),
            StagePhase::Paused => {
                if !input.has_tapped(Button::Secondary) {
                    return None;
                }
                self.switch_phase(StagePhase::Play);
            }
            StagePhase::GameOver => {
                log::info!("Game over, restarting");
                return self.request(StageRequest::RestartGame);
            }
            StagePhase::StageClear => {
                if self.state_time >= STAGE_CLEAR_FRAMES && !self.env.audio.is_music_playing() {
                    request = self.request(StageRequest::NextStage);
                }
            }
        }

        self.simulate(vars, input);
        request
    }

    fn update_play(&mut self, vars: &mut GameVars, input: &InputState) {
        self.with_ctx(vars, input, |w, ctx| w.player.update(ctx));
        if input.has_tapped(Button::InvincibilityToggle) {
            self.world.player.toggle_invincibility();
        }
    }

    fn update_player_dead(&mut self, vars: &GameVars) {
        if !self.world.explosions.is_empty() {
            return;
        }
        if vars.lives > 0 {
            self.world.player = Player::new();
            self.switch_phase(StagePhase::PlayerSpawned);
        } else {
            self.switch_phase(StagePhase::GameOver);
            self.env.events.push(StageEvent::GameOver { score: vars.score });
            let music = self.env.audio.load_music(MusicTrack::GameOver);
            self.env.audio.play_music(music, false, STAGE_MUSIC_CHANNELS, None);
        }
    }

    fn spawn_enemies(&mut self, vars: &mut GameVars, input: &InputState, requests: Vec<SpawnRequest>) {
        if requests.is_empty() {
            return;
        }
        self.with_ctx(vars, input, |_, ctx| {
            for req in requests {
                let enemy = Enemy::new(req.enemy, req.pos);
                ctx.push_event(StageEvent::EnemySpawned {
                    enemy: req.enemy,
                    pos: enemy.sprite.pos,
                });
                if enemy.is_boss() {
                    log::info!("Boss {:?} incoming", req.enemy);
                    let music = ctx.audio.load_music(MusicTrack::Boss);
                    ctx.audio.play_music(music, true, STAGE_MUSIC_CHANNELS, None);
                    ctx.add_boss(enemy);
                } else {
                    ctx.add_enemy(enemy);
                }
            }
        });
    }

    fn stage_clear_init(&mut self, vars: &mut GameVars, input: &InputState) {
        for shot in self.world.enemy_shots.iter_mut() {
            shot.sprite.removed = true;
        }
        self.with_ctx(vars, input, |w, ctx| {
            for e in w.enemies.iter_mut() {
                e.destroy(ctx);
            }
        });
        self.switch_phase(StagePhase::StageClear);
        self.env.events.push(StageEvent::StageCleared {
            stage: self.stage_num,
        });
        log::info!("Stage {} clear", self.stage_num);

        if self.stage_num < FINAL_STAGE {
            let music = self.env.audio.load_music(MusicTrack::StageClear);
            self.env.audio.play_music(
                music,
                false,
                STAGE_MUSIC_CHANNELS,
                Some(STAGE_CLEAR_MUSIC_START),
            );
        } else {
            self.env.audio.stop_music(STAGE_MUSIC_CHANNELS);
        }
    }

    /// Clear enemy bullets and hit every enemy and boss with bomb damage
    fn trigger_bomb(&mut self, vars: &mut GameVars, input: &InputState) {
        for shot in self.world.enemy_shots.iter_mut() {
            shot.sprite.removed = true;
        }
        self.with_ctx(vars, input, |w, ctx| {
            for e in w.enemies.iter_mut().chain(w.bosses.iter_mut()) {
                if !e.is_removed() {
                    e.hit_with_bomb(ctx);
                }
            }
            ctx.push_event(StageEvent::BombTriggered);
        });
    }

    fn simulate(&mut self, vars: &mut GameVars, input: &InputState) {
        let bg = self.env.background.update();
        self.spawn_enemies(vars, input, bg.spawns);
        if bg.reached_end && self.phase == StagePhase::Play {
            self.check_stage_clear = true;
        }

        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.powerups, ctx));
        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.player_shots, ctx));
        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.enemies, ctx));
        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.bosses, ctx));
        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.enemy_shots, ctx));

        // Only a live player clears the stage; the flag waits out a respawn
        match self.phase {
            StagePhase::Play if mem::take(&mut self.check_stage_clear) => {
                if live_count(&self.world.bosses) == 0 {
                    self.stage_clear_init(vars, input);
                }
            }
            StagePhase::StageClear => self.check_stage_clear = false,
            _ => {}
        }

        self.with_ctx(vars, input, |w, ctx| {
            lists_collide(&mut w.player_shots, &mut w.enemies, ctx);
            lists_collide(&mut w.player_shots, &mut w.bosses, ctx);
            collide_list(&mut w.player, &mut w.powerups, ctx);
        });
        if mem::take(&mut self.env.spawns.bomb) {
            self.trigger_bomb(vars, input);
        }
        self.with_ctx(vars, input, |w, ctx| {
            collide_list(&mut w.player, &mut w.enemy_shots, ctx);
            collide_list(&mut w.player, &mut w.enemies, ctx);
            collide_list(&mut w.player, &mut w.bosses, ctx);
        });

        self.with_ctx(vars, input, |w, ctx| update_list(&mut w.explosions, ctx));

        if self.phase == StagePhase::Play && self.world.player.is_removed() {
            self.switch_phase(StagePhase::PlayerDead);
            for shot in self.world.player_shots.iter_mut() {
                shot.sprite.removed = true;
            }
        }

        self.world.purge();
    }

    pub fn draw(&self, vars: &GameVars, out: &mut DrawList) {
        let frame = self.env.frame;
        let w = &self.world;

        self.env.background.draw(out);
        if !matches!(self.phase, StagePhase::PlayerDead | StagePhase::GameOver) {
            w.player.draw(frame, out);
        }
        draw_list(&w.powerups, frame, out);
        draw_list(&w.player_shots, frame, out);
        draw_list(&w.enemies, frame, out);
        draw_list(&w.bosses, frame, out);
        draw_list(&w.explosions, frame, out);
        draw_list(&w.enemy_shots, frame, out);

        hud::draw(vars, out);

        match self.phase {
            StagePhase::Paused => out.text(104.0, 88.0, "PAUSED", 7),
            StagePhase::GameOver => out.text(96.0, 88.0, "GAME OVER", 7),
            StagePhase::StageClear
                if self.stage_num != FINAL_STAGE && self.state_time > STAGE_CLEAR_BANNER_FRAMES =>
            {
                let banner = if self.env.background.is_vortex() {
                    "LEAVING VORTEX"
                } else {
                    "ENTERING VORTEX"
                };
                out.text(80.0, 88.0, banner, 7);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::input::Buttons;
    use crate::sim::context::test_support::Harness;
    use crate::sim::enemy::INVINCIBLE_START_FRAMES;
    use crate::sim::enemy_kinds::EnemyType;
    use crate::sim::powerup::PowerupKind;

    fn empty_stage() -> (Stage, GameVars) {
        let vars = GameVars::default();
        let stage = Stage::with_layout(&vars, &StageLayout::empty(200), AudioManager::default(), 1);
        (stage, vars)
    }

    fn playing_stage() -> (Stage, GameVars) {
        let (mut stage, vars) = empty_stage();
        stage.phase = StagePhase::Play;
        stage.world.player.invincibility_frames = 0;
        (stage, vars)
    }

    fn aged_enemy(enemy_type: EnemyType, pos: Vec2) -> Enemy {
        let mut e = Enemy::new(enemy_type, pos);
        e.lifetime = INVINCIBLE_START_FRAMES;
        e
    }

    fn idle() -> InputState {
        InputState::default()
    }

    #[test]
    fn test_spawn_in_then_play() {
        let (mut stage, mut vars) = empty_stage();
        for _ in 0..PLAYER_SPAWN_IN_FRAMES - 1 {
            stage.update(&mut vars, &idle());
            assert_eq!(stage.phase, StagePhase::PlayerSpawned);
        }
        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::Play);
        assert_eq!(stage.state_time, 0);
        assert_eq!(stage.world.player.sprite.pos.x, 60.0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut stage, mut vars) = playing_stage();
        stage.world.enemies.push(aged_enemy(EnemyType::A, Vec2::new(200.0, 60.0)));

        stage.update(&mut vars, &InputState::tap(Button::Secondary));
        assert_eq!(stage.phase, StagePhase::Paused);
        for _ in 0..50 {
            stage.update(&mut vars, &idle());
        }
        assert_eq!(stage.world.enemies[0].sprite.pos.x, 200.0);
        assert_eq!(stage.world.enemies[0].lifetime, INVINCIBLE_START_FRAMES);
        assert_eq!(stage.env.background.scroll_x(), 0.0);

        stage.update(&mut vars, &InputState::tap(Button::Secondary));
        assert_eq!(stage.phase, StagePhase::Play);
        assert_eq!(stage.world.enemies[0].sprite.pos.x, 199.0);
    }

    #[test]
    fn test_collision_kills_player_then_dead_phase() {
        let (mut stage, mut vars) = playing_stage();
        let player_pos = stage.world.player.sprite.pos;
        stage.world.enemies.push(aged_enemy(EnemyType::A, player_pos + Vec2::new(4.0, 0.0)));
        let held = InputState::new(Buttons::NONE.with(Button::Fire), Buttons::NONE);

        stage.update(&mut vars, &held);

        assert!(stage.world.player.is_removed());
        assert_eq!(stage.phase, StagePhase::PlayerDead);
        assert_eq!(vars.lives, 2);
        assert!(stage.world.player_shots.is_empty());
        assert!(!stage.world.explosions.is_empty());
    }

    #[test]
    fn test_respawn_after_explosions() {
        let (mut stage, mut vars) = playing_stage();
        stage.world.player.kill(&mut stage.env.ctx(&mut vars, &idle(), WorldInfo::default()));
        stage.absorb_spawns();
        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::PlayerDead);

        let mut frames = 0;
        while stage.phase == StagePhase::PlayerDead && frames < 500 {
            stage.update(&mut vars, &idle());
            frames += 1;
        }
        assert_eq!(stage.phase, StagePhase::PlayerSpawned);
        assert!(!stage.world.player.is_removed());
        assert!(stage.world.player.is_invincible());
    }

    #[test]
    fn test_game_over_entered_once() {
        let (mut stage, mut vars) = empty_stage();
        stage.phase = StagePhase::PlayerDead;
        vars.lives = 0;

        assert_eq!(stage.update(&mut vars, &idle()), None);
        assert_eq!(stage.phase, StagePhase::GameOver);
        assert_eq!(stage.update(&mut vars, &idle()), Some(StageRequest::RestartGame));
        assert_eq!(stage.update(&mut vars, &idle()), None);

        let entries = stage
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, StageEvent::PhaseChanged { to: StagePhase::GameOver, .. }))
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_stage_clear_waits_for_bosses() {
        let (mut stage, mut vars) = playing_stage();
        stage.world.bosses.push(aged_enemy(EnemyType::K, Vec2::new(200.0, 60.0)));
        stage.check_stage_clear = true;

        stage.update(&mut vars, &idle());
        assert!(!stage.check_stage_clear);
        assert_eq!(stage.phase, StagePhase::Play);

        stage.world.bosses.clear();
        stage.world.enemies.push(aged_enemy(EnemyType::B, Vec2::new(150.0, 60.0)));
        stage.world.enemy_shots.push(EnemyShot::new(Vec2::new(120.0, 60.0), Vec2::ZERO, 0));
        stage.check_stage_clear = true;
        stage.update(&mut vars, &idle());

        assert_eq!(stage.phase, StagePhase::StageClear);
        assert!(stage.world.enemies.is_empty());
        assert!(stage.world.enemy_shots.is_empty());
        assert_eq!(vars.score, 100);
    }

    #[test]
    fn test_boss_death_leads_to_next_stage() {
        let (mut stage, mut vars) = playing_stage();
        stage.world.player.forced_invincible = true;
        stage.world.bosses.push(aged_enemy(EnemyType::K, Vec2::new(200.0, 60.0)));
        stage.with_ctx(&mut vars, &idle(), |w, ctx| w.bosses[0].hit(1000, ctx));
        assert!(stage.check_stage_clear);

        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::StageClear);
        assert_eq!(vars.score, 5000);

        let mut requested_at = None;
        for i in 0..400 {
            if let Some(req) = stage.update(&mut vars, &idle()) {
                assert_eq!(req, StageRequest::NextStage);
                assert!(requested_at.is_none());
                requested_at = Some(i);
            }
        }
        assert_eq!(requested_at, Some(STAGE_CLEAR_FRAMES as usize - 1));
    }

    fn phase_changes(stage: &mut Stage) -> Vec<(StagePhase, StagePhase)> {
        stage
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                StageEvent::PhaseChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    /// Kill the player, then the boss while the death explosions play out
    fn boss_dies_while_player_dead(lives: u8) -> (Stage, GameVars) {
        let (mut stage, mut vars) = playing_stage();
        vars.lives = lives;
        stage.world.bosses.push(aged_enemy(EnemyType::K, Vec2::new(200.0, 60.0)));
        stage.world.player.kill(&mut stage.env.ctx(&mut vars, &idle(), WorldInfo::default()));
        stage.absorb_spawns();
        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::PlayerDead);

        stage.with_ctx(&mut vars, &idle(), |w, ctx| w.bosses[0].hit(1000, ctx));
        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::PlayerDead);
        assert!(stage.check_stage_clear);
        (stage, vars)
    }

    #[test]
    fn test_boss_killed_while_dead_clears_after_respawn() {
        let (mut stage, mut vars) = boss_dies_while_player_dead(3);
        stage.drain_events();

        for _ in 0..500 {
            assert_eq!(stage.update(&mut vars, &idle()), None);
            if stage.phase == StagePhase::StageClear {
                break;
            }
        }

        assert_eq!(
            phase_changes(&mut stage),
            vec![
                (StagePhase::PlayerDead, StagePhase::PlayerSpawned),
                (StagePhase::PlayerSpawned, StagePhase::Play),
                (StagePhase::Play, StagePhase::StageClear),
            ]
        );
        assert_eq!(vars.lives, 2);
    }

    #[test]
    fn test_boss_killed_while_dead_on_last_life_is_game_over() {
        let (mut stage, mut vars) = boss_dies_while_player_dead(1);
        assert_eq!(vars.lives, 0);

        let mut request = None;
        for _ in 0..500 {
            assert_ne!(stage.phase, StagePhase::StageClear);
            request = stage.update(&mut vars, &idle());
            if request.is_some() {
                break;
            }
        }

        assert_eq!(request, Some(StageRequest::RestartGame));
        let events = stage.drain_events();
        assert!(events.iter().any(|e| matches!(e, StageEvent::GameOver { .. })));
        assert!(!events.iter().any(|e| matches!(e, StageEvent::StageCleared { .. })));
    }

    #[test]
    fn test_last_life_and_boss_lost_in_same_frame() {
        let (mut stage, mut vars) = playing_stage();
        vars.lives = 1;
        let mut boss = aged_enemy(EnemyType::K, Vec2::new(150.0, 60.0));
        boss.hp = 1;
        let boss_pos = boss.sprite.pos;
        stage.world.bosses.push(boss);
        stage
            .world
            .player_shots
            .push(PlayerShot::new(boss_pos + Vec2::new(8.0, 8.0), 0, 0, Vec2::ZERO));
        let player_pos = stage.world.player.sprite.pos;
        stage
            .world
            .enemy_shots
            .push(EnemyShot::new(player_pos + Vec2::new(4.0, 2.0), Vec2::ZERO, 0));

        stage.update(&mut vars, &idle());
        assert_eq!(stage.phase, StagePhase::PlayerDead);
        assert_eq!(vars.lives, 0);
        assert!(stage.world.bosses.is_empty());

        let mut request = None;
        for _ in 0..500 {
            request = stage.update(&mut vars, &idle());
            if request.is_some() {
                break;
            }
        }
        assert_eq!(request, Some(StageRequest::RestartGame));
        assert_eq!(stage.phase, StagePhase::GameOver);
        assert_eq!(vars.lives, 0);
    }

    #[test]
    fn test_clear_banner_ignores_stage_advance() {
        let (mut stage, mut vars) = empty_stage();
        stage.phase = StagePhase::StageClear;
        stage.state_time = STAGE_CLEAR_BANNER_FRAMES + 1;
        assert!(vars.go_to_next_stage());
        assert!(vars.is_vortex_stage());

        let mut out = DrawList::new();
        stage.draw(&vars, &mut out);
        assert!(out.contains_text("ENTERING VORTEX"));
        assert!(!out.contains_text("LEAVING VORTEX"));
    }

    #[test]
    fn test_vortex_end_clears_stage() {
        let mut vars = GameVars {
            stage_num: 2,
            ..GameVars::default()
        };
        let mut layout = StageLayout::empty(33);
        layout.vortex = true;
        let mut stage = Stage::with_layout(&vars, &layout, AudioManager::default(), 1);
        stage.phase = StagePhase::Play;
        stage.world.player.forced_invincible = true;

        for _ in 0..12 {
            stage.update(&mut vars, &idle());
        }
        assert_eq!(stage.phase, StagePhase::StageClear);
    }

    #[test]
    fn test_bomb_clears_shots_and_damages_enemies() {
        let (mut stage, mut vars) = playing_stage();
        let player_pos = stage.world.player.sprite.pos;
        stage.world.powerups.push(Powerup::new(PowerupKind::Bomb, player_pos));
        stage.world.enemies.push(aged_enemy(EnemyType::P, Vec2::new(200.0, 30.0)));
        stage.world.enemy_shots.push(EnemyShot::new(Vec2::new(150.0, 30.0), Vec2::ZERO, 0));

        stage.update(&mut vars, &idle());

        assert!(stage.world.powerups.is_empty());
        assert!(stage.world.enemy_shots.is_empty());
        assert_eq!(stage.world.enemies[0].hp, 3);
        assert!(stage.drain_events().contains(&StageEvent::BombTriggered));
    }

    #[test]
    fn test_no_removed_entities_survive_a_frame() {
        let (mut stage, mut vars) = playing_stage();
        stage.world.player.forced_invincible = true;
        for i in 0..6 {
            let mut e = aged_enemy(EnemyType::N, Vec2::new(40.0 + i as f32 * 30.0, 40.0));
            e.sprite.removed = i % 2 == 0;
            stage.world.enemies.push(e);
        }
        let fire = InputState::new(Buttons::NONE.with(Button::Fire), Buttons::NONE);
        for _ in 0..120 {
            stage.update(&mut vars, &fire);
            assert_eq!(stage.world.removed_count(), 0);
        }
    }

    #[test]
    fn test_one_shot_cannot_hit_two_enemies() {
        let mut h = Harness::new();
        let mut enemies = vec![
            aged_enemy(EnemyType::G, Vec2::new(100.0, 80.0)),
            aged_enemy(EnemyType::G, Vec2::new(104.0, 80.0)),
        ];
        let mut shots = vec![PlayerShot::new(Vec2::new(102.0, 81.0), 0, 0, Vec2::ZERO)];

        lists_collide(&mut shots, &mut enemies, &mut h.ctx());

        assert!(shots[0].sprite.removed);
        assert_eq!(enemies[0].hp, 1);
        assert_eq!(enemies[1].hp, 2);
    }

    #[test]
    fn test_second_shot_destroys_exactly_once() {
        let mut h = Harness::new();
        let mut enemies = vec![aged_enemy(EnemyType::G, Vec2::new(100.0, 80.0))];
        let mut shots = vec![
            PlayerShot::new(Vec2::new(98.0, 81.0), 0, 0, Vec2::ZERO),
            PlayerShot::new(Vec2::new(102.0, 81.0), 0, 0, Vec2::ZERO),
        ];

        lists_collide(&mut shots, &mut enemies, &mut h.ctx());

        assert_eq!(enemies[0].hp, 0);
        assert!(enemies[0].sprite.removed);
        assert_eq!(h.vars.score, 100);
        assert_eq!(h.env.spawns.explosions.len(), 1);
        // A third overlap in a later pass changes nothing
        let mut late = vec![PlayerShot::new(Vec2::new(100.0, 81.0), 0, 0, Vec2::ZERO)];
        lists_collide(&mut late, &mut enemies, &mut h.ctx());
        assert!(!late[0].sprite.removed);
        assert_eq!(h.vars.score, 100);
    }

    #[test]
    fn test_draw_order_and_banners() {
        let (mut stage, vars) = empty_stage();
        stage.phase = StagePhase::Paused;
        let mut out = DrawList::new();
        stage.draw(&vars, &mut out);
        assert!(out.contains_text("PAUSED"));
        assert!(out.contains_text("HI-SCORE"));

        stage.phase = StagePhase::StageClear;
        stage.state_time = 61;
        out.clear();
        stage.draw(&vars, &mut out);
        assert!(out.contains_text("ENTERING VORTEX"));

        stage.phase = StagePhase::GameOver;
        out.clear();
        stage.draw(&vars, &mut out);
        assert!(out.contains_text("GAME OVER"));
    }
}

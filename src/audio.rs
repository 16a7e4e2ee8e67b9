//! Audio system
//!
//! Four channels: music takes channels 0..n (3 during stages, 4 on the
//! title screen), sound effects share channel 3. A new effect only
//! pre-empts a busy effect channel when it is at least as important as the
//! last one played. The actual sound device sits behind [`AudioBackend`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::FINAL_STAGE;

/// Number of hardware channels
pub const NUM_CHANNELS: usize = 4;
/// Channel reserved for sound effects
pub const SOUND_CHANNEL: usize = 3;
/// Channels used by stage music
pub const STAGE_MUSIC_CHANNELS: usize = 3;
/// Default channel gain (12.5%)
pub const SOUND_CHANNEL_GAIN_DEFAULT: f32 = 0.125;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundType {
    /// Small explosion
    ExplodeSmall,
    /// Enemy hit without dying
    Blip,
    /// Weapon pickup
    WeaponPowerup,
    /// Extra life pickup
    LifePowerup,
    /// Bomb pickup
    BombPowerup,
}

impl SoundType {
    /// Static priority table (higher pre-empts lower)
    pub fn priority(self) -> u8 {
        match self {
            SoundType::ExplodeSmall => 5,
            SoundType::Blip => 4,
            SoundType::WeaponPowerup => 10,
            SoundType::LifePowerup => 10,
            SoundType::BombPowerup => 10,
        }
    }

    /// Index into the sound bank (0-3 are reserved for music loading)
    pub fn sound_index(self) -> u8 {
        match self {
            SoundType::ExplodeSmall => 4,
            SoundType::Blip => 5,
            SoundType::WeaponPowerup => 6,
            SoundType::LifePowerup => 7,
            SoundType::BombPowerup => 8,
        }
    }
}

/// Music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Title,
    Stage1,
    Vortex,
    Stage3,
    Stage5,
    Boss,
    StageClear,
    GameOver,
    GameComplete,
}

impl MusicTrack {
    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Title => "music_title.json",
            MusicTrack::Stage1 => "music_stage_1.json",
            MusicTrack::Vortex => "music_vortex.json",
            MusicTrack::Stage3 => "music_stage_3.json",
            MusicTrack::Stage5 => "music_stage_5.json",
            MusicTrack::Boss => "music_boss.json",
            MusicTrack::StageClear => "music_stage_clear.json",
            MusicTrack::GameOver => "music_game_over.json",
            MusicTrack::GameComplete => "music_game_complete.json",
        }
    }

    /// Stage music; even stages are vortex stages
    pub fn for_stage(stage_num: u8) -> Self {
        match stage_num {
            1 => MusicTrack::Stage1,
            3 => MusicTrack::Stage3,
            n if n >= FINAL_STAGE => MusicTrack::Stage5,
            _ => MusicTrack::Vortex,
        }
    }

    /// Length of one pass through the track, in frames
    pub fn length_ticks(self) -> u32 {
        match self {
            MusicTrack::StageClear => 720,
            MusicTrack::GameOver => 300,
            MusicTrack::Boss => 960,
            _ => 1920,
        }
    }
}

/// A loaded music track, ready to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicHandle {
    pub track: MusicTrack,
}

/// What a channel is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSource {
    /// One part of a multi-channel music track
    Music { track: MusicTrack, part: usize },
    Sound(SoundType),
}

/// The sound device. Channel-level only; arbitration lives in [`AudioManager`].
pub trait AudioBackend {
    fn play(&mut self, channel: usize, source: ChannelSource, looped: bool, start_tick: Option<u32>);
    fn stop(&mut self, channel: usize);
    fn is_busy(&self, channel: usize) -> bool;
    fn set_gain(&mut self, channel: usize, gain: f32);
    /// Advance playback by one frame
    fn tick(&mut self) {}
}

/// Length of a sound effect in frames
const SOUND_LENGTH_TICKS: u32 = 15;

#[derive(Debug, Clone, Copy)]
struct Playback {
    looped: bool,
    remaining: u32,
}

/// Device-less backend that tracks playback time so "is music playing" has
/// the same answers it would have on real hardware. Gain is ignored.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    channels: [Option<Playback>; NUM_CHANNELS],
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for HeadlessBackend {
    fn play(&mut self, channel: usize, source: ChannelSource, looped: bool, start_tick: Option<u32>) {
        let length = match source {
            ChannelSource::Music { track, .. } => track.length_ticks(),
            ChannelSource::Sound(_) => SOUND_LENGTH_TICKS,
        };
        if let Some(slot) = self.channels.get_mut(channel) {
            *slot = Some(Playback {
                looped,
                remaining: length.saturating_sub(start_tick.unwrap_or(0)).max(1),
            });
        }
    }

    fn stop(&mut self, channel: usize) {
        if let Some(slot) = self.channels.get_mut(channel) {
            *slot = None;
        }
    }

    fn is_busy(&self, channel: usize) -> bool {
        matches!(self.channels.get(channel), Some(Some(_)))
    }

    fn set_gain(&mut self, _channel: usize, _gain: f32) {}

    fn tick(&mut self) {
        for slot in self.channels.iter_mut() {
            if let Some(playback) = slot {
                if playback.looped {
                    continue;
                }
                playback.remaining = playback.remaining.saturating_sub(1);
                if playback.remaining == 0 {
                    *slot = None;
                }
            }
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    last_sound_played: Option<SoundType>,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(HeadlessBackend::new()))
    }
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("last_sound_played", &self.last_sound_played)
            .field("music_volume", &self.music_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            last_sound_played: None,
            music_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.apply_music_gain();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.apply_sfx_gain();
    }

    /// Mute/unmute all audio. Playback keeps running silently so timing
    /// driven by music length is unaffected.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_music_gain();
        self.apply_sfx_gain();
    }

    /// Music plays on every channel but the effect channel
    fn apply_music_gain(&mut self) {
        let gain = if self.muted {
            0.0
        } else {
            SOUND_CHANNEL_GAIN_DEFAULT * self.music_volume
        };
        for ch in (0..NUM_CHANNELS).filter(|&ch| ch != SOUND_CHANNEL) {
            self.backend.set_gain(ch, gain);
        }
    }

    fn apply_sfx_gain(&mut self) {
        let gain = if self.muted {
            0.0
        } else {
            SOUND_CHANNEL_GAIN_DEFAULT * self.sfx_volume
        };
        self.backend.set_gain(SOUND_CHANNEL, gain);
    }

    /// Advance backend playback by one frame
    pub fn tick(&mut self) {
        self.backend.tick();
    }

    pub fn load_music(&self, track: MusicTrack) -> MusicHandle {
        log::debug!("Loading music {}", track.file_name());
        MusicHandle { track }
    }

    /// Start `music` on channels `0..num_channels`, optionally from `start_tick`
    pub fn play_music(
        &mut self,
        music: MusicHandle,
        looped: bool,
        num_channels: usize,
        start_tick: Option<u32>,
    ) {
        let num_channels = num_channels.min(NUM_CHANNELS);
        for ch in 0..num_channels {
            self.backend.play(
                ch,
                ChannelSource::Music {
                    track: music.track,
                    part: ch,
                },
                looped,
                start_tick,
            );
        }
    }

    pub fn stop_music(&mut self, num_channels: usize) {
        for ch in 0..num_channels.min(NUM_CHANNELS) {
            self.backend.stop(ch);
        }
    }

    /// Music is playing while channel 0 is busy
    pub fn is_music_playing(&self) -> bool {
        self.backend.is_busy(0)
    }

    /// Play a sound effect on the effect channel.
    ///
    /// A free channel always plays. A busy channel is taken over when
    /// `priority` is set or the new sound ranks at least as high as the last
    /// sound played.
    pub fn play_sound(&mut self, sound: SoundType, looped: bool, priority: bool) {
        let busy = self.backend.is_busy(SOUND_CHANNEL);
        let take_over = match self.last_sound_played {
            _ if !busy || priority => true,
            Some(last) => sound.priority() >= last.priority(),
            None => true,
        };
        if take_over {
            self.backend
                .play(SOUND_CHANNEL, ChannelSource::Sound(sound), looped, None);
            self.last_sound_played = Some(sound);
        }
    }

    pub fn last_sound_played(&self) -> Option<SoundType> {
        self.last_sound_played
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_sound_priority_preemption() {
        let mut audio = AudioManager::default();
        audio.play_sound(SoundType::WeaponPowerup, false, false);
        assert_eq!(audio.last_sound_played(), Some(SoundType::WeaponPowerup));

        // Lower priority cannot interrupt a busy channel
        audio.play_sound(SoundType::Blip, false, false);
        assert_eq!(audio.last_sound_played(), Some(SoundType::WeaponPowerup));

        // Unless forced
        audio.play_sound(SoundType::Blip, false, true);
        assert_eq!(audio.last_sound_played(), Some(SoundType::Blip));

        // Higher priority interrupts
        audio.play_sound(SoundType::ExplodeSmall, false, false);
        assert_eq!(audio.last_sound_played(), Some(SoundType::ExplodeSmall));
    }

    #[test]
    fn test_free_channel_always_plays() {
        let mut audio = AudioManager::default();
        audio.play_sound(SoundType::LifePowerup, false, false);
        for _ in 0..SOUND_LENGTH_TICKS {
            audio.tick();
        }
        audio.play_sound(SoundType::Blip, false, false);
        assert_eq!(audio.last_sound_played(), Some(SoundType::Blip));
    }

    #[test]
    fn test_music_runs_out_unless_looped() {
        let mut audio = AudioManager::default();
        let music = audio.load_music(MusicTrack::StageClear);
        audio.play_music(music, false, STAGE_MUSIC_CHANNELS, Some(620));
        assert!(audio.is_music_playing());
        for _ in 0..100 {
            audio.tick();
        }
        assert!(!audio.is_music_playing());

        let music = audio.load_music(MusicTrack::Stage1);
        audio.play_music(music, true, STAGE_MUSIC_CHANNELS, None);
        for _ in 0..5000 {
            audio.tick();
        }
        assert!(audio.is_music_playing());
        audio.stop_music(STAGE_MUSIC_CHANNELS);
        assert!(!audio.is_music_playing());
    }

    /// Records the last gain set on each channel
    struct GainRecorder(Rc<RefCell<[f32; NUM_CHANNELS]>>);

    impl AudioBackend for GainRecorder {
        fn play(&mut self, _: usize, _: ChannelSource, _: bool, _: Option<u32>) {}
        fn stop(&mut self, _: usize) {}
        fn is_busy(&self, _: usize) -> bool {
            false
        }
        fn set_gain(&mut self, channel: usize, gain: f32) {
            self.0.borrow_mut()[channel] = gain;
        }
    }

    #[test]
    fn test_mute_and_volumes_reach_the_backend() {
        let gains = Rc::new(RefCell::new([-1.0; NUM_CHANNELS]));
        let mut audio = AudioManager::new(Box::new(GainRecorder(Rc::clone(&gains))));

        audio.set_music_volume(0.5);
        audio.set_sfx_volume(2.0);
        assert_eq!(gains.borrow()[0], SOUND_CHANNEL_GAIN_DEFAULT * 0.5);
        assert_eq!(gains.borrow()[2], SOUND_CHANNEL_GAIN_DEFAULT * 0.5);
        assert_eq!(gains.borrow()[SOUND_CHANNEL], SOUND_CHANNEL_GAIN_DEFAULT);

        audio.set_muted(true);
        assert_eq!(*gains.borrow(), [0.0; NUM_CHANNELS]);
        audio.set_muted(false);
        assert_eq!(gains.borrow()[1], SOUND_CHANNEL_GAIN_DEFAULT * 0.5);
    }

    #[test]
    fn test_stage_music_mapping() {
        assert_eq!(MusicTrack::for_stage(1), MusicTrack::Stage1);
        assert_eq!(MusicTrack::for_stage(2), MusicTrack::Vortex);
        assert_eq!(MusicTrack::for_stage(4), MusicTrack::Vortex);
        assert_eq!(MusicTrack::for_stage(5), MusicTrack::Stage5);
    }
}

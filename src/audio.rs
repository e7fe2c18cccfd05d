//! Audio cues for game events
//!
//! `AudioDirector` decides what to play; an injected `AudioOutput` plays it.
//! In the browser the output is one preloaded `<audio>` element per cue.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Background music (loops)
    Track,
    /// Game started or restarted
    Start,
    GameOver,
    LevelUp,
    /// Item collected
    Collect,
    /// Hit by an enemy
    Collision,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Track,
        SoundCue::Start,
        SoundCue::GameOver,
        SoundCue::LevelUp,
        SoundCue::Collect,
        SoundCue::Collision,
    ];

    /// Music is governed by mute toggling, effects by the muted flag
    pub fn is_music(&self) -> bool {
        matches!(self, SoundCue::Track)
    }
}

/// Something that can play cues
pub trait AudioOutput {
    /// Play from the current position
    fn play(&mut self, cue: SoundCue);
    /// Pause, keeping the position
    fn pause(&mut self, cue: SoundCue);
    /// Pause and rewind to the start
    fn stop(&mut self, cue: SoundCue);

    /// Rewind and play from the start
    fn restart(&mut self, cue: SoundCue) {
        self.stop(cue);
        self.play(cue);
    }
}

/// Maps game events to cues
#[derive(Debug, Clone, Default)]
pub struct AudioDirector {
    muted: bool,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Start the background music (on boot, unless muted)
    pub fn start_music(&self, out: &mut impl AudioOutput) {
        if !self.muted {
            out.play(SoundCue::Track);
        }
    }

    /// Flip mute; pauses or resumes the background music
    pub fn toggle_mute(&mut self, out: &mut impl AudioOutput) {
        self.muted = !self.muted;
        if self.muted {
            out.pause(SoundCue::Track);
        } else {
            out.play(SoundCue::Track);
        }
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
    }

    /// React to one game event
    pub fn handle(&self, event: &GameEvent, out: &mut impl AudioOutput) {
        match event {
            // Boot playback is usually blocked until this first gesture
            GameEvent::Started => {
                self.start_music(out);
                self.effect(out, SoundCue::Start, false);
            }
            GameEvent::Restarted => {
                out.stop(SoundCue::GameOver);
                self.start_music(out);
                self.effect(out, SoundCue::Start, false);
            }
            GameEvent::EnemyHit { .. } => self.effect(out, SoundCue::Collision, true),
            GameEvent::ItemCollected { .. } => self.effect(out, SoundCue::Collect, true),
            GameEvent::LevelUp { .. } => self.effect(out, SoundCue::LevelUp, false),
            GameEvent::GameOver { .. } => {
                out.stop(SoundCue::Track);
                self.effect(out, SoundCue::GameOver, false);
            }
            GameEvent::LevelResumed { .. } => {}
        }
    }

    /// Rapid-fire cues restart so back-to-back events are all audible
    fn effect(&self, out: &mut impl AudioOutput, cue: SoundCue, restart: bool) {
        if self.muted {
            return;
        }
        if restart {
            out.restart(cue);
        } else {
            out.play(cue);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudioBackend;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioOutput, SoundCue};
    use crate::config::{SoundConfig, SoundsConfig};

    /// One preloaded `<audio>` element per cue
    pub struct HtmlAudioBackend {
        elements: HashMap<SoundCue, HtmlAudioElement>,
    }

    impl HtmlAudioBackend {
        pub fn new(sounds: &SoundsConfig) -> Self {
            let mut elements = HashMap::new();
            for cue in SoundCue::ALL {
                let config = config_for(sounds, cue);
                match HtmlAudioElement::new_with_src(&config.src) {
                    Ok(el) => {
                        el.set_volume(config.volume as f64);
                        el.set_preload("auto");
                        el.set_loop(cue.is_music());
                        elements.insert(cue, el);
                    }
                    Err(e) => log::warn!("Failed to create audio for {}: {:?}", config.src, e),
                }
            }
            Self { elements }
        }
    }

    fn config_for(sounds: &SoundsConfig, cue: SoundCue) -> &SoundConfig {
        match cue {
            SoundCue::Track => &sounds.track,
            SoundCue::Start => &sounds.start,
            SoundCue::GameOver => &sounds.gameover,
            SoundCue::LevelUp => &sounds.levelup,
            SoundCue::Collect => &sounds.collect,
            SoundCue::Collision => &sounds.collision,
        }
    }

    impl AudioOutput for HtmlAudioBackend {
        fn play(&mut self, cue: SoundCue) {
            let Some(el) = self.elements.get(&cue) else { return };
            match el.play() {
                // Browsers reject playback before the first user gesture
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::debug!("Playback of {:?} rejected: {:?}", cue, e);
                    }
                }),
                Err(e) => log::warn!("Failed to play {:?}: {:?}", cue, e),
            }
        }

        fn pause(&mut self, cue: SoundCue) {
            if let Some(el) = self.elements.get(&cue) {
                let _ = el.pause();
            }
        }

        fn stop(&mut self, cue: SoundCue) {
            if let Some(el) = self.elements.get(&cue) {
                let _ = el.pause();
                el.set_current_time(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Play(SoundCue),
        Pause(SoundCue),
        Stop(SoundCue),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl AudioOutput for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.calls.push(Call::Play(cue));
        }
        fn pause(&mut self, cue: SoundCue) {
            self.calls.push(Call::Pause(cue));
        }
        fn stop(&mut self, cue: SoundCue) {
            self.calls.push(Call::Stop(cue));
        }
    }

    #[test]
    fn test_hit_restarts_collision_sound() {
        let director = AudioDirector::new();
        let mut out = Recorder::default();
        director.handle(&GameEvent::EnemyHit { lives_left: 2 }, &mut out);
        assert_eq!(
            out.calls,
            vec![Call::Stop(SoundCue::Collision), Call::Play(SoundCue::Collision)]
        );
    }

    #[test]
    fn test_start_plays_music_and_jingle() {
        let director = AudioDirector::new();
        let mut out = Recorder::default();
        director.handle(&GameEvent::Started, &mut out);
        assert_eq!(
            out.calls,
            vec![Call::Play(SoundCue::Track), Call::Play(SoundCue::Start)]
        );
    }

    #[test]
    fn test_game_over_silences_music() {
        let director = AudioDirector::new();
        let mut out = Recorder::default();
        director.handle(&GameEvent::GameOver { points: 40, level: 2 }, &mut out);
        assert_eq!(
            out.calls,
            vec![Call::Stop(SoundCue::Track), Call::Play(SoundCue::GameOver)]
        );
    }

    #[test]
    fn test_restart_brings_music_back() {
        let director = AudioDirector::new();
        let mut out = Recorder::default();
        director.handle(&GameEvent::Restarted, &mut out);
        assert_eq!(
            out.calls,
            vec![
                Call::Stop(SoundCue::GameOver),
                Call::Play(SoundCue::Track),
                Call::Play(SoundCue::Start),
            ]
        );
    }

    #[test]
    fn test_muted_suppresses_effects() {
        let mut director = AudioDirector::new();
        let mut out = Recorder::default();
        director.toggle_mute(&mut out);
        assert!(director.is_muted());
        assert_eq!(out.calls, vec![Call::Pause(SoundCue::Track)]);

        out.calls.clear();
        director.handle(&GameEvent::ItemCollected { points: 10 }, &mut out);
        director.handle(&GameEvent::LevelUp { level: 2 }, &mut out);
        assert!(out.calls.is_empty());

        director.toggle_mute(&mut out);
        assert_eq!(out.calls, vec![Call::Play(SoundCue::Track)]);
    }

    #[test]
    fn test_resume_is_silent() {
        let director = AudioDirector::new();
        let mut out = Recorder::default();
        director.handle(&GameEvent::LevelResumed { level: 3 }, &mut out);
        assert!(out.calls.is_empty());
    }
}

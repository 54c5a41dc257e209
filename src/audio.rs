//! Audio playback using HTML media elements
//!
//! Two looping soundtracks plus a set of meows played together on a loss.

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

use crate::consts::{GAME_MUSIC_URL, GAME_OVER_MUSIC_URL, MEOW_URLS};
use crate::settings::Settings;
use crate::sim::Cue;

/// Soundtrack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Background music while playing
    Game,
    /// Loops after a loss
    GameOver,
}

/// Audio manager for the game
pub struct AudioManager {
    meows: Vec<HtmlAudioElement>,
    game_music: Option<HtmlAudioElement>,
    game_over_music: Option<HtmlAudioElement>,
    /// Track that should be audible (replayed after autoplay is unblocked)
    current: Option<Track>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let meows: Vec<_> = MEOW_URLS.iter().filter_map(|url| load(url, false)).collect();
        if meows.len() < MEOW_URLS.len() {
            log::warn!("Loaded {} of {} meows", meows.len(), MEOW_URLS.len());
        }

        let mut manager = Self {
            meows,
            game_music: load(GAME_MUSIC_URL, true),
            game_over_music: load(GAME_OVER_MUSIC_URL, true),
            current: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Push volume/mute preferences to every element
    pub fn apply_settings(&mut self, settings: &Settings) {
        let sfx = f64::from(settings.effective_sfx_volume());
        let music = f64::from(settings.effective_music_volume());
        for meow in &self.meows {
            meow.set_volume(sfx);
        }
        for track in [&self.game_music, &self.game_over_music].into_iter().flatten() {
            track.set_volume(music);
        }
    }

    fn element(&self, track: Track) -> Option<&HtmlAudioElement> {
        match track {
            Track::Game => self.game_music.as_ref(),
            Track::GameOver => self.game_over_music.as_ref(),
        }
    }

    pub fn play_music(&mut self, track: Track) {
        self.current = Some(track);
        if let Some(el) = self.element(track) {
            play(el);
        }
    }

    /// Pause a track. The game-over track also rewinds.
    pub fn stop_music(&mut self, track: Track) {
        if self.current == Some(track) {
            self.current = None;
        }
        if let Some(el) = self.element(track) {
            let _ = el.pause();
            if track == Track::GameOver {
                el.set_current_time(0.0);
            }
        }
    }

    /// Retry the current track (browsers block playback before a user gesture)
    pub fn resume(&self) {
        if let Some(el) = self.current.and_then(|t| self.element(t)) {
            if el.paused() {
                play(el);
            }
        }
    }

    pub fn meow_burst(&self) {
        for meow in &self.meows {
            meow.set_current_time(0.0);
            play(meow);
        }
    }

    /// Act on an audio cue. Returns false for cues that are not about sound.
    pub fn handle(&mut self, cue: Cue) -> bool {
        match cue {
            Cue::StopGameMusic => self.stop_music(Track::Game),
            Cue::PlayGameMusic => self.play_music(Track::Game),
            Cue::PlayGameOverMusic => self.play_music(Track::GameOver),
            Cue::StopGameOverMusic => self.stop_music(Track::GameOver),
            Cue::MeowBurst => self.meow_burst(),
            _ => return false,
        }
        true
    }
}

fn load(url: &str, looping: bool) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(url) {
        Ok(el) => {
            el.set_loop(looping);
            Some(el)
        }
        Err(e) => {
            log::warn!("Failed to load audio {}: {:?}", url, e);
            None
        }
    }
}

fn play(el: &HtmlAudioElement) {
    match el.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Playback blocked: {:?}", e);
            }
        }),
        Err(e) => log::warn!("Playback failed: {:?}", e),
    }
}

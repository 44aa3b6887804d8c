//! Host glue shared by the browser and native entry points
//!
//! Owns the game state plus the platform services, queues input between
//! frames and turns drained [`GameEvent`]s into sound and storage writes.

use std::collections::VecDeque;

use crate::audio::{self, AudioOut, CUE_GAIN, MUSIC_GAIN, MusicSequencer};
use crate::highscores::{self, HighScores};
use crate::persistence::Storage;
use crate::renderer::{self, DrawList, ViewOptions};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, GameState, PowerUpKind, TickInput, tick};

/// Frames kept for the fps estimate
const FPS_WINDOW: usize = 60;

/// Player intent, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Click, tap or space
    Activate,
    Up,
    Down,
    Left,
    Right,
    /// Enter
    Confirm,
}

impl InputEvent {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" => Some(InputEvent::Activate),
            "ArrowUp" => Some(InputEvent::Up),
            "ArrowDown" => Some(InputEvent::Down),
            "ArrowLeft" => Some(InputEvent::Left),
            "ArrowRight" => Some(InputEvent::Right),
            "Enter" => Some(InputEvent::Confirm),
            _ => None,
        }
    }
}

pub struct App<S: Storage, A: AudioOut> {
    state: GameState,
    settings: Settings,
    storage: S,
    audio: A,
    music: MusicSequencer,
    /// Input collected since the last tick
    pending: TickInput,
    autopilot: bool,
    frame_times: VecDeque<f64>,
}

impl<S: Storage, A: AudioOut> App<S, A> {
    /// Create the app on the title screen, loading persisted scores and settings
    pub fn new(seed: u64, storage: S, audio: A) -> Self {
        let mut state = GameState::new(seed);
        state.high_scores = HighScores::load(&storage);
        state.best_score = highscores::load_best_score(&storage)
            .max(state.high_scores.top_score().unwrap_or(0));
        let settings = Settings::load(&storage);

        log::info!(
            "App ready: seed {}, best {}, {} leaderboard entries",
            seed,
            state.best_score,
            state.high_scores.len()
        );

        Self {
            state,
            settings,
            storage,
            audio,
            music: MusicSequencer::new(),
            pending: TickInput::default(),
            autopilot: false,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    /// Replace and persist settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(&mut self.storage) {
            log::warn!("Failed to save settings: {:#}", e);
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot {}", if enabled { "on" } else { "off" });
    }

    /// Queue an input for the next tick
    pub fn handle_input(&mut self, event: InputEvent) {
        // Browsers only allow audio after a user gesture
        self.audio.resume();

        let input = &mut self.pending;
        match event {
            InputEvent::Activate => input.activate = true,
            InputEvent::Up => input.up = true,
            InputEvent::Down => input.down = true,
            InputEvent::Left => input.left = true,
            InputEvent::Right => input.right = true,
            InputEvent::Confirm => input.confirm = true,
        }
    }

    /// Queue a key press; unmapped keys still dismiss the leaderboard
    pub fn handle_key(&mut self, key: &str) {
        match InputEvent::from_key(key) {
            Some(event) => self.handle_input(event),
            None if self.state.mode == GameMode::Leaderboard => self.handle_input(InputEvent::Activate),
            None => {}
        }
    }

    /// Apply a power-up by tag on the next playing tick. Unknown tags are ignored.
    pub fn grant_power_up(&mut self, tag: &str) -> bool {
        match PowerUpKind::from_tag(tag) {
            Some(kind) => {
                self.pending.grant = Some(kind);
                true
            }
            None => {
                log::warn!("Unknown power-up tag '{}'", tag);
                false
            }
        }
    }

    /// Run one simulation tick and react to its events
    pub fn step(&mut self, now_ms: f64) {
        let mut input = std::mem::take(&mut self.pending);
        input.autopilot = self.autopilot;
        let was_playing = self.state.mode == GameMode::Playing;

        tick(&mut self.state, &input);

        // Grants only land in a live run; hold them until one starts
        if !was_playing && self.state.mode != GameMode::Playing {
            self.pending.grant = input.grant;
        }

        for event in self.state.drain_events() {
            self.dispatch(event, now_ms);
        }

        if let Some(note) = self.music.advance(now_ms) {
            self.audio.play(&note, MUSIC_GAIN * self.settings.music_gain());
        }
    }

    /// One display frame: a tick followed by the frame description
    pub fn frame(&mut self, now_ms: f64) -> DrawList {
        if self.frame_times.len() == FPS_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(now_ms);

        self.step(now_ms);
        let opts = ViewOptions::from_settings(&self.settings, self.fps());
        renderer::draw_frame(&self.state, &opts)
    }

    /// Frames per second over the recent window
    pub fn fps(&self) -> Option<f32> {
        let (first, last) = (self.frame_times.front()?, self.frame_times.back()?);
        let span = last - first;
        if span <= 0.0 {
            return None;
        }
        Some(((self.frame_times.len() - 1) as f64 * 1000.0 / span) as f32)
    }

    fn dispatch(&mut self, event: GameEvent, now_ms: f64) {
        let gain = CUE_GAIN * self.settings.sfx_gain();
        for cue in audio::cues_for(&event) {
            log::debug!("cue {:?} for {:?}", cue, event);
            self.audio.play(&cue.tone(), gain);
        }

        match event {
            GameEvent::MusicStart => self.music.start(now_ms),
            GameEvent::MusicStop => self.music.stop(),
            GameEvent::BestScore(score) => {
                if let Err(e) = highscores::save_best_score(&mut self.storage, score) {
                    log::warn!("Failed to save best score: {:#}", e);
                }
            }
            GameEvent::LeaderboardChanged => {
                if let Err(e) = self.state.high_scores.save(&mut self.storage) {
                    log::warn!("Failed to save leaderboard: {:#}", e);
                }
            }
            GameEvent::AntagonistSpawned(kind) => log::info!("{} incoming", kind.name()),
            _ => {}
        }
    }
}

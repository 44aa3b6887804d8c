//! Synthesized audio: gameplay cues and the looping background melody
//!
//! Everything is a plain oscillator tone, no sample files. The cue table and
//! the sequencer are platform-free; `WebAudio` plays them in the browser.

use crate::sim::{GameEvent, HazardKind, PowerUpKind};

/// Gain of a gameplay cue before volume settings
pub const CUE_GAIN: f32 = 0.1;
/// Gain of a melody note before volume settings
pub const MUSIC_GAIN: f32 = 0.08;
/// Milliseconds between melody notes
pub const NOTE_INTERVAL_MS: f64 = 320.0;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single fire-and-forget tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
}

impl Tone {
    pub const fn square(frequency: f32, duration: f32) -> Self {
        Self {
            frequency,
            duration,
            waveform: Waveform::Square,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Flap,
    /// Player lost a life
    Hit,
    /// Mermaid released a pickup
    PowerUpDrop,
    PowerUpCollect,
    /// Extra chime for the worm
    Heal,
    /// Extra chime for the star
    Star,
    /// Star power brushed through something
    Deflect,
    BonusLife,
    BossHit,
    BossDefeat,
    NetThrow,
    WhirlpoolSpawn,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::Flap => Tone::square(800.0, 0.1),
            SoundEffect::Hit => Tone::square(200.0, 0.3),
            SoundEffect::PowerUpDrop => Tone::square(700.0, 0.2),
            SoundEffect::PowerUpCollect => Tone::square(900.0, 0.3),
            SoundEffect::Heal => Tone::square(900.0, 0.3),
            SoundEffect::Star => Tone::square(1200.0, 0.5),
            SoundEffect::Deflect => Tone::square(800.0, 0.1),
            SoundEffect::BonusLife => Tone::square(1200.0, 0.4),
            SoundEffect::BossHit => Tone::square(150.0, 0.3),
            SoundEffect::BossDefeat => Tone::square(1000.0, 0.5),
            SoundEffect::NetThrow => Tone::square(300.0, 0.2),
            SoundEffect::WhirlpoolSpawn => Tone::square(400.0, 0.2),
        }
    }
}

/// Cues a gameplay event triggers, in play order
pub fn cues_for(event: &GameEvent) -> &'static [SoundEffect] {
    match event {
        GameEvent::Flap => &[SoundEffect::Flap],
        GameEvent::PlayerHit => &[SoundEffect::Hit],
        GameEvent::PowerUpDropped(_) => &[SoundEffect::PowerUpDrop],
        GameEvent::PowerUpCollected(PowerUpKind::Heal) => {
            &[SoundEffect::PowerUpCollect, SoundEffect::Heal]
        }
        GameEvent::PowerUpCollected(PowerUpKind::Invincible) => {
            &[SoundEffect::PowerUpCollect, SoundEffect::Star]
        }
        GameEvent::PowerUpCollected(_) => &[SoundEffect::PowerUpCollect],
        GameEvent::InvincibleDeflect => &[SoundEffect::Deflect],
        GameEvent::BonusLifeCollected => &[SoundEffect::BonusLife],
        GameEvent::AntagonistHit { .. } => &[SoundEffect::BossHit],
        GameEvent::AntagonistDefeated(_) => &[SoundEffect::BossDefeat],
        GameEvent::HazardSpawned(HazardKind::Net) => &[SoundEffect::NetThrow],
        GameEvent::HazardSpawned(HazardKind::Whirlpool) => &[SoundEffect::WhirlpoolSpawn],
        GameEvent::GameOver
        | GameEvent::AntagonistSpawned(_)
        | GameEvent::MusicStart
        | GameEvent::MusicStop
        | GameEvent::BestScore(_)
        | GameEvent::LeaderboardChanged => &[],
    }
}

/// Background melody as (Hz, seconds); 0 Hz is a rest
pub const MELODY: [(f32, f32); 56] = [
    // Intro
    (392.00, 0.4),
    (493.88, 0.4),
    (587.33, 0.4),
    (659.25, 0.6),
    (587.33, 0.3),
    (493.88, 0.5),
    (0.0, 0.3),
    // Rising
    (523.25, 0.4),
    (587.33, 0.4),
    (659.25, 0.4),
    (698.46, 0.4),
    (783.99, 0.8),
    (0.0, 0.3),
    // Cascade
    (880.00, 0.3),
    (783.99, 0.3),
    (659.25, 0.3),
    (587.33, 0.3),
    (523.25, 0.4),
    (493.88, 0.4),
    (392.00, 0.6),
    (0.0, 0.3),
    // Middle
    (440.00, 0.5),
    (523.25, 0.3),
    (659.25, 0.5),
    (587.33, 0.3),
    (523.25, 0.4),
    (440.00, 0.8),
    (0.0, 0.3),
    (493.88, 0.3),
    (587.33, 0.3),
    (659.25, 0.3),
    (698.46, 0.4),
    (783.99, 0.4),
    (880.00, 0.6),
    (0.0, 0.3),
    (987.77, 0.4),
    (880.00, 0.3),
    (783.99, 0.4),
    (698.46, 0.3),
    (659.25, 0.5),
    (587.33, 0.5),
    (0.0, 0.3),
    // Build up
    (523.25, 0.3),
    (587.33, 0.3),
    (659.25, 0.3),
    (783.99, 0.4),
    (880.00, 0.4),
    (987.77, 0.6),
    (0.0, 0.3),
    // Resolution
    (1046.50, 0.4),
    (987.77, 0.3),
    (880.00, 0.4),
    (783.99, 0.4),
    (659.25, 0.5),
    (523.25, 1.0),
    (0.0, 0.5),
];

/// Steps through `MELODY` on the host clock
#[derive(Debug, Clone, Default)]
pub struct MusicSequencer {
    playing: bool,
    index: usize,
    next_at_ms: f64,
}

impl MusicSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start from the first note; no-op while already playing
    pub fn start(&mut self, now_ms: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.index = 0;
        self.next_at_ms = now_ms + NOTE_INTERVAL_MS;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.index = 0;
    }

    /// Emit at most one note that has come due by `now_ms`
    ///
    /// Rests advance the sequence but return None. After a long stall (hidden
    /// tab) the schedule resyncs instead of replaying the backlog.
    pub fn advance(&mut self, now_ms: f64) -> Option<Tone> {
        if !self.playing || now_ms < self.next_at_ms {
            return None;
        }

        let (frequency, duration) = MELODY[self.index];
        self.index = (self.index + 1) % MELODY.len();
        self.next_at_ms += NOTE_INTERVAL_MS;
        if now_ms - self.next_at_ms > NOTE_INTERVAL_MS * 4.0 {
            self.next_at_ms = now_ms + NOTE_INTERVAL_MS;
        }

        (frequency > 0.0).then_some(Tone {
            frequency,
            duration,
            waveform: Waveform::Triangle,
        })
    }
}

/// Somewhere tones can be played
pub trait AudioOut {
    /// Play `tone` at `gain` (already scaled by volume settings)
    fn play(&mut self, tone: &Tone, gain: f32);

    /// Unlock output after a user gesture
    fn resume(&mut self) {}
}

/// Keeps every tone it was asked to play; the headless host's output
#[derive(Debug, Clone, Default)]
pub struct ToneRecorder {
    pub played: Vec<(Tone, f32)>,
}

impl AudioOut for ToneRecorder {
    fn play(&mut self, tone: &Tone, gain: f32) {
        log::trace!("tone {:.0} Hz for {:.2}s at {:.3}", tone.frequency, tone.duration, gain);
        self.played.push((*tone, gain));
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioOut, Tone, Waveform};

    /// Web Audio output
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl AudioOut for WebAudio {
        fn play(&mut self, tone: &Tone, gain: f32) {
            if gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, env)) = Self::create_osc(ctx, tone.frequency, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + tone.duration as f64;

            env.gain().set_value_at_time(gain, t).ok();
            env.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }

        fn resume(&mut self) {
            // Resume context if suspended (browsers require user gesture)
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AntagonistKind;

    #[test]
    fn test_cue_table() {
        assert_eq!(cues_for(&GameEvent::Flap), &[SoundEffect::Flap]);
        assert_eq!(
            cues_for(&GameEvent::PowerUpCollected(PowerUpKind::Invincible)),
            &[SoundEffect::PowerUpCollect, SoundEffect::Star]
        );
        assert_eq!(
            cues_for(&GameEvent::HazardSpawned(HazardKind::Whirlpool)),
            &[SoundEffect::WhirlpoolSpawn]
        );
        assert!(cues_for(&GameEvent::AntagonistSpawned(AntagonistKind::Diver)).is_empty());
        assert_eq!(SoundEffect::Hit.tone(), Tone::square(200.0, 0.3));
    }

    #[test]
    fn test_sequencer_tempo() {
        let mut music = MusicSequencer::new();
        assert_eq!(music.advance(1000.0), None);

        music.start(0.0);
        assert_eq!(music.advance(100.0), None);
        let first = music.advance(320.0);
        assert_eq!(first.map(|t| t.frequency), Some(392.0));
        assert_eq!(first.map(|t| t.waveform), Some(Waveform::Triangle));
        assert_eq!(music.advance(330.0), None);
        assert_eq!(music.advance(640.0).map(|t| t.frequency), Some(493.88));
    }

    #[test]
    fn test_rest_is_silent_and_loop_wraps() {
        let mut music = MusicSequencer::new();
        music.start(0.0);
        let mut now = 0.0;
        let mut sounded = 0;
        for _ in 0..MELODY.len() {
            now += NOTE_INTERVAL_MS;
            if music.advance(now).is_some() {
                sounded += 1;
            }
        }
        let rests = MELODY.iter().filter(|(f, _)| *f == 0.0).count();
        assert_eq!(sounded, MELODY.len() - rests);

        now += NOTE_INTERVAL_MS;
        assert_eq!(music.advance(now).map(|t| t.frequency), Some(MELODY[0].0));
    }

    #[test]
    fn test_stop_and_restart_from_top() {
        let mut music = MusicSequencer::new();
        music.start(0.0);
        music.advance(320.0);
        music.stop();
        assert!(!music.is_playing());
        assert_eq!(music.advance(10_000.0), None);

        music.start(10_000.0);
        assert_eq!(music.advance(10_320.0).map(|t| t.frequency), Some(392.0));
    }

    #[test]
    fn test_stall_resyncs() {
        let mut music = MusicSequencer::new();
        music.start(0.0);
        assert!(music.advance(60_000.0).is_some());
        // No backlog replay right after the stall
        assert_eq!(music.advance(60_010.0), None);
    }
}

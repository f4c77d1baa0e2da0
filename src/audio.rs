//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a looping background melody. Each cue is
//! described as a list of [`Voice`]s so the sound design stays testable off
//! the browser; only the oscillator plumbing is WASM-specific.

use crate::sim::GameEvent;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player left the ground
    Jump,
    /// Data block picked up
    Collect,
    /// Player hit an obstacle
    Crash,
    /// Difficulty tier increased
    LevelUp,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Gain shape over a voice's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Start at `from`, exponential ramp to `to` after `secs`
    Decay { from: f32, to: f32, secs: f64 },
    /// Silent start, linear rise to `peak` at `attack`, back to silence at `release`
    Swell { peak: f32, attack: f64, release: f64 },
}

/// A single oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Exponential pitch glide: target frequency and when it is reached
    pub glide: Option<(f32, f64)>,
    pub envelope: Envelope,
    /// Offset from "now" before the note starts
    pub delay: f64,
    /// Time from start until the oscillator stops
    pub duration: f64,
}

impl Voice {
    const fn decay(waveform: Waveform, frequency: f32, from: f32, secs: f64) -> Self {
        Self {
            waveform,
            frequency,
            glide: None,
            envelope: Envelope::Decay {
                from,
                to: 0.01,
                secs,
            },
            delay: 0.0,
            duration: secs,
        }
    }
}

/// Level-up arpeggio (C5, E5, G5)
const LEVEL_UP_NOTES: [f32; 3] = [523.25, 659.25, 783.99];
const LEVEL_UP_SPACING: f64 = 0.1;

impl Cue {
    /// Oscillators making up this cue
    pub fn voices(self) -> Vec<Voice> {
        match self {
            Cue::Jump => vec![Voice::decay(Waveform::Square, 400.0, 0.1, 0.1)],
            Cue::Collect => vec![Voice {
                glide: Some((1200.0, 0.1)),
                ..Voice::decay(Waveform::Sine, 800.0, 0.15, 0.2)
            }],
            Cue::Crash => vec![Voice::decay(Waveform::Sawtooth, 100.0, 0.2, 0.3)],
            Cue::LevelUp => LEVEL_UP_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Voice {
                    delay: i as f64 * LEVEL_UP_SPACING,
                    ..Voice::decay(Waveform::Sine, freq, 0.15, 0.3)
                })
                .collect(),
        }
    }

    /// Cue announced by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Jump => Some(Cue::Jump),
            GameEvent::Collect => Some(Cue::Collect),
            GameEvent::Crash => Some(Cue::Crash),
            GameEvent::LevelUp { .. } => Some(Cue::LevelUp),
            GameEvent::ScoreChanged(_) | GameEvent::GameOver(_) => None,
        }
    }
}

/// Background melody, one note per interval
pub const MUSIC_NOTES: [f32; 6] = [261.63, 329.63, 392.00, 523.25, 392.00, 329.63];
/// Milliseconds between melody notes
pub const MUSIC_NOTE_INTERVAL_MS: i32 = 400;

/// Cycles through [`MUSIC_NOTES`]
#[derive(Debug, Clone, Default)]
pub struct MusicSequencer {
    index: usize,
}

impl MusicSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next note of the loop as a voice
    pub fn next_voice(&mut self) -> Voice {
        let frequency = MUSIC_NOTES[self.index];
        self.index = (self.index + 1) % MUSIC_NOTES.len();
        Voice {
            waveform: Waveform::Sine,
            frequency,
            glide: None,
            envelope: Envelope::Swell {
                peak: 0.08,
                attack: 0.1,
                release: 0.5,
            },
            delay: 0.0,
            duration: 0.5,
        }
    }
}

/// Audio manager for the game
///
/// The context is created lazily on the first `init` (browsers only allow it
/// after a user gesture). Without a context every call is a silent no-op.
pub struct AudioManager {
    music_enabled: bool,
    sfx_enabled: bool,
    #[cfg(target_arch = "wasm32")]
    backend: Option<web::WebAudio>,
    #[cfg(not(target_arch = "wasm32"))]
    initialized: bool,
    #[cfg(not(target_arch = "wasm32"))]
    music_playing: bool,
}

impl AudioManager {
    pub fn new(music_enabled: bool, sfx_enabled: bool) -> Self {
        Self {
            music_enabled,
            sfx_enabled,
            #[cfg(target_arch = "wasm32")]
            backend: None,
            #[cfg(not(target_arch = "wasm32"))]
            initialized: false,
            #[cfg(not(target_arch = "wasm32"))]
            music_playing: false,
        }
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn sfx_enabled(&self) -> bool {
        self.sfx_enabled
    }

    /// Turn the background loop on or off
    ///
    /// Disabling stops the loop at once. Enabling restarts it only if audio
    /// was already initialized by a game start.
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if enabled {
            if self.is_initialized() {
                self.start_music();
            }
        } else {
            self.stop_music();
        }
    }

    /// Muting effects only affects cues played from now on
    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.sfx_enabled = enabled;
    }

    /// Play the cues announced by a batch of simulation events
    pub fn play_events(&self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(Cue::for_event) {
            self.play(cue);
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Create the context on first use and start the music loop
    pub fn init(&mut self) {
        match &self.backend {
            Some(backend) => backend.resume(),
            None => {
                self.backend = web::WebAudio::new();
                if self.backend.is_some() {
                    log::info!("Audio initialized");
                    if self.music_enabled {
                        self.start_music();
                    }
                }
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_music_playing(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.music_playing())
    }

    /// Play a cue
    pub fn play(&self, cue: Cue) {
        if !self.sfx_enabled {
            return;
        }
        let Some(backend) = &self.backend else { return };
        for voice in cue.voices() {
            backend.play_voice(&voice);
        }
    }

    fn start_music(&mut self) {
        if let Some(backend) = &mut self.backend {
            backend.start_music();
        }
    }

    fn stop_music(&mut self) {
        if let Some(backend) = &mut self.backend {
            backend.stop_music();
        }
    }
}

/// Native stubs: track state only
#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn init(&mut self) {
        if !self.initialized {
            self.initialized = true;
            log::debug!("Audio unavailable on native, cues are silent");
            if self.music_enabled {
                self.start_music();
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn play(&self, cue: Cue) {
        if self.sfx_enabled && self.initialized {
            log::trace!("cue {:?}", cue);
        }
    }

    fn start_music(&mut self) {
        self.music_playing = true;
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Envelope, MUSIC_NOTE_INTERVAL_MS, MusicSequencer, Voice, Waveform};

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            }
        }
    }

    /// Interval timer driving the melody; cleared on drop
    struct MusicLoop {
        handle: i32,
        _tick: Closure<dyn FnMut()>,
    }

    impl Drop for MusicLoop {
        fn drop(&mut self) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(self.handle);
            }
        }
    }

    pub(super) struct WebAudio {
        ctx: AudioContext,
        music: Option<MusicLoop>,
    }

    impl WebAudio {
        pub fn new() -> Option<Self> {
            // May fail outside a secure context
            match AudioContext::new() {
                Ok(ctx) => Some(Self { ctx, music: None }),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    None
                }
            }
        }

        /// Resume a suspended context (required after user gesture)
        pub fn resume(&self) {
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }

        pub fn music_playing(&self) -> bool {
            self.music.is_some()
        }

        pub fn play_voice(&self, voice: &Voice) {
            play_voice(&self.ctx, voice);
        }

        /// Play the first note now, then one every interval
        pub fn start_music(&mut self) {
            self.stop_music();

            let sequencer = Rc::new(RefCell::new(MusicSequencer::new()));
            let ctx = self.ctx.clone();
            let tick = Closure::<dyn FnMut()>::new(move || {
                let voice = sequencer.borrow_mut().next_voice();
                play_voice(&ctx, &voice);
            });

            let Some(window) = web_sys::window() else { return };
            let _ = tick.as_ref().unchecked_ref::<js_sys::Function>().call0(&window);
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                MUSIC_NOTE_INTERVAL_MS,
            ) {
                Ok(handle) => {
                    self.music = Some(MusicLoop {
                        handle,
                        _tick: tick,
                    });
                }
                Err(_) => log::warn!("Failed to schedule background music"),
            }
        }

        pub fn stop_music(&mut self) {
            self.music = None;
        }
    }

    /// Create an oscillator routed through a gain node
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

    fn play_voice(ctx: &AudioContext, voice: &Voice) {
        let Some((osc, gain)) = create_osc(ctx, voice.frequency, voice.waveform.into()) else {
            return;
        };
        let t = ctx.current_time() + voice.delay;

        match voice.envelope {
            Envelope::Decay { from, to, secs } => {
                gain.gain().set_value_at_time(from, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(to, t + secs).ok();
            }
            Envelope::Swell {
                peak,
                attack,
                release,
            } => {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(peak, t + attack).ok();
                gain.gain().linear_ramp_to_value_at_time(0.0, t + release).ok();
            }
        }

        if let Some((target, at)) = voice.glide {
            osc.frequency().set_value_at_time(voice.frequency, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, t + at)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + voice.duration).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RunSummary;

    #[test]
    fn test_jump_is_short_square_blip() {
        let voices = Cue::Jump.voices();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].waveform, Waveform::Square);
        assert_eq!(voices[0].frequency, 400.0);
        assert_eq!(voices[0].duration, 0.1);
    }

    #[test]
    fn test_collect_glides_up() {
        let voice = Cue::Collect.voices()[0];
        assert_eq!(voice.frequency, 800.0);
        assert_eq!(voice.glide, Some((1200.0, 0.1)));
        assert_eq!(
            voice.envelope,
            Envelope::Decay {
                from: 0.15,
                to: 0.01,
                secs: 0.2
            }
        );
    }

    #[test]
    fn test_level_up_arpeggio_is_staggered() {
        let voices = Cue::LevelUp.voices();
        let freqs: Vec<f32> = voices.iter().map(|v| v.frequency).collect();
        assert_eq!(freqs, LEVEL_UP_NOTES.to_vec());
        assert_eq!(voices[0].delay, 0.0);
        assert!((voices[2].delay - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(Cue::for_event(&GameEvent::Jump), Some(Cue::Jump));
        assert_eq!(Cue::for_event(&GameEvent::Crash), Some(Cue::Crash));
        assert_eq!(
            Cue::for_event(&GameEvent::LevelUp {
                level: 2,
                name: "Data Stream"
            }),
            Some(Cue::LevelUp)
        );
        assert_eq!(Cue::for_event(&GameEvent::ScoreChanged(3)), None);
        let summary = RunSummary {
            score: 0,
            level: 1,
            level_name: "Beginner Network",
            new_best: false,
        };
        assert_eq!(Cue::for_event(&GameEvent::GameOver(summary)), None);
    }

    #[test]
    fn test_sequencer_wraps() {
        let mut seq = MusicSequencer::new();
        let played: Vec<f32> = (0..8).map(|_| seq.next_voice().frequency).collect();
        assert_eq!(&played[..6], &MUSIC_NOTES);
        assert_eq!(played[6], MUSIC_NOTES[0]);
        assert_eq!(played[7], MUSIC_NOTES[1]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_music_toggle_before_and_after_init() {
        let mut audio = AudioManager::new(true, true);
        // No context yet, nothing plays
        audio.set_music_enabled(true);
        assert!(!audio.is_music_playing());

        audio.init();
        assert!(audio.is_music_playing());

        audio.set_music_enabled(false);
        assert!(!audio.is_music_playing());
        audio.set_music_enabled(true);
        assert!(audio.is_music_playing());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_init_with_music_muted() {
        let mut audio = AudioManager::new(false, true);
        audio.init();
        assert!(audio.is_initialized());
        assert!(!audio.is_music_playing());
    }
}

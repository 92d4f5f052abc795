//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Cue selection and tone recipes are plain data so they run on every
//! target; only [`AudioManager`] touches the browser.

use rand::Rng;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Projectile struck an enemy
    Hit,
    /// Enemy destroyed
    Explosion,
    /// Player took contact damage
    Damage,
    /// Health is low
    LowHealth,
    /// New wave reached
    WaveTransition,
    /// Enemy entered the arena
    EnemySpawn,
    /// Player died
    GameOver,
    /// Session (re)started
    Restart,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one. Events carrying an
    /// `audible` flag only sound when it is set.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::Shoot),
            GameEvent::EnemyHit { .. } => Some(SoundEffect::Hit),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerDamaged { audible: true, .. } => Some(SoundEffect::Damage),
            GameEvent::PlayerDamaged { audible: false, .. } => None,
            GameEvent::EnemySpawned { audible: true, .. } => Some(SoundEffect::EnemySpawn),
            GameEvent::EnemySpawned { audible: false, .. } => None,
            GameEvent::LowHealthWarning => Some(SoundEffect::LowHealth),
            GameEvent::WaveAdvanced { .. } => Some(SoundEffect::WaveTransition),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Restarted => Some(SoundEffect::Restart),
        }
    }

    /// Voices that make up this effect. Some effects detune randomly so
    /// rapid repeats do not sound identical.
    pub fn voices<R: Rng>(self, rng: &mut R) -> Vec<Voice> {
        use Waveform::*;
        match self {
            SoundEffect::Shoot => {
                let f = crate::rand_range(rng, 120.0, 160.0);
                vec![
                    Voice::tone(f, 0.2, Sawtooth, 0.01, 0.08),
                    Voice::tone(f * 2.0, 0.15, Square, 0.01, 0.06),
                    Voice::tone(f * 0.5, 0.18, Triangle, 0.01, 0.1),
                ]
            }
            SoundEffect::Hit => {
                let f = crate::rand_range(rng, 80.0, 110.0);
                vec![
                    Voice::tone(f, 0.18, Sawtooth, 0.01, 0.2),
                    Voice::tone(f * 1.5, 0.12, Square, 0.01, 0.15),
                    Voice::noise(0.15, 0.1, 400.0),
                ]
            }
            SoundEffect::Explosion => vec![
                Voice::noise(0.4, 0.25, 800.0),
                Voice::tone(40.0, 0.2, Sawtooth, 0.01, 0.4),
                Voice::tone(60.0, 0.15, Square, 0.01, 0.25),
                Voice::tone(30.0, 0.12, Triangle, 0.01, 0.2).delayed(0.15),
            ],
            SoundEffect::Damage => {
                let f = crate::rand_range(rng, 60.0, 80.0);
                vec![
                    Voice::tone(f, 0.15, Sawtooth, 0.01, 0.3),
                    Voice::tone(f * 0.7, 0.12, Square, 0.01, 0.25),
                    Voice::noise(0.2, 0.08, 300.0),
                ]
            }
            SoundEffect::LowHealth => {
                let f = crate::rand_range(rng, 70.0, 80.0);
                vec![Voice::tone(f, 0.12, Sawtooth, 0.01, 0.25)]
            }
            SoundEffect::WaveTransition => vec![
                Voice::tone(100.0, 0.15, Sawtooth, 0.01, 0.15),
                Voice::tone(150.0, 0.15, Square, 0.01, 0.15).delayed(0.1),
                Voice::tone(200.0, 0.18, Sawtooth, 0.01, 0.2).delayed(0.2),
                Voice::noise(0.2, 0.12, 600.0),
            ],
            SoundEffect::EnemySpawn => {
                let f = crate::rand_range(rng, 60.0, 80.0);
                vec![
                    Voice::tone(f, 0.08, Sawtooth, 0.05, 0.1),
                    Voice::tone(f * 1.5, 0.06, Square, 0.05, 0.08),
                ]
            }
            SoundEffect::GameOver => vec![
                Voice::tone(80.0, 0.25, Sawtooth, 0.1, 0.5),
                Voice::tone(60.0, 0.2, Sawtooth, 0.1, 0.5).delayed(0.3),
                Voice::tone(40.0, 0.15, Sawtooth, 0.1, 0.8).delayed(0.6),
            ],
            SoundEffect::Restart => vec![
                Voice::tone(120.0, 0.2, Sawtooth, 0.01, 0.2),
                Voice::tone(150.0, 0.2, Square, 0.01, 0.2).delayed(0.1),
                Voice::tone(180.0, 0.2, Sawtooth, 0.01, 0.25).delayed(0.2),
            ],
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
    Triangle,
}

/// Sound source behind a voice's envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceKind {
    /// Periodic oscillator
    Tone { freq: f32, waveform: Waveform },
    /// Decaying white noise through a lowpass filter
    Noise { duration: f64, cutoff: f32 },
}

/// One enveloped source: linear attack to `volume`, exponential decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub kind: VoiceKind,
    pub volume: f32,
    pub attack: f64,
    pub decay: f64,
    /// Offset from "now" before the voice starts (seconds)
    pub delay: f64,
}

impl Voice {
    pub fn tone(freq: f32, volume: f32, waveform: Waveform, attack: f64, decay: f64) -> Self {
        Self {
            kind: VoiceKind::Tone { freq, waveform },
            volume,
            attack,
            decay,
            delay: 0.0,
        }
    }

    /// Noise burst with a 10 ms attack; the envelope spans the whole buffer
    pub fn noise(duration: f64, volume: f32, cutoff: f32) -> Self {
        Self {
            kind: VoiceKind::Noise { duration, cutoff },
            volume,
            attack: 0.01,
            decay: duration - 0.01,
            delay: 0.0,
        }
    }

    pub fn delayed(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Oscillator frequency, `None` for noise
    pub fn freq(&self) -> Option<f32> {
        match self.kind {
            VoiceKind::Tone { freq, .. } => Some(freq),
            VoiceKind::Noise { .. } => None,
        }
    }

    /// Total time from trigger to silence
    pub fn end_time(&self) -> f64 {
        self.delay + self.attack + self.decay
    }
}

/// Noise samples in [-1, 1] with a quadratic fade to silence
pub fn noise_samples<R: Rng>(rng: &mut R, len: usize) -> Vec<f32> {
    let n = len.max(1) as f32;
    (0..len)
        .map(|i| {
            let fade = 1.0 - i as f32 / n;
            (rng.random::<f32>() * 2.0 - 1.0) * fade * fade
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use web_sys::{AudioContext, AudioNode, BiquadFilterType, GainNode, OscillatorType};

    use super::{SoundEffect, Voice, VoiceKind, Waveform, noise_samples};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        /// Detune and noise source, independent of the simulation RNG
        rng: Pcg32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings, seed: u64) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
                rng: Pcg32::seed_from_u64(seed),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let voices = effect.voices(&mut self.rng);
            let Some(ctx) = &self.ctx else { return };

            for voice in voices {
                let t = ctx.current_time() + voice.delay;
                let played = match voice.kind {
                    VoiceKind::Tone { freq, waveform } => {
                        play_tone(ctx, freq, waveform, t, voice.attack + voice.decay)
                    }
                    VoiceKind::Noise { duration, cutoff } => play_noise(ctx, &mut self.rng, duration, cutoff, t),
                };
                if let Some(gain) = played {
                    shape_envelope(&gain, &voice, vol, t);
                }
            }
        }
    }

    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }

    /// Gain node wired to the destination, fed by `source`
    fn gain_after(ctx: &AudioContext, source: &AudioNode) -> Option<GainNode> {
        let gain = ctx.create_gain().ok()?;
        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(gain)
    }

    fn play_tone(ctx: &AudioContext, freq: f32, waveform: Waveform, t: f64, length: f64) -> Option<GainNode> {
        let osc = ctx.create_oscillator().ok()?;
        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(freq);
        let gain = gain_after(ctx, &osc)?;

        osc.start_with_when(t).ok()?;
        osc.stop_with_when(t + length).ok()?;
        Some(gain)
    }

    /// Buffer source -> lowpass biquad -> gain
    fn play_noise(ctx: &AudioContext, rng: &mut Pcg32, duration: f64, cutoff: f32, t: f64) -> Option<GainNode> {
        let rate = ctx.sample_rate();
        let len = (rate as f64 * duration) as u32;
        if len == 0 {
            return None;
        }
        let mut samples = noise_samples(rng, len as usize);
        let buffer = ctx.create_buffer(1, len, rate).ok()?;
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(&buffer));

        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(cutoff);
        source.connect_with_audio_node(&filter).ok()?;
        let gain = gain_after(ctx, &filter)?;

        source.start_with_when(t).ok()?;
        Some(gain)
    }

    fn shape_envelope(gain: &GainNode, voice: &Voice, vol: f32, t: f64) {
        let param = gain.gain();
        param.set_value_at_time(0.0, t).ok();
        param.linear_ramp_to_value_at_time(voice.volume * vol, t + voice.attack).ok();
        param
            .exponential_ramp_to_value_at_time(0.001, t + voice.attack + voice.decay)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Archetype;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_event_mapping() {
        let shot = GameEvent::ShotFired {
            pos: Vec2::ZERO,
            hue: 37,
        };
        assert_eq!(SoundEffect::for_event(&shot), Some(SoundEffect::Shoot));
        let kill = GameEvent::EnemyKilled {
            archetype: Archetype::Brute,
            pos: Vec2::ZERO,
            bounty: 27,
        };
        assert_eq!(SoundEffect::for_event(&kill), Some(SoundEffect::Explosion));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WaveAdvanced { wave: 2 }),
            Some(SoundEffect::WaveTransition)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Restarted), Some(SoundEffect::Restart));
    }

    #[test]
    fn test_audible_flag_gates_cues() {
        let quiet = GameEvent::PlayerDamaged {
            amount: 0.4,
            audible: false,
        };
        let loud = GameEvent::PlayerDamaged {
            amount: 0.4,
            audible: true,
        };
        assert_eq!(SoundEffect::for_event(&quiet), None);
        assert_eq!(SoundEffect::for_event(&loud), Some(SoundEffect::Damage));

        let spawn = GameEvent::EnemySpawned {
            archetype: Archetype::Runner,
            audible: false,
        };
        assert_eq!(SoundEffect::for_event(&spawn), None);
    }

    #[test]
    fn test_shoot_detune_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            let voices = SoundEffect::Shoot.voices(&mut rng);
            assert_eq!(voices.len(), 3);
            let base = voices[0].freq().unwrap();
            assert!((120.0..160.0).contains(&base));
            assert!((voices[1].freq().unwrap() - base * 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_game_over_is_a_descending_sequence() {
        let mut rng = Pcg32::seed_from_u64(1);
        let voices = SoundEffect::GameOver.voices(&mut rng);
        assert!(voices.windows(2).all(|w| w[1].freq() < w[0].freq() && w[1].delay > w[0].delay));
        assert!((voices[2].end_time() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_explosion_has_lowpassed_noise() {
        let mut rng = Pcg32::seed_from_u64(1);
        let voices = SoundEffect::Explosion.voices(&mut rng);
        let noise = voices
            .iter()
            .find(|v| matches!(v.kind, VoiceKind::Noise { .. }))
            .unwrap();
        assert_eq!(noise.kind, VoiceKind::Noise { duration: 0.4, cutoff: 800.0 });
        assert_eq!(noise.freq(), None);
        assert!((noise.end_time() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_noise_cues() {
        let mut rng = Pcg32::seed_from_u64(1);
        let cutoff = |effect: SoundEffect, rng: &mut Pcg32| {
            effect.voices(rng).iter().find_map(|v| match v.kind {
                VoiceKind::Noise { cutoff, .. } => Some(cutoff),
                VoiceKind::Tone { .. } => None,
            })
        };
        assert_eq!(cutoff(SoundEffect::Hit, &mut rng), Some(400.0));
        assert_eq!(cutoff(SoundEffect::Damage, &mut rng), Some(300.0));
        assert_eq!(cutoff(SoundEffect::WaveTransition, &mut rng), Some(600.0));
        assert_eq!(cutoff(SoundEffect::Shoot, &mut rng), None);
    }

    #[test]
    fn test_noise_samples_fade_out() {
        let mut rng = Pcg32::seed_from_u64(3);
        let samples = noise_samples(&mut rng, 1000);
        assert_eq!(samples.len(), 1000);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        // Envelope at i is (1 - i/n)^2, so the tail is nearly silent
        assert!(samples[990..].iter().all(|s| s.abs() <= 0.0001 + 1e-6));
        assert!(samples[..100].iter().any(|s| s.abs() > 0.1));
    }
}

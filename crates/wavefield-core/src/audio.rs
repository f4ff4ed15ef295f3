//! The drone's audio scene: one fixed signal chain, a noise bed and a small
//! ensemble of auto-panned tone voices.
//!
//! The scene is a plain description built once at startup. [`AudioScene::mount`]
//! realises it on any [`AudioGraph`] backend in a fixed order, so the topology
//! is owned here and the backend only knows how to create and connect nodes.

use crate::params::{ParameterSeed, SessionConfig, SessionParams};

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// One processing stage of the master chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChainStage {
    /// Amplitude envelope held open after a single attack.
    Envelope {
        attack: f64,
        decay: f64,
        sustain: f64,
        release: f64,
    },
    /// Delay time in beats of the session transport.
    FeedbackDelay { beats: f64, feedback: f64, wet: f64 },
    /// `rolloff_db` is a multiple of -12; each -12 is one filter section.
    LowShelf {
        frequency: f64,
        gain_db: f64,
        q: f64,
        rolloff_db: f64,
    },
    Distortion { amount: f64, wet: f64 },
    Lowpass {
        frequency: f64,
        q: f64,
        rolloff_db: f64,
    },
    Reverb { decay: f64, pre_delay: f64, wet: f64 },
    Limiter { threshold_db: f64 },
}

impl ChainStage {
    /// Number of cascaded second-order sections for the filter stages; 1 for
    /// everything else.
    pub fn filter_sections(&self) -> u32 {
        match self {
            ChainStage::LowShelf { rolloff_db, .. } | ChainStage::Lowpass { rolloff_db, .. } => {
                ((rolloff_db / -12.0).round() as u32).max(1)
            }
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainStage::Envelope { .. } => "envelope",
            ChainStage::FeedbackDelay { .. } => "feedback-delay",
            ChainStage::LowShelf { .. } => "low-shelf",
            ChainStage::Distortion { .. } => "distortion",
            ChainStage::Lowpass { .. } => "lowpass",
            ChainStage::Reverb { .. } => "reverb",
            ChainStage::Limiter { .. } => "limiter",
        }
    }
}

/// Ordered, fixed-topology list of stages: stage `i` feeds stage `i + 1`.
#[derive(Clone, Debug)]
pub struct SignalChain {
    stages: Vec<ChainStage>,
}

impl SignalChain {
    /// envelope -> feedback delay -> low shelf -> distortion -> lowpass ->
    /// reverb -> limiter
    pub fn drone() -> Self {
        Self {
            stages: vec![
                ChainStage::Envelope {
                    attack: 6.0,
                    decay: 0.1,
                    sustain: 1.0,
                    release: 1.0,
                },
                ChainStage::FeedbackDelay {
                    beats: 1.0,
                    feedback: 0.5,
                    wet: 1.0,
                },
                ChainStage::LowShelf {
                    frequency: 220.0,
                    gain_db: 15.0,
                    q: 3.0,
                    rolloff_db: -24.0,
                },
                ChainStage::Distortion {
                    amount: 0.4,
                    wet: 0.25,
                },
                ChainStage::Lowpass {
                    frequency: 4000.0,
                    q: 1.0,
                    rolloff_db: -12.0,
                },
                ChainStage::Reverb {
                    decay: 1.5,
                    pre_delay: 0.01,
                    wet: 0.5,
                },
                ChainStage::Limiter { threshold_db: -0.1 },
            ],
        }
    }

    pub fn stages(&self) -> &[ChainStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Always-on brown noise bed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSource {
    pub volume_db: f64,
}

/// Slow sinusoidal left-right modulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoPan {
    pub rate_hz: f64,
    pub depth: f64,
}

/// One oscillator and its own auto-panner feeding the chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneVoice {
    pub frequency: f64,
    /// Equal-amplitude harmonics counting the fundamental; 0 is a pure sine.
    pub partials: u32,
    pub volume_db: f64,
    pub pan: AutoPan,
}

/// Session playback clock; only gives the delay a tempo-relative time base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transport {
    pub bpm: f64,
}

impl Transport {
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.seconds_per_beat()
    }
}

#[derive(Clone, Debug)]
pub struct AudioScene {
    pub input_volume_db: f64,
    pub chain: SignalChain,
    pub noise: NoiseSource,
    pub voices: Vec<ToneVoice>,
    pub transport: Transport,
}

/// Builds the drone scene from the session parameters.
pub struct AudioSceneBuilder<'a> {
    config: &'a SessionConfig,
    params: &'a SessionParams,
}

impl<'a> AudioSceneBuilder<'a> {
    pub fn new(config: &'a SessionConfig, params: &'a SessionParams) -> Self {
        Self { config, params }
    }

    /// Draws, per voice in frequency order, the partial count and then the
    /// pan-rate factor.
    pub fn build(&self, seed: &mut ParameterSeed) -> AudioScene {
        let volume_db = self.params.voice_volume_db(self.config);
        let voices = self
            .params
            .frequencies(self.config)
            .iter()
            .map(|&frequency| {
                let partials = seed.draw(0.0, self.config.max_partials).floor().max(0.0) as u32;
                let rate_hz = frequency * seed.draw(0.0, 1.0) * self.config.pan_rate_factor;
                ToneVoice {
                    frequency,
                    partials,
                    volume_db,
                    pan: AutoPan {
                        rate_hz,
                        depth: self.config.pan_depth,
                    },
                }
            })
            .collect::<Vec<_>>();
        log::info!(
            "[audio] voices={} rare={} bpm={}",
            voices.len(),
            self.params.rare,
            self.config.bpm
        );
        AudioScene {
            input_volume_db: self.config.master_volume_db,
            chain: SignalChain::drone(),
            noise: NoiseSource {
                volume_db: self.config.noise_volume_db,
            },
            voices,
            transport: Transport {
                bpm: self.config.bpm,
            },
        }
    }
}

/// Backend that can create and wire the nodes an [`AudioScene`] needs.
pub trait AudioGraph {
    type Node;
    type Error;

    /// Channel every source feeds; the head of the chain.
    fn input(&mut self, volume_db: f64) -> Result<Self::Node, Self::Error>;
    fn stage(&mut self, stage: &ChainStage, transport: &Transport)
        -> Result<Self::Node, Self::Error>;
    fn destination(&mut self) -> Result<Self::Node, Self::Error>;
    fn noise(&mut self, source: &NoiseSource) -> Result<Self::Node, Self::Error>;
    fn oscillator(&mut self, voice: &ToneVoice) -> Result<Self::Node, Self::Error>;
    fn auto_panner(&mut self, pan: &AutoPan) -> Result<Self::Node, Self::Error>;
    fn connect(&mut self, from: &Self::Node, to: &Self::Node) -> Result<(), Self::Error>;
    /// Start a source or modulator; it runs for the rest of the session.
    fn start(&mut self, node: &Self::Node) -> Result<(), Self::Error>;
    fn trigger_attack(&mut self, envelope: &Self::Node, stage: &ChainStage)
        -> Result<(), Self::Error>;
    fn start_transport(&mut self, transport: &Transport) -> Result<(), Self::Error>;
}

/// Handles to everything a mounted scene created, kept alive for the session.
pub struct MountedScene<N> {
    pub input: N,
    pub stages: Vec<N>,
    pub destination: N,
    pub noise: N,
    /// `(oscillator, auto-panner)` per voice.
    pub voices: Vec<(N, N)>,
}

impl AudioScene {
    pub fn mount<G: AudioGraph>(&self, graph: &mut G) -> Result<MountedScene<G::Node>, G::Error> {
        let input = graph.input(self.input_volume_db)?;
        let stages = self
            .chain
            .stages()
            .iter()
            .map(|stage| graph.stage(stage, &self.transport))
            .collect::<Result<Vec<_>, _>>()?;
        let destination = graph.destination()?;

        let mut prev = &input;
        for node in &stages {
            graph.connect(prev, node)?;
            prev = node;
        }
        graph.connect(prev, &destination)?;

        let noise = graph.noise(&self.noise)?;
        graph.connect(&noise, &input)?;
        graph.start(&noise)?;

        let mut voices = Vec::with_capacity(self.voices.len());
        for voice in &self.voices {
            let osc = graph.oscillator(voice)?;
            let panner = graph.auto_panner(&voice.pan)?;
            graph.start(&panner)?;
            graph.connect(&osc, &panner)?;
            graph.connect(&panner, &input)?;
            graph.start(&osc)?;
            voices.push((osc, panner));
        }

        for (stage, node) in self.chain.stages().iter().zip(&stages) {
            if matches!(stage, ChainStage::Envelope { .. }) {
                graph.trigger_attack(node, stage)?;
            }
        }
        graph.start_transport(&self.transport)?;

        Ok(MountedScene {
            input,
            stages,
            destination,
            noise,
            voices,
        })
    }
}

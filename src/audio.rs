//! WebAudio realisation of the drone scene.
//!
//! Every [`ChainStage`] becomes a small cluster of native nodes wrapped in a
//! [`WebNode`] with one entry and one exit, so the scene's own mounting order
//! can wire them like single nodes.

use crate::constants::*;
use rand::Rng;
use wasm_bindgen::JsValue;
use wavefield_core::{
    db_to_gain, AudioGraph, AutoPan, ChainStage, Error, NoiseSource, ToneVoice,
    Transport,
};
use web_sys as web;

/// A realised scene node: where signal enters, where it leaves, plus the
/// handles `start` and `trigger_attack` need.
#[derive(Clone)]
pub struct WebNode {
    input: web::AudioNode,
    output: web::AudioNode,
    source: Option<web::AudioScheduledSourceNode>,
    level: Option<web::AudioParam>,
}

impl WebNode {
    fn through(input: impl Into<web::AudioNode>, output: impl Into<web::AudioNode>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            source: None,
            level: None,
        }
    }

    fn single(node: impl Into<web::AudioNode>) -> Self {
        let node = node.into();
        Self::through(node.clone(), node)
    }
}

fn js_err(what: &'static str) -> impl Fn(JsValue) -> Error {
    move |e| Error::Audio(format!("{what}: {e:?}"))
}

fn link(from: &web::AudioNode, to: &web::AudioNode) -> Result<(), Error> {
    from.connect_with_audio_node(to)
        .map(|_| ())
        .map_err(js_err("connect"))
}

pub struct WebAudioGraph {
    ctx: web::AudioContext,
}

impl WebAudioGraph {
    pub fn new(ctx: web::AudioContext) -> Self {
        Self { ctx }
    }

    fn gain(&self, value: f64) -> Result<web::GainNode, Error> {
        let g = web::GainNode::new(&self.ctx).map_err(js_err("GainNode"))?;
        g.gain().set_value(value as f32);
        Ok(g)
    }

    /// `input -> dry -> output` alongside `input -> effect -> wet -> output`.
    fn wet_dry(
        &self,
        effect_in: &web::AudioNode,
        effect_out: &web::AudioNode,
        wet: f64,
    ) -> Result<WebNode, Error> {
        let input = self.gain(1.0)?;
        let dry = self.gain(1.0 - wet)?;
        let wet_gain = self.gain(wet)?;
        let output = self.gain(1.0)?;
        link(&input, &dry)?;
        link(&dry, &output)?;
        link(&input, effect_in)?;
        link(effect_out, &wet_gain)?;
        link(&wet_gain, &output)?;
        Ok(WebNode::through(input, output))
    }

    fn envelope(&self) -> Result<WebNode, Error> {
        let g = self.gain(0.0)?;
        let mut node = WebNode::single(g.clone());
        node.level = Some(g.gain());
        Ok(node)
    }

    fn feedback_delay(&self, seconds: f64, feedback: f64, wet: f64) -> Result<WebNode, Error> {
        let delay = self
            .ctx
            .create_delay_with_max_delay_time(MAX_DELAY_SECONDS.max(seconds))
            .map_err(js_err("DelayNode"))?;
        delay.delay_time().set_value(seconds as f32);
        let loop_gain = self.gain(feedback)?;
        link(&delay, &loop_gain)?;
        link(&loop_gain, &delay)?;
        self.wet_dry(&delay, &delay, wet)
    }

    fn filter(
        &self,
        kind: web::BiquadFilterType,
        frequency: f64,
        gain_db: f64,
        q: f64,
        sections: u32,
    ) -> Result<WebNode, Error> {
        let mut chain: Vec<web::BiquadFilterNode> = Vec::new();
        for _ in 0..sections.max(1) {
            let f = web::BiquadFilterNode::new(&self.ctx).map_err(js_err("BiquadFilterNode"))?;
            f.set_type(kind);
            f.frequency().set_value(frequency as f32);
            f.gain().set_value(gain_db as f32);
            f.q().set_value(q as f32);
            if let Some(prev) = chain.last() {
                link(prev, &f)?;
            }
            chain.push(f);
        }
        match (chain.first(), chain.last()) {
            (Some(first), Some(last)) => Ok(WebNode::through(first.clone(), last.clone())),
            _ => Err(Error::Audio("empty filter chain".into())),
        }
    }

    fn distortion(&self, amount: f64, wet: f64) -> Result<WebNode, Error> {
        #[allow(deprecated)]
        let shaper = web::WaveShaperNode::new(&self.ctx).map_err(js_err("WaveShaperNode"))?;
        let mut curve = distortion_curve(amount as f32, DISTORTION_CURVE_LEN);
        #[allow(deprecated)]
        shaper.set_curve(Some(curve.as_mut_slice()));
        self.wet_dry(&shaper, &shaper, wet)
    }

    fn reverb(&self, decay: f64, pre_delay: f64, wet: f64) -> Result<WebNode, Error> {
        let convolver = web::ConvolverNode::new(&self.ctx).map_err(js_err("ConvolverNode"))?;
        convolver.set_normalize(true);
        let sr = self.ctx.sample_rate();
        let len = ((pre_delay + decay) * sr as f64).ceil().max(1.0) as u32;
        let ir = self
            .ctx
            .create_buffer(2, len, sr)
            .map_err(js_err("reverb impulse"))?;
        let mut rng = rand::thread_rng();
        for ch in 0..2 {
            let mut buf: Vec<f32> = (0..len)
                .map(|i| {
                    let t = i as f64 / sr as f64 - pre_delay;
                    if t < 0.0 {
                        return 0.0;
                    }
                    let n: f32 = rng.gen_range(-1.0..1.0);
                    n * (-REVERB_DECAY_EFOLDS * (t / decay) as f32).exp()
                })
                .collect();
            ir.copy_to_channel(&mut buf, ch)
                .map_err(js_err("reverb impulse"))?;
        }
        convolver.set_buffer(Some(&ir));
        self.wet_dry(&convolver, &convolver, wet)
    }

    fn limiter(&self, threshold_db: f64) -> Result<WebNode, Error> {
        let c = web::DynamicsCompressorNode::new(&self.ctx)
            .map_err(js_err("DynamicsCompressorNode"))?;
        c.threshold().set_value(threshold_db as f32);
        c.ratio().set_value(LIMITER_RATIO);
        c.knee().set_value(LIMITER_KNEE_DB);
        c.attack().set_value(LIMITER_ATTACK_SEC);
        c.release().set_value(LIMITER_RELEASE_SEC);
        Ok(WebNode::single(c))
    }
}

/// Soft-clipping transfer curve over `[-1, 1]`; larger `amount` clips harder.
fn distortion_curve(amount: f32, len: usize) -> Vec<f32> {
    let k = amount * 100.0;
    let deg = std::f32::consts::PI / 180.0;
    (0..len)
        .map(|i| {
            let x = (i as f32 / (len - 1) as f32) * 2.0 - 1.0;
            if x.abs() < 0.001 {
                0.0
            } else {
                ((3.0 + k) * x * 20.0 * deg) / (std::f32::consts::PI + k * x.abs())
            }
        })
        .collect()
}

/// Mono brown noise for a looping buffer source: leaky-integrated white noise.
fn brown_noise(len: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let mut last = 0.0f32;
    (0..len)
        .map(|_| {
            let white: f32 = rng.gen_range(-1.0..1.0);
            last = (last + 0.02 * white) / 1.02;
            last * BROWN_NOISE_MAKEUP
        })
        .collect()
}

impl AudioGraph for WebAudioGraph {
    type Node = WebNode;
    type Error = Error;

    fn input(&mut self, volume_db: f64) -> Result<WebNode, Error> {
        Ok(WebNode::single(self.gain(db_to_gain(volume_db))?))
    }

    fn stage(&mut self, stage: &ChainStage, transport: &Transport) -> Result<WebNode, Error> {
        let sections = stage.filter_sections();
        match *stage {
            ChainStage::Envelope { .. } => self.envelope(),
            ChainStage::FeedbackDelay {
                beats,
                feedback,
                wet,
            } => self.feedback_delay(transport.beats_to_seconds(beats), feedback, wet),
            ChainStage::LowShelf {
                frequency,
                gain_db,
                q,
                ..
            } => self.filter(web::BiquadFilterType::Lowshelf, frequency, gain_db, q, sections),
            ChainStage::Distortion { amount, wet } => self.distortion(amount, wet),
            ChainStage::Lowpass { frequency, q, .. } => {
                self.filter(web::BiquadFilterType::Lowpass, frequency, 0.0, q, sections)
            }
            ChainStage::Reverb {
                decay,
                pre_delay,
                wet,
            } => self.reverb(decay, pre_delay, wet),
            ChainStage::Limiter { threshold_db } => self.limiter(threshold_db),
        }
    }

    fn destination(&mut self) -> Result<WebNode, Error> {
        Ok(WebNode::single(self.ctx.destination()))
    }

    fn noise(&mut self, source: &NoiseSource) -> Result<WebNode, Error> {
        let sr = self.ctx.sample_rate();
        let len = (sr * NOISE_BUFFER_SECONDS) as u32;
        let buffer = self
            .ctx
            .create_buffer(1, len, sr)
            .map_err(js_err("noise buffer"))?;
        let mut samples = brown_noise(len as usize);
        buffer
            .copy_to_channel(&mut samples, 0)
            .map_err(js_err("noise buffer"))?;
        let player = web::AudioBufferSourceNode::new(&self.ctx)
            .map_err(js_err("AudioBufferSourceNode"))?;
        player.set_buffer(Some(&buffer));
        player.set_loop(true);
        let level = self.gain(db_to_gain(source.volume_db))?;
        link(&player, &level)?;
        let mut node = WebNode::single(level);
        node.source = Some(player.into());
        Ok(node)
    }

    fn oscillator(&mut self, voice: &ToneVoice) -> Result<WebNode, Error> {
        let osc = web::OscillatorNode::new(&self.ctx).map_err(js_err("OscillatorNode"))?;
        osc.frequency().set_value(voice.frequency as f32);
        if voice.partials == 0 {
            osc.set_type(web::OscillatorType::Sine);
        } else {
            // imag[n] = 1 for harmonics 1..=partials
            let n = voice.partials as usize + 1;
            let mut real = vec![0.0f32; n];
            let mut imag = vec![1.0f32; n];
            imag[0] = 0.0;
            #[allow(deprecated)]
            let wave = self
                .ctx
                .create_periodic_wave(&mut real, &mut imag)
                .map_err(js_err("PeriodicWave"))?;
            osc.set_periodic_wave(&wave);
        }
        let level = self.gain(db_to_gain(voice.volume_db))?;
        link(&osc, &level)?;
        let mut node = WebNode::single(level);
        node.source = Some(osc.into());
        Ok(node)
    }

    fn auto_panner(&mut self, pan: &AutoPan) -> Result<WebNode, Error> {
        let panner = web::StereoPannerNode::new(&self.ctx).map_err(js_err("StereoPannerNode"))?;
        panner.pan().set_value(0.0);
        let lfo = web::OscillatorNode::new(&self.ctx).map_err(js_err("OscillatorNode"))?;
        lfo.set_type(web::OscillatorType::Sine);
        lfo.frequency().set_value(pan.rate_hz as f32);
        let depth = self.gain(pan.depth)?;
        link(&lfo, &depth)?;
        depth
            .connect_with_audio_param(&panner.pan())
            .map_err(js_err("auto-pan modulation"))?;
        let mut node = WebNode::single(panner);
        node.source = Some(lfo.into());
        Ok(node)
    }

    fn connect(&mut self, from: &WebNode, to: &WebNode) -> Result<(), Error> {
        link(&from.output, &to.input)
    }

    fn start(&mut self, node: &WebNode) -> Result<(), Error> {
        match &node.source {
            Some(src) => src.start().map_err(js_err("start")),
            None => Ok(()),
        }
    }

    fn trigger_attack(&mut self, envelope: &WebNode, stage: &ChainStage) -> Result<(), Error> {
        let (Some(level), ChainStage::Envelope {
            attack, sustain, ..
        }) = (&envelope.level, stage)
        else {
            return Ok(());
        };
        let now = self.ctx.current_time();
        level
            .set_value_at_time(0.0, now)
            .map_err(js_err("envelope"))?;
        level
            .linear_ramp_to_value_at_time(*sustain as f32, now + attack)
            .map_err(js_err("envelope"))?;
        log::debug!("[audio] envelope attack {}s from t={:.3}", attack, now);
        Ok(())
    }

    fn start_transport(&mut self, transport: &Transport) -> Result<(), Error> {
        // Tempo only sets the delay time, which the stages already baked in.
        log::info!(
            "[audio] transport started at {} bpm (beat {:.3}s)",
            transport.bpm,
            transport.seconds_per_beat()
        );
        Ok(())
    }
}

/// Build the Web Audio graph for `scene` and start it. The context stays
/// suspended until the first user gesture resumes it.
pub fn mount_scene(
    ctx: &web::AudioContext,
    scene: &wavefield_core::AudioScene,
) -> anyhow::Result<wavefield_core::MountedScene<WebNode>> {
    let mut graph = WebAudioGraph::new(ctx.clone());
    let mounted = scene.mount(&mut graph)?;
    log::info!(
        "[audio] mounted {} stages, {} voices, noise {} dB",
        mounted.stages.len(),
        mounted.voices.len(),
        scene.noise.volume_db
    );
    Ok(mounted)
}

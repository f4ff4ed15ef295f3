//! Session parameters: the bounded random source and the configuration record
//! every tunable is drawn from.
//!
//! A session draws each parameter exactly once, in a fixed order, and never
//! changes it afterwards. Tests pin the order by seeding [`ParameterSeed`].

use crate::constants::*;
use crate::pipeline::{BloomSettings, DepthOfFieldSettings};
use rand::prelude::*;

/// Bounded random draws seeding every tunable of a session.
pub struct ParameterSeed {
    rng: StdRng,
}

impl ParameterSeed {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[min, max)`.
    ///
    /// A negative `min` does not widen the range below zero. Instead the lower
    /// bound becomes `max + min` and the result gets an independent random
    /// sign, so `draw(-0.2, 0.3)` yields magnitudes in `[0.1, 0.3)` on either
    /// side of zero. The sign is drawn before the magnitude.
    pub fn draw(&mut self, min: f64, max: f64) -> f64 {
        let mut lo = min;
        let mut sign = 1.0;
        if min < 0.0 {
            lo = max + min;
            sign = self.sign();
        }
        sign * (self.rng.gen::<f64>() * (max - lo) + lo)
    }

    #[inline]
    pub fn draw_range(&mut self, range: (f64, f64)) -> f64 {
        self.draw(range.0, range.1)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.draw(0.0, 1.0) < p
    }

    /// `+1.0` or `-1.0` with equal probability.
    pub fn sign(&mut self) -> f64 {
        if self.rng.gen::<f64>() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
}

/// The single configuration record every session is generated from.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    // curve
    pub curve_steps: usize,
    pub step_jitter: f64,
    pub subdivisions: usize,
    pub width_ratio: (f64, f64),
    pub height_ratio: (f64, f64),
    // field and motion
    pub line_spacing_landscape_px: f64,
    pub line_spacing_portrait_px: f64,
    pub rotation_span: (f64, f64),
    pub gap: (f64, f64),
    pub speed: (f64, f64),
    pub speed_multiplier: f64,
    pub depth: f64,
    // post-processing
    pub afterimage_damp: (f64, f64),
    pub bloom: BloomSettings,
    pub depth_of_field: DepthOfFieldSettings,
    pub film_noise: f32,
    // background and fade-in
    pub background_hue: (f64, f64),
    pub background_saturation: f64,
    pub background_lightness: f64,
    pub fade_duration_ms: f64,
    pub rare_chance: f64,
    // audio
    pub frequencies: Vec<f64>,
    pub rare_frequencies: Vec<f64>,
    pub voice_volume_db: f64,
    pub rare_voice_volume_db: f64,
    pub noise_volume_db: f64,
    pub master_volume_db: f64,
    pub max_partials: f64,
    pub pan_rate_factor: f64,
    pub pan_depth: f64,
    pub bpm: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            curve_steps: CURVE_STEPS,
            step_jitter: CURVE_STEP_JITTER,
            subdivisions: CURVE_SUBDIVISIONS,
            width_ratio: CURVE_WIDTH_RATIO,
            height_ratio: CURVE_HEIGHT_RATIO,
            line_spacing_landscape_px: LINE_SPACING_LANDSCAPE_PX,
            line_spacing_portrait_px: LINE_SPACING_PORTRAIT_PX,
            rotation_span: WAVE_ROTATION_SPAN,
            gap: WAVE_GAP,
            speed: WAVE_SPEED,
            speed_multiplier: WAVE_SPEED_MULTIPLIER,
            depth: WAVE_DEPTH,
            afterimage_damp: AFTERIMAGE_DAMP,
            bloom: BloomSettings::default(),
            depth_of_field: DepthOfFieldSettings::default(),
            film_noise: FILM_NOISE,
            background_hue: BACKGROUND_HUE,
            background_saturation: BACKGROUND_SATURATION,
            background_lightness: BACKGROUND_LIGHTNESS,
            fade_duration_ms: FADE_DURATION_MS,
            rare_chance: RARE_SESSION_CHANCE,
            frequencies: DRONE_FREQUENCIES.to_vec(),
            rare_frequencies: RARE_DRONE_FREQUENCIES.to_vec(),
            voice_volume_db: VOICE_VOLUME_DB,
            rare_voice_volume_db: RARE_VOICE_VOLUME_DB,
            noise_volume_db: NOISE_VOLUME_DB,
            master_volume_db: MASTER_VOLUME_DB,
            max_partials: MAX_PARTIALS,
            pan_rate_factor: AUTO_PAN_RATE_FACTOR,
            pan_depth: AUTO_PAN_DEPTH,
            bpm: TRANSPORT_BPM,
        }
    }
}

impl SessionConfig {
    /// Number of replicas for a viewport: one per 60 px of width in landscape,
    /// one per 30 px of height in portrait.
    pub fn line_count(&self, width: f64, height: f64) -> usize {
        let n = if width >= height {
            width / self.line_spacing_landscape_px
        } else {
            height / self.line_spacing_portrait_px
        };
        n.max(0.0).floor() as usize
    }
}

/// Values drawn once from a [`SessionConfig`] at startup.
#[derive(Clone, Debug)]
pub struct SessionParams {
    pub hue: f64,
    pub rare: bool,
    pub afterimage_damp: f32,
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub rotation_span: f64,
    pub gap: f64,
    pub speed: f64,
    pub depth: f64,
    pub film_noise: f32,
    pub fade_saturation: f64,
    pub background_lightness: f64,
    pub fade_duration_ms: f64,
}

impl SessionParams {
    /// Draw in session order: hue, rare flag, afterimage damp, width ratio,
    /// height ratio, rotation span, gap, speed.
    pub fn draw(config: &SessionConfig, seed: &mut ParameterSeed) -> Self {
        let hue = seed.draw_range(config.background_hue);
        let rare = seed.chance(config.rare_chance);
        let afterimage_damp = seed.draw_range(config.afterimage_damp) as f32;
        let width_ratio = seed.draw_range(config.width_ratio);
        let height_ratio = seed.draw_range(config.height_ratio);
        let rotation_span = seed.draw_range(config.rotation_span);
        let gap = seed.draw_range(config.gap);
        let speed = seed.draw_range(config.speed) * config.speed_multiplier;
        Self {
            hue,
            rare,
            afterimage_damp,
            width_ratio,
            height_ratio,
            rotation_span,
            gap,
            speed,
            depth: config.depth,
            film_noise: config.film_noise,
            fade_saturation: if rare {
                config.background_saturation
            } else {
                0.0
            },
            background_lightness: config.background_lightness,
            fade_duration_ms: config.fade_duration_ms,
        }
    }

    pub fn frequencies<'a>(&self, config: &'a SessionConfig) -> &'a [f64] {
        if self.rare {
            &config.rare_frequencies
        } else {
            &config.frequencies
        }
    }

    pub fn voice_volume_db(&self, config: &SessionConfig) -> f64 {
        if self.rare {
            config.rare_voice_volume_db
        } else {
            config.voice_volume_db
        }
    }
}

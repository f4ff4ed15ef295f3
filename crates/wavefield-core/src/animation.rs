//! Per-frame wave motion and the background fade-in.
//!
//! Both run from the same visual tick but are otherwise independent: the wave
//! displacement is a pure function of replica index and wall-clock seconds,
//! while the fade keeps a small amount of state and settles for good after a
//! fixed number of updates.

use crate::constants::FADE_STEPS;
use crate::field::Field;
use crate::params::SessionParams;
use std::f64::consts::PI;

/// Drives the vertical phase displacement of every replica.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    pub count: usize,
    pub speed: f64,
    pub depth: f64,
}

impl AnimationDriver {
    pub fn new(count: usize, speed: f64, depth: f64) -> Self {
        Self {
            count,
            speed,
            depth,
        }
    }

    /// `sin((index mod N) * PI / speed + t) * depth`
    #[inline]
    pub fn offset_z(&self, index: usize, t: f64) -> f64 {
        let wrapped = if self.count == 0 { index } else { index % self.count };
        ((wrapped as f64 * PI) / self.speed + t).sin() * self.depth
    }

    pub fn apply(&self, field: &mut Field, t: f64) {
        for element in field.elements_mut() {
            element.offset_z = self.offset_z(element.index(), t);
        }
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// sRGB components in `[0, 1]`.
    pub fn to_rgb(&self) -> [f32; 3] {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        if s == 0.0 {
            return [l as f32; 3];
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
            hue_to_channel(p, q, h) as f32,
            hue_to_channel(p, q, h - 1.0 / 3.0) as f32,
        ]
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    Fading,
    Settled,
}

/// Background fade from white toward the session lightness.
///
/// Updates at most once per tick, on a fixed `duration / FADE_STEPS` cadence.
/// Once settled the background never changes again.
#[derive(Clone, Debug)]
pub struct FadeState {
    step: f64,
    step_size: f64,
    period_secs: f64,
    target_lightness: f64,
    phase: FadePhase,
    last_update: Option<f64>,
    background: Hsl,
    updates: usize,
}

impl FadeState {
    pub fn new(hue: f64, saturation: f64, target_lightness: f64, duration_ms: f64) -> Self {
        Self {
            step: 0.0,
            step_size: (100.0 - target_lightness) / FADE_STEPS,
            period_secs: duration_ms / FADE_STEPS / 1000.0,
            target_lightness,
            phase: FadePhase::Fading,
            last_update: None,
            background: Hsl::new(hue, saturation, 100.0),
            updates: 0,
        }
    }

    pub fn from_params(params: &SessionParams) -> Self {
        Self::new(
            params.hue,
            params.fade_saturation,
            params.background_lightness,
            params.fade_duration_ms,
        )
    }

    /// Advance the fade; returns `true` when the background changed.
    ///
    /// The first tick only anchors the rate limiter. Later updates land on
    /// whole periods after the anchor; after a stall longer than one period
    /// the anchor resyncs to `now` instead of replaying missed updates.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.phase == FadePhase::Settled {
            return false;
        }
        let last = *self.last_update.get_or_insert(now);
        if now - last < self.period_secs {
            return false;
        }
        let next = last + self.period_secs;
        self.last_update = Some(if now - next >= self.period_secs {
            now
        } else {
            next
        });
        self.background.lightness = self.lightness_at(self.step);
        self.step += self.step_size;
        self.updates += 1;
        if self.step > 100.0 - self.target_lightness {
            self.phase = FadePhase::Settled;
            log::debug!(
                "[fade] settled after {} updates at lightness {:.2}",
                self.updates,
                self.background.lightness
            );
        }
        true
    }

    /// `100 - step * (100 - target) / 100`
    #[inline]
    pub fn lightness_at(&self, step: f64) -> f64 {
        100.0 - step * (100.0 - self.target_lightness) / 100.0
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == FadePhase::Settled
    }

    pub fn background(&self) -> Hsl {
        self.background
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }
}

/// Number of fade updates before a fade toward `target_lightness` settles,
/// replaying the same accumulation `FadeState::tick` performs.
/// `None` when it never settles (a target of exactly 100).
pub fn updates_until_settled(target_lightness: f64) -> Option<usize> {
    let step_size = (100.0 - target_lightness) / FADE_STEPS;
    let limit = 100.0 - target_lightness;
    if step_size <= 0.0 {
        return if limit < 0.0 { Some(1) } else { None };
    }
    let mut step = 0.0;
    let mut updates = 0;
    while step <= limit {
        step += step_size;
        updates += 1;
    }
    Some(updates)
}

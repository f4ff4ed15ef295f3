use crate::constants::CATMULL_ROM_TENSION;
use crate::params::{ParameterSeed, SessionConfig, SessionParams};
use glam::Vec3;
use std::f64::consts::TAU;

/// A closed polyline in the XY plane, ready to be drawn as a line strip.
///
/// The first and last points coincide, so a strip over all points closes the
/// loop without an index buffer.
#[derive(Clone, Debug, Default)]
pub struct Curve {
    points: Vec<Vec3>,
}

impl Curve {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty curve.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Translate so the bounding-box center sits at the origin.
    pub fn center(&mut self) {
        if let Some((lo, hi)) = self.bounds() {
            let mid = (lo + hi) * 0.5;
            for p in &mut self.points {
                *p -= mid;
            }
        }
    }
}

/// Builds the jittered elliptical base curve every replica shares.
#[derive(Clone, Debug)]
pub struct CurveBuilder {
    pub steps: usize,
    pub jitter: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub subdivisions: usize,
}

impl CurveBuilder {
    pub fn new(config: &SessionConfig, params: &SessionParams) -> Self {
        Self {
            steps: config.curve_steps,
            jitter: config.step_jitter,
            width_ratio: params.width_ratio,
            height_ratio: params.height_ratio,
            subdivisions: config.subdivisions,
        }
    }

    /// One control point per step on the ellipse, each nudged by independent
    /// x then y jitter draws.
    pub fn control_points(&self, seed: &mut ParameterSeed) -> Vec<Vec3> {
        let step_size = TAU / self.steps.max(1) as f64;
        (0..self.steps)
            .map(|i| {
                let angle = i as f64 * step_size;
                let x = angle.sin() * self.width_ratio + seed.draw(-self.jitter, self.jitter);
                let y = angle.cos() * self.height_ratio + seed.draw(-self.jitter, self.jitter);
                Vec3::new(x as f32, y as f32, 0.0)
            })
            .collect()
    }

    pub fn build(&self, seed: &mut ParameterSeed) -> Curve {
        let control = self.control_points(seed);
        let mut curve = Curve::from_points(sample_closed(
            &control,
            self.steps * self.subdivisions,
        ));
        curve.center();
        curve
    }
}

/// Sample a closed Catmull-Rom spline at `divisions + 1` evenly spaced
/// parameters in `[0, 1]`.
pub fn sample_closed(control: &[Vec3], divisions: usize) -> Vec<Vec3> {
    if control.is_empty() {
        return Vec::new();
    }
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|d| closed_point(control, d as f32 / divisions as f32))
        .collect()
}

/// Point at parameter `t` in `[0, 1]` on the closed spline through `control`.
pub fn closed_point(control: &[Vec3], t: f32) -> Vec3 {
    let l = control.len();
    let p = l as f32 * t;
    let seg = p.floor();
    let weight = p - seg;
    let i1 = (seg as isize).rem_euclid(l as isize) as usize;
    let p0 = control[(i1 + l - 1) % l];
    let p1 = control[i1];
    let p2 = control[(i1 + 1) % l];
    let p3 = control[(i1 + 2) % l];
    catmull_rom(p0, p1, p2, p3, CATMULL_ROM_TENSION, weight)
}

// Hermite form with tangents tension * (p[i+1] - p[i-1]).
#[inline]
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32, w: f32) -> Vec3 {
    let t0 = (p2 - p0) * tension;
    let t1 = (p3 - p1) * tension;
    let c0 = p1;
    let c1 = t0;
    let c2 = p1 * -3.0 + p2 * 3.0 - t0 * 2.0 - t1;
    let c3 = p1 * 2.0 - p2 * 2.0 + t0 + t1;
    let w2 = w * w;
    c0 + c1 * w + c2 * w2 + c3 * (w2 * w)
}

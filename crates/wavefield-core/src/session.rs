//! The session context: everything the visual loop reads and writes.
//!
//! A [`Session`] is created once at startup from a config and a seeded
//! parameter source, then ticked every frame. Resize events go through
//! [`Session::resize`] between ticks; the renderer reads camera and pipeline
//! sizing fresh at the start of the next frame.

use crate::animation::{AnimationDriver, FadeState, Hsl};
use crate::audio::{AudioScene, AudioSceneBuilder};
use crate::camera::Camera;
use crate::clock::{CancelToken, Clock};
use crate::curve::CurveBuilder;
use crate::field::{Field, FieldReplicator};
use crate::params::{ParameterSeed, SessionConfig, SessionParams};
use crate::pipeline::RenderPipeline;
use crate::viewport::{Viewport, ViewportController};

/// What one tick changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    pub t: f64,
    pub background: Hsl,
    pub background_changed: bool,
}

pub struct Session {
    pub config: SessionConfig,
    pub params: SessionParams,
    pub field: Field,
    pub driver: AnimationDriver,
    pub fade: FadeState,
    pub camera: Camera,
    pub viewport: ViewportController,
    pub pipeline: RenderPipeline,
    frames: u64,
}

impl Session {
    pub fn new(config: SessionConfig, seed: &mut ParameterSeed, viewport: Viewport) -> Self {
        let params = SessionParams::draw(&config, seed);
        let count = config.line_count(viewport.width, viewport.height);
        let curve = CurveBuilder::new(&config, &params).build(seed);
        let field = FieldReplicator::new(count, params.rotation_span, params.gap).replicate(curve);
        let driver = AnimationDriver::new(count, params.speed, params.depth);
        let fade = FadeState::from_params(&params);
        let camera = Camera::new(viewport.aspect() as f32);
        let controller = ViewportController::new(viewport, &camera);
        let (width, height) = viewport.physical_size();
        let pipeline = RenderPipeline::new(&config, &params, width, height);
        log::info!(
            "[session] lines={} curve_points={} hue={:.1} rare={} width={:.2} height={:.2} rotation={:.3} gap={:.2} speed={:.2} damp={:.3}",
            field.len(),
            field.base().len(),
            params.hue,
            params.rare,
            params.width_ratio,
            params.height_ratio,
            params.rotation_span,
            params.gap,
            params.speed,
            params.afterimage_damp
        );
        Self {
            config,
            params,
            field,
            driver,
            fade,
            camera,
            viewport: controller,
            pipeline,
            frames: 0,
        }
    }

    /// Build the drone scene; draws after the visual parameters.
    pub fn audio_scene(&self, seed: &mut ParameterSeed) -> AudioScene {
        AudioSceneBuilder::new(&self.config, &self.params).build(seed)
    }

    /// One visual tick at `t` seconds since start.
    pub fn tick(&mut self, t: f64) -> FrameInfo {
        self.driver.apply(&mut self.field, t);
        let background_changed = self.fade.tick(t);
        self.frames += 1;
        FrameInfo {
            t,
            background: self.fade.background(),
            background_changed,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Viewport {
        self.viewport.apply(
            width,
            height,
            device_pixel_ratio,
            &mut self.camera,
            &mut self.pipeline,
        )
    }

    pub fn background(&self) -> Hsl {
        self.fade.background()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tick and present until `token` is cancelled; returns the frames run.
    ///
    /// The clock is read once per iteration, before the tick.
    pub fn run_until_cancelled<C, F>(&mut self, clock: &C, token: &CancelToken, mut present: F) -> u64
    where
        C: Clock,
        F: FnMut(&Session, FrameInfo),
    {
        let mut ran = 0;
        while !token.is_cancelled() {
            let info = self.tick(clock.now_secs());
            present(self, info);
            ran += 1;
        }
        ran
    }
}

use crate::camera::Camera;
use crate::constants::MAX_PIXEL_RATIO;
use crate::pipeline::RenderPipeline;

/// Host viewport in CSS pixels plus the pixel ratio applied to drawing buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Drawing-buffer size, never below 1x1.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).floor() as u32).max(1),
            ((self.height * self.pixel_ratio).floor() as u32).max(1),
        )
    }
}

/// Keeps the original vertical framing when the viewport changes.
///
/// The startup height and field of view are captured once; every resize
/// derives the new field of view from them rather than from the previous one.
#[derive(Clone, Debug)]
pub struct ViewportController {
    initial_height: f64,
    initial_tan_half_fov: f64,
    current: Viewport,
}

impl ViewportController {
    pub fn new(initial: Viewport, camera: &Camera) -> Self {
        Self {
            initial_height: initial.height,
            initial_tan_half_fov: ((camera.fov_degrees as f64).to_radians() / 2.0).tan(),
            current: initial,
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    pub fn initial_height(&self) -> f64 {
        self.initial_height
    }

    /// Vertical field of view in degrees for a viewport `height` px tall:
    /// `(360 / PI) * atan(tan(fov0 / 2) * height / height0)`.
    pub fn fov_for_height(&self, height: f64) -> f64 {
        (360.0 / std::f64::consts::PI)
            * (self.initial_tan_half_fov * (height / self.initial_height)).atan()
    }

    /// Recompute camera and pipeline sizing for a resize or orientation change.
    pub fn apply(
        &mut self,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        camera: &mut Camera,
        pipeline: &mut RenderPipeline,
    ) -> Viewport {
        let viewport = Viewport::new(width, height, device_pixel_ratio.min(MAX_PIXEL_RATIO));
        camera.fov_degrees = self.fov_for_height(height) as f32;
        camera.aspect = viewport.aspect() as f32;
        pipeline.set_size(viewport.width, viewport.height, viewport.pixel_ratio);
        self.current = viewport;
        log::debug!(
            "[viewport] {}x{} @{} fov={:.2}",
            width,
            height,
            viewport.pixel_ratio,
            camera.fov_degrees
        );
        viewport
    }
}

use crate::constants::*;
use crate::params::{SessionConfig, SessionParams};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: BLOOM_STRENGTH,
            radius: BLOOM_RADIUS,
            threshold: BLOOM_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthOfFieldSettings {
    pub focus: f32,
    pub aperture: f32,
    pub max_blur: f32,
}

impl Default for DepthOfFieldSettings {
    fn default() -> Self {
        Self {
            focus: DOF_FOCUS,
            aperture: DOF_APERTURE,
            max_blur: DOF_MAX_BLUR,
        }
    }
}

/// One post-processing effect and its fixed settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PostEffect {
    Scene,
    Afterimage { damp: f32 },
    Bloom(BloomSettings),
    DepthOfField(DepthOfFieldSettings),
    FilmGrain { intensity: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    Scene,
    Afterimage,
    Bloom,
    DepthOfField,
    FilmGrain,
}

impl PostEffect {
    pub fn kind(&self) -> StageKind {
        match self {
            PostEffect::Scene => StageKind::Scene,
            PostEffect::Afterimage { .. } => StageKind::Afterimage,
            PostEffect::Bloom(_) => StageKind::Bloom,
            PostEffect::DepthOfField(_) => StageKind::DepthOfField,
            PostEffect::FilmGrain { .. } => StageKind::FilmGrain,
        }
    }
}

/// A stage of the pipeline together with the framebuffer size it renders at.
#[derive(Clone, Debug)]
pub struct Stage {
    pub effect: PostEffect,
    width: u32,
    height: u32,
}

impl Stage {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Fixed, ordered chain of post-processing stages; each stage transforms the
/// previous stage's framebuffer.
#[derive(Clone, Debug)]
pub struct RenderPipeline {
    stages: Vec<Stage>,
}

impl RenderPipeline {
    /// scene -> afterimage -> bloom -> depth of field -> film grain
    pub fn new(config: &SessionConfig, params: &SessionParams, width: u32, height: u32) -> Self {
        let effects = [
            PostEffect::Scene,
            PostEffect::Afterimage {
                damp: params.afterimage_damp,
            },
            PostEffect::Bloom(config.bloom),
            PostEffect::DepthOfField(config.depth_of_field),
            PostEffect::FilmGrain {
                intensity: params.film_noise,
            },
        ];
        let stages = effects
            .into_iter()
            .map(|effect| Stage {
                effect,
                width: width.max(1),
                height: height.max(1),
            })
            .collect();
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.effect.kind()).collect()
    }

    /// Push a new drawing-buffer size (css size times pixel ratio) to every stage.
    pub fn set_size(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        let width = ((css_width * pixel_ratio).floor() as u32).max(1);
        let height = ((css_height * pixel_ratio).floor() as u32).max(1);
        for stage in &mut self.stages {
            stage.width = width;
            stage.height = height;
        }
    }

    /// Output size of the final stage.
    pub fn size(&self) -> (u32, u32) {
        self.stages.last().map(Stage::size).unwrap_or((1, 1))
    }

    pub fn afterimage_damp(&self) -> Option<f32> {
        self.stages.iter().find_map(|s| match s.effect {
            PostEffect::Afterimage { damp } => Some(damp),
            _ => None,
        })
    }

    pub fn bloom(&self) -> Option<BloomSettings> {
        self.stages.iter().find_map(|s| match s.effect {
            PostEffect::Bloom(b) => Some(b),
            _ => None,
        })
    }

    pub fn depth_of_field(&self) -> Option<DepthOfFieldSettings> {
        self.stages.iter().find_map(|s| match s.effect {
            PostEffect::DepthOfField(d) => Some(d),
            _ => None,
        })
    }

    pub fn film_grain(&self) -> Option<f32> {
        self.stages.iter().find_map(|s| match s.effect {
            PostEffect::FilmGrain { intensity } => Some(intensity),
            _ => None,
        })
    }
}

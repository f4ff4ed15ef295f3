use wavefield_core::constants::CAMERA_FAR;

// Front-end constants: DOM hooks, GPU formats and WebAudio realisation details.

// DOM
pub const CANVAS_ID: &str = "app-canvas";
pub const ERROR_DIALOG_ID: &str = "error-dialog";
pub const TITLE_ID: &str = "title";
pub const TITLE_REVEAL_CLASS: &str = "fade-in";
pub const WEBGPU_UNAVAILABLE_HTML: &str = "Your browser does not seem to support \
<a href=\"https://github.com/gpuweb/gpuweb/wiki/Implementation-Status\">WebGPU</a>.";

// GPU
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const VIEW_Z_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;
// background pixels sit at the far plane
pub const VIEW_Z_CLEAR: wgpu::Color = wgpu::Color {
    r: -(CAMERA_FAR as f64),
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const BLOOM_DOWNSAMPLE: u32 = 2;

// Audio
pub const NOISE_BUFFER_SECONDS: f32 = 5.0;
pub const BROWN_NOISE_MAKEUP: f32 = 3.5; // restores level lost in the leaky integrator
pub const DISTORTION_CURVE_LEN: usize = 4096;
pub const REVERB_DECAY_EFOLDS: f32 = 5.0; // tail falls ~43 dB over the decay time
pub const LIMITER_RATIO: f32 = 20.0;
pub const LIMITER_KNEE_DB: f32 = 30.0;
pub const LIMITER_ATTACK_SEC: f32 = 0.003;
pub const LIMITER_RELEASE_SEC: f32 = 0.01;
pub const MAX_DELAY_SECONDS: f64 = 4.0;

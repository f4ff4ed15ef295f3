// Shared visual/audio tuning constants used to build the default session config.

// Curve
pub const CURVE_STEPS: usize = 20;
pub const CURVE_STEP_JITTER: f64 = 0.35 / 2.0;
pub const CURVE_SUBDIVISIONS: usize = 30;
pub const CURVE_WIDTH_RATIO: (f64, f64) = (2.67, 3.67);
pub const CURVE_HEIGHT_RATIO: (f64, f64) = (1.33, 2.33);
pub const CATMULL_ROM_TENSION: f32 = 0.5;

// Field and wave motion
pub const LINE_SPACING_LANDSCAPE_PX: f64 = 60.0; // one line per this many px of width
pub const LINE_SPACING_PORTRAIT_PX: f64 = 30.0; // one line per this many px of height
pub const WAVE_ROTATION_SPAN: (f64, f64) = (-0.2, 0.3);
pub const WAVE_GAP: (f64, f64) = (3.0, 4.0);
pub const WAVE_SPEED: (f64, f64) = (1.67, 3.0);
pub const WAVE_SPEED_MULTIPLIER: f64 = 10.0;
pub const WAVE_DEPTH: f64 = 0.5;

// Background and fade-in
pub const BACKGROUND_HUE: (f64, f64) = (0.0, 360.0);
pub const BACKGROUND_SATURATION: f64 = 85.0;
pub const BACKGROUND_LIGHTNESS: f64 = 55.0;
pub const FADE_DURATION_MS: f64 = 5000.0;
pub const FADE_STEPS: f64 = 100.0;
pub const RARE_SESSION_CHANCE: f64 = 0.05; // coloured fade + seven-voice ensemble

// Post-processing
pub const AFTERIMAGE_DAMP: (f64, f64) = (0.93, 0.98);
pub const BLOOM_STRENGTH: f32 = 0.3;
pub const BLOOM_RADIUS: f32 = 0.1;
pub const BLOOM_THRESHOLD: f32 = 1.0;
pub const DOF_FOCUS: f32 = 0.1;
pub const DOF_APERTURE: f32 = 0.05;
pub const DOF_MAX_BLUR: f32 = 0.005;
pub const FILM_NOISE: f32 = 0.3;

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_POSITION: [f32; 3] = [-4.0, -10.0, 3.0];
pub const CAMERA_ROTATION: [f32; 3] = [1.3, -0.3, 0.3]; // XYZ euler, radians
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Audio
pub const TRANSPORT_BPM: f64 = 140.0;
pub const MASTER_VOLUME_DB: f64 = -8.0;
pub const NOISE_VOLUME_DB: f64 = -15.0;
pub const VOICE_VOLUME_DB: f64 = -6.0;
pub const RARE_VOICE_VOLUME_DB: f64 = -9.0;
pub const MAX_PARTIALS: f64 = 32.0;
pub const AUTO_PAN_RATE_FACTOR: f64 = 0.005;
pub const AUTO_PAN_DEPTH: f64 = 0.7;

// "flat harmonic" drone
pub const DRONE_FREQUENCIES: &[f64] = &[55.0, 96.18975, 123.01156, 150.43251, 205.72674];
// seven-voice drone for the rare session
pub const RARE_DRONE_FREQUENCIES: &[f64] = &[
    110.000, 131.827, 140.853, 150.497, 160.801, 192.709, 205.903,
];

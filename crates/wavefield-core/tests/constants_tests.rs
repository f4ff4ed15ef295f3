// Host-side sanity checks for the tuning constants.
#![allow(clippy::assertions_on_constants)]

use wavefield_core::constants::*;

#[test]
fn ranges_are_ordered() {
    for (lo, hi) in [
        CURVE_WIDTH_RATIO,
        CURVE_HEIGHT_RATIO,
        WAVE_GAP,
        WAVE_SPEED,
        BACKGROUND_HUE,
        AFTERIMAGE_DAMP,
    ] {
        assert!(lo < hi, "{lo} >= {hi}");
    }
}

#[test]
fn curves_are_wider_than_tall() {
    assert!(CURVE_WIDTH_RATIO.0 > CURVE_HEIGHT_RATIO.0);
    assert!(CURVE_WIDTH_RATIO.1 > CURVE_HEIGHT_RATIO.1);
}

#[test]
fn afterimage_never_amplifies() {
    assert!(AFTERIMAGE_DAMP.1 < 1.0);
}

#[test]
fn fade_ends_darker_than_white() {
    assert!(BACKGROUND_LIGHTNESS < 100.0);
    assert!(FADE_STEPS > 0.0);
    assert!(FADE_DURATION_MS > 0.0);
}

#[test]
fn rare_ensemble_is_larger_and_quieter() {
    assert_eq!(DRONE_FREQUENCIES.len(), 5);
    assert_eq!(RARE_DRONE_FREQUENCIES.len(), 7);
    assert!(RARE_VOICE_VOLUME_DB < VOICE_VOLUME_DB);
    assert!(DRONE_FREQUENCIES.windows(2).all(|w| w[0] < w[1]));
    assert!(RARE_DRONE_FREQUENCIES.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn levels_stay_below_unity() {
    assert!(MASTER_VOLUME_DB < 0.0);
    assert!(NOISE_VOLUME_DB < MASTER_VOLUME_DB);
}

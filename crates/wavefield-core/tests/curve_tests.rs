// Host-side tests for the jittered closed spline.

use glam::Vec3;
use wavefield_core::curve::{closed_point, sample_closed};
use wavefield_core::*;

fn make_builder() -> CurveBuilder {
    CurveBuilder {
        steps: 20,
        jitter: 0.175,
        width_ratio: 3.0,
        height_ratio: 2.0,
        subdivisions: 30,
    }
}

fn close(a: Vec3, b: Vec3, tol: f32) -> bool {
    (a - b).abs().max_element() <= tol
}

#[test]
fn curve_is_closed_after_centering() {
    for s in 0..20 {
        let curve = make_builder().build(&mut ParameterSeed::from_seed(s));
        let pts = curve.points();
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!(close(first, last, 1e-6), "seed {s}: {first:?} != {last:?}");
    }
}

#[test]
fn curve_sample_count_is_steps_times_subdivisions_plus_one() {
    let curve = make_builder().build(&mut ParameterSeed::from_seed(1));
    assert_eq!(curve.len(), 20 * 30 + 1);
}

#[test]
fn curve_bounding_box_is_centered() {
    let curve = make_builder().build(&mut ParameterSeed::from_seed(2));
    let (lo, hi) = curve.bounds().expect("non-empty curve");
    let mid = (lo + hi) * 0.5;
    assert!(close(mid, Vec3::ZERO, 1e-5), "center {mid:?}");
    assert!(curve.points().iter().all(|p| p.z == 0.0));
}

#[test]
fn curve_is_deterministic_for_a_fixed_draw_sequence() {
    let a = make_builder().build(&mut ParameterSeed::from_seed(9));
    let b = make_builder().build(&mut ParameterSeed::from_seed(9));
    assert_eq!(a.points(), b.points());
}

#[test]
fn spline_passes_through_control_points() {
    let control = make_builder().control_points(&mut ParameterSeed::from_seed(4));
    let samples = sample_closed(&control, 20 * 30);
    for (i, cp) in control.iter().enumerate() {
        let s = samples[i * 30];
        assert!(close(s, *cp, 1e-4), "control {i}: {cp:?} vs sample {s:?}");
    }
}

#[test]
fn jitter_free_curve_follows_the_ellipse() {
    let builder = CurveBuilder {
        jitter: 0.0,
        ..make_builder()
    };
    let curve = builder.build(&mut ParameterSeed::from_seed(0));
    let (lo, hi) = curve.bounds().unwrap();
    assert!((hi.x - 3.0).abs() < 0.1, "x extent {}", hi.x);
    assert!((lo.x + 3.0).abs() < 0.1);
    assert!((hi.y - 2.0).abs() < 0.1, "y extent {}", hi.y);
    assert!((lo.y + 2.0).abs() < 0.1);
}

#[test]
fn closed_point_wraps_at_both_ends() {
    let control = vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    assert_eq!(closed_point(&control, 0.0), control[0]);
    assert_eq!(closed_point(&control, 1.0), control[0]);
    assert!(close(closed_point(&control, 0.5), control[2], 1e-6));
}

#[test]
fn empty_control_set_yields_empty_curve() {
    assert!(sample_closed(&[], 10).is_empty());
    let mut curve = Curve::default();
    curve.center();
    assert!(curve.is_empty());
    assert!(curve.bounds().is_none());
}

// atan2(x, y) per point, unwrapped so a full turn keeps increasing.
fn unwrapped_angles(points: &[Vec3]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(points.len());
    for p in points {
        let mut a = (p.x as f64).atan2(p.y as f64);
        if let Some(&prev) = out.last() {
            while a < prev - std::f64::consts::PI {
                a += std::f64::consts::TAU;
            }
        }
        out.push(a);
    }
    out
}

#[test]
fn angular_parameter_increases_monotonically() {
    let builder = CurveBuilder {
        jitter: 0.0,
        ..make_builder()
    };
    let control = builder.control_points(&mut ParameterSeed::from_seed(0));
    let angles = unwrapped_angles(&control);
    for (i, w) in angles.windows(2).enumerate() {
        assert!(w[1] > w[0], "control {i}: {} then {}", w[0], w[1]);
    }

    let curve = builder.build(&mut ParameterSeed::from_seed(0));
    let angles = unwrapped_angles(curve.points());
    for (i, w) in angles.windows(2).enumerate() {
        assert!(w[1] > w[0], "sample {i}: {} then {}", w[0], w[1]);
    }
    let turn = angles[angles.len() - 1] - angles[0];
    assert!((turn - std::f64::consts::TAU).abs() < 1e-4, "total turn {turn}");
}

#[test]
fn jittered_control_points_keep_their_angular_order() {
    for s in 0..20 {
        let control = make_builder().control_points(&mut ParameterSeed::from_seed(s));
        let angles = unwrapped_angles(&control);
        assert!(
            angles.windows(2).all(|w| w[1] > w[0]),
            "seed {s}: {angles:?}"
        );
    }
}

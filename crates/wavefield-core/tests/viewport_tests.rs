// Host-side tests for resize handling and render pipeline sizing.

use wavefield_core::*;

fn make_session(width: f64, height: f64) -> Session {
    let mut seed = ParameterSeed::from_seed(11);
    Session::new(
        SessionConfig::default(),
        &mut seed,
        Viewport::new(width, height, 1.0),
    )
}

#[test]
fn halving_height_halves_the_half_fov_tangent() {
    let mut session = make_session(1200.0, 800.0);
    assert_eq!(session.camera.fov_degrees, 75.0);
    session.resize(1200.0, 400.0, 1.0);
    let half = (session.camera.fov_degrees as f64).to_radians() / 2.0;
    let expected = 37.5f64.to_radians().tan() * 0.5;
    assert!((half.tan() - expected).abs() < 1e-5, "{} vs {expected}", half.tan());
}

#[test]
fn fov_is_derived_from_the_initial_height_not_the_previous_one() {
    let mut session = make_session(1200.0, 800.0);
    session.resize(1200.0, 400.0, 1.0);
    session.resize(1200.0, 1600.0, 1.0);
    session.resize(1200.0, 800.0, 1.0);
    assert!((session.camera.fov_degrees - 75.0).abs() < 1e-4);
    assert_eq!(session.viewport.initial_height(), 800.0);
}

#[test]
fn aspect_tracks_the_viewport() {
    let mut session = make_session(1200.0, 800.0);
    session.resize(1024.0, 768.0, 1.0);
    assert_eq!(session.camera.aspect, (1024.0f64 / 768.0) as f32);
}

#[test]
fn pipeline_is_sized_by_css_size_times_pixel_ratio() {
    let mut session = make_session(1200.0, 800.0);
    assert_eq!(session.pipeline.size(), (1200, 800));
    let viewport = session.resize(1000.0, 500.0, 2.0);
    assert_eq!(viewport.pixel_ratio, 2.0);
    for stage in session.pipeline.stages() {
        assert_eq!(stage.size(), (2000, 1000));
    }
}

#[test]
fn pixel_ratio_is_clamped_to_two() {
    let mut session = make_session(1200.0, 800.0);
    let viewport = session.resize(1000.0, 500.0, 3.0);
    assert_eq!(viewport.pixel_ratio, 2.0);
    assert_eq!(session.pipeline.size(), (2000, 1000));
    assert_eq!(session.viewport.current(), viewport);
}

#[test]
fn viewport_physical_size_never_collapses() {
    assert_eq!(Viewport::new(0.0, 0.0, 1.0).physical_size(), (1, 1));
    assert_eq!(Viewport::new(333.3, 200.9, 1.5).physical_size(), (499, 301));
}

#[test]
fn pipeline_stages_are_in_fixed_order() {
    let session = make_session(1200.0, 800.0);
    assert_eq!(
        session.pipeline.kinds(),
        vec![
            StageKind::Scene,
            StageKind::Afterimage,
            StageKind::Bloom,
            StageKind::DepthOfField,
            StageKind::FilmGrain,
        ]
    );
}

#[test]
fn pipeline_carries_session_effect_settings() {
    let session = make_session(1200.0, 800.0);
    let pipeline = &session.pipeline;
    assert_eq!(pipeline.afterimage_damp(), Some(session.params.afterimage_damp));
    assert_eq!(pipeline.bloom(), Some(BloomSettings::default()));
    let dof = pipeline.depth_of_field().unwrap();
    assert_eq!((dof.focus, dof.aperture, dof.max_blur), (0.1, 0.05, 0.005));
    assert_eq!(pipeline.film_grain(), Some(0.3));
}

#[test]
fn camera_keeps_its_placement_across_resizes() {
    let mut session = make_session(1200.0, 800.0);
    let position = session.camera.position;
    let rotation = session.camera.rotation;
    session.resize(500.0, 900.0, 1.0);
    assert_eq!(session.camera.position, position);
    assert_eq!(session.camera.rotation, rotation);
}

#[test]
fn camera_sits_off_axis_with_euler_orientation() {
    let camera = Camera::new(1.5);
    assert_eq!(camera.position, glam::Vec3::new(-4.0, -10.0, 3.0));
    assert_eq!(camera.rotation, glam::Vec3::new(1.3, -0.3, 0.3));
    assert_eq!(camera.fov_degrees, 75.0);
    // the view matrix undoes the placement: the eye maps to the view origin
    let eye = camera.view_matrix().transform_point3(camera.position);
    assert!(eye.length() < 1e-5, "eye in view space {eye:?}");
    // looking down its local -Z, rotated by the XYZ Euler angles
    let forward = camera.orientation() * glam::Vec3::NEG_Z;
    let ahead = camera.position + forward * 10.0;
    let in_view = camera.view_matrix().transform_point3(ahead);
    assert!((in_view - glam::Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
}

// Host-side tests for replicating the base curve into the wave field.

use glam::Vec3;
use std::f64::consts::PI;
use wavefield_core::*;

fn unit_square() -> Curve {
    Curve::from_points(vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ])
}

#[test]
fn replica_rotation_and_scale_follow_index() {
    let n = 12;
    let (r, g) = (0.25, 3.5);
    let field = FieldReplicator::new(n, r, g).replicate(unit_square());
    assert_eq!(field.len(), n);
    for (i, e) in field.elements().iter().enumerate() {
        assert_eq!(e.index(), i);
        assert_eq!(e.rotation(), (i as f64 / n as f64) * PI * r);
        assert_eq!(e.scale(), i as f64 / g);
    }
}

#[test]
fn nested_stack_when_rotation_is_zero_and_gap_is_one() {
    // N=5, R=0, G=1: concentric copies at scales 0..4, identical orientation
    let field = FieldReplicator::new(5, 0.0, 1.0).replicate(unit_square());
    let scales: Vec<f64> = field.elements().iter().map(|e| e.scale()).collect();
    assert_eq!(scales, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    for e in field.elements() {
        assert_eq!(e.rotation(), 0.0);
        let p = e.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(e.scale() as f32, 0.0, 0.0)).length() < 1e-6);
    }
}

#[test]
fn first_replica_collapses_to_a_point() {
    let field = FieldReplicator::new(8, 0.3, 3.2).replicate(unit_square());
    let first = &field.elements()[0];
    assert_eq!(first.scale(), 0.0);
    for p in field.base().points() {
        assert!(first.transform_point(*p).length() < 1e-6);
    }
}

#[test]
fn replicas_share_the_base_curve() {
    let base = unit_square();
    let field = FieldReplicator::new(6, -0.15, 3.0).replicate(base.clone());
    assert_eq!(field.base().points(), base.points());
    assert_eq!(field.instance_transforms().len(), 6);
}

#[test]
fn model_matrix_applies_rotation_then_scale_then_offset() {
    let mut field = FieldReplicator::new(4, 1.0, 1.0).replicate(unit_square());
    let e = &mut field.elements_mut()[2];
    e.offset_z = 0.25;
    // rotation = (2/4) * PI * 1 = PI/2, scale = 2
    let p = e.transform_point(Vec3::new(1.0, 0.0, 0.0));
    assert!((p - Vec3::new(0.0, 2.0, 0.25)).length() < 1e-5, "{p:?}");
}

#[test]
fn empty_field_is_valid() {
    let field = FieldReplicator::new(0, 0.2, 3.0).replicate(unit_square());
    assert!(field.is_empty());
    assert!(field.instance_transforms().is_empty());
}

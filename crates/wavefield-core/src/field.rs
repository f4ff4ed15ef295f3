use crate::curve::Curve;
use glam::{Mat4, Vec3};
use std::f64::consts::PI;

/// One rotated-and-scaled replica of the base curve.
///
/// Rotation and scale are fixed at construction; only `offset_z` changes,
/// once per frame, when the animation driver runs.
#[derive(Clone, Debug)]
pub struct WaveElement {
    index: usize,
    rotation: f64,
    scale: f64,
    pub offset_z: f64,
}

impl WaveElement {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Radians about +Z.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `translate(0, 0, offset_z) * scale * rotate_z`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.offset_z as f32))
            * Mat4::from_scale(Vec3::splat(self.scale as f32))
            * Mat4::from_rotation_z(self.rotation as f32)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.model_matrix().transform_point3(p)
    }
}

/// The full set of replicas sharing one base curve.
#[derive(Clone, Debug)]
pub struct Field {
    base: Curve,
    elements: Vec<WaveElement>,
}

impl Field {
    pub fn base(&self) -> &Curve {
        &self.base
    }

    pub fn elements(&self) -> &[WaveElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [WaveElement] {
        &mut self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Per-replica model matrices in index order, for instanced drawing.
    pub fn instance_transforms(&self) -> Vec<Mat4> {
        self.elements.iter().map(WaveElement::model_matrix).collect()
    }
}

/// Replicates the base curve `count` times with per-index rotation and scale.
#[derive(Clone, Debug)]
pub struct FieldReplicator {
    pub count: usize,
    pub rotation_span: f64,
    pub gap: f64,
}

impl FieldReplicator {
    pub fn new(count: usize, rotation_span: f64, gap: f64) -> Self {
        Self {
            count,
            rotation_span,
            gap,
        }
    }

    #[inline]
    pub fn rotation_for(&self, index: usize) -> f64 {
        (index as f64 / self.count as f64) * PI * self.rotation_span
    }

    /// Replica 0 collapses to a point; that is a valid part of the motif.
    #[inline]
    pub fn scale_for(&self, index: usize) -> f64 {
        index as f64 / self.gap
    }

    pub fn replicate(&self, base: Curve) -> Field {
        let elements = (0..self.count)
            .map(|index| WaveElement {
                index,
                rotation: self.rotation_for(index),
                scale: self.scale_for(index),
                offset_z: 0.0,
            })
            .collect();
        Field { base, elements }
    }
}
